//! JSearch (RapidAPI) job search provider.
//!
//! `GET https://{host}/search?query=…&num_pages=…` authenticated with the
//! `X-RapidAPI-Key` and `X-RapidAPI-Host` headers. Responses look like
//! `{"data": [{"job_title", "employer_name", "job_is_remote", "job_city",
//! "job_description", "job_apply_link"}]}`.

use async_trait::async_trait;
use jobmatch_rank::{JobRecord, RankError, SearchProvider};
use serde::Deserialize;

use crate::config::JSearchConfig;
use crate::http::read_success_body;

/// Registry name of this provider.
pub const NAME: &str = "jsearch";

/// `source` value stamped on every record.
pub const SOURCE: &str = "JSearch";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Posting>,
}

#[derive(Debug, Deserialize)]
struct Posting {
    #[serde(default)]
    job_title: Option<String>,
    #[serde(default)]
    employer_name: Option<String>,
    #[serde(default)]
    job_is_remote: Option<bool>,
    #[serde(default)]
    job_city: Option<String>,
    #[serde(default)]
    job_description: Option<String>,
    #[serde(default)]
    job_apply_link: Option<String>,
}

impl From<Posting> for JobRecord {
    fn from(posting: Posting) -> Self {
        let location = if posting.job_is_remote.unwrap_or(false) {
            "Remote".to_owned()
        } else {
            posting.job_city.unwrap_or_default()
        };
        JobRecord {
            title: posting.job_title.unwrap_or_default(),
            company: posting.employer_name.unwrap_or_default(),
            location,
            description: posting.job_description.unwrap_or_default(),
            url: posting.job_apply_link.unwrap_or_default(),
            source: SOURCE.to_owned(),
        }
    }
}

/// JSearch provider.
pub struct JSearchProvider {
    client: reqwest::Client,
    config: JSearchConfig,
}

impl std::fmt::Debug for JSearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JSearchProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JSearchProvider {
    /// Create a provider sending requests through `client`.
    pub fn new(client: reqwest::Client, config: JSearchConfig) -> Self {
        Self { client, config }
    }

    fn search_url(&self, query: &str) -> Result<url::Url, RankError> {
        let base = format!("{}/search", self.config.endpoint_base());
        let num_pages = self.config.num_pages.to_string();
        url::Url::parse_with_params(&base, [("query", query), ("num_pages", num_pages.as_str())])
            .map_err(|e| RankError::Config(format!("invalid JSearch endpoint {base}: {e}")))
    }
}

#[async_trait]
impl SearchProvider for JSearchProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn search(&self, query: &str) -> Result<Vec<JobRecord>, RankError> {
        if self.config.api_key.is_empty() || self.config.host.is_empty() {
            return Err(RankError::Config(
                "JSearch requires jsearch.api_key and jsearch.host (RAPIDAPI_KEY / RAPIDAPI_HOST)"
                    .into(),
            ));
        }

        let url = self.search_url(query)?;
        tracing::trace!(provider = NAME, query, "sending search request");

        let response = self
            .client
            .get(url)
            .header("X-RapidAPI-Key", &self.config.api_key)
            .header("X-RapidAPI-Host", &self.config.host)
            .send()
            .await
            .map_err(|e| RankError::Provider(format!("JSearch request failed: {e}")))?;

        let body = read_success_body(response)
            .await
            .map_err(|e| RankError::Provider(format!("JSearch {e}")))?;

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| RankError::MalformedResponse(format!("JSearch response: {e}")))?;

        let jobs: Vec<JobRecord> = parsed.data.into_iter().map(JobRecord::from).collect();
        tracing::debug!(provider = NAME, count = jobs.len(), "search completed");
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_posting_gets_remote_location() {
        let posting: Posting = serde_json::from_str(
            r#"{
                "job_title": "Rust Engineer",
                "employer_name": "Ferrous",
                "job_is_remote": true,
                "job_city": "Berlin",
                "job_description": "Build things",
                "job_apply_link": "https://ferrous.example/apply"
            }"#,
        )
        .expect("valid posting");
        let job = JobRecord::from(posting);
        assert_eq!(job.location, "Remote");
        assert_eq!(job.company, "Ferrous");
        assert_eq!(job.source, "JSearch");
    }

    #[test]
    fn onsite_posting_keeps_city_and_tolerates_nulls() {
        let posting: Posting = serde_json::from_str(
            r#"{
                "job_title": "Backend Developer",
                "employer_name": null,
                "job_is_remote": false,
                "job_city": "Lisbon",
                "job_apply_link": "https://jobs.example/1"
            }"#,
        )
        .expect("valid posting");
        let job = JobRecord::from(posting);
        assert_eq!(job.location, "Lisbon");
        assert_eq!(job.company, "");
        assert_eq!(job.description, "");
    }

    #[test]
    fn search_url_encodes_query() {
        let provider = JSearchProvider::new(reqwest::Client::new(), JSearchConfig::default());
        let url = provider.search_url("senior rust & go").expect("valid url");
        assert_eq!(url.host_str(), Some("jsearch.p.rapidapi.com"));
        assert_eq!(url.path(), "/search");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("query".to_owned(), "senior rust & go".to_owned()),
                ("num_pages".to_owned(), "10".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn missing_key_is_config_error() {
        let provider = JSearchProvider::new(reqwest::Client::new(), JSearchConfig::default());
        let result = provider.search("rust").await;
        assert!(matches!(result, Err(RankError::Config(_))));
    }
}
