//! LinkUp job search provider.
//!
//! Sends a structured-output search and converts the returned job
//! announcements into [`JobRecord`]s. Endpoints that answer in the older
//! `{"results": [...]}` shape are still accepted, with defaults for the
//! fields that shape lacks.

use async_trait::async_trait;
use jobmatch_rank::{JobRecord, RankError, SearchProvider};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::LinkUpConfig;
use crate::http::read_success_body;

/// Registry name of this provider.
pub const NAME: &str = "linkup";

/// `source` value stamped on every record.
pub const SOURCE: &str = "LinkUp-Structured";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    q: &'a str,
    depth: &'a str,
    output_type: &'static str,
    include_images: bool,
    structured_output_schema: Value,
}

/// JSON schema for the structured answer.
fn announcement_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "jobs": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "job_title": {
                            "type": "string",
                            "description": "Job Title mentioned in the job announcement"
                        },
                        "experience_level": {
                            "type": "string",
                            "enum": ["internship", "entry level", "junior", "mid-level", "senior"],
                            "description": "Required experience level"
                        },
                        "required_skills": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "List of required skills for the job"
                        },
                        "remote": {
                            "type": "boolean",
                            "description": "Whether the job is remote or not"
                        },
                        "location": {
                            "type": "string",
                            "description": "Location, if there is any location restriction in the job"
                        },
                        "salary": {
                            "type": "integer",
                            "description": "Yearly salary, when available"
                        },
                        "job_post_url": {
                            "type": "string",
                            "description": "URL to the job announcement"
                        },
                        "company": {
                            "type": "string",
                            "description": "Company hiring for the job"
                        }
                    },
                    "required": [
                        "job_title", "experience_level", "required_skills",
                        "remote", "job_post_url", "company"
                    ]
                }
            }
        },
        "required": ["jobs"]
    })
}

#[derive(Debug, Deserialize)]
struct Announcements {
    jobs: Vec<Announcement>,
}

#[derive(Debug, Deserialize)]
struct Announcement {
    job_title: String,
    #[serde(default)]
    experience_level: String,
    #[serde(default)]
    required_skills: Vec<String>,
    #[serde(default)]
    remote: bool,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    salary: Option<i64>,
    #[serde(default)]
    job_post_url: String,
    #[serde(default)]
    company: String,
}

#[derive(Debug, Deserialize)]
struct LegacyResults {
    results: Vec<LegacyResult>,
}

#[derive(Debug, Deserialize)]
struct LegacyResult {
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
}

impl From<LegacyResult> for Announcement {
    fn from(result: LegacyResult) -> Self {
        Announcement {
            job_title: result.name,
            experience_level: "mid-level".into(),
            required_skills: Vec::new(),
            remote: false,
            location: None,
            salary: None,
            job_post_url: result.url,
            company: "Unknown".into(),
        }
    }
}

impl From<Announcement> for JobRecord {
    fn from(job: Announcement) -> Self {
        let location = match job.location {
            Some(location) if !job.remote => location,
            _ => "Remote".to_owned(),
        };

        let mut description = format!(
            "Experience Level: {}\nRequired Skills: {}",
            job.experience_level,
            job.required_skills.join(", ")
        );
        if let Some(salary) = job.salary {
            description.push_str(&format!("\nSalary: ${salary}"));
        }

        JobRecord {
            title: job.job_title,
            company: job.company,
            location,
            description,
            url: job.job_post_url,
            source: SOURCE.to_owned(),
        }
    }
}

/// Decode a LinkUp answer, accepting the structured and the legacy shape.
fn decode_announcements(body: &str) -> Result<Vec<Announcement>, RankError> {
    match serde_json::from_str::<Announcements>(body) {
        Ok(parsed) => Ok(parsed.jobs),
        Err(structured_err) => match serde_json::from_str::<LegacyResults>(body) {
            Ok(legacy) => {
                tracing::debug!(
                    provider = NAME,
                    count = legacy.results.len(),
                    "converting legacy search results"
                );
                Ok(legacy.results.into_iter().map(Announcement::from).collect())
            }
            Err(legacy_err) => Err(RankError::MalformedResponse(format!(
                "LinkUp response: {legacy_err} (structured: {structured_err})"
            ))),
        },
    }
}

/// LinkUp provider.
pub struct LinkUpProvider {
    client: reqwest::Client,
    config: LinkUpConfig,
}

impl std::fmt::Debug for LinkUpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkUpProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LinkUpProvider {
    /// Create a provider sending requests through `client`.
    pub fn new(client: reqwest::Client, config: LinkUpConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl SearchProvider for LinkUpProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn search(&self, query: &str) -> Result<Vec<JobRecord>, RankError> {
        if self.config.api_key.is_empty() || self.config.api_url.is_empty() {
            return Err(RankError::Config(
                "LinkUp requires linkup.api_key and linkup.api_url (LINKUP_API_KEY / LINKUP_API_URL)"
                    .into(),
            ));
        }

        let request = SearchRequest {
            q: query,
            depth: &self.config.depth,
            output_type: "structured",
            include_images: false,
            structured_output_schema: announcement_schema(),
        };
        tracing::trace!(provider = NAME, query, "sending search request");

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RankError::Provider(format!("LinkUp request failed: {e}")))?;

        let body = read_success_body(response)
            .await
            .map_err(|e| RankError::Provider(format!("LinkUp {e}")))?;

        let jobs: Vec<JobRecord> = decode_announcements(&body)?
            .into_iter()
            .map(JobRecord::from)
            .collect();
        tracing::debug!(provider = NAME, count = jobs.len(), "search completed");
        Ok(jobs)
    }
}
