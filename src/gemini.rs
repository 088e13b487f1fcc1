//! Gemini `generateContent` client.
//!
//! One client serves both model-backed collaborators of the ranking
//! pipeline: [`ProfileExtractor`] (resume PDF in, profile summary out) and
//! [`BatchScorer`] (profile plus a batch of job cards in, per-job
//! evaluations out).

use async_trait::async_trait;
use base64::Engine;
use jobmatch_rank::{
    BatchScorer, Evaluation, JobRecord, ProfileExtractor, RankError, decode_evaluations,
};
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::http::{ResponseError, read_success_body};

const PROFILE_PROMPT: &str = "\
You analyze resumes. Read the attached resume and write a structured summary of the candidate:
- job titles the candidate is suited for
- technical skills and areas of expertise
- years of professional experience
- education
- preferred locations and work arrangement (remote, hybrid or on-site), if stated
- industry experience
- notable projects or achievements

Internships do not count as professional experience: a candidate whose only experience is \
internships is a fresher and fits internships and entry-level roles.";

const SCORING_PROMPT: &str = "\
You match jobs to a candidate. For every job below, judge how well it fits the candidate \
profile. Consider title alignment, required skills, seniority (internship, entry level, \
junior, mid-level, senior), company location and work arrangement against the candidate's \
preferences, industry relevance and overall career trajectory. Give each job a match score \
between 0 and 100 and explain it.

Answer with one JSON object and nothing else:
{
  \"evaluations\": [
    {
      \"job_index\": <index of the job as numbered below>,
      \"match_score\": <integer 0-100>,
      \"reasons\": \"<explanation of the score>\",
      \"skills_matched\": [\"<candidate skills the job asks for>\"],
      \"experience_match\": \"<how the experience level fits>\"
    }
  ]
}
Evaluate ALL jobs and use job_index to refer to each one.";

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if it has any.
    fn first_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Render `batch` as numbered JSON cards.
fn job_cards(batch: &[JobRecord]) -> String {
    let mut cards = String::new();
    for (i, job) in batch.iter().enumerate() {
        let card = serde_json::to_string_pretty(job).unwrap_or_else(|_| job.title.clone());
        cards.push_str(&format!("Job {i}:\n{card}\n\n"));
    }
    cards
}

fn scoring_prompt(context: &str, batch: &[JobRecord]) -> String {
    format!(
        "{SCORING_PROMPT}\n\nCandidate profile:\n'''\n{context}\n'''\n\n\
         The {} jobs to evaluate:\n'''\n{}'''",
        batch.len(),
        job_cards(batch)
    )
}

// ── Client ───────────────────────────────────────────────────────────────

/// Failure of one `generateContent` call.
#[derive(Debug, thiserror::Error)]
enum GeminiError {
    #[error("model.api_key is not set (GEMINI_API_KEY)")]
    MissingKey,

    #[error("{model} request failed: {source}")]
    Request {
        model: String,
        source: reqwest::Error,
    },

    #[error("{model} {source}")]
    Response {
        model: String,
        source: ResponseError,
    },

    #[error("{model} response: {source}")]
    Decode {
        model: String,
        source: serde_json::Error,
    },

    #[error("{model} returned no candidates")]
    NoCandidates { model: String },
}

/// Gemini client implementing [`ProfileExtractor`] and [`BatchScorer`].
pub struct GeminiClient {
    client: reqwest::Client,
    config: ModelConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client sending requests through `client`.
    pub fn new(client: reqwest::Client, config: ModelConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Run one `generateContent` call and return the answer text.
    async fn generate(&self, model: &str, parts: Vec<Part<'_>>) -> Result<String, GeminiError> {
        if self.config.api_key.is_empty() {
            return Err(GeminiError::MissingKey);
        }

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| GeminiError::Request {
                model: model.to_owned(),
                source,
            })?;

        let body = read_success_body(response)
            .await
            .map_err(|source| GeminiError::Response {
                model: model.to_owned(),
                source,
            })?;

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|source| GeminiError::Decode {
                model: model.to_owned(),
                source,
            })?;

        parsed.first_text().ok_or_else(|| GeminiError::NoCandidates {
            model: model.to_owned(),
        })
    }
}

#[async_trait]
impl ProfileExtractor for GeminiClient {
    async fn extract(&self, document: &[u8]) -> Result<String, RankError> {
        if document.is_empty() {
            return Err(RankError::Extraction("document is empty".into()));
        }

        let parts = vec![
            Part::Inline {
                inline_data: Blob {
                    mime_type: "application/pdf",
                    data: base64::engine::general_purpose::STANDARD.encode(document),
                },
            },
            Part::Text {
                text: PROFILE_PROMPT,
            },
        ];

        let profile = self
            .generate(&self.config.profile_model, parts)
            .await
            .map_err(|e| RankError::Extraction(e.to_string()))?;
        tracing::debug!(
            model = %self.config.profile_model,
            chars = profile.len(),
            "candidate profile extracted"
        );
        Ok(profile)
    }
}

#[async_trait]
impl BatchScorer for GeminiClient {
    async fn score(
        &self,
        context: &str,
        batch: &[JobRecord],
    ) -> Result<Vec<Evaluation>, RankError> {
        let prompt = scoring_prompt(context, batch);
        let answer = self
            .generate(&self.config.scoring_model, vec![Part::Text { text: &prompt }])
            .await
            .map_err(|e| RankError::Scoring(e.to_string()))?;

        let evaluations = decode_evaluations(&answer, batch.len())?;
        tracing::debug!(
            model = %self.config.scoring_model,
            jobs = batch.len(),
            evaluations = evaluations.len(),
            "batch evaluated"
        );
        Ok(evaluations)
    }
}
