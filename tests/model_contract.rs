//! Gemini Client Contract Tests
//!
//! These tests verify the `generateContent` request format and response
//! handling for both model-backed collaborators:
//! - Profile extraction sends the resume inline as base64 PDF
//! - Batch scoring sends numbered job cards and decodes evaluations
//! - Error statuses and unusable answers map to extraction/scoring errors

use jobmatch::GeminiClient;
use jobmatch::config::ModelConfig;
use jobmatch_rank::{BatchScorer, JobRecord, ProfileExtractor, RankError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROFILE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";
const SCORING_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(
        reqwest::Client::new(),
        ModelConfig {
            api_key: "gemini-key".into(),
            base_url: server.uri(),
            ..Default::default()
        },
    )
}

fn text_answer(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

fn jobs(n: usize) -> Vec<JobRecord> {
    (0..n)
        .map(|i| JobRecord {
            title: format!("Engineer {i}"),
            company: "Acme".into(),
            location: "Remote".into(),
            description: String::new(),
            url: format!("https://acme.example/{i}"),
            source: "JSearch".into(),
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Profile extraction
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_request_sends_pdf_inline() {
    let server = MockServer::start().await;

    // base64("%PDF-1.7") == "JVBERi0xLjc="
    Mock::given(method("POST"))
        .and(path(PROFILE_PATH))
        .and(header("x-goog-api-key", "gemini-key"))
        .and(body_partial_json(json!({
            "contents": [{
                "role": "user",
                "parts": [{"inlineData": {"mimeType": "application/pdf", "data": "JVBERi0xLjc="}}]
            }]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(text_answer("Mid-level Rust engineer")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let profile = client(&server)
        .extract(b"%PDF-1.7")
        .await
        .expect("extraction succeeds");
    assert_eq!(profile, "Mid-level Rust engineer");
}

#[tokio::test]
async fn profile_without_candidates_is_extraction_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PROFILE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let err = client(&server).extract(b"%PDF-1.7").await.unwrap_err();
    assert!(matches!(err, RankError::Extraction(_)));
}

#[tokio::test]
async fn profile_http_error_is_extraction_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PROFILE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "API key not valid"}
        })))
        .mount(&server)
        .await;

    let err = client(&server).extract(b"%PDF-1.7").await.unwrap_err();
    assert!(matches!(err, RankError::Extraction(_)));
    let message = err.to_string();
    assert!(message.contains("403"));
    assert!(!message.contains("gemini-key"));
}

// ────────────────────────────────────────────────────────────────────────────
// Batch scoring
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn scoring_request_carries_context_and_cards() {
    let server = MockServer::start().await;

    let answer = "Here is my evaluation:\n```json\n{\"evaluations\": [\
        {\"job_index\": 1, \"match_score\": 64, \"reasons\": \"decent\", \"skills_matched\": [\"Rust\"], \"experience_match\": \"ok\"},\
        {\"job_index\": 0, \"match_score\": 88, \"reasons\": \"strong\", \"skills_matched\": [], \"experience_match\": \"good\"}\
    ]}\n```";

    Mock::given(method("POST"))
        .and(path(SCORING_PATH))
        .and(body_string_contains("Preferred locations: Berlin"))
        .and(body_string_contains("Job 1:"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_answer(answer)))
        .expect(1)
        .mount(&server)
        .await;

    let evaluations = client(&server)
        .score("Rust engineer\nPreferred locations: Berlin", &jobs(2))
        .await
        .expect("scoring succeeds");

    assert_eq!(evaluations.len(), 2);
    let first = evaluations
        .iter()
        .find(|e| e.index_in_batch == 0)
        .expect("job 0 evaluated");
    assert!((first.score - 88.0).abs() < f64::EPSILON);
    assert_eq!(first.reason, "strong");
}

#[tokio::test]
async fn prose_answer_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SCORING_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_answer("Job 0 looks like a great match, about 80%.")),
        )
        .mount(&server)
        .await;

    let err = client(&server).score("profile", &jobs(1)).await.unwrap_err();
    assert!(matches!(err, RankError::MalformedResponse(_)));
}

#[tokio::test]
async fn scoring_http_error_is_scoring_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SCORING_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server).score("profile", &jobs(3)).await.unwrap_err();
    assert!(matches!(err, RankError::Scoring(_)));
}
