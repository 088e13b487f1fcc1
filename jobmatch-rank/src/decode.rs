//! Strict decoding of model-produced batch evaluations.
//!
//! Scorers backed by a generative model answer in free-form text that is
//! expected to embed one JSON object:
//!
//! ```text
//! {"evaluations": [{"job_index": 0, "match_score": 72, "reasons": "...",
//!                   "skills_matched": ["Rust"], "experience_match": "..."}]}
//! ```
//!
//! Anything that does not decode into that shape is a
//! [`RankError::MalformedResponse`]; there is no lenient keyword guessing.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::RankError;
use crate::types::Evaluation;

#[derive(Debug, Deserialize)]
struct BatchEvaluation {
    evaluations: Vec<RawEvaluation>,
}

#[derive(Debug, Deserialize)]
struct RawEvaluation {
    job_index: i64,
    match_score: f64,
    reasons: String,
    #[serde(default)]
    skills_matched: Vec<String>,
    #[serde(default)]
    experience_match: String,
}

/// Slice out the outermost JSON object: first `{` through last `}`.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Decode the evaluations embedded in `text` for a batch of `batch_len`
/// records.
///
/// - indices outside `0..batch_len` are dropped
/// - a repeated index keeps its first evaluation
/// - scores are clamped to `[0, 100]`
///
/// The result may hold fewer evaluations than the batch has records; the
/// caller decides how to treat the gaps.
///
/// # Errors
///
/// Returns [`RankError::MalformedResponse`] if no JSON object is present or
/// it does not match the expected shape.
pub fn decode_evaluations(text: &str, batch_len: usize) -> Result<Vec<Evaluation>, RankError> {
    let json = extract_json_object(text)
        .ok_or_else(|| RankError::MalformedResponse("no JSON object found in response".into()))?;

    let parsed: BatchEvaluation = serde_json::from_str(json)
        .map_err(|e| RankError::MalformedResponse(format!("invalid evaluation JSON: {e}")))?;

    let mut seen = HashSet::new();
    let mut evaluations = Vec::with_capacity(parsed.evaluations.len());

    for raw in parsed.evaluations {
        let index = match usize::try_from(raw.job_index) {
            Ok(i) if i < batch_len => i,
            _ => {
                tracing::warn!(index = raw.job_index, batch_len, "invalid job index, skipping");
                continue;
            }
        };
        if !seen.insert(index) {
            tracing::warn!(index, "duplicate evaluation, keeping the first");
            continue;
        }

        evaluations.push(Evaluation {
            index_in_batch: index,
            score: raw.match_score.clamp(0.0, 100.0),
            reason: raw.reasons,
            skills_matched: raw.skills_matched,
            experience_match: raw.experience_match,
        });
    }

    Ok(evaluations)
}
