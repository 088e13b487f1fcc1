//! Error types for the jobmatch-rank crate.
//!
//! Every variant maps to one failure class of the ranking pipeline. Most of
//! them are recovered inside the pipeline (a failed provider contributes no
//! records, a failed batch is fallback-ranked) and only surface to callers
//! of the individual collaborators. No API keys or document content appear
//! in error messages.

/// Errors produced by the ranking pipeline and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum RankError {
    /// A directive named a provider that is not registered.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// A search provider call failed (network, HTTP status, transport).
    #[error("provider error: {0}")]
    Provider(String),

    /// An external response could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The candidate profile could not be extracted from the document.
    #[error("profile extraction failed: {0}")]
    Extraction(String),

    /// A batch scoring call failed.
    #[error("scoring failed: {0}")]
    Scoring(String),

    /// Invalid ranking or collaborator configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The caller supplied a structurally invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A spawned unit of work panicked or was aborted.
    #[error("task failed: {0}")]
    Task(String),
}

/// Convenience type alias for jobmatch-rank results.
pub type Result<T> = std::result::Result<T, RankError>;
