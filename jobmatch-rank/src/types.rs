//! Core types: job records, search directives, evaluations, scored jobs and
//! pagination.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RankError;

/// Smallest page size a caller may request.
pub const MIN_PAGE_SIZE: usize = 1;
/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;
/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// A single job listing as returned by a search provider.
///
/// Records carry no identity: the same posting returned by two providers
/// appears twice in the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Job title.
    pub title: String,
    /// Hiring company.
    #[serde(default)]
    pub company: String,
    /// Location, or `"Remote"` for remote postings.
    #[serde(default)]
    pub location: String,
    /// Free-form description or summary.
    #[serde(default)]
    pub description: String,
    /// Link to the posting or application page.
    pub url: String,
    /// Name of the provider that produced this record.
    pub source: String,
}

/// An instruction to run `query` against the provider registered as
/// `provider`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDirective {
    /// Registered provider name.
    pub provider: String,
    /// Query text handed to the provider verbatim.
    pub query: String,
}

impl SearchDirective {
    /// Create a directive for `provider` with `query`.
    pub fn new(provider: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            query: query.into(),
        }
    }
}

/// One scoring verdict for a record inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// 0-based position of the evaluated record within its batch.
    pub index_in_batch: usize,
    /// Match score in `[0, 100]`.
    pub score: f64,
    /// Explanation of the score.
    pub reason: String,
    /// Candidate skills that matched the posting, in model order.
    pub skills_matched: Vec<String>,
    /// Assessment of experience-level fit.
    pub experience_match: String,
}

/// Where a [`ScoredJob`]'s score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOrigin {
    /// Scored by the batch scorer.
    Evaluated,
    /// The scorer answered for the batch but skipped this record; a neutral
    /// default was substituted.
    Recovered,
    /// Deterministic position-based score; the scorer was unavailable.
    Fallback,
}

/// A job record together with its match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredJob {
    /// The underlying listing.
    pub job: JobRecord,
    /// Match score in `[0, 100]`.
    pub score: f64,
    /// Why the record received this score.
    pub match_reason: String,
    /// Skills that matched, in scorer order.
    pub skills_matched: Vec<String>,
    /// Experience-level assessment.
    pub experience_match: String,
    /// Provenance of the score.
    pub origin: ScoreOrigin,
}

/// A requested work arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkArrangement {
    /// Fully remote.
    Remote,
    /// On site at the employer's location.
    Onsite,
    /// Mix of remote and on-site.
    Hybrid,
}

impl WorkArrangement {
    /// Lowercase wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Onsite => "onsite",
            Self::Hybrid => "hybrid",
        }
    }

    /// Whether this arrangement only makes sense with a physical location.
    pub fn needs_location(&self) -> bool {
        matches!(self, Self::Onsite | Self::Hybrid)
    }
}

impl fmt::Display for WorkArrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WorkArrangement {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "onsite" => Ok(Self::Onsite),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(RankError::InvalidRequest(format!(
                "invalid location type '{other}': must be 'remote', 'onsite', or 'hybrid'"
            ))),
        }
    }
}

/// Where and how the candidate wants to work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPreference {
    /// Acceptable arrangements. Empty means remote only.
    #[serde(default)]
    pub types: Vec<WorkArrangement>,
    /// Preferred locations for on-site or hybrid work.
    #[serde(default)]
    pub locations: Vec<String>,
}

impl LocationPreference {
    /// Returns a copy with the remote default applied when no arrangement
    /// was given.
    pub fn normalized(&self) -> Self {
        let mut pref = self.clone();
        if pref.types.is_empty() {
            pref.types.push(WorkArrangement::Remote);
        }
        pref
    }

    /// Checks that on-site and hybrid requests name at least one location.
    pub fn validate(&self) -> Result<(), RankError> {
        let needs_location = self.types.iter().any(WorkArrangement::needs_location);
        if needs_location && self.locations.iter().all(|l| l.trim().is_empty()) {
            return Err(RankError::InvalidRequest(
                "at least one location is required for onsite and hybrid positions".into(),
            ));
        }
        Ok(())
    }

    /// Renders the preference as extra context for the scorer.
    ///
    /// Returns an empty string when no arrangement is set.
    pub fn to_context(&self) -> String {
        if self.types.is_empty() {
            return String::new();
        }
        let types: Vec<&str> = self.types.iter().map(WorkArrangement::name).collect();
        let mut context = format!("\nWork arrangement preferences: {}", types.join(", "));
        if !self.locations.is_empty() {
            context.push_str(&format!(
                "\nPreferred locations: {}",
                self.locations.join(", ")
            ));
        }
        context
    }
}

/// Which page of the ranked set to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationRequest {
    /// 1-based page number.
    pub page: usize,
    /// Items per page, within `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`.
    pub page_size: usize,
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationRequest {
    /// Build a validated pagination request.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::InvalidRequest`] for page 0 or a page size
    /// outside `[1, 100]`.
    pub fn new(page: usize, page_size: usize) -> Result<Self, RankError> {
        let request = Self { page, page_size };
        request.validate()?;
        Ok(request)
    }

    /// Validates an already-constructed request.
    pub fn validate(&self) -> Result<(), RankError> {
        if self.page == 0 {
            return Err(RankError::InvalidRequest("page must be >= 1".into()));
        }
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(RankError::InvalidRequest(format!(
                "page_size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }
}

/// One page of the ranked result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult {
    /// The jobs on this page, best match first.
    pub items: Vec<ScoredJob>,
    /// Number of ranked jobs across all pages.
    pub total_count: usize,
    /// The page that was requested.
    pub page: usize,
    /// The page size that was requested.
    pub page_size: usize,
    /// `ceil(total_count / page_size)`.
    pub total_pages: usize,
}
