//! # jobmatch-rank
//!
//! Concurrent aggregation and ranking of job listings for jobmatch.
//!
//! Given a candidate document and a set of search directives, the crate
//! queries several independent search providers, scores the combined
//! listings against the candidate's profile under a bounded external-call
//! budget, and returns one page of the ranked result. It owns no transport:
//! providers, the profile extractor and the batch scorer are injected
//! through the traits in [`provider`].
//!
//! ## Design
//!
//! - One task per search directive; a failing or unknown provider
//!   contributes zero records and never aborts the others
//! - At most 60 candidates are scored, in batches of 10, with at most 3
//!   scoring calls in flight (counting semaphore)
//! - A failed batch is ranked by position (`80, 75, 70, ...`); skipped
//!   records in a partial answer get a neutral 50
//! - If the profile cannot be extracted, the whole capped set is ranked by
//!   position without any scoring call
//! - Scores below 30 are dropped; the rest are sorted by score, ties in
//!   aggregation order, and paginated
//!
//! Only an invalid request is reported as an error. Every failure inside
//! the pipeline, a panicking collaborator included, degrades to a complete,
//! bounded response.
//!
//! ## Example
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use jobmatch_rank::{BatchScorer, ProfileExtractor, ProviderRegistry};
//! # async fn example(
//! #     registry: ProviderRegistry,
//! #     extractor: Arc<dyn ProfileExtractor>,
//! #     scorer: Arc<dyn BatchScorer>,
//! #     resume: Vec<u8>,
//! # ) -> jobmatch_rank::Result<()> {
//! use jobmatch_rank::{
//!     LocationPreference, PaginationRequest, RankingConfig, RankingPipeline, SearchDirective,
//! };
//!
//! let pipeline = RankingPipeline::new(registry, extractor, scorer, RankingConfig::default())?;
//! let page = pipeline
//!     .fetch_ranked(
//!         &resume,
//!         &LocationPreference::default(),
//!         &[SearchDirective::new("jsearch", "Junior Rust Developer")],
//!         PaginationRequest::default(),
//!     )
//!     .await?;
//! for job in &page.items {
//!     println!("{:>5.1}  {} @ {}", job.score, job.job.title, job.job.company);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod orchestrator;
pub mod provider;
pub mod types;

pub use config::RankingConfig;
pub use decode::decode_evaluations;
pub use error::{RankError, Result};
pub use orchestrator::invoke::ProviderInvoker;
pub use orchestrator::pipeline::RankingPipeline;
pub use orchestrator::scorer::BoundedConcurrentScorer;
pub use provider::{BatchScorer, ProfileExtractor, ProviderRegistry, SearchProvider};
pub use types::{
    Evaluation, JobRecord, LocationPreference, PaginatedResult, PaginationRequest, ScoreOrigin,
    ScoredJob, SearchDirective, WorkArrangement,
};
