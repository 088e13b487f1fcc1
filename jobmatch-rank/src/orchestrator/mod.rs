//! Ranking orchestrator: provider fan-out, batching, bounded scoring,
//! aggregation and pagination.
//!
//! This module fans out search directives to providers concurrently, caps
//! the candidate set, scores it in bounded-concurrency batches with
//! deterministic fallback, merges the survivors into one score-sorted
//! sequence and slices out the requested page.

pub mod aggregate;
pub mod batch;
pub mod invoke;
pub(crate) mod join;
pub mod paginate;
pub mod pipeline;
pub mod scorer;
pub mod scoring;
