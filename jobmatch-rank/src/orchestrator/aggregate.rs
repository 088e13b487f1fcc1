//! Merge batch outputs into one score-sorted sequence.
//!
//! Ties keep their relative input order (stable sort). Inputs arrive in
//! directive order and then batch order, both fixed before any task runs,
//! so the final order never depends on completion timing.

use std::cmp::Ordering;

use crate::types::ScoredJob;

/// Ranking order: higher score first. `f64::total_cmp` keeps it a total
/// order even for values that `partial_cmp` cannot compare.
pub fn rank_order(a: &ScoredJob, b: &ScoredJob) -> Ordering {
    b.score.total_cmp(&a.score)
}

/// Concatenate `batch_results` and sort by score, descending.
pub fn merge_and_sort<I>(batch_results: I) -> Vec<ScoredJob>
where
    I: IntoIterator<Item = Vec<ScoredJob>>,
{
    let mut merged: Vec<ScoredJob> = batch_results.into_iter().flatten().collect();
    merged.sort_by(rank_order);
    merged
}
