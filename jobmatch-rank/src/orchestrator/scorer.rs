//! Bounded-concurrency batch scoring with per-batch fallback.
//!
//! Candidate sets are split into contiguous batches, each scored by its own
//! task, even when there is only one. A counting semaphore caps the number of scoring calls in
//! flight; the permit is an RAII guard held only around the call, so it is
//! released on success, error and panic alike.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::RankingConfig;
use crate::error::RankError;
use crate::provider::BatchScorer;
use crate::types::{JobRecord, ScoredJob};

use super::batch::split_batches;
use super::join::IndexedTasks;
use super::scoring::{apply_evaluations, fallback_ranking, filter_by_threshold};

/// Scores candidate sets through a [`BatchScorer`] under a concurrency
/// ceiling.
#[derive(Clone)]
pub struct BoundedConcurrentScorer {
    scorer: Arc<dyn BatchScorer>,
    config: RankingConfig,
}

impl std::fmt::Debug for BoundedConcurrentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedConcurrentScorer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BoundedConcurrentScorer {
    /// Create a scorer over `scorer` using the batch and threshold settings
    /// of `config`.
    pub fn new(scorer: Arc<dyn BatchScorer>, config: RankingConfig) -> Self {
        Self { scorer, config }
    }

    /// Score `jobs` against `context` and return the survivors of threshold
    /// filtering, in batch order.
    ///
    /// - `jobs.len() <= batch_size`: a single scoring call
    /// - otherwise: `ceil(n / batch_size)` batches, at most
    ///   `max_concurrent_batches` calls in flight, all joined before return
    ///
    /// Every call runs in its own task. A batch whose call fails or panics
    /// is fallback-ranked by its in-batch positions; failures never leak to
    /// other batches or to the caller.
    pub async fn score_all(&self, context: &str, jobs: &[JobRecord]) -> Vec<ScoredJob> {
        if jobs.is_empty() {
            return Vec::new();
        }

        let batches = split_batches(jobs, self.config.batch_size);
        let permits = Arc::new(Semaphore::new(self.config.max_concurrent_batches));
        let context: Arc<str> = Arc::from(context);
        let mut tasks = IndexedTasks::new();

        tracing::debug!(
            jobs = jobs.len(),
            batches = batches.len(),
            max_concurrent = self.config.max_concurrent_batches,
            "scoring batches"
        );

        for (index, batch) in batches.iter().enumerate() {
            let scorer = Arc::clone(&self.scorer);
            let permits = Arc::clone(&permits);
            let context = Arc::clone(&context);
            let config = self.config.clone();
            let batch = batch.clone();

            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| RankError::Task(format!("scoring permit unavailable: {e}")))?;
                Ok::<_, RankError>(
                    score_batch(scorer.as_ref(), &context, &batch, &config, index).await,
                )
            });
        }

        let outcomes = tasks.join_all().await;

        let mut all_scored = Vec::new();
        for (index, (batch, outcome)) in batches.iter().zip(outcomes).enumerate() {
            match outcome.and_then(|inner| inner) {
                Ok(scored) => all_scored.extend(scored),
                Err(err) => {
                    tracing::warn!(batch = index + 1, error = %err, "batch task failed, using fallback");
                    let ranked = fallback_ranking(batch, &self.config);
                    all_scored.extend(filter_by_threshold(ranked, self.config.min_score));
                }
            }
        }

        tracing::debug!(
            batches = batches.len(),
            count = all_scored.len(),
            "collected batch results"
        );

        all_scored
    }
}

/// Score one batch: call the scorer, recover partial answers, fall back on
/// failure, then apply the threshold.
async fn score_batch(
    scorer: &dyn BatchScorer,
    context: &str,
    batch: &[JobRecord],
    config: &RankingConfig,
    index: usize,
) -> Vec<ScoredJob> {
    tracing::debug!(batch = index + 1, jobs = batch.len(), "processing batch");

    let scored = match scorer.score(context, batch).await {
        Ok(evaluations) => apply_evaluations(batch, evaluations, config),
        Err(err) => {
            tracing::warn!(batch = index + 1, error = %err, "batch scoring failed, using fallback");
            fallback_ranking(batch, config)
        }
    };

    let kept = filter_by_threshold(scored, config.min_score);
    tracing::debug!(batch = index + 1, kept = kept.len(), "completed batch");
    kept
}
