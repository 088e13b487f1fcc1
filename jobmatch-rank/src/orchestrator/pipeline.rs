//! End-to-end ranking pipeline: fan-out, cap, profile, score, merge, page.

use std::sync::Arc;

use tracing::Instrument;

use crate::config::RankingConfig;
use crate::error::RankError;
use crate::provider::{BatchScorer, ProfileExtractor, ProviderRegistry};
use crate::types::{
    JobRecord, LocationPreference, PaginatedResult, PaginationRequest, ScoredJob, SearchDirective,
};

use super::aggregate::merge_and_sort;
use super::invoke::ProviderInvoker;
use super::join::run_isolated;
use super::paginate::paginate;
use super::scorer::BoundedConcurrentScorer;
use super::scoring::{fallback_ranking, filter_by_threshold};

/// The aggregation and ranking pipeline for one deployment.
///
/// Holds only immutable collaborators and settings; every call to
/// [`fetch_ranked`](Self::fetch_ranked) builds its own state and shares
/// nothing with concurrent calls.
#[derive(Clone)]
pub struct RankingPipeline {
    invoker: ProviderInvoker,
    extractor: Arc<dyn ProfileExtractor>,
    scorer: BoundedConcurrentScorer,
    config: RankingConfig,
}

impl std::fmt::Debug for RankingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingPipeline")
            .field("invoker", &self.invoker)
            .field("scorer", &self.scorer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RankingPipeline {
    /// Assemble a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::Config`] if `config` fails validation.
    pub fn new(
        registry: ProviderRegistry,
        extractor: Arc<dyn ProfileExtractor>,
        scorer: Arc<dyn BatchScorer>,
        config: RankingConfig,
    ) -> Result<Self, RankError> {
        config.validate()?;
        Ok(Self {
            invoker: ProviderInvoker::new(registry),
            extractor,
            scorer: BoundedConcurrentScorer::new(scorer, config.clone()),
            config,
        })
    }

    /// The settings this pipeline was built with.
    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Fetch, rank and paginate jobs for one candidate document.
    ///
    /// # Pipeline
    ///
    /// 1. Validate `pagination` and `location`
    /// 2. Fan out `directives` to their providers (failures contribute nothing)
    /// 3. Rank the aggregate with [`rank`](Self::rank)
    /// 4. Slice out the requested page
    ///
    /// Dropping the returned future aborts every in-flight provider and
    /// scoring call.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::InvalidRequest`] for an invalid pagination or
    /// location preference. Provider, extraction and scoring failures are
    /// absorbed and never surface here.
    pub async fn fetch_ranked(
        &self,
        document: &[u8],
        location: &LocationPreference,
        directives: &[SearchDirective],
        pagination: PaginationRequest,
    ) -> Result<PaginatedResult, RankError> {
        pagination.validate()?;
        let location = location.normalized();
        location.validate()?;

        let span = tracing::info_span!("fetch_ranked", request_id = %uuid::Uuid::new_v4());

        let result = async move {
            tracing::info!(directives = directives.len(), "fetching jobs from providers");
            let jobs = self.invoker.invoke(directives).await;

            if jobs.is_empty() {
                tracing::info!("no jobs found");
                return paginate(Vec::new(), pagination);
            }

            tracing::info!(count = jobs.len(), "ranking jobs");
            let ranked = self.rank(document, &location, jobs).await;

            paginate(ranked, pagination)
        }
        .instrument(span)
        .await;

        Ok(result)
    }

    /// Rank an already-aggregated job list.
    ///
    /// # Pipeline
    ///
    /// 1. Keep the first `max_candidates` jobs; drop the rest
    /// 2. Extract the candidate profile once, in its own task; on failure or
    ///    panic fallback-rank the whole capped set by position and skip batch
    ///    scoring entirely
    /// 3. Otherwise score through the [`BoundedConcurrentScorer`] with the
    ///    profile plus location preference as context
    /// 4. Merge and sort by score, descending
    pub async fn rank(
        &self,
        document: &[u8],
        location: &LocationPreference,
        mut jobs: Vec<JobRecord>,
    ) -> Vec<ScoredJob> {
        if jobs.is_empty() {
            return Vec::new();
        }

        if jobs.len() > self.config.max_candidates {
            tracing::warn!(
                total = jobs.len(),
                limit = self.config.max_candidates,
                "limiting ranking to first jobs"
            );
            jobs.truncate(self.config.max_candidates);
        }

        let extractor = Arc::clone(&self.extractor);
        let owned_document = document.to_vec();
        let extraction =
            run_isolated(async move { extractor.extract(&owned_document).await }).await;

        let profile = match extraction.and_then(|inner| inner) {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(error = %err, count = jobs.len(), "profile extraction failed, using fallback ranking");
                let ranked = fallback_ranking(&jobs, &self.config);
                return merge_and_sort([filter_by_threshold(ranked, self.config.min_score)]);
            }
        };
        tracing::trace!(profile = %profile, "candidate profile extracted");

        let context = format!("{profile}{}", location.to_context());
        let scored = self.scorer.score_all(&context, &jobs).await;
        let ranked = merge_and_sort([scored]);

        tracing::info!(count = ranked.len(), "ranked and sorted jobs");
        ranked
    }
}
