//! Provider fan-out: one task per search directive, merged after a full join.

use crate::error::RankError;
use crate::provider::ProviderRegistry;
use crate::types::{JobRecord, SearchDirective};

use super::join::IndexedTasks;

/// Dispatches search directives to registered providers concurrently.
#[derive(Debug, Clone)]
pub struct ProviderInvoker {
    registry: ProviderRegistry,
}

impl ProviderInvoker {
    /// Create an invoker over `registry`.
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Run every directive concurrently and merge the successful results.
    ///
    /// # Pipeline
    ///
    /// 1. Spawn one task per directive; unknown provider names resolve to
    ///    [`RankError::UnknownProvider`] inside their own task
    /// 2. Wait for all tasks (join barrier)
    /// 3. Log per-directive failures at warn level; they contribute no records
    /// 4. Concatenate successful results in directive order, keeping each
    ///    provider's own result order
    ///
    /// Never fails: if every directive errors the result is simply empty.
    pub async fn invoke(&self, directives: &[SearchDirective]) -> Vec<JobRecord> {
        let mut tasks = IndexedTasks::new();

        for directive in directives {
            let provider = self.registry.get(&directive.provider);
            let name = directive.provider.clone();
            let query = directive.query.clone();
            tasks.spawn(async move {
                let Some(provider) = provider else {
                    return Err(RankError::UnknownProvider(name));
                };
                tracing::trace!(provider = %name, query = %query, "dispatching search");
                provider.search(&query).await
            });
        }

        let outcomes = tasks.join_all().await;

        let mut all_jobs: Vec<JobRecord> = Vec::new();
        let mut failures = 0usize;

        for (directive, outcome) in directives.iter().zip(outcomes) {
            match outcome.and_then(|inner| inner) {
                Ok(jobs) => {
                    tracing::debug!(provider = %directive.provider, count = jobs.len(), "provider returned jobs");
                    all_jobs.extend(jobs);
                }
                Err(err) => {
                    failures += 1;
                    tracing::warn!(provider = %directive.provider, error = %err, "provider search failed");
                }
            }
        }

        tracing::info!(
            directives = directives.len(),
            failures,
            count = all_jobs.len(),
            "provider fan-out complete"
        );

        all_jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SearchProvider;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct StaticProvider {
        name: &'static str,
        count: usize,
        delay_ms: u64,
    }

    #[async_trait]
    impl SearchProvider for StaticProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(&self, query: &str) -> Result<Vec<JobRecord>, RankError> {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            Ok((0..self.count)
                .map(|i| JobRecord {
                    title: format!("{query} #{i}"),
                    company: "Acme".into(),
                    location: "Remote".into(),
                    description: String::new(),
                    url: format!("https://{}.example/{i}", self.name),
                    source: self.name.into(),
                })
                .collect())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl SearchProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn search(&self, _query: &str) -> Result<Vec<JobRecord>, RankError> {
            Err(RankError::Provider("connection reset".into()))
        }
    }

    fn invoker() -> ProviderInvoker {
        ProviderInvoker::new(
            ProviderRegistry::new()
                .with(Arc::new(StaticProvider {
                    name: "slow",
                    count: 3,
                    delay_ms: 30,
                }))
                .with(Arc::new(StaticProvider {
                    name: "fast",
                    count: 2,
                    delay_ms: 0,
                }))
                .with(Arc::new(FailingProvider)),
        )
    }

    #[tokio::test]
    async fn merges_in_directive_order_regardless_of_latency() {
        let jobs = invoker()
            .invoke(&[
                SearchDirective::new("slow", "rust"),
                SearchDirective::new("fast", "go"),
            ])
            .await;

        assert_eq!(jobs.len(), 5);
        let sources: Vec<&str> = jobs.iter().map(|j| j.source.as_str()).collect();
        assert_eq!(sources, vec!["slow", "slow", "slow", "fast", "fast"]);
        assert_eq!(jobs[0].title, "rust #0");
        assert_eq!(jobs[2].title, "rust #2");
    }

    #[tokio::test]
    async fn failed_and_unknown_providers_contribute_nothing() {
        let jobs = invoker()
            .invoke(&[
                SearchDirective::new("fast", "rust"),
                SearchDirective::new("failing", "rust"),
                SearchDirective::new("nonexistent", "rust"),
            ])
            .await;
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|j| j.source == "fast"));
    }

    #[tokio::test]
    async fn no_directives_yields_empty() {
        assert!(invoker().invoke(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn same_provider_twice_is_not_deduplicated() {
        let jobs = invoker()
            .invoke(&[
                SearchDirective::new("fast", "rust"),
                SearchDirective::new("fast", "rust"),
            ])
            .await;
        assert_eq!(jobs.len(), 4);
        assert_eq!(jobs[0].url, jobs[2].url);
    }
}
