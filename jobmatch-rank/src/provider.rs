//! Collaborator traits consumed by the ranking pipeline.
//!
//! The pipeline never talks to the network itself. Search backends, the
//! profile extractor and the batch scorer are injected as trait objects so
//! that transports can be swapped and tests can substitute in-memory stubs.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RankError;
use crate::types::{Evaluation, JobRecord};

/// A named source of job listings.
///
/// Implementations must be `Send + Sync`: one call per directive runs
/// concurrently with the others.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Name under which this provider is registered and addressed by
    /// directives.
    fn name(&self) -> &str;

    /// Run `query` and return the listings in provider order.
    ///
    /// # Errors
    ///
    /// Returns [`RankError`] if the request fails or the response cannot be
    /// decoded. The pipeline treats any error as "no records from this call".
    async fn search(&self, query: &str) -> Result<Vec<JobRecord>, RankError>;
}

/// Turns a candidate document into profile text used as scoring context.
#[async_trait]
pub trait ProfileExtractor: Send + Sync {
    /// Extract a profile summary from the raw document bytes.
    ///
    /// # Errors
    ///
    /// Any error switches the whole ranking stage to fallback mode.
    async fn extract(&self, document: &[u8]) -> Result<String, RankError>;
}

/// Scores a batch of records against a candidate context.
#[async_trait]
pub trait BatchScorer: Send + Sync {
    /// Evaluate every record of `batch`.
    ///
    /// Evaluations refer to records by their 0-based index in `batch`. Fewer
    /// evaluations than records is a partial answer, not an error.
    ///
    /// # Errors
    ///
    /// Transport failures and undecodable answers fail the batch, which is
    /// then fallback-ranked.
    async fn score(&self, context: &str, batch: &[JobRecord])
        -> Result<Vec<Evaluation>, RankError>;
}

/// Name → provider dispatch table.
///
/// Built once by the caller and handed to the pipeline; there is no
/// process-wide registry.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn SearchProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under its own [`SearchProvider::name`].
    ///
    /// A provider registered later under the same name replaces the earlier
    /// one.
    pub fn register(&mut self, provider: Arc<dyn SearchProvider>) -> &mut Self {
        let name = provider.name().to_string();
        if self.providers.insert(name.clone(), provider).is_some() {
            tracing::debug!(provider = %name, "replaced registered provider");
        }
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Look up a provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn SearchProvider>> {
        self.providers.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
