//! Wiring: from an [`AppConfig`] to a ready [`RankingPipeline`].

use std::sync::Arc;

use jobmatch_rank::{ProviderRegistry, RankingPipeline};

use crate::config::AppConfig;
use crate::error::Result;
use crate::gemini::GeminiClient;
use crate::http::build_client;
use crate::providers::{JSearchProvider, LinkUpProvider};

/// Register every built-in search provider.
///
/// Providers are registered even without credentials; such a provider fails
/// per call and contributes no records.
pub fn build_registry(config: &AppConfig, client: reqwest::Client) -> ProviderRegistry {
    ProviderRegistry::new()
        .with(Arc::new(JSearchProvider::new(
            client.clone(),
            config.jsearch.clone(),
        )))
        .with(Arc::new(LinkUpProvider::new(client, config.linkup.clone())))
}

/// Build the full ranking pipeline.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the HTTP client
/// cannot be built.
pub fn build_pipeline(config: &AppConfig) -> Result<RankingPipeline> {
    config.validate()?;
    let client = build_client(&config.http)?;

    if config.model.api_key.is_empty() {
        tracing::warn!("model.api_key is not set; every job will be fallback-ranked");
    }

    let registry = build_registry(config, client.clone());
    tracing::info!(providers = ?registry.names(), "search providers registered");

    let model = Arc::new(GeminiClient::new(client, config.model.clone()));
    let pipeline = RankingPipeline::new(registry, model.clone(), model, config.ranking.clone())?;
    Ok(pipeline)
}
