//! CLI binary for jobmatch.
//!
//! Prints one page of ranked jobs as JSON on stdout; logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use jobmatch::AppConfig;
use jobmatch_rank::{LocationPreference, PaginationRequest, SearchDirective, WorkArrangement};
use tracing_subscriber::EnvFilter;

/// jobmatch: rank job listings from several search providers against a resume.
#[derive(Parser)]
#[command(name = "jobmatch", version, about)]
struct Cli {
    /// Path to TOML configuration file (default: ~/.config/jobmatch/config.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a default configuration file to the config path and exit.
    #[arg(long)]
    write_default_config: bool,

    /// Resume PDF to match against.
    #[arg(short, long, required_unless_present = "write_default_config")]
    document: Option<PathBuf>,

    /// Search to run, as `<provider>=<query>` (repeatable), e.g. `jsearch=Rust Developer`.
    #[arg(
        short,
        long = "search",
        value_parser = parse_directive,
        required_unless_present = "write_default_config"
    )]
    searches: Vec<SearchDirective>,

    /// Accepted work arrangement: remote, onsite or hybrid (repeatable).
    #[arg(long = "location-type")]
    location_types: Vec<WorkArrangement>,

    /// Preferred location (repeatable). Required for onsite or hybrid.
    #[arg(long = "location")]
    locations: Vec<String>,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Items per page (1-100).
    #[arg(long, default_value_t = jobmatch_rank::types::DEFAULT_PAGE_SIZE)]
    page_size: usize,
}

fn parse_directive(raw: &str) -> Result<SearchDirective, String> {
    let (provider, query) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <provider>=<query>, got `{raw}`"))?;
    let (provider, query) = (provider.trim(), query.trim());
    if provider.is_empty() || query.is_empty() {
        return Err(format!("provider and query must be non-empty in `{raw}`"));
    }
    Ok(SearchDirective::new(provider, query))
}

/// Write the default configuration to `path`, refusing to overwrite.
fn write_default_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    AppConfig::default()
        .save_to_file(path)
        .with_context(|| format!("failed to write config to {}", path.display()))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => {
            let default_path = AppConfig::default_config_path();
            if default_path.exists() {
                AppConfig::from_file(&default_path).with_context(|| {
                    format!("failed to load config from {}", default_path.display())
                })?
            } else {
                AppConfig::default()
            }
        }
    };
    config.apply_env_overrides();
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobmatch=info,jobmatch_rank=info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.write_default_config {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(AppConfig::default_config_path);
        write_default_config(&path)?;
        tracing::info!(path = %path.display(), "default configuration written");
        return Ok(());
    }
    let Some(document_path) = cli.document else {
        anyhow::bail!("--document is required");
    };

    let config = load_config(cli.config.as_ref())?;
    let pipeline = jobmatch::build_pipeline(&config)?;

    let pagination = PaginationRequest::new(cli.page, cli.page_size)?;
    let location = LocationPreference {
        types: cli.location_types,
        locations: cli.locations,
    };
    let document = tokio::fs::read(&document_path)
        .await
        .with_context(|| format!("failed to read {}", document_path.display()))?;

    let ranked = tokio::select! {
        result = pipeline.fetch_ranked(&document, &location, &cli.searches, pagination) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted, abandoning request");
            anyhow::bail!("interrupted");
        }
    };

    println!("{}", serde_json::to_string_pretty(&ranked)?);
    Ok(())
}
