//! Configuration types for the jobmatch application.
//!
//! Loaded from TOML; every section falls back to its defaults. API keys can
//! also come from the environment (see [`AppConfig::apply_env_overrides`]).

use std::path::{Path, PathBuf};

use jobmatch_rank::RankingConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Candidate cap, batching, concurrency and score thresholds.
    pub ranking: RankingConfig,
    /// Shared HTTP client settings.
    pub http: HttpConfig,
    /// JSearch (RapidAPI) provider settings.
    pub jsearch: JSearchConfig,
    /// LinkUp provider settings.
    pub linkup: LinkUpConfig,
    /// Generative model used for profile extraction and batch scoring.
    pub model: ModelConfig,
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent. `None` uses `jobmatch/<version>`.
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: None,
        }
    }
}

/// JSearch provider configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JSearchConfig {
    /// RapidAPI key.
    pub api_key: String,
    /// RapidAPI host, sent as `X-RapidAPI-Host`.
    pub host: String,
    /// Result pages requested per query.
    pub num_pages: u32,
    /// Endpoint override. `None` means `https://{host}`.
    pub base_url: Option<String>,
}

impl Default for JSearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: "jsearch.p.rapidapi.com".into(),
            num_pages: 10,
            base_url: None,
        }
    }
}

impl JSearchConfig {
    /// Base URL requests are sent to.
    pub fn endpoint_base(&self) -> String {
        match self.base_url {
            Some(ref url) => url.trim_end_matches('/').to_owned(),
            None => format!("https://{}", self.host),
        }
    }
}

impl std::fmt::Debug for JSearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JSearchConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("host", &self.host)
            .field("num_pages", &self.num_pages)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// LinkUp provider configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkUpConfig {
    /// Bearer token.
    pub api_key: String,
    /// Search endpoint URL.
    pub api_url: String,
    /// Search depth: `standard` or `deep`.
    pub depth: String,
}

impl Default for LinkUpConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: String::new(),
            depth: "standard".into(),
        }
    }
}

impl std::fmt::Debug for LinkUpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkUpConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("api_url", &self.api_url)
            .field("depth", &self.depth)
            .finish()
    }
}

/// Generative model configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// API key, sent as `x-goog-api-key`.
    pub api_key: String,
    /// API base URL.
    pub base_url: String,
    /// Model that reads the resume and summarizes the candidate.
    pub profile_model: String,
    /// Model that scores job batches against the profile.
    pub scoring_model: String,
    /// Sampling temperature for both calls.
    pub temperature: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            profile_model: "gemini-1.5-flash".into(),
            scoring_model: "gemini-2.0-flash".into(),
            temperature: 0.1,
        }
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("base_url", &self.base_url)
            .field("profile_model", &self.profile_model)
            .field("scoring_model", &self.scoring_model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/jobmatch/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("jobmatch").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("jobmatch")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/jobmatch-config/config.toml")
        }
    }

    /// Overlay credentials and endpoints from the process environment.
    ///
    /// Reads `RAPIDAPI_KEY`, `RAPIDAPI_HOST`, `LINKUP_API_KEY`,
    /// `LINKUP_API_URL` and `GEMINI_API_KEY`. Unset or empty variables leave
    /// the file value in place.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let targets: [(&str, &mut String); 5] = [
            ("RAPIDAPI_KEY", &mut self.jsearch.api_key),
            ("RAPIDAPI_HOST", &mut self.jsearch.host),
            ("LINKUP_API_KEY", &mut self.linkup.api_key),
            ("LINKUP_API_URL", &mut self.linkup.api_url),
            ("GEMINI_API_KEY", &mut self.model.api_key),
        ];
        for (name, field) in targets {
            if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
                tracing::debug!(variable = name, "config value taken from environment");
                *field = value;
            }
        }
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Missing provider credentials are not an error here: the affected
    /// provider fails per call and contributes no results.
    pub fn validate(&self) -> Result<()> {
        self.ranking.validate()?;
        if self.http.timeout_seconds == 0 {
            return Err(AppError::Config(
                "http.timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.jsearch.num_pages == 0 {
            return Err(AppError::Config(
                "jsearch.num_pages must be greater than 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(AppError::Config(
                "model.temperature must be between 0 and 2".into(),
            ));
        }
        Ok(())
    }
}
