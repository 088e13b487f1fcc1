//! jobmatch: find job listings that fit a resume.
//!
//! This crate wires concrete collaborators into the ranking pipeline of
//! [`jobmatch_rank`]:
//! Resume → Profile → Provider fan-out → Batch scoring → Ranked page
//!
//! # Architecture
//!
//! - **Providers**: JSearch (RapidAPI) and LinkUp search over HTTP
//! - **Model**: Gemini `generateContent` extracts the candidate profile and
//!   scores job batches
//! - **Ranking**: candidate cap, bounded concurrent batch scoring, fallback
//!   scores, threshold, sort and pagination live in `jobmatch-rank`
//! - **Config**: TOML file plus environment overrides for credentials

pub mod config;
pub mod error;
pub mod gemini;
pub mod http;
pub mod providers;
pub mod service;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use gemini::GeminiClient;
pub use providers::{JSearchProvider, LinkUpProvider};
pub use service::{build_pipeline, build_registry};
