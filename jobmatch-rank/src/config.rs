//! Ranking configuration with the production defaults.
//!
//! [`RankingConfig`] bounds the external-call budget of one request: how many
//! candidates are scored, how they are batched, how many batch calls may be
//! in flight, and which scores survive.

use serde::{Deserialize, Serialize};

use crate::error::RankError;

/// Tunables for the ranking stage.
///
/// Use [`Default::default()`] for the standard budget, or override single
/// fields with struct update syntax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Candidates considered for scoring, in arrival order. The rest are
    /// dropped before any scoring call is made.
    pub max_candidates: usize,
    /// Records per scoring call.
    pub batch_size: usize,
    /// Batch scoring calls allowed in flight at once.
    pub max_concurrent_batches: usize,
    /// Records scoring below this are discarded.
    pub min_score: f64,
    /// Fallback score of the first record in a fallback-ranked slice.
    pub fallback_start_score: f64,
    /// Fallback score decrement per position.
    pub fallback_step: f64,
    /// Score given to records the scorer skipped in an otherwise valid answer.
    pub missing_evaluation_score: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_candidates: 60,
            batch_size: 10,
            max_concurrent_batches: 3,
            min_score: 30.0,
            fallback_start_score: 80.0,
            fallback_step: 5.0,
            missing_evaluation_score: 50.0,
        }
    }
}

impl RankingConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_candidates`, `batch_size` and `max_concurrent_batches` must be > 0
    /// - every score field must lie in `[0, 100]`
    /// - `fallback_step` must not be negative
    pub fn validate(&self) -> Result<(), RankError> {
        if self.max_candidates == 0 {
            return Err(RankError::Config(
                "max_candidates must be greater than 0".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(RankError::Config("batch_size must be greater than 0".into()));
        }
        if self.max_concurrent_batches == 0 {
            return Err(RankError::Config(
                "max_concurrent_batches must be greater than 0".into(),
            ));
        }
        for (name, value) in [
            ("min_score", self.min_score),
            ("fallback_start_score", self.fallback_start_score),
            ("missing_evaluation_score", self.missing_evaluation_score),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(RankError::Config(format!(
                    "{name} must be between 0 and 100"
                )));
            }
        }
        if self.fallback_step.is_nan() || self.fallback_step < 0.0 {
            return Err(RankError::Config(
                "fallback_step must not be negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_call_budget() {
        let config = RankingConfig::default();
        assert_eq!(config.max_candidates, 60);
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.max_concurrent_batches, 3);
        assert!((config.min_score - 30.0).abs() < f64::EPSILON);
        assert!((config.fallback_start_score - 80.0).abs() < f64::EPSILON);
        assert!((config.fallback_step - 5.0).abs() < f64::EPSILON);
        assert!((config.missing_evaluation_score - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(RankingConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_batch_size_rejected() {
        let config = RankingConfig {
            batch_size: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn zero_concurrency_rejected() {
        let config = RankingConfig {
            max_concurrent_batches: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_concurrent_batches"));
    }

    #[test]
    fn zero_candidates_rejected() {
        let config = RankingConfig {
            max_candidates: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let config = RankingConfig {
            min_score: 120.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_score"));
    }

    #[test]
    fn negative_step_rejected() {
        let config = RankingConfig {
            fallback_step: -1.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fallback_step"));
    }

    #[test]
    fn partial_toml_style_input_keeps_defaults() {
        let config: RankingConfig =
            serde_json::from_str(r#"{"batch_size": 5}"#).expect("deserialize");
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.max_candidates, 60);
    }
}
