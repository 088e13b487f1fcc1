//! Score assignment policy: evaluated, recovered and fallback scores, plus
//! threshold filtering.
//!
//! Fallback formula (position-based, deterministic):
//!
//! ```text
//! score(i) = max(0, fallback_start_score - fallback_step * i)
//! ```
//!
//! With the defaults that is `80, 75, 70, ...`: the order in which providers
//! returned the records is kept, and the threshold of 30 cuts everything
//! after position 10.

use crate::config::RankingConfig;
use crate::types::{Evaluation, JobRecord, ScoreOrigin, ScoredJob};

/// Reason attached to records scored by position.
pub const FALLBACK_REASON: &str = "Fallback ranking - AI scoring unavailable";

/// Reason attached to records the scorer left out of its answer.
pub const MISSING_EVALUATION_REASON: &str =
    "Fallback evaluation - AI did not provide evaluation for this job";

/// Experience assessment used when no evaluation exists.
pub const UNKNOWN_EXPERIENCE: &str = "Unknown";

/// Fallback score for the record at `position` (0-based).
pub fn fallback_score(position: usize, config: &RankingConfig) -> f64 {
    (config.fallback_start_score - config.fallback_step * position as f64).max(0.0)
}

/// Rank `jobs` by position alone.
///
/// Every record yields exactly one [`ScoredJob`] with
/// [`ScoreOrigin::Fallback`]; no threshold is applied here.
pub fn fallback_ranking(jobs: &[JobRecord], config: &RankingConfig) -> Vec<ScoredJob> {
    jobs.iter()
        .enumerate()
        .map(|(position, job)| ScoredJob {
            job: job.clone(),
            score: fallback_score(position, config),
            match_reason: FALLBACK_REASON.to_string(),
            skills_matched: Vec::new(),
            experience_match: UNKNOWN_EXPERIENCE.to_string(),
            origin: ScoreOrigin::Fallback,
        })
        .collect()
}

/// Pair a batch with the scorer's evaluations.
///
/// Returns one [`ScoredJob`] per record, in batch order. Records without an
/// evaluation receive `config.missing_evaluation_score` and
/// [`ScoreOrigin::Recovered`]. Evaluations pointing outside the batch, or at
/// an already evaluated record, are ignored; scores are clamped to `[0, 100]`.
pub fn apply_evaluations(
    batch: &[JobRecord],
    evaluations: Vec<Evaluation>,
    config: &RankingConfig,
) -> Vec<ScoredJob> {
    let mut slots: Vec<Option<Evaluation>> = vec![None; batch.len()];
    for evaluation in evaluations {
        match slots.get_mut(evaluation.index_in_batch) {
            Some(slot) if slot.is_none() => *slot = Some(evaluation),
            Some(_) => {
                tracing::warn!(index = evaluation.index_in_batch, "duplicate evaluation ignored");
            }
            None => {
                tracing::warn!(
                    index = evaluation.index_in_batch,
                    batch_len = batch.len(),
                    "evaluation index out of range, ignored"
                );
            }
        }
    }

    let missing = slots.iter().filter(|s| s.is_none()).count();
    if missing > 0 {
        tracing::warn!(
            evaluated = batch.len() - missing,
            batch_len = batch.len(),
            "partial evaluation, using neutral score for missing jobs"
        );
    }

    batch
        .iter()
        .zip(slots)
        .map(|(job, slot)| match slot {
            Some(evaluation) => ScoredJob {
                job: job.clone(),
                score: evaluation.score.clamp(0.0, 100.0),
                match_reason: evaluation.reason,
                skills_matched: evaluation.skills_matched,
                experience_match: evaluation.experience_match,
                origin: ScoreOrigin::Evaluated,
            },
            None => ScoredJob {
                job: job.clone(),
                score: config.missing_evaluation_score,
                match_reason: MISSING_EVALUATION_REASON.to_string(),
                skills_matched: Vec::new(),
                experience_match: UNKNOWN_EXPERIENCE.to_string(),
                origin: ScoreOrigin::Recovered,
            },
        })
        .collect()
}

/// Drop every job scoring below `min_score`. Order is preserved.
pub fn filter_by_threshold(mut jobs: Vec<ScoredJob>, min_score: f64) -> Vec<ScoredJob> {
    jobs.retain(|j| j.score >= min_score);
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_job(i: usize) -> JobRecord {
        JobRecord {
            title: format!("Job {i}"),
            company: "Acme".into(),
            location: "Remote".into(),
            description: String::new(),
            url: format!("https://jobs.example/{i}"),
            source: "test".into(),
        }
    }

    fn make_eval(index: usize, score: f64) -> Evaluation {
        Evaluation {
            index_in_batch: index,
            score,
            reason: format!("reason {index}"),
            skills_matched: vec!["Rust".into()],
            experience_match: "mid-level".into(),
        }
    }

    #[test]
    fn fallback_formula_correctness() {
        let config = RankingConfig::default();
        assert!((fallback_score(0, &config) - 80.0).abs() < f64::EPSILON);
        assert!((fallback_score(1, &config) - 75.0).abs() < f64::EPSILON);
        assert!((fallback_score(10, &config) - 30.0).abs() < f64::EPSILON);
        assert!((fallback_score(11, &config) - 25.0).abs() < f64::EPSILON);
        assert!((fallback_score(16, &config) - 0.0).abs() < f64::EPSILON);
        assert!((fallback_score(40, &config) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fallback_reduces_score_progressively_until_floor() {
        let config = RankingConfig::default();
        let scores: Vec<f64> = (0..17).map(|p| fallback_score(p, &config)).collect();
        for i in 1..scores.len() {
            assert!(scores[i] < scores[i - 1]);
        }
        assert!(scores.iter().all(|s| *s >= 0.0));
    }

    #[test]
    fn fallback_ranking_keeps_order_and_marks_origin() {
        let jobs: Vec<JobRecord> = (0..12).map(make_job).collect();
        let ranked = fallback_ranking(&jobs, &RankingConfig::default());

        assert_eq!(ranked.len(), 12);
        let expected = [80.0, 75.0, 70.0, 65.0, 60.0, 55.0, 50.0, 45.0, 40.0, 35.0, 30.0, 25.0];
        for (scored, want) in ranked.iter().zip(expected) {
            assert!((scored.score - want).abs() < f64::EPSILON);
            assert_eq!(scored.origin, ScoreOrigin::Fallback);
            assert_eq!(scored.match_reason, FALLBACK_REASON);
            assert_eq!(scored.experience_match, "Unknown");
        }
        assert_eq!(ranked[3].job.title, "Job 3");
    }

    #[test]
    fn full_evaluation_keeps_returned_scores() {
        let batch: Vec<JobRecord> = (0..3).map(make_job).collect();
        let evals = vec![make_eval(2, 91.0), make_eval(0, 12.0), make_eval(1, 64.0)];
        let scored = apply_evaluations(&batch, evals, &RankingConfig::default());

        assert_eq!(scored.len(), 3);
        assert_eq!(scored[0].job.title, "Job 0");
        assert!((scored[0].score - 12.0).abs() < f64::EPSILON);
        assert!((scored[2].score - 91.0).abs() < f64::EPSILON);
        assert_eq!(scored[2].match_reason, "reason 2");
        assert!(scored.iter().all(|s| s.origin == ScoreOrigin::Evaluated));
    }

    #[test]
    fn partial_evaluation_fills_gaps_with_neutral_score() {
        let batch: Vec<JobRecord> = (0..4).map(make_job).collect();
        let scored = apply_evaluations(
            &batch,
            vec![make_eval(0, 88.0), make_eval(3, 41.0)],
            &RankingConfig::default(),
        );

        assert_eq!(scored.len(), 4);
        assert_eq!(scored[0].origin, ScoreOrigin::Evaluated);
        assert_eq!(scored[1].origin, ScoreOrigin::Recovered);
        assert!((scored[1].score - 50.0).abs() < f64::EPSILON);
        assert_eq!(scored[1].match_reason, MISSING_EVALUATION_REASON);
        assert!(scored[1].skills_matched.is_empty());
        assert_eq!(scored[2].origin, ScoreOrigin::Recovered);
        assert!((scored[3].score - 41.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stray_and_duplicate_evaluations_ignored() {
        let batch: Vec<JobRecord> = (0..2).map(make_job).collect();
        let scored = apply_evaluations(
            &batch,
            vec![make_eval(0, 70.0), make_eval(0, 10.0), make_eval(9, 99.0)],
            &RankingConfig::default(),
        );
        assert_eq!(scored.len(), 2);
        assert!((scored[0].score - 70.0).abs() < f64::EPSILON);
        assert_eq!(scored[1].origin, ScoreOrigin::Recovered);
    }

    #[test]
    fn out_of_range_scores_clamped() {
        let batch = vec![make_job(0)];
        let scored = apply_evaluations(&batch, vec![make_eval(0, 250.0)], &RankingConfig::default());
        assert!((scored[0].score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_evaluation_list_recovers_whole_batch() {
        let batch: Vec<JobRecord> = (0..3).map(make_job).collect();
        let scored = apply_evaluations(&batch, vec![], &RankingConfig::default());
        assert!(scored.iter().all(|s| s.origin == ScoreOrigin::Recovered));
    }

    #[test]
    fn threshold_is_inclusive_and_order_preserving() {
        let jobs: Vec<JobRecord> = (0..12).map(make_job).collect();
        let kept = filter_by_threshold(fallback_ranking(&jobs, &RankingConfig::default()), 30.0);

        assert_eq!(kept.len(), 11);
        assert!((kept[10].score - 30.0).abs() < f64::EPSILON);
        assert!(kept.iter().all(|s| s.score >= 30.0));
        assert_eq!(kept[0].job.title, "Job 0");
    }

    #[test]
    fn empty_input_returns_empty() {
        let config = RankingConfig::default();
        assert!(fallback_ranking(&[], &config).is_empty());
        assert!(apply_evaluations(&[], vec![], &config).is_empty());
        assert!(filter_by_threshold(vec![], 30.0).is_empty());
    }
}
