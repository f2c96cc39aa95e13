use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::prelude::{ApiError, Result};

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;

/// One recorded score joined with the weight of the criterion it belongs to.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ScoreWithWeight {
    pub criterion_id: i32,
    pub score: f64,
    pub weight: f64,
}

/// Weighted average over a ranking's recorded scores, rounded to two
/// decimal places. Returns `None` when there is nothing to aggregate or
/// when the weights sum to zero.
pub fn weighted_average(scores: &[ScoreWithWeight]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let total_weight: f64 = scores.iter().map(|s| s.weight).sum();
    if total_weight == 0.0 {
        return None;
    }
    let weighted_sum: f64 = scores.iter().map(|s| s.score * s.weight).sum();
    Some(round2(weighted_sum / total_weight))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn validate_score(score: f64) -> Result<()> {
    if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
        return Err(ApiError::Validation(format!(
            "score must be between {SCORE_MIN} and {SCORE_MAX}, got {score}"
        )));
    }
    Ok(())
}

/// A score may only attach a criterion to a ranking from the same process.
pub fn ensure_same_process(criterion_process: i32, ranking_process: i32) -> Result<()> {
    if criterion_process != ranking_process {
        return Err(ApiError::Validation(format!(
            "criterion belongs to process {criterion_process} but the ranking belongs to process {ranking_process}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn entry(criterion_id: i32, score: f64, weight: f64) -> ScoreWithWeight {
        ScoreWithWeight {
            criterion_id,
            score,
            weight,
        }
    }

    #[test]
    fn equal_weights_average_evenly() {
        let scores = [entry(1, 8.0, 1.0), entry(2, 4.0, 1.0)];
        assert_eq!(weighted_average(&scores), Some(6.0));
    }

    #[test]
    fn heavier_criteria_pull_the_average() {
        let scores = [entry(1, 10.0, 3.0), entry(2, 5.0, 1.0)];
        assert_eq!(weighted_average(&scores), Some(8.75));
    }

    #[test]
    fn no_scores_means_no_average() {
        assert_eq!(weighted_average(&[]), None);
    }

    #[test]
    fn zero_total_weight_means_no_average() {
        assert_eq!(weighted_average(&[entry(1, 7.0, 0.0)]), None);
        let scores = [entry(1, 8.0, 0.0), entry(2, 4.0, 0.0)];
        assert_eq!(weighted_average(&scores), None);
    }

    #[test]
    fn a_zero_score_still_counts_as_data() {
        let scores = [entry(1, 0.0, 0.01)];
        assert_eq!(weighted_average(&scores), Some(0.0));
    }

    #[test]
    fn averages_round_to_two_decimals() {
        let scores = [entry(1, 7.0, 1.0), entry(2, 8.0, 1.0), entry(3, 7.0, 1.0)];
        assert_eq!(weighted_average(&scores), Some(7.33));
        let scores = [entry(1, 10.0, 1.0), entry(2, 10.0, 1.0), entry(3, 0.0, 1.0)];
        assert_eq!(weighted_average(&scores), Some(6.67));
    }

    #[test]
    fn scores_outside_range_are_rejected() {
        assert!(validate_score(-0.1).is_err());
        assert!(validate_score(10.01).is_err());
        assert!(validate_score(0.0).is_ok());
        assert!(validate_score(10.0).is_ok());
    }

    #[test]
    fn cross_process_scoring_is_rejected() {
        assert!(ensure_same_process(1, 2).is_err());
        assert!(ensure_same_process(3, 3).is_ok());
    }

    proptest! {
        #[test]
        fn average_stays_within_score_bounds(
            pairs in prop::collection::vec((0.0f64..=10.0, 0.01f64..=10.0), 1..20)
        ) {
            let scores: Vec<ScoreWithWeight> = pairs
                .iter()
                .enumerate()
                .map(|(i, (score, weight))| entry(i as i32, *score, *weight))
                .collect();
            let average = weighted_average(&scores).expect("weights are positive");
            prop_assert!((0.0..=10.0).contains(&average));
        }

        #[test]
        fn uniform_scores_average_to_themselves(
            score in 0.0f64..=10.0,
            weights in prop::collection::vec(0.01f64..=10.0, 1..10)
        ) {
            let scores: Vec<ScoreWithWeight> = weights
                .iter()
                .enumerate()
                .map(|(i, weight)| entry(i as i32, score, *weight))
                .collect();
            let average = weighted_average(&scores).expect("weights are positive");
            prop_assert!((average - round2(score)).abs() < 0.01);
        }
    }
}
