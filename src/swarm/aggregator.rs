//! Weighted vote aggregation.
//!
//! Reduces one cycle's vote set to a single [`Recommendation`]: a weighted
//! confidence on a 0–100 scale, an inclusive threshold decision, the
//! dominant reason among recommending votes, and the vote tally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::SwarmError;
use super::scorer::Vote;

/// Reason reported when no scorer voted to recommend.
pub const FALLBACK_REASON: &str = "Conditions optimal";

/// Vote tally of one evaluation cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VoteDistribution {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
}

/// The swarm's final decision for one evaluation cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// True iff the aggregate confidence met the threshold.
    pub recommended: bool,
    /// Rounded aggregate confidence, 0–100.
    pub confidence: u8,
    /// Dominant reason among recommending votes.
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    pub vote_distribution: VoteDistribution,
}

/// Reduce one cycle's votes to a single recommendation.
///
/// A recommending vote contributes `confidence × weight` to the aggregate;
/// a rejecting vote contributes `(1 − confidence) × weight`. Either way a
/// vote pushes the aggregate in the direction its confidence supports. The
/// weighted sum is normalised by total weight, scaled to 0–100, and
/// compared (inclusive) against `threshold` before rounding.
pub fn aggregate(
    votes: &[Vote],
    threshold: f64,
    now: DateTime<Utc>,
) -> Result<Recommendation, SwarmError> {
    let total_weight: f64 = votes.iter().map(|vote| vote.weight).sum();
    if votes.is_empty() || total_weight <= 0.0 {
        return Err(SwarmError::EmptyPopulation);
    }

    let weighted_sum: f64 = votes
        .iter()
        .map(|vote| {
            if vote.recommend {
                vote.confidence * vote.weight
            } else {
                (1.0 - vote.confidence) * vote.weight
            }
        })
        .sum();

    let aggregate_confidence = weighted_sum / total_weight * 100.0;
    let positive = votes.iter().filter(|vote| vote.recommend).count();

    Ok(Recommendation {
        recommended: aggregate_confidence >= threshold,
        confidence: aggregate_confidence.round() as u8,
        reason: dominant_reason(votes).to_string(),
        timestamp: now,
        vote_distribution: VoteDistribution {
            total: votes.len(),
            positive,
            negative: votes.len() - positive,
        },
    })
}

/// Most frequently cited reason among recommending votes. Ties break on
/// first appearance; [`FALLBACK_REASON`] when nothing recommends.
fn dominant_reason(votes: &[Vote]) -> &'static str {
    let mut tally: Vec<(&'static str, usize)> = Vec::new();
    for vote in votes.iter().filter(|vote| vote.recommend) {
        match tally.iter_mut().find(|(reason, _)| *reason == vote.reason) {
            Some((_, count)) => *count += 1,
            None => tally.push((vote.reason, 1)),
        }
    }

    let mut best: Option<(&'static str, usize)> = None;
    for (reason, count) in tally {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((reason, count)),
        }
    }
    best.map(|(reason, _)| reason).unwrap_or(FALLBACK_REASON)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(recommend: bool, confidence: f64, reason: &'static str, weight: f64) -> Vote {
        Vote {
            scorer_id: 0,
            recommend,
            confidence,
            reason,
            weight,
        }
    }

    #[test]
    fn test_empty_population_is_an_error() {
        let result = aggregate(&[], 75.0, Utc::now());
        assert!(matches!(result, Err(SwarmError::EmptyPopulation)));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let votes = vec![vote(true, 0.75, "A", 1.0)];
        let recommendation = aggregate(&votes, 75.0, Utc::now()).unwrap();
        assert!(recommendation.recommended);
        assert_eq!(recommendation.confidence, 75);
    }

    #[test]
    fn test_below_threshold_is_rejected() {
        let votes = vec![vote(true, 0.5, "A", 1.0)];
        let recommendation = aggregate(&votes, 75.0, Utc::now()).unwrap();
        assert!(!recommendation.recommended);
        assert_eq!(recommendation.confidence, 50);
    }

    #[test]
    fn test_confident_rejection_lowers_the_aggregate() {
        // A confident "no" contributes (1 - 0.9) = 0.1 of its weight.
        let votes = vec![vote(false, 0.9, "bad", 1.0)];
        let recommendation = aggregate(&votes, 75.0, Utc::now()).unwrap();
        assert!(!recommendation.recommended);
        assert_eq!(recommendation.confidence, 10);
    }

    #[test]
    fn test_monotone_in_positive_confidence() {
        let base = vec![
            vote(true, 0.5, "A", 0.6),
            vote(false, 0.6, "B", 0.4),
            vote(true, 0.4, "C", 0.8),
        ];
        let low = aggregate(&base, 75.0, Utc::now()).unwrap();

        let mut raised = base.clone();
        raised[0].confidence = 0.9;
        let high = aggregate(&raised, 75.0, Utc::now()).unwrap();

        assert!(high.confidence >= low.confidence);
    }

    #[test]
    fn test_dominant_reason_by_count() {
        let votes = vec![
            vote(true, 0.8, "A", 1.0),
            vote(true, 0.8, "A", 1.0),
            vote(true, 0.8, "B", 1.0),
            vote(false, 0.8, "C", 1.0),
        ];
        let recommendation = aggregate(&votes, 75.0, Utc::now()).unwrap();
        assert_eq!(recommendation.reason, "A");
    }

    #[test]
    fn test_dominant_reason_tie_breaks_first_seen() {
        let votes = vec![
            vote(true, 0.8, "B", 1.0),
            vote(true, 0.8, "A", 1.0),
            vote(true, 0.8, "A", 1.0),
            vote(true, 0.8, "B", 1.0),
        ];
        let recommendation = aggregate(&votes, 75.0, Utc::now()).unwrap();
        assert_eq!(recommendation.reason, "B");
    }

    #[test]
    fn test_all_negative_falls_back() {
        let votes = vec![
            vote(false, 0.6, "high gas", 1.0),
            vote(false, 0.7, "congested", 0.5),
        ];
        let recommendation = aggregate(&votes, 75.0, Utc::now()).unwrap();
        assert_eq!(recommendation.reason, FALLBACK_REASON);
        assert_eq!(recommendation.vote_distribution.positive, 0);
        assert_eq!(recommendation.vote_distribution.negative, 2);
    }

    #[test]
    fn test_distribution_totals() {
        let votes = vec![
            vote(true, 0.9, "A", 0.3),
            vote(false, 0.2, "B", 0.9),
            vote(true, 0.6, "A", 0.7),
        ];
        let recommendation = aggregate(&votes, 75.0, Utc::now()).unwrap();
        let distribution = recommendation.vote_distribution;
        assert_eq!(distribution.total, 3);
        assert_eq!(distribution.positive + distribution.negative, distribution.total);
    }

    #[test]
    fn test_weights_scale_contributions() {
        // Heavy confident yes against a light weak no.
        let votes = vec![
            vote(true, 0.9, "A", 1.0),
            vote(false, 0.5, "B", 0.1),
        ];
        let recommendation = aggregate(&votes, 75.0, Utc::now()).unwrap();
        // (0.9×1.0 + 0.5×0.1) / 1.1 ≈ 0.864
        assert_eq!(recommendation.confidence, 86);
        assert!(recommendation.recommended);
    }
}
