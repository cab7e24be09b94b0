//! Scorers: the independent voting units of the swarm.
//!
//! Each scorer carries one fixed [`Specialization`] and an immutable weight
//! assigned at creation. Per evaluation cycle it draws a fresh base
//! confidence and runs the heuristic for its specialization against the
//! scenario snapshots and the candidate intent, producing one [`Vote`].
//! Because the base confidence is drawn anew each cycle, repeated
//! evaluation of identical inputs is intentionally not deterministic.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::entropy::EntropySource;
use crate::feeds::{MarketSnapshot, NetworkSnapshot};
use crate::intents::IntentDescriptor;

/// Scorer weights are drawn uniformly from this range at creation.
pub const WEIGHT_MIN: f64 = 0.2;
pub const WEIGHT_MAX: f64 = 1.0;

/// Per-cycle base confidence range.
const BASE_CONFIDENCE_LOW: f64 = 0.4;
const BASE_CONFIDENCE_HIGH: f64 = 0.7;

/// Seconds before a time condition's deadline at which execution timing
/// starts pushing for immediate execution.
const DEADLINE_WINDOW_SECS: f64 = 3600.0;

/// The heuristic a scorer runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Specialization {
    PriceAnalysis,
    CongestionAnalysis,
    TemporalPattern,
    LiquidityFlow,
    PoolDensity,
    ExecutionTiming,
}

impl Specialization {
    /// All variants, in assignment order.
    pub const ALL: [Specialization; 6] = [
        Specialization::PriceAnalysis,
        Specialization::CongestionAnalysis,
        Specialization::TemporalPattern,
        Specialization::LiquidityFlow,
        Specialization::PoolDensity,
        Specialization::ExecutionTiming,
    ];
}

/// One scorer's output for a single evaluation cycle.
#[derive(Debug, Clone, Serialize)]
pub struct Vote {
    /// Id of the producing scorer.
    pub scorer_id: u32,
    pub recommend: bool,
    /// Confidence in the recommendation, in `[0, 1]`.
    pub confidence: f64,
    pub reason: &'static str,
    /// Copy of the scorer's weight at evaluation time.
    pub weight: f64,
}

/// One voting unit of the swarm population.
#[derive(Debug, Clone)]
pub struct Scorer {
    pub id: u32,
    pub specialization: Specialization,
    /// Relative influence on the aggregate; immutable after creation.
    pub weight: f64,
    /// Most recent vote, overwritten each evaluation cycle.
    pub last_vote: Option<Vote>,
}

impl Scorer {
    /// Create a scorer with a random specialization and weight.
    pub(crate) fn new(id: u32, entropy: &mut dyn EntropySource) -> Self {
        let specialization = Specialization::ALL[entropy.pick(Specialization::ALL.len())];
        let weight = entropy.range(WEIGHT_MIN, WEIGHT_MAX);
        Self {
            id,
            specialization,
            weight,
            last_vote: None,
        }
    }

    /// Produce this scorer's vote for the current cycle and record it as
    /// the scorer's last vote.
    pub(crate) fn cast_vote(
        &mut self,
        market: &MarketSnapshot,
        network: &NetworkSnapshot,
        intent: &IntentDescriptor,
        now: DateTime<Utc>,
        entropy: &mut dyn EntropySource,
    ) -> Vote {
        let base = entropy.range(BASE_CONFIDENCE_LOW, BASE_CONFIDENCE_HIGH);

        let (recommend, confidence, reason) = match self.specialization {
            Specialization::PriceAnalysis => price_analysis(market, base),
            Specialization::CongestionAnalysis => congestion_analysis(network, base),
            Specialization::TemporalPattern => temporal_pattern(now, base),
            Specialization::LiquidityFlow => liquidity_flow(entropy.unit(), base),
            Specialization::PoolDensity => pool_density(network, base),
            Specialization::ExecutionTiming => execution_timing(intent, now, base),
        };

        let vote = Vote {
            scorer_id: self.id,
            recommend,
            confidence,
            reason,
            weight: self.weight,
        };
        self.last_vote = Some(vote.clone());
        vote
    }
}

/// Compare the execution price against its rolling average.
fn price_analysis(market: &MarketSnapshot, base: f64) -> (bool, f64, &'static str) {
    if market.gas_price < market.average_gas * 0.7 {
        (
            true,
            (base + 0.3).min(0.95),
            "Gas prices significantly below average",
        )
    } else if market.gas_price > market.average_gas * 1.3 {
        (false, base + 0.2, "Gas prices elevated")
    } else {
        (true, base, "Gas prices at normal levels")
    }
}

/// Score the pending-transaction load against network capacity.
fn congestion_analysis(network: &NetworkSnapshot, base: f64) -> (bool, f64, &'static str) {
    let congestion = network.pending_transactions as f64 / network.max_capacity as f64;

    if congestion < 0.3 {
        (true, (base + 0.25).min(0.9), "Low network congestion")
    } else if congestion > 0.8 {
        (false, base + 0.15, "High network congestion")
    } else {
        (true, base, "Moderate network congestion")
    }
}

/// Prefer execution during low-activity hours.
fn temporal_pattern(now: DateTime<Utc>, base: f64) -> (bool, f64, &'static str) {
    let hour = now.hour();
    if (2..=6).contains(&hour) {
        (
            true,
            (base + 0.2).min(0.85),
            "Optimal time window (low activity hours)",
        )
    } else {
        (true, base, "Standard time window")
    }
}

/// Simulated liquidity signal: an independent draw unrelated to any input.
fn liquidity_flow(draw: f64, base: f64) -> (bool, f64, &'static str) {
    if draw > 0.7 {
        (true, (base + 0.15).min(0.8), "High liquidity conditions")
    } else {
        (true, base - 0.1, "Moderate liquidity")
    }
}

/// Score the transaction-pool backlog.
fn pool_density(network: &NetworkSnapshot, base: f64) -> (bool, f64, &'static str) {
    let density = network.mempool_size as f64 / 10_000.0;

    if density < 0.2 {
        (true, (base + 0.2).min(0.9), "Low mempool density")
    } else {
        (true, base, "Normal mempool conditions")
    }
}

/// Push for execution when the intent's deadline is close. Intents without
/// a numeric condition value score as standard timing.
fn execution_timing(
    intent: &IntentDescriptor,
    now: DateTime<Utc>,
    base: f64,
) -> (bool, f64, &'static str) {
    match intent.condition_value {
        Some(deadline) if deadline - (now.timestamp() as f64) < DEADLINE_WINDOW_SECS => (
            true,
            (base + 0.25).min(0.95),
            "Approaching execution deadline",
        ),
        _ => (true, base, "Standard execution timing"),
    }
}
