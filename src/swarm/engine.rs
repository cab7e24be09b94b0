//! The swarm engine: population ownership, evaluation cycles, status.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;

use super::aggregator::{aggregate, Recommendation};
use super::entropy::{EntropySource, ThreadEntropy};
use super::error::SwarmError;
use super::scorer::{Scorer, Specialization};
use crate::feeds::SnapshotProvider;
use crate::intents::IntentDescriptor;

/// Engine construction parameters.
#[derive(Debug, Clone, Copy)]
pub struct SwarmConfig {
    /// Number of scorers created at construction; fixed thereafter.
    pub population: usize,
    /// Minimum aggregate confidence (0–100) for a positive recommendation.
    pub confidence_threshold: f64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            population: 25,
            confidence_threshold: 75.0,
        }
    }
}

/// Population composition and last-decision metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwarmStatus {
    pub population_size: usize,
    pub confidence_threshold: f64,
    /// Timestamp of the last recommendation, absent before the first cycle.
    pub last_analysis: Option<DateTime<Utc>>,
    /// Scorer count per specialization.
    pub specializations: BTreeMap<Specialization, usize>,
}

/// A population of weighted heuristic scorers plus the last decision they
/// reached.
///
/// The engine is an explicit instance: construct one per process (or per
/// test) and share it behind a lock. The population is immutable after
/// construction: no scorer is added, removed, or re-weighted. That also
/// means the population cannot adapt to evolving conditions; revisit the
/// fixed assignment before building anything real on top of it.
pub struct SwarmEngine {
    scorers: Vec<Scorer>,
    confidence_threshold: f64,
    feed: Arc<dyn SnapshotProvider>,
    entropy: Box<dyn EntropySource>,
    last_recommendation: Option<Recommendation>,
}

impl SwarmEngine {
    /// Engine with the default configuration and thread-local randomness.
    pub fn new(feed: Arc<dyn SnapshotProvider>) -> Self {
        Self::with_entropy(SwarmConfig::default(), feed, Box::new(ThreadEntropy))
    }

    /// Engine with an explicit configuration.
    pub fn with_config(config: SwarmConfig, feed: Arc<dyn SnapshotProvider>) -> Self {
        Self::with_entropy(config, feed, Box::new(ThreadEntropy))
    }

    /// Engine with an explicit entropy source, used by tests to make
    /// population assignment and votes deterministic.
    pub fn with_entropy(
        config: SwarmConfig,
        feed: Arc<dyn SnapshotProvider>,
        mut entropy: Box<dyn EntropySource>,
    ) -> Self {
        let scorers: Vec<Scorer> = (0..config.population)
            .map(|id| Scorer::new(id as u32, entropy.as_mut()))
            .collect();
        info!(
            "swarm engine initialised: {} scorers, threshold {}",
            scorers.len(),
            config.confidence_threshold
        );
        Self {
            scorers,
            confidence_threshold: config.confidence_threshold,
            feed,
            entropy,
            last_recommendation: None,
        }
    }

    /// Run one evaluation cycle over `intent`.
    ///
    /// Fetches the market and network snapshots concurrently, collects one
    /// vote per scorer against the same pair of snapshots, and aggregates.
    /// The resulting recommendation replaces the stored last recommendation
    /// as a whole; a failed cycle leaves it and the population untouched.
    pub async fn evaluate(
        &mut self,
        intent: &IntentDescriptor,
    ) -> Result<Recommendation, SwarmError> {
        let (market, network) = futures::join!(self.feed.market(), self.feed.network());
        let (market, network) = (market?, network?);

        let now = Utc::now();
        let mut votes = Vec::with_capacity(self.scorers.len());
        for scorer in &mut self.scorers {
            let vote = scorer.cast_vote(&market, &network, intent, now, self.entropy.as_mut());
            debug!(
                "scorer {} ({:?}): recommend={} confidence={:.2} ({})",
                vote.scorer_id, scorer.specialization, vote.recommend, vote.confidence, vote.reason
            );
            votes.push(vote);
        }

        let recommendation = aggregate(&votes, self.confidence_threshold, now)?;
        info!(
            "swarm verdict: recommended={} confidence={} ({}/{} positive): {}",
            recommendation.recommended,
            recommendation.confidence,
            recommendation.vote_distribution.positive,
            recommendation.vote_distribution.total,
            recommendation.reason
        );
        self.last_recommendation = Some(recommendation.clone());
        Ok(recommendation)
    }

    /// Population composition and last-decision metadata. Read-only.
    pub fn status(&self) -> SwarmStatus {
        let mut specializations = BTreeMap::new();
        for scorer in &self.scorers {
            *specializations.entry(scorer.specialization).or_insert(0) += 1;
        }
        SwarmStatus {
            population_size: self.scorers.len(),
            confidence_threshold: self.confidence_threshold,
            last_analysis: self
                .last_recommendation
                .as_ref()
                .map(|recommendation| recommendation.timestamp),
            specializations,
        }
    }

    /// The most recent recommendation, if any cycle has completed.
    pub fn last_recommendation(&self) -> Option<&Recommendation> {
        self.last_recommendation.as_ref()
    }

    /// The scorer population.
    pub fn scorers(&self) -> &[Scorer] {
        &self.scorers
    }
}
