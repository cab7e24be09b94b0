//! Scenario data snapshots consumed by the swarm.
//!
//! An evaluation cycle reads two independent snapshots (market conditions
//! and network conditions) through the [`SnapshotProvider`] boundary. The
//! in-process [`SimulatedFeed`] mirrors the original demo's synthetic value
//! ranges; a re-architected deployment would back the same trait with real
//! data feeds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::swarm::{EntropySource, ThreadEntropy};

/// Fixed rolling average the simulated market reports (gwei).
const AVERAGE_GAS: f64 = 45.0;
/// Synthetic gas price range (gwei).
const GAS_LOW: f64 = 10.0;
const GAS_HIGH: f64 = 110.0;
/// Network capacity the simulated feed assumes.
const MAX_CAPACITY: u64 = 100_000;
/// Block height the simulated feed reports.
const BLOCK_NUMBER: u64 = 18_965_432;

/// Market-condition snapshot, fetched fresh per evaluation cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    /// Current price of execution.
    pub gas_price: f64,
    /// Rolling average of that price.
    pub average_gas: f64,
    pub timestamp: DateTime<Utc>,
}

/// Network-condition snapshot, fetched fresh per evaluation cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    pub pending_transactions: u64,
    pub max_capacity: u64,
    pub mempool_size: u64,
    pub block_number: u64,
}

/// Snapshot fetch failure.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The upstream feed did not produce a snapshot.
    #[error("{feed} feed unavailable: {message}")]
    Unavailable {
        feed: &'static str,
        message: String,
    },
}

/// Read-only provider of the two per-cycle scenario snapshots.
///
/// The market and network fetches of one cycle carry no ordering
/// dependency and may run concurrently; neither snapshot is retained
/// beyond the cycle that used it.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn market(&self) -> Result<MarketSnapshot, FeedError>;
    async fn network(&self) -> Result<NetworkSnapshot, FeedError>;
}

/// Synthetic feed producing plausible values in fixed ranges. Never fails.
pub struct SimulatedFeed {
    entropy: Mutex<Box<dyn EntropySource>>,
}

impl SimulatedFeed {
    pub fn new() -> Self {
        Self::with_entropy(Box::new(ThreadEntropy))
    }

    /// Feed drawing from an explicit entropy source.
    pub fn with_entropy(entropy: Box<dyn EntropySource>) -> Self {
        Self {
            entropy: Mutex::new(entropy),
        }
    }
}

impl Default for SimulatedFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotProvider for SimulatedFeed {
    async fn market(&self) -> Result<MarketSnapshot, FeedError> {
        let mut entropy = self.entropy.lock();
        Ok(MarketSnapshot {
            gas_price: entropy.range(GAS_LOW, GAS_HIGH),
            average_gas: AVERAGE_GAS,
            timestamp: Utc::now(),
        })
    }

    async fn network(&self) -> Result<NetworkSnapshot, FeedError> {
        let mut entropy = self.entropy.lock();
        Ok(NetworkSnapshot {
            pending_transactions: 10_000 + (entropy.unit() * 50_000.0) as u64,
            max_capacity: MAX_CAPACITY,
            mempool_size: 2_000 + (entropy.unit() * 8_000.0) as u64,
            block_number: BLOCK_NUMBER,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_market_snapshot_ranges() {
        let feed = SimulatedFeed::new();
        for _ in 0..100 {
            let snapshot = feed.market().await.unwrap();
            assert!(snapshot.gas_price >= GAS_LOW && snapshot.gas_price < GAS_HIGH);
            assert_eq!(snapshot.average_gas, AVERAGE_GAS);
        }
    }

    #[tokio::test]
    async fn test_network_snapshot_ranges() {
        let feed = SimulatedFeed::new();
        for _ in 0..100 {
            let snapshot = feed.network().await.unwrap();
            assert!(snapshot.pending_transactions >= 10_000);
            assert!(snapshot.pending_transactions < 60_000);
            assert!(snapshot.mempool_size >= 2_000);
            assert!(snapshot.mempool_size < 10_000);
            assert_eq!(snapshot.max_capacity, MAX_CAPACITY);
            assert_eq!(snapshot.block_number, BLOCK_NUMBER);
        }
    }

    #[tokio::test]
    async fn test_deterministic_feed() {
        use crate::swarm::SequenceEntropy;

        let feed = SimulatedFeed::with_entropy(Box::new(SequenceEntropy::constant(0.5)));
        let market = feed.market().await.unwrap();
        assert_eq!(market.gas_price, 60.0);

        let network = feed.network().await.unwrap();
        assert_eq!(network.pending_transactions, 35_000);
        assert_eq!(network.mempool_size, 6_000);
    }
}
