//! # KestrelPay Backend
//!
//! Demo backend for conditional payment intents ("pay X to Y when
//! condition Z holds"). Each intent is scored by a swarm of independently
//! weighted heuristic scorers that vote on whether execution is advisable
//! under current market and network conditions; a weighted aggregator
//! reduces the votes to a single recommendation with a threshold decision.
//!
//! The crate is a library plus a `server` binary exposing the REST API
//! over in-memory storage.

pub mod feeds;
pub mod intents;
pub mod server;
pub mod swarm;

pub use feeds::{MarketSnapshot, NetworkSnapshot, SimulatedFeed, SnapshotProvider};
pub use intents::{Intent, IntentDescriptor, IntentStore};
pub use swarm::{Recommendation, SwarmConfig, SwarmEngine, SwarmStatus};

/// Service version reported by the health endpoint.
pub const VERSION: &str = "2.0.0";
