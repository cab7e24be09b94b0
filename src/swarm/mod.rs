//! Swarm decision engine.
//!
//! A fixed population of independently weighted scorers votes on whether a
//! payment intent should execute under current market and network
//! conditions. Each scorer runs the heuristic for its specialization and
//! the aggregator reduces the vote set to one [`Recommendation`].
//!
//! The engine holds no global state: construct a [`SwarmEngine`] per
//! process (or per test) and inject an [`EntropySource`] where determinism
//! is needed.

pub mod aggregator;
pub mod engine;
pub mod entropy;
pub mod error;
pub mod scorer;

pub use aggregator::{Recommendation, VoteDistribution, FALLBACK_REASON};
pub use engine::{SwarmConfig, SwarmEngine, SwarmStatus};
pub use entropy::{EntropySource, SequenceEntropy, ThreadEntropy};
pub use error::SwarmError;
pub use scorer::{Scorer, Specialization, Vote};
