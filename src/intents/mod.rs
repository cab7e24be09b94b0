//! Payment intents and their in-memory lifecycle.
//!
//! An intent is created `pending`, evaluated by the swarm at creation
//! time, and evaluated again at execution time; it transitions to
//! `executed` only when that second recommendation is positive.

pub mod intent;
pub mod store;

pub use intent::{ConditionType, Intent, IntentDescriptor, IntentStatus};
pub use store::{AnalyticsSnapshot, IntentStore};
