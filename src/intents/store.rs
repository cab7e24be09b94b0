//! In-memory intent storage and analytics counters.
//!
//! A map keyed by intent id plus a handful of running counters. There is
//! no persistence and no per-user isolation; the store exists to back the
//! demo REST surface.

use chrono::Utc;
use dashmap::DashMap;
use log::info;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::intent::{ConditionType, Intent, IntentDescriptor, IntentStatus};
use crate::swarm::{Recommendation, VoteDistribution};

/// Aggregate counters over the stored intents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_intents: u64,
    pub executed_intents: u64,
    pub cancelled_intents: u64,
    pub total_volume: f64,
    /// Rounded mean confidence over intents that carry an analysis.
    pub average_confidence: u8,
}

/// Map of intents keyed by id, plus running counters.
#[derive(Default)]
pub struct IntentStore {
    intents: DashMap<String, Intent>,
    analytics: RwLock<AnalyticsSnapshot>,
}

impl IntentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new intent, counting it toward totals.
    pub fn insert(&self, intent: Intent) {
        {
            let mut analytics = self.analytics.write();
            analytics.total_intents += 1;
            analytics.total_volume += intent.descriptor.amount;
        }
        self.intents.insert(intent.id.clone(), intent);
    }

    pub fn get(&self, id: &str) -> Option<Intent> {
        self.intents.get(id).map(|entry| entry.value().clone())
    }

    /// Attach the creation-time analysis to a stored intent.
    pub fn attach_analysis(&self, id: &str, analysis: Recommendation) {
        if let Some(mut entry) = self.intents.get_mut(id) {
            entry.swarm_analysis = Some(analysis);
        }
    }

    /// Transition a pending intent to executed, stamping the execution
    /// time and recording the final analysis. Returns the updated intent.
    pub fn mark_executed(&self, id: &str, analysis: Recommendation) -> Option<Intent> {
        let mut entry = self.intents.get_mut(id)?;
        entry.status = IntentStatus::Executed;
        entry.executed_at = Some(Utc::now());
        entry.final_analysis = Some(analysis);
        self.analytics.write().executed_intents += 1;
        info!("intent {} executed", id);
        Some(entry.value().clone())
    }

    /// All intents of one sender, newest first.
    pub fn by_sender(&self, sender: &str) -> Vec<Intent> {
        let mut intents: Vec<Intent> = self
            .intents
            .iter()
            .filter(|entry| entry.value().descriptor.sender == sender)
            .map(|entry| entry.value().clone())
            .collect();
        intents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        intents
    }

    /// Current counters, with `average_confidence` recomputed from the
    /// stored creation-time analyses.
    pub fn analytics(&self) -> AnalyticsSnapshot {
        let (sum, count) = self
            .intents
            .iter()
            .filter_map(|entry| {
                entry
                    .value()
                    .swarm_analysis
                    .as_ref()
                    .map(|analysis| analysis.confidence as u64)
            })
            .fold((0u64, 0u64), |(sum, count), confidence| {
                (sum + confidence, count + 1)
            });

        let mut analytics = self.analytics.write();
        analytics.average_confidence = if count > 0 {
            (sum as f64 / count as f64).round() as u8
        } else {
            0
        };
        analytics.clone()
    }

    /// Install the executed sample intent the demo ships with.
    pub fn seed_demo(&self) {
        let now = Utc::now();
        let analysis = Recommendation {
            recommended: true,
            confidence: 85,
            reason: "Optimal gas prices".to_string(),
            timestamp: now,
            vote_distribution: VoteDistribution {
                total: 25,
                positive: 21,
                negative: 4,
            },
        };
        let intent = Intent {
            id: "sample-1".to_string(),
            descriptor: IntentDescriptor {
                sender: "0xUser123".to_string(),
                receiver: "0xRecipient1".to_string(),
                amount: 0.5,
                condition_type: ConditionType::Time,
                condition_value: Some(now.timestamp() as f64),
            },
            status: IntentStatus::Executed,
            created_at: now,
            executed_at: Some(now),
            swarm_analysis: Some(analysis.clone()),
            final_analysis: Some(analysis),
        };
        self.insert(intent);
        self.analytics.write().executed_intents += 1;
    }
}
