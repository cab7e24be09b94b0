//! Payment intent model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::swarm::Recommendation;

/// Kind of condition gating an intent's execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    /// Execute once a deadline passes.
    Time,
    /// Execute once a price threshold is met.
    Price,
    /// Execute on explicit user request.
    Manual,
}

impl Default for ConditionType {
    fn default() -> Self {
        ConditionType::Manual
    }
}

/// The candidate conditional payment under evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntentDescriptor {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
    pub condition_type: ConditionType,
    /// Unix seconds for [`ConditionType::Time`], price threshold for
    /// [`ConditionType::Price`]. Absent for manual intents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_value: Option<f64>,
}

/// Lifecycle state of a stored intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentStatus {
    Pending,
    Executed,
}

/// A stored payment intent with its swarm analyses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub id: String,
    #[serde(flatten)]
    pub descriptor: IntentDescriptor,
    pub status: IntentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<DateTime<Utc>>,
    /// Analysis attached when the intent was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swarm_analysis: Option<Recommendation>,
    /// Analysis of the execution-time evaluation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_analysis: Option<Recommendation>,
}

impl Intent {
    /// New pending intent with a fresh id.
    pub fn new(descriptor: IntentDescriptor) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            descriptor,
            status: IntentStatus::Pending,
            created_at: Utc::now(),
            executed_at: None,
            swarm_analysis: None,
            final_analysis: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_intent_is_pending() {
        let intent = Intent::new(IntentDescriptor {
            sender: "0xUser123".into(),
            receiver: "0xRecipient1".into(),
            amount: 0.5,
            condition_type: ConditionType::Time,
            condition_value: Some(1_705_329_000.0),
        });
        assert_eq!(intent.status, IntentStatus::Pending);
        assert!(intent.executed_at.is_none());
        assert!(intent.swarm_analysis.is_none());
    }

    #[test]
    fn test_descriptor_accepts_sparse_json() {
        // The recommendation endpoint receives arbitrary JSON; missing
        // fields fall back to defaults.
        let descriptor: IntentDescriptor = serde_json::from_str("{}").unwrap();
        assert_eq!(descriptor.condition_type, ConditionType::Manual);
        assert!(descriptor.condition_value.is_none());

        let descriptor: IntentDescriptor = serde_json::from_str(
            r#"{"receiver": "0xabc", "amount": 1.5, "conditionType": "time", "conditionValue": 1705329000}"#,
        )
        .unwrap();
        assert_eq!(descriptor.receiver, "0xabc");
        assert_eq!(descriptor.condition_type, ConditionType::Time);
        assert_eq!(descriptor.condition_value, Some(1_705_329_000.0));
    }

    #[test]
    fn test_intent_serializes_flat_camel_case() {
        let intent = Intent::new(IntentDescriptor {
            sender: "0xUser123".into(),
            receiver: "0xRecipient1".into(),
            amount: 0.5,
            condition_type: ConditionType::Manual,
            condition_value: None,
        });
        let value = serde_json::to_value(&intent).unwrap();
        assert_eq!(value["conditionType"], "manual");
        assert_eq!(value["status"], "pending");
        assert!(value.get("createdAt").is_some());
        // Descriptor fields are flattened onto the intent object.
        assert_eq!(value["receiver"], "0xRecipient1");
    }
}
