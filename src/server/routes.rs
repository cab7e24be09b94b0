//! Axum route handlers for the KestrelPay backend.
//!
//! # Routes
//!
//! - `GET  /api/health`                      — Service liveness
//! - `POST /api/intents/create`              — Create intent + initial swarm analysis
//! - `POST /api/intents/execute/:id`         — Re-evaluate and execute a pending intent
//! - `GET  /api/intents/user/:address`       — List a sender's intents, newest first
//! - `GET  /api/intents/analytics/overview`  — Analytics counters + swarm status
//! - `GET  /api/swarm/status`                — Population composition and threshold
//! - `GET  /api/swarm/recommendation`        — Run one evaluation cycle on demand

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use crate::feeds::SimulatedFeed;
use crate::intents::{ConditionType, Intent, IntentDescriptor, IntentStatus, IntentStore};
use crate::swarm::{SwarmConfig, SwarmEngine, SwarmError};

/// Shared application state for the HTTP server.
///
/// One engine serves both the intent lifecycle and the swarm routes; its
/// evaluation cycle mutates scorer state, so it sits behind an async lock.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<SwarmEngine>>,
    pub store: Arc<IntentStore>,
}

impl AppState {
    /// State with a default-configured engine over the simulated feed.
    pub fn new() -> Self {
        Self::with_config(SwarmConfig::default())
    }

    /// State with an explicitly configured engine over the simulated feed.
    pub fn with_config(config: SwarmConfig) -> Self {
        Self::with_engine(SwarmEngine::with_config(
            config,
            Arc::new(SimulatedFeed::new()),
        ))
    }

    /// State wrapping a pre-built engine (tests inject deterministic ones).
    pub fn with_engine(engine: SwarmEngine) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            store: Arc::new(IntentStore::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/intents/create", post(create_intent_handler))
        .route("/api/intents/execute/:id", post(execute_intent_handler))
        .route("/api/intents/user/:address", get(user_intents_handler))
        .route("/api/intents/analytics/overview", get(analytics_handler))
        .route("/api/swarm/status", get(swarm_status_handler))
        .route("/api/swarm/recommendation", get(recommendation_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn internal_error(error: SwarmError) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": format!("Swarm evaluation failed: {}", error),
        })),
    )
}

/// GET /api/health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "OK",
        "timestamp": Utc::now(),
        "service": "KestrelPay Backend",
        "version": crate::VERSION,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateIntentRequest {
    sender: Option<String>,
    receiver: Option<String>,
    amount: Option<f64>,
    condition_type: Option<ConditionType>,
    condition_value: Option<f64>,
}

/// POST /api/intents/create — store a new intent and attach the swarm's
/// initial analysis.
async fn create_intent_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateIntentRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let (receiver, amount, condition_type) = match (
        request.receiver,
        request.amount,
        request.condition_type,
    ) {
        (Some(receiver), Some(amount), Some(condition_type)) => {
            (receiver, amount, condition_type)
        }
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Missing required fields"})),
            ));
        }
    };

    let descriptor = IntentDescriptor {
        sender: request.sender.unwrap_or_else(|| "0xUserAddress".to_string()),
        receiver,
        amount,
        condition_type,
        condition_value: request.condition_value,
    };

    let intent = Intent::new(descriptor.clone());
    let intent_id = intent.id.clone();
    state.store.insert(intent);

    let analysis = state
        .engine
        .write()
        .await
        .evaluate(&descriptor)
        .await
        .map_err(internal_error)?;
    state.store.attach_analysis(&intent_id, analysis.clone());

    Ok(Json(serde_json::json!({
        "success": true,
        "intentId": intent_id,
        "swarmAnalysis": analysis,
        "message": "Intent created successfully",
    })))
}

/// POST /api/intents/execute/:id — final swarm check, then execution.
///
/// The intent transitions to executed only when the execution-time
/// evaluation recommends it; otherwise the attempt is rejected and the
/// intent stays pending.
async fn execute_intent_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let intent = state.store.get(&id).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Intent not found"})),
        )
    })?;

    if intent.status != IntentStatus::Pending {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Intent not pending"})),
        ));
    }

    let final_analysis = state
        .engine
        .write()
        .await
        .evaluate(&intent.descriptor)
        .await
        .map_err(internal_error)?;

    if !final_analysis.recommended {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "Execution not recommended",
                "analysis": final_analysis,
            })),
        ));
    }

    state
        .store
        .mark_executed(&id, final_analysis.clone())
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "Intent not found"})),
            )
        })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "intentId": id,
        "analysis": final_analysis,
        "message": "Intent executed successfully",
    })))
}

/// GET /api/intents/user/:address — a sender's intents, newest first.
async fn user_intents_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Json<Value> {
    let intents = state.store.by_sender(&address);
    Json(serde_json::json!({
        "success": true,
        "count": intents.len(),
        "intents": intents,
    }))
}

/// GET /api/intents/analytics/overview — counters plus swarm status.
async fn analytics_handler(State(state): State<AppState>) -> Json<Value> {
    let analytics = state.store.analytics();
    let swarm_status = state.engine.read().await.status();
    Json(serde_json::json!({
        "success": true,
        "analytics": analytics,
        "swarmStatus": swarm_status,
    }))
}

/// GET /api/swarm/status — population composition and last-decision
/// metadata.
async fn swarm_status_handler(State(state): State<AppState>) -> Json<Value> {
    let status = state.engine.read().await.status();
    Json(serde_json::json!({
        "success": true,
        "status": status,
    }))
}

#[derive(Debug, Deserialize)]
struct RecommendationQuery {
    /// JSON-encoded [`IntentDescriptor`]; missing fields default.
    #[serde(rename = "intentData")]
    intent_data: Option<String>,
}

/// GET /api/swarm/recommendation — run one evaluation cycle on demand.
async fn recommendation_handler(
    State(state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let descriptor = match query.intent_data {
        Some(raw) => serde_json::from_str::<IntentDescriptor>(&raw).map_err(|error| {
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": format!("Invalid intentData: {}", error),
                })),
            )
        })?,
        None => IntentDescriptor::default(),
    };

    let recommendation = state
        .engine
        .write()
        .await
        .evaluate(&descriptor)
        .await
        .map_err(internal_error)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "recommendation": recommendation,
    })))
}
