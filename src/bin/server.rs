//! KestrelPay backend server binary.
//!
//! Starts the axum HTTP server that exposes the intent and swarm REST
//! endpoints over in-memory storage.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 3001)
//! - `KESTREL_SWARM_SIZE` — Scorer population size (default: 25)
//! - `KESTREL_THRESHOLD` — Confidence threshold, 0–100 (default: 75)
//! - `RUST_LOG` — Tracing filter (default: "info")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use kestrelpay::server::{app_router, AppState};
use kestrelpay::swarm::SwarmConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,kestrelpay=debug".into()),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let bind_addr = format!("0.0.0.0:{}", port);

    let mut config = SwarmConfig::default();
    if let Some(population) = env_parse("KESTREL_SWARM_SIZE") {
        config.population = population;
    }
    if let Some(threshold) = env_parse("KESTREL_THRESHOLD") {
        config.confidence_threshold = threshold;
    }

    // Build app state and seed the demo intent
    let state = AppState::with_config(config);
    state.store.seed_demo();

    let app = app_router(state);

    tracing::info!("KestrelPay backend starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /api/health                     — liveness probe");
    tracing::info!("  POST /api/intents/create             — create payment intent");
    tracing::info!("  POST /api/intents/execute/:id        — execute pending intent");
    tracing::info!("  GET  /api/intents/user/:address      — list intents by sender");
    tracing::info!("  GET  /api/intents/analytics/overview — analytics counters");
    tracing::info!("  GET  /api/swarm/status               — swarm composition");
    tracing::info!("  GET  /api/swarm/recommendation       — on-demand evaluation");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|value| value.parse().ok())
}
