//! HTTP transport for the KestrelPay backend.
//!
//! A thin axum layer over the swarm engine and the in-memory intent
//! store. All decision logic lives in [`crate::swarm`]; handlers parse,
//! delegate, and shape JSON responses.

pub mod routes;

pub use routes::{app_router, AppState};
