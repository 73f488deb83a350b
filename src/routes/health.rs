// ABOUTME: Health check route reporting service status and settings-store reachability
// ABOUTME: Unauthenticated endpoint for load balancers and uptime monitors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::mcp::resources::ServerResources;

/// Key read to probe settings-store reachability; the value is irrelevant
const PROBE_KEY: &str = "provider_config";

/// Health check response body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "ok" or "degraded"
    pub status: &'static str,
    /// Service name
    pub service: &'static str,
    /// Service version
    pub version: &'static str,
    /// Whether the durable settings store answered
    pub settings_store: &'static str,
    /// Response timestamp (RFC 3339)
    pub timestamp: String,
}

/// Router for `GET /health`
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(resources)
}

/// Report service health.
///
/// An unreachable settings store degrades the status but does not fail the
/// check: the server keeps serving with in-memory configuration fallback.
async fn health_check(State(resources): State<Arc<ServerResources>>) -> Json<HealthResponse> {
    let store_reachable = resources
        .settings_store
        .get(PROBE_KEY)
        .await
        .is_ok();

    Json(HealthResponse {
        status: if store_reachable { "ok" } else { "degraded" },
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        settings_store: if store_reachable {
            "reachable"
        } else {
            "unavailable"
        },
        timestamp: Utc::now().to_rfc3339(),
    })
}
