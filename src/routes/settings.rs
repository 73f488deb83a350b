// ABOUTME: Provider settings API exposing the configuration resolver
// ABOUTME: GET resolves the effective config, PUT applies a validated partial update
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::auth::authenticate_request;
use crate::config::{ConfigPatch, ProviderConfig};
use crate::errors::AppResult;
use crate::mcp::resources::ServerResources;

/// Effective provider settings as returned by the API
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    /// Provider project identifier, when configured
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Provider API base URL
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    /// For updates: whether the new settings reached the durable store.
    /// `false` means the update is held in-process only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durable: Option<bool>,
}

impl SettingsResponse {
    fn resolved(config: ProviderConfig) -> Self {
        Self {
            project_id: config.project_id,
            base_url: config.base_url,
            durable: None,
        }
    }
}

/// Router for `/api/settings`
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/api/settings", get(get_settings).put(update_settings))
        .with_state(resources)
}

/// Resolve and return the effective provider settings.
///
/// # Errors
/// Returns `AuthRequired`/`InvalidToken` for a missing or undecodable
/// bearer token; resolution itself never fails.
async fn get_settings(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
) -> AppResult<Json<SettingsResponse>> {
    authenticate_request(&headers)?;

    let config = resources.resolver.resolve().await;
    Ok(Json(SettingsResponse::resolved(config)))
}

/// Apply a partial settings update and return the new effective settings.
///
/// # Errors
/// Returns `AuthRequired`/`InvalidToken` for authentication failures and
/// `Validation` for a malformed patch. A persistence failure is not an
/// error: the response reports `durable: false` instead.
async fn update_settings(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> AppResult<Json<SettingsResponse>> {
    authenticate_request(&headers)?;

    let patch = ConfigPatch::from_value(&body)?;
    let outcome = resources.resolver.update(patch).await?;

    info!(durable = outcome.durable, "provider settings updated via API");

    Ok(Json(SettingsResponse {
        project_id: outcome.config.project_id,
        base_url: outcome.config.base_url,
        durable: Some(outcome.durable),
    }))
}
