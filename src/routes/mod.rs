// ABOUTME: HTTP route organization for the Beacon MCP server
// ABOUTME: Assembles the MCP endpoint, settings API, and health check into one router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! Route modules.
//!
//! Each domain module contains route definitions and thin handlers that
//! delegate to the MCP server, configuration resolver, or settings store.
//! [`router`] assembles the full HTTP surface with request tracing.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::mcp::resources::ServerResources;

/// Health check route
pub mod health;

/// Model Context Protocol endpoint
pub mod mcp;

/// Provider settings API
pub mod settings;

/// Build the server's complete HTTP router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::router(resources.clone()))
        .merge(mcp::router(resources.clone()))
        .merge(settings::router(resources))
        .layer(TraceLayer::new_for_http())
}
