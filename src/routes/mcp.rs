// ABOUTME: HTTP transport for the MCP endpoint
// ABOUTME: Authenticates the bearer caller and hands JSON-RPC requests to the MCP server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use crate::auth::authenticate_request;
use crate::mcp::resources::ServerResources;
use crate::mcp::schema::{JsonRpcRequest, JsonRpcResponse};
use crate::mcp::server::McpServer;

/// Router for `POST /mcp`
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp))
        .with_state(resources)
}

/// Authenticate the caller, then dispatch the JSON-RPC request.
///
/// Authentication failures answer with an HTTP error status and a JSON-RPC
/// error envelope; everything after authentication answers 200 with the
/// outcome inside the envelope, as MCP clients expect.
async fn handle_mcp(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    let caller = match authenticate_request(&headers) {
        Ok(caller) => caller,
        Err(e) => {
            let response =
                JsonRpcResponse::error(request.id, e.jsonrpc_code(), e.to_string());
            return (e.http_status(), Json(response)).into_response();
        }
    };

    let server = McpServer::new(resources);
    let response = server.handle_request(request, &caller).await;
    (StatusCode::OK, Json(response)).into_response()
}
