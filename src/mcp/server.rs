// ABOUTME: MCP request dispatch over JSON-RPC
// ABOUTME: Routes initialize, tools/list, and tools/call to the tool registry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! MCP server.
//!
//! One [`McpServer`] handles one authenticated JSON-RPC request end to end.
//! Tool failures surface as JSON-RPC errors with the taxonomy's
//! server-defined codes; they never become partial success payloads.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth::CallerAuthInfo;
use crate::errors::{ERROR_INVALID_PARAMS, ERROR_INVALID_REQUEST, ERROR_METHOD_NOT_FOUND};
use crate::mcp::resources::ServerResources;
use crate::mcp::schema::{
    JsonRpcRequest, JsonRpcResponse, ToolCallParams, JSONRPC_VERSION, MCP_PROTOCOL_VERSION,
};
use crate::tools::ToolExecutionContext;

/// MCP protocol server over shared resources
#[derive(Clone)]
pub struct McpServer {
    resources: Arc<ServerResources>,
}

impl McpServer {
    /// Create a server over pre-built resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Handle one authenticated MCP request.
    ///
    /// The caller context has already been authenticated by the transport
    /// layer; authorization (scope checks) happens per tool.
    pub async fn handle_request(
        &self,
        request: JsonRpcRequest,
        caller: &CallerAuthInfo,
    ) -> JsonRpcResponse {
        debug!(method = %request.method, "handling MCP request");

        if request.jsonrpc != JSONRPC_VERSION {
            return JsonRpcResponse::error(
                request.id,
                ERROR_INVALID_REQUEST,
                format!("unsupported JSON-RPC version: {}", request.jsonrpc),
            );
        }

        match request.method.as_str() {
            "initialize" => Self::handle_initialize(request.id),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "notifications/initialized" => JsonRpcResponse::success(request.id, Value::Null),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params, caller).await,
            other => JsonRpcResponse::error(
                request.id,
                ERROR_METHOD_NOT_FOUND,
                format!("method not found: {other}"),
            ),
        }
    }

    fn handle_initialize(id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": MCP_PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let tools = self.resources.tools.descriptors();
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_tools_call(
        &self,
        id: Value,
        params: Value,
        caller: &CallerAuthInfo,
    ) -> JsonRpcResponse {
        let call: ToolCallParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    ERROR_INVALID_PARAMS,
                    format!("invalid tools/call parameters: {e}"),
                );
            }
        };

        let Some(tool) = self.resources.tools.get(&call.name) else {
            return JsonRpcResponse::error(
                id,
                ERROR_METHOD_NOT_FOUND,
                format!("tool not found: {}", call.name),
            );
        };

        let context = ToolExecutionContext {
            caller,
            resources: &self.resources,
        };

        match tool.execute(&call.arguments, &context).await {
            Ok(text) => JsonRpcResponse::success(
                id,
                json!({
                    "content": [{ "type": "text", "text": text }],
                    "isError": false
                }),
            ),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "tool invocation failed");
                JsonRpcResponse::error(id, e.jsonrpc_code(), e.to_string())
            }
        }
    }
}
