// ABOUTME: JSON-RPC 2.0 and MCP wire types for the HTTP transport
// ABOUTME: Request/response envelopes, error payloads, and tool descriptors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC protocol version sent in every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision this server implements
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// A JSON-RPC 2.0 request as delivered to `POST /mcp`.
///
/// `id` is kept as a raw [`Value`] so string, numeric, and null identifiers
/// all round-trip unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version marker; expected to be "2.0"
    pub jsonrpc: String,
    /// Method name (e.g. `tools/call`)
    pub method: String,
    /// Method parameters; defaults to null when omitted
    #[serde(default)]
    pub params: Value,
    /// Request identifier echoed in the response; null for notifications
    #[serde(default)]
    pub id: Value,
}

/// A JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version marker, always "2.0"
    pub jsonrpc: String,
    /// Successful result; absent on error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload; absent on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    /// Identifier of the request this answers
    pub id: Value,
}

/// A JSON-RPC 2.0 error payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code (standard or server-defined)
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Successful response carrying `result`
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Error response with the given code and message
    #[must_use]
    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id,
        }
    }
}

/// Tool metadata returned by `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name used in `tools/call`
    pub name: String,
    /// Human-readable tool description
    pub description: String,
    /// JSON Schema of the tool's parameter object
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Parameters of a `tools/call` request
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to invoke
    pub name: String,
    /// Validated parameter object for the tool; defaults to null
    #[serde(default)]
    pub arguments: Value,
}
