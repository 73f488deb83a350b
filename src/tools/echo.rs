// ABOUTME: Echo tool exercising the authenticated transport path
// ABOUTME: Returns the caller's message unchanged behind the Echo prefix
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{AppError, AppResult};

use super::{McpTool, ToolExecutionContext};

#[derive(Debug, Deserialize)]
struct EchoParams {
    message: String,
}

/// Echoes a message back to the caller. Requires no scope; useful for
/// verifying the authenticated transport path end to end.
pub struct EchoTool;

#[async_trait]
impl McpTool for EchoTool {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn description(&self) -> &'static str {
        "Echo a message back to verify connectivity"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Message to echo back"
                }
            },
            "required": ["message"]
        })
    }

    async fn execute(
        &self,
        params: &Value,
        _context: &ToolExecutionContext<'_>,
    ) -> AppResult<String> {
        let params: EchoParams = serde_json::from_value(params.clone())
            .map_err(|e| AppError::validation(format!("invalid echo parameters: {e}")))?;

        Ok(format!("Echo: {}", params.message))
    }
}
