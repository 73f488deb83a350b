// ABOUTME: MCP tool trait, execution context, and registry
// ABOUTME: Tools declare name, description, and schema; the registry serves list and lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! Tool implementations.
//!
//! Each tool is a [`McpTool`] implementation registered in the
//! [`ToolRegistry`]. Tools receive a validated parameter object plus the
//! caller's authorization context and return plain text; every failure is a
//! distinct `AppError` variant that the MCP server maps to a protocol-level
//! error.

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::CallerAuthInfo;
use crate::errors::AppResult;
use crate::mcp::resources::ServerResources;
use crate::mcp::schema::ToolDescriptor;

/// Echo tool
pub mod echo;

/// GitHub repository tools
pub mod github;

/// Weather tools
pub mod weather;

pub use echo::EchoTool;
pub use github::{CreateRepositoryTool, ListRepositoriesTool, REPOS_READ_SCOPE, REPOS_WRITE_SCOPE};
pub use weather::{WeatherAlertsTool, WeatherForecastTool, WEATHER_READ_SCOPE};

/// Per-invocation context handed to a tool
pub struct ToolExecutionContext<'a> {
    /// Authenticated caller of this invocation
    pub caller: &'a CallerAuthInfo,
    /// Shared server resources
    pub resources: &'a ServerResources,
}

/// A single MCP tool.
///
/// Implementations are stateless; per-request state arrives through the
/// execution context.
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name used in `tools/call`
    fn name(&self) -> &'static str;

    /// Human-readable description for `tools/list`
    fn description(&self) -> &'static str;

    /// JSON Schema of the tool's parameter object
    fn input_schema(&self) -> Value;

    /// Execute the tool and return its textual result.
    ///
    /// # Errors
    /// Returns the taxonomy variant matching the failure point:
    /// `Unauthorized`, `InvalidToken`, `InvalidClientId`, `ExchangeFailed`,
    /// `DownstreamFailed`, `UnexpectedFormat`, or `Validation`.
    async fn execute(&self, params: &Value, context: &ToolExecutionContext<'_>)
        -> AppResult<String>;
}

/// Registry of available tools, in listing order
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the server's standard tool set
    #[must_use]
    pub fn with_default_tools() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(weather::WeatherAlertsTool));
        registry.register(Box::new(weather::WeatherForecastTool));
        registry.register(Box::new(github::ListRepositoriesTool));
        registry.register(Box::new(github::CreateRepositoryTool));
        registry.register(Box::new(echo::EchoTool));
        registry
    }

    /// Add a tool to the registry
    pub fn register(&mut self, tool: Box<dyn McpTool>) {
        self.tools.push(tool);
    }

    /// Look up a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(AsRef::as_ref)
    }

    /// Descriptors of all registered tools, in registration order
    #[must_use]
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|tool| ToolDescriptor {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }
}
