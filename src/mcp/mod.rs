// ABOUTME: Model Context Protocol server implementation
// ABOUTME: JSON-RPC schema types, shared server resources, and request dispatch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

/// Shared server resources built once at startup
pub mod resources;

/// JSON-RPC 2.0 and MCP wire types
pub mod schema;

/// MCP request dispatch
pub mod server;

pub use resources::ServerResources;
pub use server::McpServer;
