// ABOUTME: Configuration management for the Beacon MCP server
// ABOUTME: Environment-driven server settings and layered provider settings resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

/// Server configuration loaded from the process environment
pub mod environment;

/// Layered identity-provider settings resolution
pub mod resolver;

pub use environment::ServerConfig;
pub use resolver::{ConfigPatch, ConfigResolver, ConfigUpdate, ProviderConfig};
