// ABOUTME: Main library entry point for the Beacon MCP server
// ABOUTME: Exposes scope-gated MCP tools backed by identity-brokered outbound tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

#![deny(unsafe_code)]

//! # Beacon MCP Server
//!
//! A Model Context Protocol (MCP) server that exposes a small set of tools
//! (weather alerts/forecast, GitHub repository listing/creation, echo) to AI
//! assistants. Callers authenticate with a bearer token issued by an identity
//! provider; tools that reach GitHub on the caller's behalf exchange that
//! token for a provider-scoped outbound access token before calling the
//! downstream API.
//!
//! ## Architecture
//!
//! - **Auth**: bearer extraction and claim decoding for inbound requests
//! - **Config**: layered provider settings (persisted, environment, default)
//! - **Outbound**: scope checks and outbound token exchange for tools
//! - **External**: downstream REST clients (National Weather Service, GitHub)
//! - **Tools**: MCP tool implementations behind a shared registry
//! - **Routes**: Axum HTTP surface (`/mcp`, `/api/settings`, `/health`)
//!
//! ## Trust boundary
//!
//! Bearer token signatures are verified upstream (identity-provider
//! middleware or a fronting gateway). This server decodes token claims
//! without cryptographic verification; deploying it without the upstream
//! verification layer is unsupported.

/// Bearer token handling and caller identity extraction
pub mod auth;

/// Configuration management and layered settings resolution
pub mod config;

/// Durable key/value settings storage
pub mod database;

/// Unified error handling with protocol-level error codes
pub mod errors;

/// External API clients (National Weather Service, GitHub)
pub mod external;

/// Plain-text rendering of tool results
pub mod formatters;

/// Model Context Protocol server implementation
pub mod mcp;

/// Outbound token brokering for downstream API calls
pub mod outbound;

/// HTTP routes for the MCP endpoint and settings API
pub mod routes;

/// Tool implementations and registry
pub mod tools;
