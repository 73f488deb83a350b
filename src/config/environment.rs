// ABOUTME: Server configuration loaded from the process environment
// ABOUTME: Ports, store location, downstream base URLs, and the outbound app identifier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

use std::env;

use crate::errors::{AppError, AppResult};

/// Default HTTP port when `HTTP_PORT` is unset
pub const DEFAULT_HTTP_PORT: u16 = 3000;
/// Default National Weather Service API base URL
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.weather.gov";
/// Default GitHub REST API base URL
pub const DEFAULT_GITHUB_BASE_URL: &str = "https://api.github.com";
/// Default outbound application identifier for the GitHub integration
pub const DEFAULT_GITHUB_APP_ID: &str = "github";

/// Server configuration resolved from environment variables.
///
/// Downstream base URLs are overridable so tests and staging environments
/// can redirect them; production deployments normally leave the defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port (`HTTP_PORT`)
    pub http_port: u16,
    /// Settings store location (`DATABASE_URL`); `None` selects the
    /// in-memory store for non-hosted environments
    pub database_url: Option<String>,
    /// Outbound application identifier for GitHub token exchange
    /// (`OUTBOUND_GITHUB_APP_ID`)
    pub github_app_id: String,
    /// GitHub REST API base URL (`GITHUB_API_BASE_URL`)
    pub github_base_url: String,
    /// National Weather Service API base URL (`WEATHER_API_BASE_URL`)
    pub weather_base_url: String,
    /// User-Agent header sent to downstream APIs
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            database_url: None,
            github_app_id: DEFAULT_GITHUB_APP_ID.to_owned(),
            github_base_url: DEFAULT_GITHUB_BASE_URL.to_owned(),
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_owned(),
            user_agent: default_user_agent(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns `Validation` if `HTTP_PORT` is set but not a valid port
    /// number.
    pub fn from_env() -> AppResult<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::validation(format!("HTTP_PORT is not a valid port: {raw}"))
            })?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        Ok(Self {
            http_port,
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            github_app_id: env_or("OUTBOUND_GITHUB_APP_ID", DEFAULT_GITHUB_APP_ID),
            github_base_url: env_or("GITHUB_API_BASE_URL", DEFAULT_GITHUB_BASE_URL),
            weather_base_url: env_or("WEATHER_API_BASE_URL", DEFAULT_WEATHER_BASE_URL),
            user_agent: default_user_agent(),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn default_user_agent() -> String {
    format!(
        "{}/{} (+{})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_REPOSITORY")
    )
}
