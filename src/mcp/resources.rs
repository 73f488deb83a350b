// ABOUTME: Shared server resources constructed once per process
// ABOUTME: Dependency injection point wiring stores, clients, broker, and tool registry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! Server resources.
//!
//! Everything request handlers need is built once at startup and shared as
//! `Arc<ServerResources>`. The constructor takes the store, exchanger, and
//! downstream clients as trait objects so tests can inject recording mocks;
//! [`ServerResources::from_config`] wires the production implementations.

use std::sync::Arc;

use crate::config::{ConfigResolver, ServerConfig};
use crate::database::{connect_settings_store, SettingsStore};
use crate::errors::{AppError, AppResult};
use crate::external::{GithubClient, NwsClient, RepositoryHost, WeatherSource};
use crate::outbound::{HttpTokenExchanger, OutboundBroker, TokenExchanger};
use crate::tools::ToolRegistry;

/// Shared, immutable server state.
///
/// Constructed once per process; request handlers hold an `Arc` and never
/// mutate it. Mutable state (the configuration overlay) lives inside the
/// resolver behind its own lock.
pub struct ServerResources {
    /// Environment-derived server configuration
    pub config: ServerConfig,
    /// Durable settings store
    pub settings_store: Arc<dyn SettingsStore>,
    /// Layered provider-settings resolver
    pub resolver: Arc<ConfigResolver>,
    /// Outbound token broker for downstream calls
    pub broker: OutboundBroker,
    /// Weather data source
    pub weather: Arc<dyn WeatherSource>,
    /// Source-control host
    pub repository_host: Arc<dyn RepositoryHost>,
    /// Registered MCP tools
    pub tools: ToolRegistry,
}

impl ServerResources {
    /// Assemble resources from explicit collaborators.
    ///
    /// Tests use this to substitute mocks for the exchanger, weather
    /// source, and repository host.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        settings_store: Arc<dyn SettingsStore>,
        exchanger: Arc<dyn TokenExchanger>,
        weather: Arc<dyn WeatherSource>,
        repository_host: Arc<dyn RepositoryHost>,
    ) -> Self {
        let resolver = Arc::new(ConfigResolver::new(settings_store.clone()));
        let broker = OutboundBroker::new(resolver.clone(), exchanger);

        Self {
            config,
            settings_store,
            resolver,
            broker,
            weather,
            repository_host,
            tools: ToolRegistry::with_default_tools(),
        }
    }

    /// Build production resources: settings store per `database_url`, HTTP
    /// exchanger, and real downstream clients.
    ///
    /// # Errors
    /// Returns `PersistenceUnavailable` if the settings store cannot be
    /// opened and `Internal` if the HTTP client cannot be constructed.
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        let settings_store = connect_settings_store(config.database_url.as_deref()).await?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::internal(format!("failed to build HTTP client: {e}")))?;

        let exchanger = Arc::new(HttpTokenExchanger::new(http.clone()));
        let weather = Arc::new(NwsClient::new(http.clone(), config.weather_base_url.clone()));
        let repository_host = Arc::new(GithubClient::new(http, config.github_base_url.clone()));

        Ok(Self::new(
            config,
            settings_store,
            exchanger,
            weather,
            repository_host,
        ))
    }
}
