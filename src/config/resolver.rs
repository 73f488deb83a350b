// ABOUTME: Layered identity-provider settings resolution with best-effort persistence
// ABOUTME: Resolves persisted overrides, environment fallbacks, and hard-coded defaults per field
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! Identity-provider settings resolution.
//!
//! The effective provider configuration is assembled per field from three
//! layers, in strict precedence order: a persisted override in the settings
//! store, a process environment variable, and a hard-coded default. A stored
//! `project_id` with no stored `base_url` still falls back to the
//! environment or default for `base_url` alone.
//!
//! Updates are best-effort durable: when the settings store is unreachable
//! the merged configuration is retained in an in-process overlay so the
//! update stays observable for the remainder of the process lifetime, at
//! the cost of cross-instance consistency.

use std::env;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use crate::database::SettingsStore;
use crate::errors::{AppError, AppResult};

/// Hard-coded default identity-provider base URL
pub const DEFAULT_BASE_URL: &str = "https://api.descope.com";
/// Environment fallback for the provider project identifier
pub const ENV_PROJECT_ID: &str = "DESCOPE_PROJECT_ID";
/// Environment fallback for the provider base URL
pub const ENV_BASE_URL: &str = "DESCOPE_BASE_URL";

/// Settings store key holding the persisted provider configuration
const SETTINGS_KEY: &str = "provider_config";

/// Effective identity-provider configuration.
///
/// `base_url` is always a non-empty absolute URL because the hard-coded
/// default exists; `project_id` stays `None` until configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Identity-provider project identifier
    pub project_id: Option<String>,
    /// Identity-provider API base URL
    pub base_url: String,
}

/// Persisted partial configuration, stored as a single JSON document.
///
/// Only explicitly configured fields are present; resolution fills the rest
/// from the environment and defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoredConfig {
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    project_id: Option<String>,
    #[serde(rename = "baseUrl", skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
}

/// Partial update to the persisted provider configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigPatch {
    /// New project identifier, when provided
    pub project_id: Option<String>,
    /// New base URL, when provided
    pub base_url: Option<String>,
}

impl ConfigPatch {
    /// Build a patch from a JSON request body, enforcing that any provided
    /// field is a string.
    ///
    /// Unknown fields are ignored.
    ///
    /// # Errors
    /// Returns `Validation` if the body is not an object or a known field
    /// carries a non-string value.
    pub fn from_value(body: &Value) -> AppResult<Self> {
        let Some(object) = body.as_object() else {
            return Err(AppError::validation("settings update must be a JSON object"));
        };

        let mut patch = Self::default();
        for (key, field) in [("projectId", &mut patch.project_id), ("baseUrl", &mut patch.base_url)]
        {
            if let Some(value) = object.get(key) {
                let Some(text) = value.as_str() else {
                    return Err(AppError::validation(format!("'{key}' must be a string")));
                };
                *field = Some(text.to_owned());
            }
        }

        Ok(patch)
    }

    fn is_empty(&self) -> bool {
        self.project_id.is_none() && self.base_url.is_none()
    }
}

/// Outcome of a settings update
#[derive(Debug, Clone)]
pub struct ConfigUpdate {
    /// Newly resolved effective configuration
    pub config: ProviderConfig,
    /// Whether the update reached the durable store. `false` means the
    /// update is held in-process only and will not survive a restart.
    pub durable: bool,
}

/// Layered settings resolver.
///
/// Constructed once per process and shared through the server resources;
/// `resolve` is read-only and safe under concurrency, `update` is
/// last-writer-wins.
pub struct ConfigResolver {
    store: Arc<dyn SettingsStore>,
    /// In-process view of the persisted configuration. Written by `update`
    /// (whether or not persistence succeeded) so its effect is observable by
    /// later `resolve` calls in this process.
    overlay: RwLock<Option<StoredConfig>>,
}

impl ConfigResolver {
    /// Create a resolver over the given settings store
    #[must_use]
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            overlay: RwLock::new(None),
        }
    }

    /// Resolve the effective provider configuration.
    ///
    /// Never fails: a store error is logged and resolution degrades to the
    /// environment and default layers. Idempotent and side-effect-free.
    pub async fn resolve(&self) -> ProviderConfig {
        let stored = self.persisted_view().await;
        Self::effective(&stored)
    }

    /// Apply a partial update to the persisted configuration.
    ///
    /// The patch is merged over the currently *persisted* configuration,
    /// not over the fully resolved one, so clearing an environment variable
    /// later does not resurrect stale values. The merged document is
    /// written to the store; if that write fails the update is retained
    /// in-process and the outcome reports `durable: false`.
    ///
    /// # Errors
    /// Returns `Validation` if the patch is empty, a field is an empty
    /// string, or `base_url` is not an absolute http(s) URL.
    pub async fn update(&self, patch: ConfigPatch) -> AppResult<ConfigUpdate> {
        Self::validate(&patch)?;

        let mut stored = self.persisted_view().await;
        if let Some(project_id) = patch.project_id {
            stored.project_id = Some(project_id);
        }
        if let Some(base_url) = patch.base_url {
            stored.base_url = Some(base_url);
        }

        let raw = serde_json::to_string(&stored)
            .map_err(|e| AppError::internal(format!("failed to serialize settings: {e}")))?;

        let durable = match self.store.set(SETTINGS_KEY, &raw).await {
            Ok(()) => true,
            Err(e) => {
                warn!("settings update not persisted, keeping in-memory only: {e}");
                false
            }
        };

        *self.overlay.write().await = Some(stored.clone());
        debug!(durable, "provider settings updated");

        Ok(ConfigUpdate {
            config: Self::effective(&stored),
            durable,
        })
    }

    /// Current persisted view: the in-process overlay when an update has
    /// happened in this process, otherwise the store contents. Store errors
    /// degrade to an empty document.
    async fn persisted_view(&self) -> StoredConfig {
        if let Some(overlay) = self.overlay.read().await.clone() {
            return overlay;
        }

        match self.store.get(SETTINGS_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("ignoring malformed persisted settings: {e}");
                StoredConfig::default()
            }),
            Ok(None) => StoredConfig::default(),
            Err(e) => {
                warn!("settings store unavailable, using environment fallbacks: {e}");
                StoredConfig::default()
            }
        }
    }

    fn effective(stored: &StoredConfig) -> ProviderConfig {
        let project_id = non_empty(stored.project_id.clone())
            .or_else(|| non_empty(env::var(ENV_PROJECT_ID).ok()));

        let base_url = non_empty(stored.base_url.clone())
            .or_else(|| non_empty(env::var(ENV_BASE_URL).ok()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        ProviderConfig {
            project_id,
            base_url,
        }
    }

    fn validate(patch: &ConfigPatch) -> AppResult<()> {
        if patch.is_empty() {
            return Err(AppError::validation(
                "settings update requires at least one of 'projectId' or 'baseUrl'",
            ));
        }

        if let Some(project_id) = &patch.project_id {
            if project_id.trim().is_empty() {
                return Err(AppError::validation("'projectId' must be non-empty"));
            }
        }

        if let Some(base_url) = &patch.base_url {
            let parsed = Url::parse(base_url)
                .map_err(|_| AppError::validation("'baseUrl' must be an absolute URL"))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(AppError::validation("'baseUrl' must use http or https"));
            }
        }

        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
