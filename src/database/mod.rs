// ABOUTME: Durable key/value settings storage behind a pluggable store trait
// ABOUTME: Selects SQLite persistence or an in-memory fallback based on configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! Settings storage.
//!
//! The server persists a single small settings document (the provider
//! configuration override). Storage is abstracted behind [`SettingsStore`] so
//! hosted deployments get a durable SQLite store while non-hosted
//! environments (no `DATABASE_URL`) degrade to an in-memory store instead of
//! refusing to start. Store errors are classified as `PersistenceUnavailable`
//! and never crash resolution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::AppResult;

/// In-memory settings store for non-hosted environments and tests
pub mod memory;

/// SQLite-backed settings store
pub mod sqlite;

pub use memory::MemorySettingsStore;
pub use sqlite::SqliteSettingsStore;

/// Durable key/value store for server settings.
///
/// Implementations must be safe to share across concurrent requests. Both
/// operations are best-effort from the caller's perspective: the
/// configuration resolver treats failures as a degraded-durability
/// condition, not a fatal one.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    /// Returns `PersistenceUnavailable` when the store cannot be reached.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns `PersistenceUnavailable` when the store cannot be reached or
    /// the write fails.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;
}

/// Connect the settings store selected by configuration.
///
/// A configured `database_url` selects the SQLite store; absence selects the
/// in-memory store, which keeps the server usable in non-hosted environments
/// at the cost of settings durability.
///
/// # Errors
/// Returns `PersistenceUnavailable` if the SQLite store cannot be opened.
pub async fn connect_settings_store(
    database_url: Option<&str>,
) -> AppResult<Arc<dyn SettingsStore>> {
    match database_url {
        Some(url) => {
            let store = SqliteSettingsStore::connect(url).await?;
            info!("settings store: sqlite");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL is not set; settings will not survive a restart");
            Ok(Arc::new(MemorySettingsStore::new()))
        }
    }
}
