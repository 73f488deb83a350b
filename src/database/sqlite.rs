// ABOUTME: SQLite-backed settings store using sqlx runtime queries
// ABOUTME: Single settings table with upsert semantics and connection pooling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::errors::{AppError, AppResult};

use super::SettingsStore;

/// Settings store backed by a SQLite database.
///
/// The schema is a single `settings` table created on connect; every value
/// is a JSON document keyed by name. Store failures map to
/// `PersistenceUnavailable` so the configuration resolver can degrade
/// instead of failing the request.
#[derive(Debug, Clone)]
pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    /// Open (creating if missing) the SQLite database at `database_url` and
    /// ensure the settings schema exists.
    ///
    /// # Errors
    /// Returns `PersistenceUnavailable` if the URL is malformed, the file
    /// cannot be opened, or schema setup fails.
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::persistence_unavailable(format!("invalid DATABASE_URL: {e}"))
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::persistence_unavailable(format!("failed to open settings store: {e}"))
            })?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| {
            AppError::persistence_unavailable(format!("failed to initialize settings schema: {e}"))
        })?;

        debug!("settings schema ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::persistence_unavailable(format!("settings read failed: {e}"))
            })?;

        Ok(row.map(|r| r.get("value")))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::persistence_unavailable(format!("settings write failed: {e}")))?;

        Ok(())
    }
}
