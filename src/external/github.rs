// ABOUTME: GitHub REST API client authenticated with brokered outbound tokens
// ABOUTME: Repository listing and creation with strict response-shape classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! GitHub REST client.
//!
//! Every call is authenticated with an outbound access token brokered for
//! the caller; the client itself holds no credentials. The repository list
//! endpoint documents a JSON array, so anything else is classified as
//! `UnexpectedFormat` rather than being coerced.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Service name used in error classification
const SERVICE: &str = "GitHub";

/// A repository as returned by the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Short repository name
    pub name: String,
    /// Owner-qualified name, when present
    #[serde(default)]
    pub full_name: Option<String>,
    /// Web URL of the repository
    pub html_url: String,
    /// Whether the repository is private
    #[serde(default)]
    pub private: bool,
    /// Repository description, when set
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameters for creating a repository
#[derive(Debug, Clone)]
pub struct NewRepository {
    /// Repository name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Whether to create the repository as private
    pub private: bool,
}

/// Source-control host the repository tools talk to.
///
/// The production implementation is [`GithubClient`]; tests substitute a
/// recording mock.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// List repositories accessible to the token's user.
    ///
    /// # Errors
    /// `DownstreamFailed` for a non-success status, `UnexpectedFormat` when
    /// the response is not the documented JSON array.
    async fn list_repositories(&self, access_token: &str) -> AppResult<Vec<Repository>>;

    /// Create a repository for the token's user.
    ///
    /// # Errors
    /// `DownstreamFailed` for a non-success status, `UnexpectedFormat` when
    /// the response is not a repository object.
    async fn create_repository(
        &self,
        access_token: &str,
        request: &NewRepository,
    ) -> AppResult<Repository>;
}

/// HTTP client for the GitHub REST API
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
}

impl GithubClient {
    /// Create a client against `base_url` (normally `https://api.github.com`)
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<Value> {
        let response = request
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| AppError::internal(format!("GitHub request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::DownstreamFailed {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::UnexpectedFormat {
                service: SERVICE,
                detail: format!("response body is not JSON: {e}"),
            })
    }
}

#[async_trait]
impl RepositoryHost for GithubClient {
    async fn list_repositories(&self, access_token: &str) -> AppResult<Vec<Repository>> {
        let url = format!("{}/user/repos", self.base_url);
        debug!("listing repositories for authenticated user");

        let body = self
            .send(
                self.http
                    .get(url)
                    .bearer_auth(access_token)
                    .query(&[("per_page", "100"), ("sort", "updated")]),
            )
            .await?;

        parse_repository_list(body)
    }

    async fn create_repository(
        &self,
        access_token: &str,
        request: &NewRepository,
    ) -> AppResult<Repository> {
        let url = format!("{}/user/repos", self.base_url);
        debug!(name = %request.name, "creating repository");

        let body = self
            .send(self.http.post(url).bearer_auth(access_token).json(&json!({
                "name": request.name,
                "description": request.description,
                "private": request.private,
            })))
            .await?;

        parse_repository(body)
    }
}

/// Parse a repository-list response.
///
/// # Errors
/// Returns `UnexpectedFormat` when the body is not a JSON array of
/// repository objects.
pub fn parse_repository_list(body: Value) -> AppResult<Vec<Repository>> {
    if !body.is_array() {
        return Err(AppError::UnexpectedFormat {
            service: SERVICE,
            detail: "expected a JSON array of repositories".to_owned(),
        });
    }

    serde_json::from_value(body).map_err(|e| AppError::UnexpectedFormat {
        service: SERVICE,
        detail: format!("repository entry is malformed: {e}"),
    })
}

/// Parse a single-repository response.
///
/// # Errors
/// Returns `UnexpectedFormat` when the body is not a repository object.
pub fn parse_repository(body: Value) -> AppResult<Repository> {
    if !body.is_object() {
        return Err(AppError::UnexpectedFormat {
            service: SERVICE,
            detail: "expected a repository object".to_owned(),
        });
    }

    serde_json::from_value(body).map_err(|e| AppError::UnexpectedFormat {
        service: SERVICE,
        detail: format!("repository object is malformed: {e}"),
    })
}
