// ABOUTME: GitHub repository tools using brokered outbound tokens
// ABOUTME: Repository listing and creation on the caller's behalf, scope-gated per operation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! GitHub tools.
//!
//! Both tools follow the full outbound pattern: scope gate, subject
//! extraction, token exchange for the configured GitHub outbound
//! application, then exactly one REST call with the exchanged token.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth;
use crate::errors::{AppError, AppResult};
use crate::external::NewRepository;
use crate::formatters;

use super::{McpTool, ToolExecutionContext};

/// Scope required to list repositories
pub const REPOS_READ_SCOPE: &str = "repos:read";

/// Scope required to create repositories
pub const REPOS_WRITE_SCOPE: &str = "repos:write";

#[derive(Debug, Deserialize)]
struct CreateRepositoryParams {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    private: bool,
}

/// List the caller's repositories
pub struct ListRepositoriesTool;

#[async_trait]
impl McpTool for ListRepositoriesTool {
    fn name(&self) -> &'static str {
        "list_repositories"
    }

    fn description(&self) -> &'static str {
        "List GitHub repositories for the authenticated user"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(
        &self,
        _params: &Value,
        context: &ToolExecutionContext<'_>,
    ) -> AppResult<String> {
        let resources = context.resources;
        let host = &resources.repository_host;

        let repositories = resources
            .broker
            .call(
                context.caller,
                REPOS_READ_SCOPE,
                &resources.config.github_app_id,
                |token| async move { host.list_repositories(&token.access_token).await },
            )
            .await?;

        // The broker has already validated the token, so the subject is
        // available for the rendered heading.
        let user_id = auth::subject(&context.caller.token)?;
        Ok(formatters::render_repositories(&user_id, &repositories))
    }
}

/// Create a repository for the caller
pub struct CreateRepositoryTool;

#[async_trait]
impl McpTool for CreateRepositoryTool {
    fn name(&self) -> &'static str {
        "create_repository"
    }

    fn description(&self) -> &'static str {
        "Create a GitHub repository for the authenticated user"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Repository name"
                },
                "description": {
                    "type": "string",
                    "description": "Repository description"
                },
                "private": {
                    "type": "boolean",
                    "description": "Create the repository as private (default false)"
                }
            },
            "required": ["name"]
        })
    }

    async fn execute(
        &self,
        params: &Value,
        context: &ToolExecutionContext<'_>,
    ) -> AppResult<String> {
        let params: CreateRepositoryParams = serde_json::from_value(params.clone())
            .map_err(|e| AppError::validation(format!("invalid repository parameters: {e}")))?;

        if params.name.trim().is_empty() {
            return Err(AppError::validation("'name' must be non-empty"));
        }

        let request = NewRepository {
            name: params.name,
            description: params.description,
            private: params.private,
        };

        let resources = context.resources;
        let host = &resources.repository_host;
        let request_ref = &request;

        let repository = resources
            .broker
            .call(
                context.caller,
                REPOS_WRITE_SCOPE,
                &resources.config.github_app_id,
                |token| async move {
                    host.create_repository(&token.access_token, request_ref).await
                },
            )
            .await?;

        Ok(formatters::render_created_repository(&repository))
    }
}
