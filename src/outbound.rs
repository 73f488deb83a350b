// ABOUTME: Outbound token brokering for downstream API calls made on a caller's behalf
// ABOUTME: Scope gate, subject extraction, and identity-provider token exchange in one reusable path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! Scoped outbound call brokering.
//!
//! Every tool that reaches a downstream API on the caller's behalf follows
//! the same sequence: check the required scope against the caller's grants,
//! extract the subject claim from the caller's token, resolve which provider
//! project addresses the exchange, swap the caller's token for a
//! provider-issued outbound access token, and hand that token to exactly one
//! downstream invocation. [`OutboundBroker::call`] packages that sequence so
//! tool implementations only supply the scope, the outbound application
//! identifier, and the downstream operation itself.
//!
//! The scope check always runs before any network I/O, and the exchange is a
//! single attempt with no retry. Outbound tokens are never cached; each tool
//! invocation performs its own exchange.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::auth::{self, CallerAuthInfo};
use crate::config::ConfigResolver;
use crate::errors::{AppError, AppResult};

/// Path of the identity provider's outbound token endpoint, relative to the
/// provider base URL
const EXCHANGE_PATH: &str = "/v1/mgmt/outbound/app/user/token/latest";

/// Provider-issued access token for a single downstream invocation.
///
/// Obtained per call and consumed immediately; never cached or persisted.
#[derive(Debug, Clone)]
pub struct OutboundToken {
    /// Bearer credential for the downstream API
    pub access_token: String,
}

/// Fully addressed token-exchange request.
///
/// Assembled by the broker from the resolved provider configuration and the
/// caller's credentials; consumed by a [`TokenExchanger`].
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    /// Identity-provider API base URL
    pub base_url: String,
    /// Provider project identifier used in the exchange bearer scheme
    pub project_id: String,
    /// The caller's original bearer token
    pub caller_token: String,
    /// Outbound application identifier (which downstream integration)
    pub app_id: String,
    /// Subject the outbound token is issued for
    pub user_id: String,
}

/// Exchanges a caller's credential for a provider-issued outbound token.
///
/// The HTTP implementation talks to the identity provider; tests substitute
/// a recording mock.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Perform the exchange. Single attempt; the broker never retries.
    ///
    /// # Errors
    /// Returns `ExchangeFailed` when the provider answers with a non-success
    /// status, carrying that status for diagnostics.
    async fn exchange(&self, request: &ExchangeRequest) -> AppResult<OutboundToken>;
}

/// Wire shape of a successful exchange response
#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    token: ExchangedToken,
}

#[derive(Debug, Deserialize)]
struct ExchangedToken {
    #[serde(rename = "accessToken")]
    access_token: String,
}

/// HTTP token exchanger talking to the identity provider's management API
#[derive(Debug, Clone)]
pub struct HttpTokenExchanger {
    http: reqwest::Client,
}

impl HttpTokenExchanger {
    /// Create an exchanger using the given HTTP client
    #[must_use]
    pub const fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl TokenExchanger for HttpTokenExchanger {
    async fn exchange(&self, request: &ExchangeRequest) -> AppResult<OutboundToken> {
        let endpoint = format!(
            "{}{EXCHANGE_PATH}",
            request.base_url.trim_end_matches('/')
        );

        // The provider's management bearer scheme combines the project
        // identifier with the caller's own token.
        let bearer = format!("{}:{}", request.project_id, request.caller_token);

        let response = self
            .http
            .post(endpoint)
            .bearer_auth(bearer)
            .json(&json!({
                "appId": request.app_id,
                "userId": request.user_id,
            }))
            .send()
            .await
            .map_err(|e| AppError::internal(format!("token exchange request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::exchange_failed(
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown"),
            ));
        }

        let body: ExchangeResponse = response.json().await.map_err(|e| {
            AppError::internal(format!("token exchange returned an unreadable body: {e}"))
        })?;

        Ok(OutboundToken {
            access_token: body.token.access_token,
        })
    }
}

/// Require that the caller holds `scope`.
///
/// This is the first step of every tool invocation and runs before any
/// claim decoding or network I/O.
///
/// # Errors
/// Returns `Unauthorized` naming the missing scope.
pub fn require_scope(caller: &CallerAuthInfo, scope: &str) -> AppResult<()> {
    if caller.has_scope(scope) {
        Ok(())
    } else {
        Err(AppError::unauthorized(scope))
    }
}

/// Brokers outbound tokens for downstream calls made on a caller's behalf.
///
/// Owned by the server resources and shared across requests; holds no
/// per-request state.
pub struct OutboundBroker {
    resolver: Arc<ConfigResolver>,
    exchanger: Arc<dyn TokenExchanger>,
}

impl OutboundBroker {
    /// Create a broker over the given resolver and exchanger
    #[must_use]
    pub fn new(resolver: Arc<ConfigResolver>, exchanger: Arc<dyn TokenExchanger>) -> Self {
        Self {
            resolver,
            exchanger,
        }
    }

    /// Obtain an outbound access token for `app_id` on behalf of the caller.
    ///
    /// Sequence: scope check, subject extraction from the caller's token,
    /// provider project resolution (configured `project_id`, or the
    /// project half of the caller's client identifier when none is
    /// configured), then a single token-exchange attempt.
    ///
    /// # Errors
    /// `Unauthorized` for a missing scope, `InvalidToken` for a malformed
    /// token or missing `sub` claim, `InvalidClientId` for an undecodable
    /// client identifier, and `ExchangeFailed` when the provider rejects
    /// the exchange.
    pub async fn broker_token(
        &self,
        caller: &CallerAuthInfo,
        required_scope: &str,
        app_id: &str,
    ) -> AppResult<OutboundToken> {
        require_scope(caller, required_scope)?;

        let user_id = auth::subject(&caller.token)?;

        let config = self.resolver.resolve().await;
        let project_id = match config.project_id {
            Some(project_id) => project_id,
            None => auth::decode_client_id(&caller.client_id)?.0,
        };

        debug!(app_id, user_id, "exchanging caller token for outbound access token");

        let request = ExchangeRequest {
            base_url: config.base_url,
            project_id,
            caller_token: caller.token.clone(),
            app_id: app_id.to_owned(),
            user_id,
        };

        self.exchanger.exchange(&request).await
    }

    /// Run a downstream operation under an outbound token.
    ///
    /// Brokers a token (see [`Self::broker_token`]) and passes it to
    /// `operation`, which performs exactly one downstream invocation. The
    /// operation is never started when brokering fails.
    ///
    /// # Errors
    /// Propagates brokering failures and whatever the operation returns.
    pub async fn call<T, F, Fut>(
        &self,
        caller: &CallerAuthInfo,
        required_scope: &str,
        app_id: &str,
        operation: F,
    ) -> AppResult<T>
    where
        F: FnOnce(OutboundToken) -> Fut,
        Fut: Future<Output = AppResult<T>> + Send,
    {
        let token = self.broker_token(caller, required_scope, app_id).await?;
        operation(token).await
    }
}
