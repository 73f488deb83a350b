// ABOUTME: Unified error handling system with protocol-level error codes
// ABOUTME: Maps every failure point to a distinct variant, JSON-RPC code, and HTTP status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// JSON-RPC 2.0 standard error code for malformed requests
pub const ERROR_INVALID_REQUEST: i32 = -32600;
/// JSON-RPC 2.0 standard error code for unknown methods
pub const ERROR_METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC 2.0 standard error code for invalid parameters
pub const ERROR_INVALID_PARAMS: i32 = -32602;
/// JSON-RPC 2.0 standard error code for internal errors
pub const ERROR_INTERNAL_ERROR: i32 = -32603;

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
///
/// Each failure point in a tool invocation maps to its own variant so that
/// callers and tests can distinguish "not authorized" from "bad token" from
/// "exchange failed" from "downstream API failed". None of these are retried
/// automatically; each surfaces as a single protocol-level error for the
/// invocation that produced it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    /// Caller's scope set does not include the scope a tool requires
    #[error("missing required scope: {scope}")]
    Unauthorized {
        /// The scope that was required and absent
        scope: String,
    },

    /// Bearer token is structurally malformed or lacks a required claim
    #[error("invalid bearer token: {0}")]
    InvalidToken(String),

    /// Client identifier could not be decoded into a project/app pair
    #[error("invalid client identifier: {0}")]
    InvalidClientId(String),

    /// Identity provider rejected the outbound token exchange
    #[error("token exchange failed with HTTP {status} {status_text}")]
    ExchangeFailed {
        /// HTTP status returned by the exchange endpoint
        status: u16,
        /// Reason phrase for the status, when known
        status_text: String,
    },

    /// Downstream API returned a non-success status
    #[error("{service} request failed with HTTP {status}")]
    DownstreamFailed {
        /// Human-readable downstream service name
        service: &'static str,
        /// HTTP status returned by the downstream API
        status: u16,
    },

    /// Downstream response violated its documented shape
    #[error("{service} returned an unexpected response shape: {detail}")]
    UnexpectedFormat {
        /// Human-readable downstream service name
        service: &'static str,
        /// What was wrong with the shape
        detail: String,
    },

    /// Invalid input to a configuration or tool operation
    #[error("validation error: {0}")]
    Validation(String),

    /// Durable settings store is unreachable (non-fatal for resolution)
    #[error("settings store unavailable: {0}")]
    PersistenceUnavailable(String),

    /// Request carried no usable Authorization header
    #[error("authentication required: {0}")]
    AuthRequired(String),

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Missing-scope authorization failure
    #[must_use]
    pub fn unauthorized(scope: impl Into<String>) -> Self {
        Self::Unauthorized {
            scope: scope.into(),
        }
    }

    /// Malformed bearer token or missing claim
    #[must_use]
    pub fn invalid_token(detail: impl Into<String>) -> Self {
        Self::InvalidToken(detail.into())
    }

    /// Malformed client identifier
    #[must_use]
    pub fn invalid_client_id(detail: impl Into<String>) -> Self {
        Self::InvalidClientId(detail.into())
    }

    /// Non-success response from the outbound token exchange
    #[must_use]
    pub fn exchange_failed(status: u16, status_text: impl Into<String>) -> Self {
        Self::ExchangeFailed {
            status,
            status_text: status_text.into(),
        }
    }

    /// Invalid configuration or tool input
    #[must_use]
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }

    /// Durable store unreachable
    #[must_use]
    pub fn persistence_unavailable(detail: impl Into<String>) -> Self {
        Self::PersistenceUnavailable(detail.into())
    }

    /// Unexpected internal failure
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    /// JSON-RPC error code for this error.
    ///
    /// Validation errors reuse the standard invalid-params code; the rest of
    /// the taxonomy uses server-defined codes in the -32000..-32099 range so
    /// protocol clients can tell the failure points apart.
    #[must_use]
    pub const fn jsonrpc_code(&self) -> i32 {
        match self {
            Self::AuthRequired(_) => -32000,
            Self::Unauthorized { .. } => -32001,
            Self::InvalidToken(_) => -32002,
            Self::InvalidClientId(_) => -32003,
            Self::ExchangeFailed { .. } => -32004,
            Self::DownstreamFailed { .. } => -32005,
            Self::UnexpectedFormat { .. } => -32006,
            Self::PersistenceUnavailable(_) => -32007,
            Self::Validation(_) => ERROR_INVALID_PARAMS,
            Self::Internal(_) => ERROR_INTERNAL_ERROR,
        }
    }

    /// HTTP status for this error when surfaced over a REST route
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::AuthRequired(_) | Self::InvalidToken(_) | Self::InvalidClientId(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Unauthorized { .. } => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::ExchangeFailed { .. }
            | Self::DownstreamFailed { .. }
            | Self::UnexpectedFormat { .. } => StatusCode::BAD_GATEWAY,
            Self::PersistenceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        let body = Json(json!({
            "error": self.to_string(),
            "code": self.jsonrpc_code(),
        }));
        (status, body).into_response()
    }
}
