// ABOUTME: Bearer token handling and caller identity extraction
// ABOUTME: Decodes JWT claims and client identifiers without cryptographic verification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! Caller authentication context.
//!
//! Token *signature verification* happens upstream (identity-provider
//! middleware or a fronting gateway); by the time a request reaches this
//! module its bearer token is assumed authentic. The functions here only
//! decode the token payload to extract claims needed for authorization and
//! for addressing the outbound token exchange. Deployments without the
//! upstream verification layer are unsupported.

use std::collections::HashSet;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine as _;
use serde_json::Value;

use crate::errors::{AppError, AppResult};

/// Caller authorization context for a single inbound request.
///
/// Produced once per request from the (upstream-verified) bearer token and
/// immutable for the duration of that request. Never persisted.
#[derive(Debug, Clone)]
pub struct CallerAuthInfo {
    /// Raw bearer token as presented by the caller
    pub token: String,
    /// Scopes granted to the caller, from the space-delimited `scope` claim
    pub scopes: HashSet<String>,
    /// OAuth client identifier, from the `azp` claim (may be empty)
    pub client_id: String,
}

impl CallerAuthInfo {
    /// Build caller context from a bearer token.
    ///
    /// # Errors
    /// Returns `InvalidToken` if the token is not a three-segment JWT or its
    /// payload is not a JSON object.
    pub fn from_bearer(token: &str) -> AppResult<Self> {
        let claims = decode_claims(token)?;

        let scopes = claims
            .get("scope")
            .and_then(Value::as_str)
            .map(|s| s.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default();

        let client_id = claims
            .get("azp")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();

        Ok(Self {
            token: token.to_owned(),
            scopes,
            client_id,
        })
    }

    /// Whether the caller holds the given scope
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }
}

/// Extract and decode the bearer token from request headers.
///
/// # Errors
/// Returns `AuthRequired` when the Authorization header is missing or not a
/// bearer credential, and `InvalidToken` when the token cannot be decoded.
pub fn authenticate_request(headers: &HeaderMap) -> AppResult<CallerAuthInfo> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthRequired("missing Authorization header".to_owned()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::AuthRequired("expected a Bearer credential".to_owned()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::AuthRequired("empty bearer token".to_owned()));
    }

    CallerAuthInfo::from_bearer(token)
}

/// Decode the claim set from a bearer token's payload segment.
///
/// The token must have exactly three dot-separated segments; the middle
/// segment is base64url-decoded (after padding normalization) and parsed as
/// a JSON object. The signature segment is ignored: verification is an
/// upstream responsibility.
///
/// # Errors
/// Returns `InvalidToken` for any structural failure.
pub fn decode_claims(token: &str) -> AppResult<Value> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AppError::invalid_token(format!(
            "expected 3 dot-separated segments, found {}",
            segments.len()
        )));
    }

    let payload = URL_SAFE
        .decode(pad_base64(segments[1]))
        .map_err(|e| AppError::invalid_token(format!("payload is not valid base64: {e}")))?;

    let claims: Value = serde_json::from_slice(&payload)
        .map_err(|e| AppError::invalid_token(format!("payload is not valid JSON: {e}")))?;

    if !claims.is_object() {
        return Err(AppError::invalid_token("payload is not a JSON object"));
    }

    Ok(claims)
}

/// Extract the subject (`sub`) claim from a bearer token.
///
/// # Errors
/// Returns `InvalidToken` if the token cannot be decoded or the claim set
/// has no non-empty `sub`.
pub fn subject(token: &str) -> AppResult<String> {
    let claims = decode_claims(token)?;
    claims
        .get("sub")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AppError::invalid_token("missing 'sub' claim"))
}

/// Decode a client identifier into its `(project_id, app_id)` halves.
///
/// Client identifiers are a colon-separated `project:app` pair encoded as a
/// single base64 unit.
///
/// # Errors
/// Returns `InvalidClientId` if decoding fails or either half is empty.
pub fn decode_client_id(client_id: &str) -> AppResult<(String, String)> {
    let decoded = STANDARD
        .decode(pad_base64(client_id))
        .map_err(|e| AppError::invalid_client_id(format!("not valid base64: {e}")))?;

    let decoded = String::from_utf8(decoded)
        .map_err(|_| AppError::invalid_client_id("decoded bytes are not UTF-8"))?;

    let (project_id, app_id) = decoded
        .split_once(':')
        .ok_or_else(|| AppError::invalid_client_id("expected 'project:app' form"))?;

    if project_id.is_empty() || app_id.is_empty() {
        return Err(AppError::invalid_client_id(
            "project and app components must be non-empty",
        ));
    }

    Ok((project_id.to_owned(), app_id.to_owned()))
}

/// Pad a base64 string to a multiple of 4 characters
fn pad_base64(input: &str) -> String {
    let remainder = input.len() % 4;
    if remainder == 0 {
        input.to_owned()
    } else {
        let mut padded = String::with_capacity(input.len() + 4 - remainder);
        padded.push_str(input);
        for _ in 0..(4 - remainder) {
            padded.push('=');
        }
        padded
    }
}
