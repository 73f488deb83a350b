// ABOUTME: Integration tests for the scoped outbound call pattern
// ABOUTME: Scope gating before I/O, claim extraction, client-id decode, and exchange failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::json;

use beacon_mcp_server::auth::CallerAuthInfo;
use beacon_mcp_server::config::resolver::DEFAULT_BASE_URL;
use beacon_mcp_server::config::{ConfigPatch, ConfigResolver};
use beacon_mcp_server::database::MemorySettingsStore;
use beacon_mcp_server::errors::{AppError, AppResult};
use beacon_mcp_server::outbound::OutboundBroker;

use common::{caller, encode_client_id, forge_token_with_claims, MockExchanger};

const SCOPE: &str = "repos:read";
const APP_ID: &str = "github";

fn broker_with(exchanger: Arc<MockExchanger>) -> (OutboundBroker, Arc<ConfigResolver>) {
    common::init_test_logging();
    let resolver = Arc::new(ConfigResolver::new(Arc::new(MemorySettingsStore::new())));
    (OutboundBroker::new(resolver.clone(), exchanger), resolver)
}

async fn invoke(
    broker: &OutboundBroker,
    auth: &CallerAuthInfo,
) -> (AppResult<String>, Arc<AtomicBool>) {
    let ran = Arc::new(AtomicBool::new(false));
    let ran_flag = ran.clone();
    let result = broker
        .call(auth, SCOPE, APP_ID, |token| async move {
            ran_flag.store(true, Ordering::SeqCst);
            Ok(token.access_token)
        })
        .await;
    (result, ran)
}

#[tokio::test]
async fn missing_scope_fails_before_any_network_call() {
    let exchanger = MockExchanger::returning("tok-abc");
    let (broker, _) = broker_with(exchanger.clone());
    let auth = caller("user-123", &["weather:read"], None);

    let (result, ran) = invoke(&broker, &auth).await;

    match result.unwrap_err() {
        AppError::Unauthorized { scope } => assert_eq!(scope, SCOPE),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    assert_eq!(exchanger.call_count(), 0, "exchange must not run");
    assert!(!ran.load(Ordering::SeqCst), "downstream operation must not run");
}

#[tokio::test]
async fn wrong_segment_count_fails_with_invalid_token() {
    let exchanger = MockExchanger::returning("tok-abc");
    let (broker, _) = broker_with(exchanger.clone());

    for token in ["two.segments", "one", "a.b.c.d"] {
        let auth = CallerAuthInfo {
            token: token.to_owned(),
            scopes: [SCOPE.to_owned()].into_iter().collect(),
            client_id: encode_client_id("proj1", "app1"),
        };

        let (result, _) = invoke(&broker, &auth).await;
        assert!(
            matches!(result.unwrap_err(), AppError::InvalidToken(_)),
            "token {token:?} must be rejected"
        );
    }
    assert_eq!(exchanger.call_count(), 0);
}

#[tokio::test]
async fn payload_without_sub_fails_with_invalid_token() {
    let exchanger = MockExchanger::returning("tok-abc");
    let (broker, _) = broker_with(exchanger.clone());

    for claims in [json!({"scope": SCOPE}), json!({"sub": ""})] {
        let auth = CallerAuthInfo {
            token: forge_token_with_claims(&claims),
            scopes: [SCOPE.to_owned()].into_iter().collect(),
            client_id: encode_client_id("proj1", "app1"),
        };

        let (result, _) = invoke(&broker, &auth).await;
        assert!(matches!(result.unwrap_err(), AppError::InvalidToken(_)));
    }
    assert_eq!(exchanger.call_count(), 0);
}

#[tokio::test]
async fn client_id_supplies_project_when_none_is_configured() {
    let exchanger = MockExchanger::returning("tok-abc");
    let (broker, _) = broker_with(exchanger.clone());
    let auth = caller("user-123", &[SCOPE], Some(&encode_client_id("proj1", "app1")));

    let (result, ran) = invoke(&broker, &auth).await;

    assert_eq!(result.unwrap(), "tok-abc");
    assert!(ran.load(Ordering::SeqCst));
    assert_eq!(exchanger.call_count(), 1);

    let request = exchanger.last_request().unwrap();
    assert_eq!(request.base_url, DEFAULT_BASE_URL);
    assert_eq!(request.project_id, "proj1");
    assert_eq!(request.app_id, APP_ID);
    assert_eq!(request.user_id, "user-123");
    assert_eq!(request.caller_token, auth.token);
}

#[tokio::test]
async fn configured_project_skips_client_id_decode() {
    let exchanger = MockExchanger::returning("tok-abc");
    let (broker, resolver) = broker_with(exchanger.clone());
    resolver
        .update(
            ConfigPatch::from_value(&json!({"projectId": "proj-configured"})).unwrap(),
        )
        .await
        .unwrap();

    // Garbage client id: never decoded when a project is configured.
    let auth = caller("user-123", &[SCOPE], Some("!!not-base64!!"));

    let (result, _) = invoke(&broker, &auth).await;

    assert!(result.is_ok());
    let request = exchanger.last_request().unwrap();
    assert_eq!(request.project_id, "proj-configured");
}

#[tokio::test]
async fn malformed_client_id_fails_with_invalid_client_id() {
    let exchanger = MockExchanger::returning("tok-abc");
    let (broker, _) = broker_with(exchanger.clone());

    for client_id in [
        "!!not-base64!!".to_owned(),
        encode_client_id("proj1", ""),
        encode_client_id("", "app1"),
        STANDARD.encode("no-separator"),
    ] {
        let auth = caller("user-123", &[SCOPE], Some(&client_id));
        let (result, _) = invoke(&broker, &auth).await;
        assert!(
            matches!(result.unwrap_err(), AppError::InvalidClientId(_)),
            "client id {client_id:?} must be rejected"
        );
    }
    assert_eq!(exchanger.call_count(), 0);
}

#[tokio::test]
async fn exchange_failure_carries_upstream_status() {
    let exchanger = MockExchanger::failing(AppError::exchange_failed(502, "Bad Gateway"));
    let (broker, _) = broker_with(exchanger.clone());
    let auth = caller("user-123", &[SCOPE], Some(&encode_client_id("proj1", "app1")));

    let (result, ran) = invoke(&broker, &auth).await;

    match result.unwrap_err() {
        AppError::ExchangeFailed { status, status_text } => {
            assert_eq!(status, 502);
            assert_eq!(status_text, "Bad Gateway");
        }
        other => panic!("expected ExchangeFailed, got {other:?}"),
    }
    assert!(
        !ran.load(Ordering::SeqCst),
        "downstream operation must not run after a failed exchange"
    );
}
