// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Token forging, recording mocks for the exchanger and downstream APIs, resource builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

//! Shared test utilities for `beacon_mcp_server`.
//!
//! Tokens are forged (unsigned) because the server's documented trust
//! boundary puts signature verification upstream; tests exercise claim
//! decoding only. All downstream collaborators are recording mocks so no
//! test touches the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde_json::{json, Value};

use beacon_mcp_server::auth::CallerAuthInfo;
use beacon_mcp_server::config::ServerConfig;
use beacon_mcp_server::database::{MemorySettingsStore, SettingsStore};
use beacon_mcp_server::errors::{AppError, AppResult};
use beacon_mcp_server::external::{
    ForecastPeriod, NewRepository, Repository, RepositoryHost, WeatherAlert, WeatherSource,
};
use beacon_mcp_server::mcp::resources::ServerResources;
use beacon_mcp_server::outbound::{ExchangeRequest, OutboundToken, TokenExchanger};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging once per test process
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

// ============================================================================
// Token forging
// ============================================================================

/// Forge an unsigned three-segment bearer token with the given claim set
pub fn forge_token_with_claims(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.forged-signature")
}

/// Forge a token with a subject and a space-delimited scope claim
pub fn forge_token(sub: &str, scopes: &[&str]) -> String {
    forge_token_with_claims(&json!({
        "sub": sub,
        "scope": scopes.join(" "),
        "iss": "https://api.descope.com",
    }))
}

/// Forge a token whose claim set also carries an `azp` client identifier
pub fn forge_token_with_azp(sub: &str, scopes: &[&str], azp: &str) -> String {
    forge_token_with_claims(&json!({
        "sub": sub,
        "scope": scopes.join(" "),
        "azp": azp,
        "iss": "https://api.descope.com",
    }))
}

/// Encode a `project:app` pair the way identity providers encode client ids
pub fn encode_client_id(project_id: &str, app_id: &str) -> String {
    STANDARD.encode(format!("{project_id}:{app_id}"))
}

/// Build a caller context from a forged token and an encoded client id
pub fn caller(sub: &str, scopes: &[&str], client_id: Option<&str>) -> CallerAuthInfo {
    let token = forge_token(sub, scopes);
    CallerAuthInfo {
        token,
        scopes: scopes.iter().map(|s| (*s).to_owned()).collect(),
        client_id: client_id.unwrap_or_default().to_owned(),
    }
}

// ============================================================================
// Sample records
// ============================================================================

pub fn sample_alert() -> WeatherAlert {
    WeatherAlert {
        event: "Flood Warning".to_owned(),
        area: "Sacramento County".to_owned(),
        severity: "Severe".to_owned(),
        status: "Actual".to_owned(),
        headline: Some("Flood Warning until noon".to_owned()),
    }
}

pub fn sample_period() -> ForecastPeriod {
    ForecastPeriod {
        name: "Tonight".to_owned(),
        temperature: 58,
        temperature_unit: "F".to_owned(),
        wind_speed: "5 mph".to_owned(),
        wind_direction: "SW".to_owned(),
        detailed_forecast: "Patchy fog after midnight.".to_owned(),
    }
}

pub fn sample_repository(name: &str) -> Repository {
    Repository {
        name: name.to_owned(),
        full_name: Some(format!("octocat/{name}")),
        html_url: format!("https://github.com/octocat/{name}"),
        private: false,
        description: None,
    }
}

// ============================================================================
// Recording mocks
// ============================================================================

/// Token exchanger that records every request and returns a programmed
/// outcome without touching the network
pub struct MockExchanger {
    calls: AtomicUsize,
    last_request: Mutex<Option<ExchangeRequest>>,
    result: Mutex<Result<String, AppError>>,
}

impl MockExchanger {
    pub fn returning(access_token: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            result: Mutex::new(Ok(access_token.to_owned())),
        })
    }

    pub fn failing(error: AppError) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            result: Mutex::new(Err(error)),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ExchangeRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenExchanger for MockExchanger {
    async fn exchange(&self, request: &ExchangeRequest) -> AppResult<OutboundToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.result
            .lock()
            .unwrap()
            .clone()
            .map(|access_token| OutboundToken { access_token })
    }
}

/// Repository host mock recording calls and the token each call carried
pub struct MockRepositoryHost {
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    last_token: Mutex<Option<String>>,
    last_create: Mutex<Option<NewRepository>>,
    list_result: Mutex<Result<Vec<Repository>, AppError>>,
    create_result: Mutex<Result<Repository, AppError>>,
}

impl Default for MockRepositoryHost {
    fn default() -> Self {
        Self {
            list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
            last_create: Mutex::new(None),
            list_result: Mutex::new(Ok(Vec::new())),
            create_result: Mutex::new(Ok(sample_repository("created"))),
        }
    }
}

impl MockRepositoryHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_repositories(repositories: Vec<Repository>) -> Arc<Self> {
        let host = Self::default();
        *host.list_result.lock().unwrap() = Ok(repositories);
        Arc::new(host)
    }

    pub fn with_list_error(error: AppError) -> Arc<Self> {
        let host = Self::default();
        *host.list_result.lock().unwrap() = Err(error);
        Arc::new(host)
    }

    pub fn with_created(repository: Repository) -> Arc<Self> {
        let host = Self::default();
        *host.create_result.lock().unwrap() = Ok(repository);
        Arc::new(host)
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_call_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn last_token(&self) -> Option<String> {
        self.last_token.lock().unwrap().clone()
    }

    pub fn last_create(&self) -> Option<NewRepository> {
        self.last_create.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositoryHost for MockRepositoryHost {
    async fn list_repositories(&self, access_token: &str) -> AppResult<Vec<Repository>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = Some(access_token.to_owned());
        self.list_result.lock().unwrap().clone()
    }

    async fn create_repository(
        &self,
        access_token: &str,
        request: &NewRepository,
    ) -> AppResult<Repository> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = Some(access_token.to_owned());
        *self.last_create.lock().unwrap() = Some(request.clone());
        self.create_result.lock().unwrap().clone()
    }
}

/// Weather source mock recording calls
pub struct MockWeatherSource {
    calls: AtomicUsize,
    alerts_result: Mutex<Result<Vec<WeatherAlert>, AppError>>,
    forecast_result: Mutex<Result<Vec<ForecastPeriod>, AppError>>,
}

impl Default for MockWeatherSource {
    fn default() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            alerts_result: Mutex::new(Ok(Vec::new())),
            forecast_result: Mutex::new(Ok(Vec::new())),
        }
    }
}

impl MockWeatherSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_alerts(alerts: Vec<WeatherAlert>) -> Arc<Self> {
        let source = Self::default();
        *source.alerts_result.lock().unwrap() = Ok(alerts);
        Arc::new(source)
    }

    pub fn with_forecast(periods: Vec<ForecastPeriod>) -> Arc<Self> {
        let source = Self::default();
        *source.forecast_result.lock().unwrap() = Ok(periods);
        Arc::new(source)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherSource for MockWeatherSource {
    async fn active_alerts(&self, _state: &str) -> AppResult<Vec<WeatherAlert>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.alerts_result.lock().unwrap().clone()
    }

    async fn forecast(&self, _latitude: f64, _longitude: f64) -> AppResult<Vec<ForecastPeriod>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.forecast_result.lock().unwrap().clone()
    }
}

/// Settings store whose operations can be programmed to fail
pub struct FailingStore {
    pub fail_get: bool,
    pub fail_set: bool,
    inner: MemorySettingsStore,
}

impl FailingStore {
    /// Store where writes fail but reads answer normally
    pub fn set_only() -> Arc<Self> {
        Arc::new(Self {
            fail_get: false,
            fail_set: true,
            inner: MemorySettingsStore::new(),
        })
    }

    /// Store where every operation fails
    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            fail_get: true,
            fail_set: true,
            inner: MemorySettingsStore::new(),
        })
    }
}

#[async_trait]
impl SettingsStore for FailingStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        if self.fail_get {
            return Err(AppError::persistence_unavailable("store offline"));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        if self.fail_set {
            return Err(AppError::persistence_unavailable("store offline"));
        }
        self.inner.set(key, value).await
    }
}

// ============================================================================
// Resource builders
// ============================================================================

/// Handles to the mocks inside a test resource set
pub struct TestHarness {
    pub resources: Arc<ServerResources>,
    pub exchanger: Arc<MockExchanger>,
    pub weather: Arc<MockWeatherSource>,
    pub repository_host: Arc<MockRepositoryHost>,
}

/// Build server resources over explicit mocks
pub fn test_resources(
    store: Arc<dyn SettingsStore>,
    exchanger: Arc<MockExchanger>,
    weather: Arc<MockWeatherSource>,
    repository_host: Arc<MockRepositoryHost>,
) -> TestHarness {
    init_test_logging();
    let resources = Arc::new(ServerResources::new(
        ServerConfig::default(),
        store,
        exchanger.clone(),
        weather.clone(),
        repository_host.clone(),
    ));

    TestHarness {
        resources,
        exchanger,
        weather,
        repository_host,
    }
}

/// Default harness: in-memory store, exchanger yielding `tok-abc`, empty
/// downstream results
pub fn default_harness() -> TestHarness {
    test_resources(
        Arc::new(MemorySettingsStore::new()),
        MockExchanger::returning("tok-abc"),
        MockWeatherSource::new(),
        MockRepositoryHost::new(),
    )
}
