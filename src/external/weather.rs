// ABOUTME: National Weather Service API client for active alerts and point forecasts
// ABOUTME: Classifies non-success statuses and shape violations as distinct failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! National Weather Service client.
//!
//! The NWS API is public and unauthenticated, but it rejects requests that
//! carry no `User-Agent`, so the client is always built with one. Forecasts
//! are a two-step lookup: the points endpoint maps coordinates to a
//! gridpoint forecast URL, which is then fetched for the period list.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Service name used in error classification
const SERVICE: &str = "National Weather Service";

/// One active weather alert for an area
#[derive(Debug, Clone)]
pub struct WeatherAlert {
    /// Alert event type (e.g. "Flood Warning")
    pub event: String,
    /// Affected area description
    pub area: String,
    /// Severity classification
    pub severity: String,
    /// Alert status (e.g. "Actual")
    pub status: String,
    /// Headline summary, when the feed provides one
    pub headline: Option<String>,
}

/// One forecast period for a gridpoint
#[derive(Debug, Clone)]
pub struct ForecastPeriod {
    /// Period name (e.g. "Tonight")
    pub name: String,
    /// Temperature in `temperature_unit`
    pub temperature: i64,
    /// Temperature unit letter (F or C)
    pub temperature_unit: String,
    /// Wind speed description
    pub wind_speed: String,
    /// Wind direction abbreviation
    pub wind_direction: String,
    /// Full prose forecast for the period
    pub detailed_forecast: String,
}

/// Source of weather data for the weather tools.
///
/// The production implementation is [`NwsClient`]; tests substitute a mock.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch active alerts for a two-letter state/territory code.
    ///
    /// # Errors
    /// `DownstreamFailed` for a non-success status, `UnexpectedFormat` when
    /// the alert feed violates its documented shape.
    async fn active_alerts(&self, state: &str) -> AppResult<Vec<WeatherAlert>>;

    /// Fetch the forecast period list for a coordinate pair.
    ///
    /// # Errors
    /// `DownstreamFailed` for a non-success status, `UnexpectedFormat` when
    /// either lookup step violates its documented shape.
    async fn forecast(&self, latitude: f64, longitude: f64) -> AppResult<Vec<ForecastPeriod>>;
}

/// HTTP client for the National Weather Service API
#[derive(Debug, Clone)]
pub struct NwsClient {
    http: reqwest::Client,
    base_url: String,
}

impl NwsClient {
    /// Create a client against `base_url` (normally `https://api.weather.gov`)
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn get_json(&self, url: &str) -> AppResult<Value> {
        let response = self
            .http
            .get(url)
            .header("Accept", "application/geo+json")
            .send()
            .await
            .map_err(|e| AppError::internal(format!("weather request failed: {e}")))?;

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
impl WeatherSource for NwsClient {
    async fn active_alerts(&self, state: &str) -> AppResult<Vec<WeatherAlert>> {
        let url = format!("{}/alerts/active/area/{state}", self.base_url);
        debug!(state, "fetching active weather alerts");
        let body = self.get_json(&url).await?;
        parse_alerts(&body)
    }

    async fn forecast(&self, latitude: f64, longitude: f64) -> AppResult<Vec<ForecastPeriod>> {
        // The points endpoint expects coordinates rounded to four decimals.
        let url = format!("{}/points/{latitude:.4},{longitude:.4}", self.base_url);
        debug!(latitude, longitude, "resolving forecast gridpoint");
        let points = self.get_json(&url).await?;

        let forecast_url = forecast_url(&points)?;
        let body = self.get_json(&forecast_url).await?;
        parse_forecast(&body)
    }
}

/// Parse the active-alerts feed into alert records.
///
/// The feed is a `GeoJSON` feature collection; each feature's `properties`
/// carries the alert fields. Missing optional fields degrade to "Unknown"
/// rather than failing the whole feed.
///
/// # Errors
/// Returns `UnexpectedFormat` when `features` is missing or not an array.
pub fn parse_alerts(body: &Value) -> AppResult<Vec<WeatherAlert>> {
    let features = body
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::UnexpectedFormat {
            service: SERVICE,
            detail: "'features' is missing or not an array".to_owned(),
        })?;

    Ok(features
        .iter()
        .map(|feature| {
            let properties = feature.get("properties").cloned().unwrap_or_default();
            WeatherAlert {
                event: string_or_unknown(&properties, "event"),
                area: string_or_unknown(&properties, "areaDesc"),
                severity: string_or_unknown(&properties, "severity"),
                status: string_or_unknown(&properties, "status"),
                headline: properties
                    .get("headline")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            }
        })
        .collect())
}

/// Extract the gridpoint forecast URL from a points response.
///
/// # Errors
/// Returns `UnexpectedFormat` when `properties.forecast` is absent.
pub fn forecast_url(points: &Value) -> AppResult<String> {
    points
        .pointer("/properties/forecast")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| AppError::UnexpectedFormat {
            service: SERVICE,
            detail: "points response has no 'properties.forecast' URL".to_owned(),
        })
}

/// Parse a gridpoint forecast into its period list.
///
/// # Errors
/// Returns `UnexpectedFormat` when `properties.periods` is missing or not
/// an array.
pub fn parse_forecast(body: &Value) -> AppResult<Vec<ForecastPeriod>> {
    let periods = body
        .pointer("/properties/periods")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::UnexpectedFormat {
            service: SERVICE,
            detail: "'properties.periods' is missing or not an array".to_owned(),
        })?;

    Ok(periods
        .iter()
        .map(|period| ForecastPeriod {
            name: string_or_unknown(period, "name"),
            temperature: period
                .get("temperature")
                .and_then(Value::as_i64)
                .unwrap_or(0),
            temperature_unit: string_or_unknown(period, "temperatureUnit"),
            wind_speed: string_or_unknown(period, "windSpeed"),
            wind_direction: string_or_unknown(period, "windDirection"),
            detailed_forecast: string_or_unknown(period, "detailedForecast"),
        })
        .collect())
}

fn string_or_unknown(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_owned()
}
