// ABOUTME: Weather tools backed by the National Weather Service API
// ABOUTME: Active alerts by state and point forecasts by coordinates, gated on weather:read
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! Weather tools.
//!
//! The NWS API is public, so these tools perform no token exchange; they
//! still apply the same scope gate as every other tool before any network
//! I/O.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{AppError, AppResult};
use crate::formatters;
use crate::outbound::require_scope;

use super::{McpTool, ToolExecutionContext};

/// Scope required by both weather tools
pub const WEATHER_READ_SCOPE: &str = "weather:read";

#[derive(Debug, Deserialize)]
struct AlertsParams {
    state: String,
}

#[derive(Debug, Deserialize)]
struct ForecastParams {
    latitude: f64,
    longitude: f64,
}

/// Active weather alerts for a US state
pub struct WeatherAlertsTool;

#[async_trait]
impl McpTool for WeatherAlertsTool {
    fn name(&self) -> &'static str {
        "get_weather_alerts"
    }

    fn description(&self) -> &'static str {
        "Get active weather alerts for a US state"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "state": {
                    "type": "string",
                    "description": "Two-letter US state or territory code (e.g. CA)"
                }
            },
            "required": ["state"]
        })
    }

    async fn execute(
        &self,
        params: &Value,
        context: &ToolExecutionContext<'_>,
    ) -> AppResult<String> {
        require_scope(context.caller, WEATHER_READ_SCOPE)?;

        let params: AlertsParams = serde_json::from_value(params.clone())
            .map_err(|e| AppError::validation(format!("invalid alert parameters: {e}")))?;

        let state = params.state.trim().to_uppercase();
        if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::validation(
                "'state' must be a two-letter state code",
            ));
        }

        let alerts = context.resources.weather.active_alerts(&state).await?;
        Ok(formatters::render_alerts(&state, &alerts))
    }
}

/// Point forecast for a coordinate pair
pub struct WeatherForecastTool;

#[async_trait]
impl McpTool for WeatherForecastTool {
    fn name(&self) -> &'static str {
        "get_weather_forecast"
    }

    fn description(&self) -> &'static str {
        "Get the weather forecast for a location by coordinates"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "latitude": {
                    "type": "number",
                    "description": "Latitude in decimal degrees"
                },
                "longitude": {
                    "type": "number",
                    "description": "Longitude in decimal degrees"
                }
            },
            "required": ["latitude", "longitude"]
        })
    }

    async fn execute(
        &self,
        params: &Value,
        context: &ToolExecutionContext<'_>,
    ) -> AppResult<String> {
        require_scope(context.caller, WEATHER_READ_SCOPE)?;

        let params: ForecastParams = serde_json::from_value(params.clone())
            .map_err(|e| AppError::validation(format!("invalid forecast parameters: {e}")))?;

        if !(-90.0..=90.0).contains(&params.latitude) {
            return Err(AppError::validation(
                "'latitude' must be between -90 and 90",
            ));
        }
        if !(-180.0..=180.0).contains(&params.longitude) {
            return Err(AppError::validation(
                "'longitude' must be between -180 and 180",
            ));
        }

        let periods = context
            .resources
            .weather
            .forecast(params.latitude, params.longitude)
            .await?;

        Ok(formatters::render_forecast(&periods))
    }
}
