// ABOUTME: Plain-text rendering of tool results for MCP clients
// ABOUTME: Fixed field order per record type and descriptive no-results messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! Tool result rendering.
//!
//! Tool output is human-readable text, never raw JSON: each record renders
//! as labeled lines in a fixed field order, records are separated by `---`
//! lines, and an empty result set produces a descriptive message instead of
//! an empty list.

use std::fmt::Write as _;

use crate::external::{ForecastPeriod, Repository, WeatherAlert};

/// Separator between rendered records
const RECORD_SEPARATOR: &str = "\n---\n";

/// Render active weather alerts for a state.
///
/// Field order per alert: event, area, severity, status, headline.
#[must_use]
pub fn render_alerts(state: &str, alerts: &[WeatherAlert]) -> String {
    if alerts.is_empty() {
        return format!("No active alerts for {state}");
    }

    let rendered: Vec<String> = alerts
        .iter()
        .map(|alert| {
            let mut text = String::new();
            let _ = writeln!(text, "Event: {}", alert.event);
            let _ = writeln!(text, "Area: {}", alert.area);
            let _ = writeln!(text, "Severity: {}", alert.severity);
            let _ = writeln!(text, "Status: {}", alert.status);
            let _ = write!(
                text,
                "Headline: {}",
                alert.headline.as_deref().unwrap_or("No headline")
            );
            text
        })
        .collect();

    format!(
        "Active alerts for {state}:\n\n{}",
        rendered.join(RECORD_SEPARATOR)
    )
}

/// Render forecast periods for a location.
///
/// Field order per period: name, temperature, wind, detailed forecast.
#[must_use]
pub fn render_forecast(periods: &[ForecastPeriod]) -> String {
    if periods.is_empty() {
        return "No forecast periods available for this location".to_owned();
    }

    let rendered: Vec<String> = periods
        .iter()
        .map(|period| {
            let mut text = String::new();
            let _ = writeln!(text, "{}:", period.name);
            let _ = writeln!(
                text,
                "Temperature: {}°{}",
                period.temperature, period.temperature_unit
            );
            let _ = writeln!(
                text,
                "Wind: {} {}",
                period.wind_speed, period.wind_direction
            );
            let _ = write!(text, "{}", period.detailed_forecast);
            text
        })
        .collect();

    format!("Forecast:\n\n{}", rendered.join(RECORD_SEPARATOR))
}

/// Render a user's repository list.
///
/// Field order per repository: name, URL, private.
#[must_use]
pub fn render_repositories(user_id: &str, repositories: &[Repository]) -> String {
    if repositories.is_empty() {
        return format!("No repositories found for {user_id}");
    }

    let rendered: Vec<String> = repositories.iter().map(render_repository_fields).collect();

    format!(
        "Repositories for {user_id}:\n\n{}",
        rendered.join(RECORD_SEPARATOR)
    )
}

/// Render a confirmation for a newly created repository
#[must_use]
pub fn render_created_repository(repository: &Repository) -> String {
    format!(
        "Created repository {}\n{}",
        repository.full_name.as_deref().unwrap_or(&repository.name),
        render_repository_fields(repository)
    )
}

fn render_repository_fields(repository: &Repository) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Name: {}", repository.name);
    let _ = writeln!(text, "URL: {}", repository.html_url);
    let _ = write!(text, "Private: {}", repository.private);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> WeatherAlert {
        WeatherAlert {
            event: "Flood Warning".to_owned(),
            area: "Sacramento County".to_owned(),
            severity: "Severe".to_owned(),
            status: "Actual".to_owned(),
            headline: Some("Flood Warning until noon".to_owned()),
        }
    }

    fn repository(name: &str, private: bool) -> Repository {
        Repository {
            name: name.to_owned(),
            full_name: Some(format!("octocat/{name}")),
            html_url: format!("https://github.com/octocat/{name}"),
            private,
            description: None,
        }
    }

    #[test]
    fn empty_alerts_render_no_results_message() {
        assert_eq!(render_alerts("CA", &[]), "No active alerts for CA");
    }

    #[test]
    fn alerts_render_fixed_field_order() {
        let text = render_alerts("CA", &[alert()]);
        let event_at = text.find("Event:").unwrap_or(usize::MAX);
        let area_at = text.find("Area:").unwrap_or(usize::MAX);
        let severity_at = text.find("Severity:").unwrap_or(usize::MAX);
        let headline_at = text.find("Headline:").unwrap_or(usize::MAX);
        assert!(event_at < area_at && area_at < severity_at && severity_at < headline_at);
        assert!(text.contains("Flood Warning until noon"));
    }

    #[test]
    fn missing_headline_renders_placeholder() {
        let mut record = alert();
        record.headline = None;
        let text = render_alerts("CA", &[record]);
        assert!(text.contains("Headline: No headline"));
    }

    #[test]
    fn empty_forecast_renders_no_results_message() {
        assert_eq!(
            render_forecast(&[]),
            "No forecast periods available for this location"
        );
    }

    #[test]
    fn empty_repositories_render_no_results_message() {
        assert_eq!(
            render_repositories("user-123", &[]),
            "No repositories found for user-123"
        );
    }

    #[test]
    fn repositories_render_separated_records() {
        let text = render_repositories("user-123", &[repository("a", false), repository("b", true)]);
        assert!(text.contains("Repositories for user-123:"));
        assert!(text.contains("---"));
        assert!(text.contains("Name: a"));
        assert!(text.contains("Private: true"));
    }

    #[test]
    fn created_repository_renders_confirmation() {
        let text = render_created_repository(&repository("beacon", true));
        assert!(text.starts_with("Created repository octocat/beacon"));
        assert!(text.contains("URL: https://github.com/octocat/beacon"));
        assert!(text.contains("Private: true"));
    }
}
