// ABOUTME: Downstream REST API clients behind trait seams
// ABOUTME: National Weather Service (unauthenticated) and GitHub (outbound-token authenticated)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! Downstream API clients.
//!
//! Each downstream dependency sits behind a trait so tool implementations
//! and tests are independent of the wire. The real clients classify every
//! failure distinctly: a non-success HTTP status is `DownstreamFailed`, a
//! response whose structure violates the documented shape is
//! `UnexpectedFormat`. Neither is retried.

/// GitHub REST API client
pub mod github;

/// National Weather Service API client
pub mod weather;

pub use github::{GithubClient, NewRepository, Repository, RepositoryHost};
pub use weather::{ForecastPeriod, NwsClient, WeatherAlert, WeatherSource};
