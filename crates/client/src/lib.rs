// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `reqwest` client for the backend that serves catalog lists and dashboard
//! metrics.
//!
//! [`HttpBackend`] implements both [`senti_dash_catalog::CatalogSource`] and
//! [`senti_dash_api::MetricsSource`]. Non-success statuses become
//! `FetchError::Status`, connection faults `FetchError::Transport`, and
//! bodies that do not decode `FetchError::Decode`.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod config;
mod http_backend;

#[cfg(test)]
mod tests;

pub use config::{
    BackendConfig, CatalogRoutes, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT, MetricsRoutes,
};
pub use http_backend::HttpBackend;
