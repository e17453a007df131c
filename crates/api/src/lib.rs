// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Boundary layer between the rendering surface and the dashboard core.
//!
//! [`DashboardController`] exposes the selection read-only, the three option
//! lists with their loading/failed/ready state, the selection mutators,
//! `apply` and `reset`, and the dashboard for the applied scope.

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

mod controller;
mod error;
mod metrics;
mod request_response;

#[cfg(test)]
mod tests;

pub use controller::{
    DashboardController, DashboardEvent, DashboardStatus, DashboardView, SelectionIssue,
};
pub use error::{ApiError, translate_domain_error, translate_fetch_error};
pub use metrics::{MetricsCache, MetricsSource};
pub use request_response::{
    ApplyResponse, CatalogListResponse, CategoryView, DashboardResponse, DashboardStatusView,
    ListView, SelectionResponse, SetCourseRequest, SetDepartmentRequest, SetKindRequest,
    SetProfessorRequest,
};

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
