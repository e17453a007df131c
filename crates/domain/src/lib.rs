// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod collation;
mod error;
mod metrics;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use collation::{compare_names, sort_by_name};
pub use error::DomainError;
pub use metrics::{
    CATEGORY_ORDER, CategoryDistribution, DashboardMetrics, KpiSummary, NEGATIVE, NEUTRAL,
    NOT_ANALYZED, POSITIVE, SentimentCount, TrendPoint, WordFrequency,
};
pub use types::{
    CatalogKey, CatalogList, Course, CourseId, Department, Named, Professor, ProfessorId, Scope,
    ScopeKind,
};
pub use validation::{parse_trend_date, validate_trend_order, validate_unique_departments};
