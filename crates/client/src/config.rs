// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How filtered catalog lists are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogRoutes {
    /// `/catalog/professors?department=...`, `/catalog/courses?professor_id=...`
    #[default]
    QueryFilter,
    /// `/catalog/departments/{name}/professors`, `/catalog/professors/{id}/courses`
    SubResource,
}

/// How scoped metrics are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricsRoutes {
    /// `/api/dashboard/metrics?scope=...&value=...`
    #[default]
    QueryFilter,
    /// `/api/dashboard/metrics/{scope}/{value}`
    PerScope,
}

/// Where and how to reach the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL; paths are appended to it.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Catalog endpoint layout.
    pub catalog_routes: CatalogRoutes,
    /// Metrics endpoint layout.
    pub metrics_routes: MetricsRoutes,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            catalog_routes: CatalogRoutes::default(),
            metrics_routes: MetricsRoutes::default(),
        }
    }
}
