// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::config::{BackendConfig, CatalogRoutes, MetricsRoutes};
use async_trait::async_trait;
use reqwest::Url;
use senti_dash::MetricsScope;
use senti_dash_api::MetricsSource;
use senti_dash_catalog::{CatalogSource, FetchError};
use senti_dash_domain::{Course, DashboardMetrics, Department, Professor, ProfessorId};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// HTTP client for the catalog and metrics backend.
#[derive(Clone)]
pub struct HttpBackend {
    config: BackendConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Creates a client for the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Transport` if the HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { config, client })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Builds a URL from the base URL and path segments. Segments are
    /// percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url: Url = Url::parse(&self.config.base_url).map_err(|e| FetchError::Transport {
            message: format!("invalid backend URL '{}': {e}", self.config.base_url),
        })?;
        url.path_segments_mut()
            .map_err(|()| FetchError::Transport {
                message: format!("backend URL '{}' cannot be a base", self.config.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn professors_url(&self, department: Option<&str>) -> Result<Url, FetchError> {
        match (department, self.config.catalog_routes) {
            (None, _) => self.url(&["catalog", "professors"]),
            (Some(name), CatalogRoutes::QueryFilter) => {
                let mut url: Url = self.url(&["catalog", "professors"])?;
                url.query_pairs_mut().append_pair("department", name);
                Ok(url)
            }
            (Some(name), CatalogRoutes::SubResource) => {
                self.url(&["catalog", "departments", name, "professors"])
            }
        }
    }

    pub(crate) fn courses_url(&self, professor_id: Option<ProfessorId>) -> Result<Url, FetchError> {
        match (professor_id, self.config.catalog_routes) {
            (None, _) => self.url(&["catalog", "courses"]),
            (Some(id), CatalogRoutes::QueryFilter) => {
                let mut url: Url = self.url(&["catalog", "courses"])?;
                url.query_pairs_mut()
                    .append_pair("professor_id", &id.to_string());
                Ok(url)
            }
            (Some(id), CatalogRoutes::SubResource) => {
                self.url(&["catalog", "professors", &id.to_string(), "courses"])
            }
        }
    }

    pub(crate) fn metrics_url(&self, scope: &MetricsScope) -> Result<Url, FetchError> {
        match (scope.query(), self.config.metrics_routes) {
            (None, _) => self.url(&["api", "dashboard", "metrics"]),
            (Some(_), MetricsRoutes::QueryFilter) => {
                let mut url: Url = self.url(&["api", "dashboard", "metrics"])?;
                url.query_pairs_mut().extend_pairs(scope.query_pairs());
                Ok(url)
            }
            (Some(query), MetricsRoutes::PerScope) => self.url(&[
                "api",
                "dashboard",
                "metrics",
                query.scope.as_str(),
                &query.value,
            ]),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| {
                warn!(%url, error = %e, "Backend request failed");
                FetchError::Transport {
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| FetchError::Transport {
            message: format!("failed reading response body: {e}"),
        })?;

        if !status.is_success() {
            warn!(%url, %status, "Backend returned an error");
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_slice::<T>(&body).map_err(|e| FetchError::Decode {
            message: e.to_string(),
        })
    }
}

/// Pulls a readable message out of an error body: the `detail` or `message`
/// field of a JSON object, or the raw text.
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "message"]
                .iter()
                .find_map(|field| value.get(field).and_then(serde_json::Value::as_str))
                .map(str::to_string)
        })
        .unwrap_or_else(|| String::from_utf8_lossy(body).to_string())
}

#[async_trait]
impl CatalogSource for HttpBackend {
    async fn list_departments(&self) -> Result<Vec<Department>, FetchError> {
        let url: Url = self.url(&["catalog", "departments"])?;
        self.get_json(url).await
    }

    async fn list_professors(
        &self,
        department: Option<&str>,
    ) -> Result<Vec<Professor>, FetchError> {
        let url: Url = self.professors_url(department)?;
        self.get_json(url).await
    }

    async fn list_courses(
        &self,
        professor_id: Option<ProfessorId>,
    ) -> Result<Vec<Course>, FetchError> {
        let url: Url = self.courses_url(professor_id)?;
        self.get_json(url).await
    }
}

#[async_trait]
impl MetricsSource for HttpBackend {
    async fn fetch_metrics(&self, scope: &MetricsScope) -> Result<DashboardMetrics, FetchError> {
        let url: Url = self.metrics_url(scope)?;
        self.get_json(url).await
    }
}
