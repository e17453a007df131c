// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dashboard metrics, cached per applied scope.

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use senti_dash::MetricsScope;
use senti_dash_catalog::{CacheConfig, CacheEvent, FetchError, QueryCache, QueryState};
use senti_dash_domain::{DashboardMetrics, validate_trend_order};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;

type Fetcher = Box<dyn FnOnce() -> BoxFuture<'static, Result<DashboardMetrics, FetchError>> + Send>;

/// The backend that computes dashboard metrics.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetches the metrics for `scope`; `MetricsScope::Unscoped` requests the
    /// global view.
    async fn fetch_metrics(&self, scope: &MetricsScope) -> Result<DashboardMetrics, FetchError>;
}

/// Metrics payloads keyed by the scope they were requested for.
pub struct MetricsCache {
    source: Arc<dyn MetricsSource>,
    cache: QueryCache<MetricsScope, DashboardMetrics>,
}

impl MetricsCache {
    /// Creates an empty metrics cache over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn MetricsSource>, config: &CacheConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            source,
            cache: QueryCache::new("metrics", config.metrics_stale_after, events),
        }
    }

    /// Subscribes to load, ready and failure events for every scope.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent<MetricsScope>> {
        self.cache.subscribe()
    }

    /// Metrics for `scope`, starting a fetch if needed.
    pub fn request(&self, scope: &MetricsScope) -> QueryState<DashboardMetrics> {
        self.cache.request(scope, self.fetcher(scope))
    }

    /// Metrics for `scope`, retrying the fetch if the last one failed.
    pub fn reload(&self, scope: &MetricsScope) -> QueryState<DashboardMetrics> {
        let state: QueryState<DashboardMetrics> = self.request(scope);
        if state.error().is_some() {
            return self.cache.retry(scope, self.fetcher(scope));
        }
        state
    }

    /// Metrics for `scope` without starting a fetch.
    #[must_use]
    pub fn peek(&self, scope: &MetricsScope) -> QueryState<DashboardMetrics> {
        self.cache.peek(scope)
    }

    /// Resolves the metrics for `scope`.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the metrics failed to load.
    pub async fn fetch(&self, scope: &MetricsScope) -> Result<Arc<DashboardMetrics>, FetchError> {
        self.cache.fetch(scope, self.fetcher(scope)).await
    }

    /// Re-issues the fetch for `scope`, superseding one still in flight.
    pub fn retry(&self, scope: &MetricsScope) -> QueryState<DashboardMetrics> {
        self.cache.refetch(scope, self.fetcher(scope))
    }

    fn fetcher(&self, scope: &MetricsScope) -> Fetcher {
        let source: Arc<dyn MetricsSource> = Arc::clone(&self.source);
        let scope: MetricsScope = scope.clone();
        Box::new(move || {
            async move {
                let metrics: DashboardMetrics = source.fetch_metrics(&scope).await?;
                if let Err(e) = validate_trend_order(&metrics.sentiment_trends) {
                    warn!(%scope, error = %e, "Trend points are not in date order");
                }
                Ok(metrics)
            }
            .boxed()
        })
    }
}
