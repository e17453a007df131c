// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use crate::{DashboardController, MetricsCache, MetricsSource};
use async_trait::async_trait;
use senti_dash::MetricsScope;
use senti_dash_catalog::{CacheConfig, CatalogCache, CatalogSource, FetchError};
use senti_dash_domain::{
    Course, DashboardMetrics, Department, Professor, ProfessorId, SentimentCount, TrendPoint,
    WordFrequency,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// An in-memory backend serving both catalog lists and metrics.
///
/// Every call is recorded under the display form of its key; catalog keys
/// as `professors[department=Math]`, metrics as `metrics:professor=42`.
#[derive(Default)]
pub struct FixtureBackend {
    departments: Mutex<Vec<Department>>,
    professors: Mutex<HashMap<Option<String>, Vec<Professor>>>,
    courses: Mutex<HashMap<Option<ProfessorId>, Vec<Course>>>,
    metrics: Mutex<HashMap<MetricsScope, Result<DashboardMetrics, FetchError>>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    calls: Mutex<Vec<String>>,
}

impl FixtureBackend {
    pub fn set_departments(&self, departments: Vec<Department>) {
        *self.departments.lock().unwrap() = departments;
    }

    pub fn set_professors(&self, department: Option<&str>, professors: Vec<Professor>) {
        self.professors
            .lock()
            .unwrap()
            .insert(department.map(str::to_string), professors);
    }

    pub fn set_courses(&self, professor_id: Option<u32>, courses: Vec<Course>) {
        self.courses
            .lock()
            .unwrap()
            .insert(professor_id.map(ProfessorId::new), courses);
    }

    pub fn set_metrics(&self, scope: MetricsScope, metrics: Result<DashboardMetrics, FetchError>) {
        self.metrics.lock().unwrap().insert(scope, metrics);
    }

    /// Holds the next call recorded as `key` until the sender fires.
    pub fn gate(&self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(key.to_string(), rx);
        tx
    }

    pub fn calls_for(&self, key: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|k| *k == key).count()
    }

    async fn enter(&self, key: String) {
        self.calls.lock().unwrap().push(key.clone());
        let gate: Option<oneshot::Receiver<()>> = self.gates.lock().unwrap().remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

#[async_trait]
impl CatalogSource for FixtureBackend {
    async fn list_departments(&self) -> Result<Vec<Department>, FetchError> {
        self.enter(String::from("departments")).await;
        Ok(self.departments.lock().unwrap().clone())
    }

    async fn list_professors(
        &self,
        department: Option<&str>,
    ) -> Result<Vec<Professor>, FetchError> {
        let key: String = department.map_or_else(
            || String::from("professors"),
            |d| format!("professors[department={d}]"),
        );
        self.enter(key).await;
        Ok(self
            .professors
            .lock()
            .unwrap()
            .get(&department.map(str::to_string))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_courses(
        &self,
        professor_id: Option<ProfessorId>,
    ) -> Result<Vec<Course>, FetchError> {
        let key: String = professor_id.map_or_else(
            || String::from("courses"),
            |id| format!("courses[professor={id}]"),
        );
        self.enter(key).await;
        Ok(self
            .courses
            .lock()
            .unwrap()
            .get(&professor_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl MetricsSource for FixtureBackend {
    async fn fetch_metrics(&self, scope: &MetricsScope) -> Result<DashboardMetrics, FetchError> {
        self.enter(format!("metrics:{scope}")).await;
        self.metrics
            .lock()
            .unwrap()
            .get(scope)
            .cloned()
            .unwrap_or_else(|| Ok(empty_metrics()))
    }
}

/// Shared caches over one backend, as a server would hold them.
pub struct Harness {
    pub backend: Arc<FixtureBackend>,
    pub catalog: Arc<CatalogCache>,
    pub metrics: Arc<MetricsCache>,
}

pub fn harness() -> Harness {
    let backend: Arc<FixtureBackend> = Arc::new(FixtureBackend::default());
    let config: CacheConfig = CacheConfig::default();
    Harness {
        catalog: Arc::new(CatalogCache::new(backend.clone(), &config)),
        metrics: Arc::new(MetricsCache::new(backend.clone(), &config)),
        backend,
    }
}

impl Harness {
    pub fn controller(&self) -> DashboardController {
        DashboardController::new(Arc::clone(&self.catalog), Arc::clone(&self.metrics))
    }
}

pub fn economics_professors() -> Vec<Professor> {
    vec![
        Professor::new(42, "Zapata", "Economía"),
        Professor::new(7, "Ávila", "Economía"),
    ]
}

pub fn empty_metrics() -> DashboardMetrics {
    DashboardMetrics {
        total_comments: 0,
        average_sentiment_score: 0.0,
        sentiment_distribution: Vec::new(),
        categories: None,
        sentiment_trends: Vec::new(),
        top_words: Vec::new(),
    }
}

pub fn sample_metrics(total_comments: u64) -> DashboardMetrics {
    DashboardMetrics {
        total_comments,
        average_sentiment_score: 0.42,
        sentiment_distribution: vec![
            SentimentCount {
                sentiment: String::from("positive"),
                count: 60,
            },
            SentimentCount {
                sentiment: String::from("neutral"),
                count: 25,
            },
            SentimentCount {
                sentiment: String::from("negative"),
                count: 15,
            },
        ],
        categories: None,
        sentiment_trends: vec![TrendPoint {
            date: String::from("2026-03-01"),
            sentiment_score: 0.4,
            count: total_comments,
        }],
        top_words: vec![WordFrequency {
            word: String::from("claro"),
            frequency: 12,
        }],
    }
}

pub fn unavailable() -> FetchError {
    FetchError::Transport {
        message: String::from("connection refused"),
    }
}
