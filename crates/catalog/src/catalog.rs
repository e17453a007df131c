// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::config::CacheConfig;
use crate::error::FetchError;
use crate::query_cache::{CacheEvent, QueryCache, QueryState};
use crate::source::CatalogSource;
use futures::FutureExt;
use futures::future::BoxFuture;
use senti_dash_domain::{
    CatalogKey, Course, Department, Professor, ProfessorId, sort_by_name,
    validate_unique_departments,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

type Fetcher<V> = Box<dyn FnOnce() -> BoxFuture<'static, Result<V, FetchError>> + Send>;

/// Departments, professors and courses, cached per scoping parameter.
///
/// Every list is a separate entry keyed by its [`CatalogKey`], so the
/// professors of one department load, fail and retry independently of
/// another department's. All three lists publish on one event channel.
///
/// Departments keep the backend's order. Professors and courses are sorted
/// by name with [`senti_dash_domain::compare_names`].
pub struct CatalogCache {
    source: Arc<dyn CatalogSource>,
    departments: QueryCache<CatalogKey, Vec<Department>>,
    professors: QueryCache<CatalogKey, Vec<Professor>>,
    courses: QueryCache<CatalogKey, Vec<Course>>,
    events: broadcast::Sender<CacheEvent<CatalogKey>>,
}

impl CatalogCache {
    /// Creates an empty catalog cache over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn CatalogSource>, config: &CacheConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        let stale_after = config.catalog_stale_after;
        Self {
            source,
            departments: QueryCache::new("departments", stale_after, events.clone()),
            professors: QueryCache::new("professors", stale_after, events.clone()),
            courses: QueryCache::new("courses", stale_after, events.clone()),
            events,
        }
    }

    /// Subscribes to load, ready and failure events for every list.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent<CatalogKey>> {
        self.events.subscribe()
    }

    /// Department list, starting a fetch if needed.
    pub fn departments(&self) -> QueryState<Vec<Department>> {
        self.departments
            .request(&CatalogKey::Departments, self.departments_fetcher())
    }

    /// Professor list for `department` (all professors when `None`),
    /// starting a fetch if needed.
    pub fn professors(&self, department: Option<&str>) -> QueryState<Vec<Professor>> {
        let key: CatalogKey = professors_key(department);
        self.professors.request(&key, self.professors_fetcher(&key))
    }

    /// Course list for `professor_id` (all courses when `None`), starting a
    /// fetch if needed.
    pub fn courses(&self, professor_id: Option<ProfessorId>) -> QueryState<Vec<Course>> {
        let key: CatalogKey = CatalogKey::Courses { professor_id };
        self.courses.request(&key, self.courses_fetcher(professor_id))
    }

    /// Resolves the department list.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the list failed to load.
    pub async fn fetch_departments(&self) -> Result<Arc<Vec<Department>>, FetchError> {
        self.departments
            .fetch(&CatalogKey::Departments, self.departments_fetcher())
            .await
    }

    /// Resolves the professor list for `department`.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the list failed to load.
    pub async fn fetch_professors(
        &self,
        department: Option<&str>,
    ) -> Result<Arc<Vec<Professor>>, FetchError> {
        let key: CatalogKey = professors_key(department);
        let fetcher = self.professors_fetcher(&key);
        self.professors.fetch(&key, fetcher).await
    }

    /// Resolves the course list for `professor_id`.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the list failed to load.
    pub async fn fetch_courses(
        &self,
        professor_id: Option<ProfessorId>,
    ) -> Result<Arc<Vec<Course>>, FetchError> {
        let key: CatalogKey = CatalogKey::Courses { professor_id };
        self.courses
            .fetch(&key, self.courses_fetcher(professor_id))
            .await
    }

    /// Re-issues the fetch for one list, superseding a fetch that is
    /// still in flight.
    pub fn retry(&self, key: &CatalogKey) {
        debug!(%key, "Catalog retry requested");
        match key {
            CatalogKey::Departments => {
                self.departments.refetch(key, self.departments_fetcher());
            }
            CatalogKey::Professors { .. } => {
                self.professors.refetch(key, self.professors_fetcher(key));
            }
            CatalogKey::Courses { professor_id } => {
                self.courses.refetch(key, self.courses_fetcher(*professor_id));
            }
        }
    }

    /// Department list state without starting a fetch.
    #[must_use]
    pub fn peek_departments(&self) -> QueryState<Vec<Department>> {
        self.departments.peek(&CatalogKey::Departments)
    }

    /// Professor list state without starting a fetch.
    #[must_use]
    pub fn peek_professors(&self, department: Option<&str>) -> QueryState<Vec<Professor>> {
        self.professors.peek(&professors_key(department))
    }

    /// Course list state without starting a fetch.
    #[must_use]
    pub fn peek_courses(&self, professor_id: Option<ProfessorId>) -> QueryState<Vec<Course>> {
        self.courses.peek(&CatalogKey::Courses { professor_id })
    }

    fn departments_fetcher(&self) -> Fetcher<Vec<Department>> {
        let source: Arc<dyn CatalogSource> = Arc::clone(&self.source);
        Box::new(move || {
            async move {
                let departments: Vec<Department> = source.list_departments().await?;
                validate_unique_departments(&departments)?;
                Ok(departments)
            }
            .boxed()
        })
    }

    fn professors_fetcher(&self, key: &CatalogKey) -> Fetcher<Vec<Professor>> {
        let source: Arc<dyn CatalogSource> = Arc::clone(&self.source);
        let department: Option<String> = match key {
            CatalogKey::Professors { department } => department.clone(),
            CatalogKey::Departments | CatalogKey::Courses { .. } => None,
        };
        Box::new(move || {
            async move {
                let mut professors: Vec<Professor> =
                    source.list_professors(department.as_deref()).await?;
                sort_by_name(&mut professors);
                Ok(professors)
            }
            .boxed()
        })
    }

    fn courses_fetcher(&self, professor_id: Option<ProfessorId>) -> Fetcher<Vec<Course>> {
        let source: Arc<dyn CatalogSource> = Arc::clone(&self.source);
        Box::new(move || {
            async move {
                let mut courses: Vec<Course> = source.list_courses(professor_id).await?;
                sort_by_name(&mut courses);
                Ok(courses)
            }
            .boxed()
        })
    }
}

/// Builds the professors key; a blank department means no filter.
fn professors_key(department: Option<&str>) -> CatalogKey {
    CatalogKey::Professors {
        department: department
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string),
    }
}
