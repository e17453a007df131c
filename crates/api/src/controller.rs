// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The per-view dashboard controller.
//!
//! A controller owns one [`SelectionState`] and shares the catalog and
//! metrics caches with every other controller. Selection changes go through
//! [`senti_dash::apply`]; when a change makes a new catalog list necessary
//! the controller requests it right away so the options are loading by the
//! time they are rendered. Metrics are only requested on `apply` and
//! `reset`.

use crate::error::{ApiError, translate_fetch_error};
use crate::metrics::MetricsCache;
use senti_dash::{Command, MetricsScope, SelectionState, TransitionResult, apply};
use senti_dash_catalog::{CacheEvent, CatalogCache, FetchError, QueryState};
use senti_dash_domain::{
    CatalogKey, CatalogList, Course, CourseId, DashboardMetrics, Department, KpiSummary,
    Professor, ProfessorId, ScopeKind,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// A cache notification a controller may care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// A catalog list changed state.
    Catalog(CacheEvent<CatalogKey>),
    /// A metrics payload changed state.
    Metrics(CacheEvent<MetricsScope>),
}

/// What the dashboard area shows.
#[derive(Debug, Clone)]
pub enum DashboardStatus {
    /// Metrics for the applied scope are loading.
    Loading,
    /// The metrics request failed.
    Failed {
        /// Banner text, including a hint to check the backend.
        message: String,
    },
    /// The scope has no comments.
    NoData,
    /// Metrics are available.
    Ready {
        /// The full payload.
        metrics: Arc<DashboardMetrics>,
        /// The headline numbers.
        kpis: KpiSummary,
        /// A background revalidation is in flight.
        refreshing: bool,
    },
}

/// The dashboard for the applied scope.
#[derive(Debug, Clone)]
pub struct DashboardView {
    /// The scope the metrics were requested for.
    pub scope: MetricsScope,
    /// Whether a filter is in effect.
    pub filter_active: bool,
    /// What to render.
    pub status: DashboardStatus,
}

/// A selected value that a loaded catalog list no longer contains.
///
/// The selection is left as is; this is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum SelectionIssue {
    /// The selected department is not in the department list.
    Department {
        /// The selected name.
        name: String,
    },
    /// The selected professor is not in the professor list.
    Professor {
        /// The selected id.
        id: ProfessorId,
    },
    /// The selected course is not in the course list.
    Course {
        /// The selected id.
        id: CourseId,
    },
}

impl std::fmt::Display for SelectionIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Department { name } => {
                write!(f, "Selected department '{name}' was not found")
            }
            Self::Professor { id } => write!(f, "Selected professor {id} was not found"),
            Self::Course { id } => write!(f, "Selected course {id} was not found"),
        }
    }
}

/// Controls one dashboard view.
pub struct DashboardController {
    selection: SelectionState,
    applied: MetricsScope,
    catalog: Arc<CatalogCache>,
    metrics: Arc<MetricsCache>,
}

impl DashboardController {
    /// Creates a controller with the initial selection and the unscoped
    /// dashboard applied.
    #[must_use]
    pub fn new(catalog: Arc<CatalogCache>, metrics: Arc<MetricsCache>) -> Self {
        Self {
            selection: SelectionState::new(),
            applied: MetricsScope::Unscoped,
            catalog,
            metrics,
        }
    }

    /// The current selection.
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// The scope of the dashboard currently shown.
    #[must_use]
    pub const fn applied_scope(&self) -> &MetricsScope {
        &self.applied
    }

    /// Whether the dashboard currently shows filtered metrics.
    #[must_use]
    pub const fn is_filter_active(&self) -> bool {
        self.applied.is_scoped()
    }

    /// Chooses the filter type.
    pub fn set_kind(&mut self, kind: ScopeKind) {
        self.dispatch(Command::SetKind { kind });
    }

    /// Chooses a department, or clears it with `None`.
    pub fn set_department(&mut self, department: Option<String>) {
        self.dispatch(Command::SetDepartment { department });
    }

    /// Chooses a professor, or clears it with `None`.
    pub fn set_professor(&mut self, professor_id: Option<ProfessorId>) {
        self.dispatch(Command::SetProfessor { professor_id });
    }

    /// Chooses a course, or clears it with `None`.
    pub fn set_course(&mut self, course_id: Option<CourseId>) {
        self.dispatch(Command::SetCourse { course_id });
    }

    /// Confirms the selection and requests the metrics for it.
    ///
    /// Cached metrics for the scope are reused; a failed fetch is retried.
    ///
    /// Returns the applied scope.
    pub fn apply(&mut self) -> MetricsScope {
        self.dispatch(Command::Apply);
        self.applied.clone()
    }

    /// Returns to the initial selection and requests the unscoped metrics.
    ///
    /// Returns the applied scope, which is always `MetricsScope::Unscoped`.
    pub fn reset(&mut self) -> MetricsScope {
        self.dispatch(Command::Reset);
        self.applied.clone()
    }

    /// Department choices.
    pub fn department_options(&self) -> QueryState<Vec<Department>> {
        self.catalog.departments()
    }

    /// Professor choices, narrowed by the selected department when the
    /// filter type uses one.
    pub fn professor_options(&self) -> QueryState<Vec<Professor>> {
        self.catalog.professors(self.selection.professor_filter())
    }

    /// Course choices, narrowed by the selected professor when the filter
    /// type is course.
    pub fn course_options(&self) -> QueryState<Vec<Course>> {
        self.catalog.courses(self.selection.course_filter())
    }

    /// The cache key `list` is read from under the current selection.
    #[must_use]
    pub fn catalog_key(&self, list: CatalogList) -> CatalogKey {
        match list {
            CatalogList::Departments => CatalogKey::Departments,
            CatalogList::Professors => CatalogKey::Professors {
                department: self.selection.professor_filter().map(str::to_string),
            },
            CatalogList::Courses => CatalogKey::Courses {
                professor_id: self.selection.course_filter(),
            },
        }
    }

    /// Re-issues the fetch for one option list.
    pub fn retry_list(&self, list: CatalogList) {
        let key: CatalogKey = self.catalog_key(list);
        info!(%key, "Retrying catalog list");
        self.catalog.retry(&key);
    }

    /// Re-issues the metrics fetch for the applied scope.
    pub fn retry_metrics(&self) -> DashboardView {
        info!(scope = %self.applied, "Retrying metrics");
        let state: QueryState<DashboardMetrics> = self.metrics.retry(&self.applied);
        self.view(state)
    }

    /// The dashboard for the applied scope, starting a fetch if needed.
    pub fn dashboard(&self) -> DashboardView {
        self.view(self.metrics.request(&self.applied))
    }

    /// Waits for the metrics of the applied scope, then returns the
    /// dashboard.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BackendUnavailable` if the metrics failed to load.
    /// The failure is also recorded, so [`Self::dashboard`] shows it.
    pub async fn load_dashboard(&self) -> Result<DashboardView, ApiError> {
        if let Err(e) = self.metrics.fetch(&self.applied).await {
            debug!(scope = %self.applied, error = %e, "Metrics unavailable");
            return Err(translate_fetch_error(e));
        }
        Ok(self.view(self.metrics.peek(&self.applied)))
    }

    /// Waits until the option list `list` has settled under the current
    /// selection.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BackendUnavailable` if the list failed to load.
    pub async fn load_options(&self, list: CatalogList) -> Result<(), ApiError> {
        let result: Result<(), FetchError> = match list {
            CatalogList::Departments => self.catalog.fetch_departments().await.map(drop),
            CatalogList::Professors => self
                .catalog
                .fetch_professors(self.selection.professor_filter())
                .await
                .map(drop),
            CatalogList::Courses => self
                .catalog
                .fetch_courses(self.selection.course_filter())
                .await
                .map(drop),
        };
        result.map_err(|e| {
            debug!(key = %self.catalog_key(list), error = %e, "Option list unavailable");
            translate_fetch_error(e)
        })
    }

    /// Selected values missing from their loaded option lists.
    ///
    /// Lists that are not loaded yet are not checked, and nothing is
    /// fetched.
    #[must_use]
    pub fn selection_issues(&self) -> Vec<SelectionIssue> {
        let mut issues: Vec<SelectionIssue> = Vec::new();
        let kind: ScopeKind = self.selection.kind();

        if kind != ScopeKind::None
            && let Some(name) = self.selection.department()
            && let Some(departments) = self.catalog.peek_departments().data()
            && !departments.iter().any(|d| d.name == name)
        {
            issues.push(SelectionIssue::Department {
                name: name.to_string(),
            });
        }

        if matches!(kind, ScopeKind::Professor | ScopeKind::Course)
            && let Some(id) = self.selection.professor_id()
            && let Some(professors) = self
                .catalog
                .peek_professors(self.selection.professor_filter())
                .data()
            && !professors.iter().any(|p| p.id == id)
        {
            issues.push(SelectionIssue::Professor { id });
        }

        if kind == ScopeKind::Course
            && let Some(id) = self.selection.course_id()
            && let Some(courses) = self
                .catalog
                .peek_courses(self.selection.course_filter())
                .data()
            && !courses.iter().any(|c| c.id == id)
        {
            issues.push(SelectionIssue::Course { id });
        }

        issues
    }

    /// Whether `event` concerns a list or scope this view currently reads.
    ///
    /// Events for keys the selection has moved away from are noise for this
    /// view.
    #[must_use]
    pub fn is_relevant(&self, event: &DashboardEvent) -> bool {
        match event {
            DashboardEvent::Catalog(event) => {
                self.selection.catalog_needs().contains(event.key())
            }
            DashboardEvent::Metrics(event) => *event.key() == self.applied,
        }
    }

    fn dispatch(&mut self, command: Command) {
        let name: &'static str = command.name();
        let result: TransitionResult = apply(&self.selection, command);
        self.selection = result.new_state;
        debug!(
            command = name,
            kind = %self.selection.kind(),
            department = ?self.selection.department(),
            professor = ?self.selection.professor_id(),
            course = ?self.selection.course_id(),
            "Selection updated"
        );

        if let Some(scope) = result.emitted {
            info!(%scope, "Applying metrics scope");
            self.applied = scope;
            self.metrics.reload(&self.applied);
        } else {
            self.prefetch();
        }
    }

    /// Starts loading every list the selection needs.
    fn prefetch(&self) {
        for key in self.selection.catalog_needs() {
            match key {
                CatalogKey::Departments => {
                    self.catalog.departments();
                }
                CatalogKey::Professors { department } => {
                    self.catalog.professors(department.as_deref());
                }
                CatalogKey::Courses { professor_id } => {
                    self.catalog.courses(professor_id);
                }
            }
        }
    }

    fn view(&self, state: QueryState<DashboardMetrics>) -> DashboardView {
        let status: DashboardStatus = match state {
            QueryState::Idle | QueryState::Loading => DashboardStatus::Loading,
            QueryState::Failed(err) => DashboardStatus::Failed {
                message: format!(
                    "Error loading dashboard data: {err}. Please make sure the API is running."
                ),
            },
            QueryState::Ready { data, .. } if data.is_empty() => DashboardStatus::NoData,
            QueryState::Ready {
                data, refreshing, ..
            } => DashboardStatus::Ready {
                kpis: KpiSummary::from_metrics(&data),
                metrics: data,
                refreshing,
            },
        };
        DashboardView {
            scope: self.applied.clone(),
            filter_active: self.is_filter_active(),
            status,
        }
    }
}
