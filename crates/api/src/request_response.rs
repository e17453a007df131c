// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use crate::controller::{DashboardController, DashboardStatus, DashboardView, SelectionIssue};
use crate::error::{ApiError, translate_domain_error};
use senti_dash::MetricsScope;
use senti_dash_catalog::QueryState;
use senti_dash_domain::{
    CatalogKey, CategoryDistribution, CourseId, DashboardMetrics, KpiSummary, ProfessorId,
    ScopeKind,
};
use serde::{Deserialize, Serialize};

/// API request to choose the filter type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetKindRequest {
    /// `department`, `professor`, `course`, or `none`/empty for no filter.
    pub kind: String,
}

impl SetKindRequest {
    /// Parses the requested kind.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for an unknown kind.
    pub fn kind(&self) -> Result<ScopeKind, ApiError> {
        self.kind.parse().map_err(translate_domain_error)
    }
}

/// API request to choose or clear the department.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetDepartmentRequest {
    /// The department name; absent or blank clears it.
    #[serde(default)]
    pub department: Option<String>,
}

/// API request to choose or clear the professor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetProfessorRequest {
    /// The professor id; absent clears it.
    #[serde(default)]
    pub professor_id: Option<ProfessorId>,
}

/// API request to choose or clear the course.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetCourseRequest {
    /// The course id; absent clears it.
    #[serde(default)]
    pub course_id: Option<CourseId>,
}

/// API response describing a controller's selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResponse {
    /// The chosen filter type.
    pub kind: ScopeKind,
    /// The selected department, if any.
    pub department: Option<String>,
    /// The selected professor, if any.
    pub professor_id: Option<ProfessorId>,
    /// The selected course, if any.
    pub course_id: Option<CourseId>,
    /// Whether applying now would filter the dashboard.
    pub complete: bool,
    /// The scope `apply` would send.
    pub pending_scope: MetricsScope,
    /// The scope of the dashboard currently shown.
    pub applied_scope: MetricsScope,
    /// Whether the dashboard currently shows filtered metrics.
    pub filter_active: bool,
    /// Selected values missing from loaded option lists.
    #[serde(default)]
    pub issues: Vec<String>,
}

impl SelectionResponse {
    /// Builds the response from a controller.
    #[must_use]
    pub fn from_controller(controller: &DashboardController) -> Self {
        let selection = controller.selection();
        Self {
            kind: selection.kind(),
            department: selection.department().map(str::to_string),
            professor_id: selection.professor_id(),
            course_id: selection.course_id(),
            complete: selection.is_complete(),
            pending_scope: selection.pending_scope(),
            applied_scope: controller.applied_scope().clone(),
            filter_active: controller.is_filter_active(),
            issues: controller
                .selection_issues()
                .iter()
                .map(SelectionIssue::to_string)
                .collect(),
        }
    }
}

/// One catalog list as the rendering layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ListView<T> {
    /// The list is loading.
    Loading,
    /// The list failed to load; offer a retry.
    Failed {
        /// What went wrong.
        error: String,
        /// Whether a retry is likely to help.
        retryable: bool,
    },
    /// The list is available.
    Ready {
        /// The options, in display order.
        items: Vec<T>,
        /// A background revalidation is in flight.
        refreshing: bool,
    },
}

impl<T: Clone> From<QueryState<Vec<T>>> for ListView<T> {
    fn from(state: QueryState<Vec<T>>) -> Self {
        match state {
            QueryState::Idle | QueryState::Loading => Self::Loading,
            QueryState::Failed(err) => Self::Failed {
                error: err.to_string(),
                retryable: err.is_retryable(),
            },
            QueryState::Ready {
                data, refreshing, ..
            } => Self::Ready {
                items: data.as_ref().clone(),
                refreshing,
            },
        }
    }
}

/// API response for one catalog list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogListResponse<T> {
    /// The cache key the list was read from.
    pub key: CatalogKey,
    /// The list state.
    pub list: ListView<T>,
}

/// A category breakdown in rendering order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    /// The category key, e.g. `calidad_didactica`.
    pub name: String,
    /// The counts.
    #[serde(flatten)]
    pub distribution: CategoryDistribution,
    /// Share of positive comments among analyzed ones.
    pub positive_share: Option<f64>,
}

/// What the dashboard area renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DashboardStatusView {
    /// Metrics are loading.
    Loading,
    /// The metrics request failed.
    Failed {
        /// Banner text.
        message: String,
    },
    /// The scope has no comments.
    NoData,
    /// Metrics are available.
    Ready {
        /// Headline numbers.
        kpis: KpiSummary,
        /// Category breakdowns in rendering order.
        categories: Vec<CategoryView>,
        /// The full payload.
        metrics: DashboardMetrics,
        /// A background revalidation is in flight.
        refreshing: bool,
    },
}

/// API response for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardResponse {
    /// The scope the metrics belong to.
    pub scope: MetricsScope,
    /// Whether a filter is in effect.
    pub filter_active: bool,
    /// What to render.
    pub dashboard: DashboardStatusView,
}

impl From<DashboardView> for DashboardResponse {
    fn from(view: DashboardView) -> Self {
        let dashboard: DashboardStatusView = match view.status {
            DashboardStatus::Loading => DashboardStatusView::Loading,
            DashboardStatus::Failed { message } => DashboardStatusView::Failed { message },
            DashboardStatus::NoData => DashboardStatusView::NoData,
            DashboardStatus::Ready {
                metrics,
                kpis,
                refreshing,
            } => DashboardStatusView::Ready {
                kpis,
                categories: metrics
                    .ordered_categories()
                    .into_iter()
                    .map(|(name, distribution)| CategoryView {
                        name: name.to_string(),
                        distribution: *distribution,
                        positive_share: distribution.share(senti_dash_domain::POSITIVE),
                    })
                    .collect(),
                metrics: metrics.as_ref().clone(),
                refreshing,
            },
        };
        Self {
            scope: view.scope,
            filter_active: view.filter_active,
            dashboard,
        }
    }
}

/// API response for `apply` and `reset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResponse {
    /// The scope now applied.
    pub scope: MetricsScope,
    /// Whether a filter is in effect.
    pub filter_active: bool,
}
