// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::SelectionState;
use senti_dash_domain::{Scope, ScopeKind};
use serde::{Deserialize, Serialize};

/// A finalized `{scope, value}` pair for the metrics collaborator.
///
/// `value` is the department name, or the professor/course id as a decimal
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeQuery {
    /// The scope dimension.
    pub scope: Scope,
    /// The identifying value within that dimension.
    pub value: String,
}

impl ScopeQuery {
    /// Creates a new scope query.
    #[must_use]
    pub fn new(scope: Scope, value: impl Into<String>) -> Self {
        Self {
            scope,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for ScopeQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.scope, self.value)
    }
}

/// Which metrics the dashboard shows: everything, or one scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsScope {
    /// Global, unfiltered metrics.
    #[default]
    Unscoped,
    /// Metrics for a single department, professor or course.
    Scoped(ScopeQuery),
}

impl MetricsScope {
    /// Returns the scope query, if any.
    #[must_use]
    pub const fn query(&self) -> Option<&ScopeQuery> {
        match self {
            Self::Unscoped => None,
            Self::Scoped(query) => Some(query),
        }
    }

    /// Whether a filter is in effect.
    #[must_use]
    pub const fn is_scoped(&self) -> bool {
        matches!(self, Self::Scoped(_))
    }

    /// The `scope`/`value` query-string pairs for this scope; empty when
    /// unscoped.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Unscoped => Vec::new(),
            Self::Scoped(query) => vec![
                ("scope", query.scope.as_str().to_string()),
                ("value", query.value.clone()),
            ],
        }
    }
}

impl std::fmt::Display for MetricsScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unscoped => write!(f, "all"),
            Self::Scoped(query) => write!(f, "{query}"),
        }
    }
}

/// Derives the metrics scope for a selection.
///
/// A selection emits a scope only when the field its kind requires is set;
/// anything else (including `ScopeKind::None`) emits `Unscoped`. Narrowing
/// fields never appear in the result.
#[must_use]
pub fn emit(state: &SelectionState) -> MetricsScope {
    let query: Option<ScopeQuery> = match state.kind() {
        ScopeKind::None => None,
        ScopeKind::Department => state
            .department()
            .map(|name| ScopeQuery::new(Scope::Department, name)),
        ScopeKind::Professor => state
            .professor_id()
            .map(|id| ScopeQuery::new(Scope::Professor, id.to_string())),
        ScopeKind::Course => state
            .course_id()
            .map(|id| ScopeQuery::new(Scope::Course, id.to_string())),
    };
    query.map_or(MetricsScope::Unscoped, MetricsScope::Scoped)
}
