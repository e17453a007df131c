// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::query::MetricsScope;
use senti_dash_domain::{CatalogKey, CourseId, ProfessorId, ScopeKind};
use serde::Serialize;

/// The filter panel selection.
///
/// `kind` decides which field is authoritative for the emitted query. The
/// other fields may still be set as narrowing context for the choice lists:
/// a department narrows the professor list, a professor narrows the course
/// list.
///
/// Fields can only be changed through [`crate::apply`], which enforces the
/// cascading resets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SelectionState {
    kind: ScopeKind,
    department: Option<String>,
    professor_id: Option<ProfessorId>,
    course_id: Option<CourseId>,
}

impl SelectionState {
    /// Creates the initial selection: no kind, nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kind: ScopeKind::None,
            department: None,
            professor_id: None,
            course_id: None,
        }
    }

    /// The selected scope kind.
    #[must_use]
    pub const fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// The selected department, if any.
    #[must_use]
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// The selected professor, if any.
    #[must_use]
    pub const fn professor_id(&self) -> Option<ProfessorId> {
        self.professor_id
    }

    /// The selected course, if any.
    #[must_use]
    pub const fn course_id(&self) -> Option<CourseId> {
        self.course_id
    }

    /// Whether this is the initial selection.
    #[must_use]
    pub fn is_initial(&self) -> bool {
        *self == Self::new()
    }

    /// Whether the field required by `kind` is set.
    ///
    /// `ScopeKind::None` is never complete.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        match self.kind {
            ScopeKind::None => false,
            ScopeKind::Department => self.department.is_some(),
            ScopeKind::Professor => self.professor_id.is_some(),
            ScopeKind::Course => self.course_id.is_some(),
        }
    }

    /// The scope [`crate::emit`] would produce for this selection.
    #[must_use]
    pub fn pending_scope(&self) -> MetricsScope {
        crate::query::emit(self)
    }

    /// The department filter for the professor list.
    ///
    /// Only meaningful while the professor list is shown.
    #[must_use]
    pub fn professor_filter(&self) -> Option<&str> {
        match self.kind {
            ScopeKind::Professor | ScopeKind::Course => self.department(),
            ScopeKind::None | ScopeKind::Department => None,
        }
    }

    /// The professor filter for the course list.
    #[must_use]
    pub const fn course_filter(&self) -> Option<ProfessorId> {
        match self.kind {
            ScopeKind::Course => self.professor_id,
            ScopeKind::None | ScopeKind::Department | ScopeKind::Professor => None,
        }
    }

    /// The catalog lists the filter panel shows for the current kind, keyed
    /// by the filters currently in effect.
    #[must_use]
    pub fn catalog_needs(&self) -> Vec<CatalogKey> {
        let professors = || CatalogKey::Professors {
            department: self.professor_filter().map(str::to_string),
        };
        match self.kind {
            ScopeKind::None => Vec::new(),
            ScopeKind::Department => vec![CatalogKey::Departments],
            ScopeKind::Professor => vec![CatalogKey::Departments, professors()],
            ScopeKind::Course => vec![
                CatalogKey::Departments,
                professors(),
                CatalogKey::Courses {
                    professor_id: self.course_filter(),
                },
            ],
        }
    }

    pub(crate) fn set_kind(&mut self, kind: ScopeKind) {
        self.kind = kind;
        self.department = None;
        self.professor_id = None;
        self.course_id = None;
    }

    pub(crate) fn set_department(&mut self, department: Option<String>) {
        self.department = department;
        self.professor_id = None;
        self.course_id = None;
    }

    pub(crate) const fn set_professor(&mut self, professor_id: Option<ProfessorId>) {
        self.professor_id = professor_id;
        self.course_id = None;
    }

    pub(crate) const fn set_course(&mut self, course_id: Option<CourseId>) {
        self.course_id = course_id;
    }
}

/// The result of applying a command.
///
/// Transitions are total: every command produces a new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new selection.
    pub new_state: SelectionState,
    /// The metrics scope to hand to the metrics collaborator, for `Apply` and
    /// `Reset` only.
    pub emitted: Option<MetricsScope>,
}
