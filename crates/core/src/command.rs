// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use senti_dash_domain::{CourseId, ProfessorId, ScopeKind};

/// A command represents a user action on the filter panel as data only.
///
/// Commands are the only way to change a `SelectionState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Choose the filter type. Clears every selected value.
    SetKind {
        /// The new scope kind.
        kind: ScopeKind,
    },
    /// Choose a department (or clear it). Clears professor and course.
    SetDepartment {
        /// Department name, `None` for "any department".
        department: Option<String>,
    },
    /// Choose a professor (or clear it). Clears the course.
    SetProfessor {
        /// Professor id, `None` for "any professor".
        professor_id: Option<ProfessorId>,
    },
    /// Choose a course (or clear it).
    SetCourse {
        /// Course id, `None` for "no course".
        course_id: Option<CourseId>,
    },
    /// Confirm the current selection and emit its metrics scope.
    Apply,
    /// Return to the initial selection and emit the unscoped metrics scope.
    Reset,
}

impl Command {
    /// A short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetKind { .. } => "SetKind",
            Self::SetDepartment { .. } => "SetDepartment",
            Self::SetProfessor { .. } => "SetProfessor",
            Self::SetCourse { .. } => "SetCourse",
            Self::Apply => "Apply",
            Self::Reset => "Reset",
        }
    }
}
