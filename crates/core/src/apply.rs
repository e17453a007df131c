// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::query::{MetricsScope, emit};
use crate::state::{SelectionState, TransitionResult};

/// Applies a command to the current selection, producing a new selection.
///
/// Values are admitted as given: whether an id exists in the catalog is a
/// display concern, not a transition error.
///
/// # Arguments
///
/// * `state` - The current selection (immutable)
/// * `command` - The user action to apply
///
/// # Returns
///
/// The new selection, plus the emitted metrics scope for `Apply` and `Reset`.
#[must_use]
pub fn apply(state: &SelectionState, command: Command) -> TransitionResult {
    let mut new_state: SelectionState = state.clone();
    let mut emitted: Option<MetricsScope> = None;

    match command {
        Command::SetKind { kind } => new_state.set_kind(kind),
        Command::SetDepartment { department } => {
            // A blank name is the "any department" choice
            let department: Option<String> = department.filter(|d| !d.trim().is_empty());
            new_state.set_department(department);
        }
        Command::SetProfessor { professor_id } => new_state.set_professor(professor_id),
        Command::SetCourse { course_id } => new_state.set_course(course_id),
        Command::Apply => emitted = Some(emit(&new_state)),
        Command::Reset => {
            new_state = SelectionState::new();
            emitted = Some(MetricsScope::Unscoped);
        }
    }

    TransitionResult { new_state, emitted }
}
