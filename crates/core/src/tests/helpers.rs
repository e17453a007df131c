// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, SelectionState, apply};
use senti_dash_domain::{CourseId, ProfessorId, ScopeKind};

pub fn set_kind(kind: ScopeKind) -> Command {
    Command::SetKind { kind }
}

pub fn set_department(name: &str) -> Command {
    Command::SetDepartment {
        department: Some(String::from(name)),
    }
}

pub fn set_professor(id: u32) -> Command {
    Command::SetProfessor {
        professor_id: Some(ProfessorId::new(id)),
    }
}

pub fn set_course(id: u32) -> Command {
    Command::SetCourse {
        course_id: Some(CourseId::new(id)),
    }
}

/// Applies commands in order, discarding emissions.
pub fn apply_all(commands: Vec<Command>) -> SelectionState {
    commands
        .into_iter()
        .fold(SelectionState::new(), |state, command| {
            apply(&state, command).new_state
        })
}
