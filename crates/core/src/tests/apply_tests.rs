// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{apply_all, set_course, set_department, set_kind, set_professor};
use crate::{Command, MetricsScope, ScopeQuery, SelectionState, TransitionResult, apply};
use senti_dash_domain::{CourseId, ProfessorId, Scope, ScopeKind};

#[test]
fn test_initial_state_is_empty() {
    let state: SelectionState = SelectionState::new();
    assert_eq!(state.kind(), ScopeKind::None);
    assert_eq!(state.department(), None);
    assert_eq!(state.professor_id(), None);
    assert_eq!(state.course_id(), None);
    assert!(state.is_initial());
    assert_eq!(state, SelectionState::default());
}

#[test]
fn test_set_kind_clears_every_field() {
    let state: SelectionState = apply_all(vec![
        set_kind(ScopeKind::Course),
        set_department("Física"),
        set_professor(7),
        set_course(12),
    ]);
    assert_eq!(state.course_id(), Some(CourseId::new(12)));

    let result: TransitionResult = apply(&state, set_kind(ScopeKind::Professor));

    assert_eq!(result.new_state.kind(), ScopeKind::Professor);
    assert_eq!(result.new_state.department(), None);
    assert_eq!(result.new_state.professor_id(), None);
    assert_eq!(result.new_state.course_id(), None);
    assert_eq!(result.emitted, None);
}

#[test]
fn test_set_same_kind_still_clears() {
    let state: SelectionState =
        apply_all(vec![set_kind(ScopeKind::Department), set_department("Física")]);

    let result: TransitionResult = apply(&state, set_kind(ScopeKind::Department));

    assert_eq!(result.new_state.kind(), ScopeKind::Department);
    assert_eq!(result.new_state.department(), None);
}

#[test]
fn test_set_department_clears_professor_and_course() {
    let state: SelectionState = apply_all(vec![
        set_kind(ScopeKind::Course),
        set_department("Física"),
        set_professor(7),
        set_course(12),
    ]);

    let result: TransitionResult = apply(&state, set_department("Química"));

    assert_eq!(result.new_state.kind(), ScopeKind::Course);
    assert_eq!(result.new_state.department(), Some("Química"));
    assert_eq!(result.new_state.professor_id(), None);
    assert_eq!(result.new_state.course_id(), None);
}

#[test]
fn test_blank_department_is_normalized_to_none() {
    let state: SelectionState =
        apply_all(vec![set_kind(ScopeKind::Department), set_department("Física")]);

    let result: TransitionResult = apply(
        &state,
        Command::SetDepartment {
            department: Some(String::from("   ")),
        },
    );

    assert_eq!(result.new_state.department(), None);
}

#[test]
fn test_department_name_kept_verbatim() {
    let state: SelectionState =
        apply_all(vec![set_kind(ScopeKind::Department), set_department(" Física")]);
    assert_eq!(state.department(), Some(" Física"));
}

#[test]
fn test_set_professor_clears_course_but_keeps_department() {
    let state: SelectionState = apply_all(vec![
        set_kind(ScopeKind::Course),
        set_department("Física"),
        set_professor(7),
        set_course(12),
    ]);

    let result: TransitionResult = apply(&state, set_professor(8));

    assert_eq!(result.new_state.department(), Some("Física"));
    assert_eq!(result.new_state.professor_id(), Some(ProfessorId::new(8)));
    assert_eq!(result.new_state.course_id(), None);
}

#[test]
fn test_clearing_professor_clears_course() {
    let state: SelectionState = apply_all(vec![
        set_kind(ScopeKind::Course),
        set_professor(7),
        set_course(12),
    ]);

    let result: TransitionResult = apply(&state, Command::SetProfessor { professor_id: None });

    assert_eq!(result.new_state.professor_id(), None);
    assert_eq!(result.new_state.course_id(), None);
}

#[test]
fn test_set_course_touches_only_course() {
    let state: SelectionState = apply_all(vec![
        set_kind(ScopeKind::Course),
        set_department("Física"),
        set_professor(7),
    ]);

    let result: TransitionResult = apply(&state, set_course(12));

    assert_eq!(result.new_state.department(), Some("Física"));
    assert_eq!(result.new_state.professor_id(), Some(ProfessorId::new(7)));
    assert_eq!(result.new_state.course_id(), Some(CourseId::new(12)));
}

#[test]
fn test_mutators_do_not_emit() {
    let state: SelectionState = SelectionState::new();
    for command in [
        set_kind(ScopeKind::Course),
        set_department("Física"),
        set_professor(7),
        set_course(12),
    ] {
        assert_eq!(apply(&state, command).emitted, None);
    }
}

#[test]
fn test_apply_emits_without_changing_state() {
    let state: SelectionState =
        apply_all(vec![set_kind(ScopeKind::Professor), set_professor(42)]);

    let result: TransitionResult = apply(&state, Command::Apply);

    assert_eq!(result.new_state, state);
    assert_eq!(
        result.emitted,
        Some(MetricsScope::Scoped(ScopeQuery::new(Scope::Professor, "42")))
    );
}

#[test]
fn test_apply_incomplete_selection_emits_unscoped() {
    let state: SelectionState = apply_all(vec![set_kind(ScopeKind::Course), set_professor(3)]);

    let result: TransitionResult = apply(&state, Command::Apply);

    assert_eq!(result.emitted, Some(MetricsScope::Unscoped));
}

#[test]
fn test_reset_returns_initial_state_and_emits_unscoped() {
    let state: SelectionState = apply_all(vec![
        set_kind(ScopeKind::Course),
        set_department("Física"),
        set_professor(7),
        set_course(12),
    ]);

    let result: TransitionResult = apply(&state, Command::Reset);

    assert!(result.new_state.is_initial());
    assert_eq!(result.emitted, Some(MetricsScope::Unscoped));
}

#[test]
fn test_reset_from_initial_state() {
    let result: TransitionResult = apply(&SelectionState::new(), Command::Reset);
    assert!(result.new_state.is_initial());
    assert_eq!(result.emitted, Some(MetricsScope::Unscoped));
}

#[test]
fn test_end_to_end_professor_selection() {
    let mut state: SelectionState = SelectionState::new();

    state = apply(&state, set_kind(ScopeKind::Professor)).new_state;
    assert_eq!(state.kind(), ScopeKind::Professor);
    assert_eq!(state.department(), None);
    assert_eq!(state.professor_id(), None);

    state = apply(&state, set_department("Economía")).new_state;
    assert_eq!(state.professor_filter(), Some("Economía"));

    state = apply(&state, set_professor(42)).new_state;
    assert_eq!(state.department(), Some("Economía"));
    assert_eq!(state.professor_id(), Some(ProfessorId::new(42)));
    assert_eq!(state.course_id(), None);

    let result: TransitionResult = apply(&state, Command::Apply);
    assert_eq!(
        result.emitted,
        Some(MetricsScope::Scoped(ScopeQuery::new(Scope::Professor, "42")))
    );
}

#[test]
fn test_command_names() {
    assert_eq!(Command::Apply.name(), "Apply");
    assert_eq!(set_kind(ScopeKind::None).name(), "SetKind");
    assert_eq!(Command::Reset.name(), "Reset");
}
