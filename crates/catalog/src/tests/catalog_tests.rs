// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    StubCatalog, catalog_with, names, professors_key, settled, unavailable,
};
use crate::{CacheEvent, CatalogCache, FetchError, QueryState};
use senti_dash_domain::{
    CatalogKey, Course, Department, DomainError, Professor, ProfessorId,
};
use std::sync::Arc;

fn math_professors() -> Vec<Professor> {
    vec![
        Professor::new(4, "Ortiz", "Math"),
        Professor::new(1, "Ñandú", "Math"),
        Professor::new(2, "Álvarez", "Math"),
        Professor::new(3, "Nieto", "Math"),
    ]
}

#[tokio::test]
async fn test_concurrent_requests_share_one_fetch() {
    let stub: Arc<StubCatalog> = Arc::new(StubCatalog::default());
    stub.set_professors(Some("Math"), Ok(math_professors()));
    let release = stub.gate(professors_key("Math"));
    let cache: CatalogCache = catalog_with(&stub);

    let (first, second, ()) = tokio::join!(
        cache.fetch_professors(Some("Math")),
        cache.fetch_professors(Some("Math")),
        async {
            release.send(()).unwrap();
        }
    );

    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(stub.calls_for(&professors_key("Math")), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_request_reports_loading_until_resolved() {
    let stub: Arc<StubCatalog> = Arc::new(StubCatalog::default());
    stub.set_professors(Some("Math"), Ok(math_professors()));
    let release = stub.gate(professors_key("Math"));
    let cache: CatalogCache = catalog_with(&stub);

    assert!(cache.professors(Some("Math")).is_loading());
    assert!(cache.peek_professors(Some("Math")).is_loading());

    release.send(()).unwrap();
    cache.fetch_professors(Some("Math")).await.unwrap();

    let state: QueryState<Vec<Professor>> = cache.professors(Some("Math"));
    let data = state.data().unwrap();
    assert_eq!(names(data.as_slice()), vec!["Álvarez", "Nieto", "Ñandú", "Ortiz"]);
    assert_eq!(stub.calls_for(&professors_key("Math")), 1);
}

#[tokio::test]
async fn test_keys_fail_independently() {
    let stub: Arc<StubCatalog> = Arc::new(StubCatalog::default());
    stub.set_professors(Some("Math"), Err(unavailable()));
    stub.set_professors(
        Some("Physics"),
        Ok(vec![Professor::new(9, "Curie", "Physics")]),
    );
    let cache: CatalogCache = catalog_with(&stub);

    let math: Result<_, FetchError> = cache.fetch_professors(Some("Math")).await;
    let physics: Result<_, FetchError> = cache.fetch_professors(Some("Physics")).await;

    assert_eq!(math.unwrap_err(), unavailable());
    assert_eq!(names(physics.unwrap().as_slice()), vec!["Curie"]);
    assert_eq!(
        cache.peek_professors(Some("Math")).error(),
        Some(&unavailable())
    );
    assert!(cache.peek_professors(Some("Physics")).data().is_some());
}

#[tokio::test]
async fn test_failed_list_waits_for_explicit_retry() {
    let stub: Arc<StubCatalog> = Arc::new(StubCatalog::default());
    stub.set_professors(Some("Math"), Err(unavailable()));
    let cache: CatalogCache = catalog_with(&stub);

    assert!(cache.fetch_professors(Some("Math")).await.is_err());
    // Neither request nor fetch refetch a failed entry
    assert!(cache.professors(Some("Math")).error().is_some());
    assert!(cache.fetch_professors(Some("Math")).await.is_err());
    assert_eq!(stub.calls_for(&professors_key("Math")), 1);

    stub.set_professors(Some("Math"), Ok(math_professors()));
    cache.retry(&professors_key("Math"));
    let professors = cache.fetch_professors(Some("Math")).await.unwrap();

    assert_eq!(professors.len(), 4);
    assert_eq!(stub.calls_for(&professors_key("Math")), 2);
}

#[tokio::test]
async fn test_retry_supersedes_hanging_fetch() {
    let stub: Arc<StubCatalog> = Arc::new(StubCatalog::default());
    stub.set_professors(Some("Math"), Ok(math_professors()));
    let release = stub.gate(professors_key("Math"));
    let cache: CatalogCache = catalog_with(&stub);

    assert!(cache.professors(Some("Math")).is_loading());
    while stub.calls_for(&professors_key("Math")) == 0 {
        tokio::task::yield_now().await;
    }

    // The first fetch is still held at the gate
    cache.retry(&professors_key("Math"));
    let professors = cache.fetch_professors(Some("Math")).await.unwrap();

    assert_eq!(professors.len(), 4);
    assert_eq!(stub.calls_for(&professors_key("Math")), 2);
    release.send(()).unwrap();
}

#[tokio::test]
async fn test_retry_of_one_list_leaves_others_alone() {
    let stub: Arc<StubCatalog> = Arc::new(StubCatalog::default());
    stub.set_departments(Err(unavailable()));
    stub.set_professors(None, Ok(math_professors()));
    let cache: CatalogCache = catalog_with(&stub);

    assert!(cache.fetch_departments().await.is_err());
    cache.fetch_professors(None).await.unwrap();

    stub.set_departments(Ok(vec![Department::new("Math", 4)]));
    cache.retry(&CatalogKey::Departments);
    cache.fetch_departments().await.unwrap();

    assert_eq!(stub.calls_for(&CatalogKey::Departments), 2);
    assert_eq!(stub.calls_for(&CatalogKey::Professors { department: None }), 1);
}

#[tokio::test]
async fn test_departments_keep_backend_order() {
    let stub: Arc<StubCatalog> = Arc::new(StubCatalog::default());
    stub.set_departments(Ok(vec![
        Department::new("Química", 3),
        Department::new("Economía", 5),
        Department::new("Física", 2),
    ]));
    let cache: CatalogCache = catalog_with(&stub);

    let departments = cache.fetch_departments().await.unwrap();

    assert_eq!(names(departments.as_slice()), vec!["Química", "Economía", "Física"]);
}

#[tokio::test]
async fn test_duplicate_departments_are_rejected() {
    let stub: Arc<StubCatalog> = Arc::new(StubCatalog::default());
    stub.set_departments(Ok(vec![
        Department::new("Física", 2),
        Department::new("Física", 3),
    ]));
    let cache: CatalogCache = catalog_with(&stub);

    let result: Result<_, FetchError> = cache.fetch_departments().await;

    assert_eq!(
        result.unwrap_err(),
        FetchError::Invalid(DomainError::DuplicateDepartment(String::from("Física")))
    );
}

#[tokio::test]
async fn test_unscoped_and_scoped_courses_are_separate_entries() {
    let stub: Arc<StubCatalog> = Arc::new(StubCatalog::default());
    stub.set_courses(
        None,
        Ok(vec![
            Course::new(2, "Termodinámica", Some("Física")),
            Course::new(1, "Álgebra", None),
        ]),
    );
    stub.set_courses(Some(7), Ok(vec![Course::new(2, "Termodinámica", None)]));
    let cache: CatalogCache = catalog_with(&stub);

    let all = cache.fetch_courses(None).await.unwrap();
    let taught = cache.fetch_courses(Some(ProfessorId::new(7))).await.unwrap();

    assert_eq!(names(all.as_slice()), vec!["Álgebra", "Termodinámica"]);
    assert_eq!(names(taught.as_slice()), vec!["Termodinámica"]);
    assert_eq!(
        stub.calls_for(&CatalogKey::Courses {
            professor_id: Some(ProfessorId::new(7))
        }),
        1
    );
}

#[tokio::test]
async fn test_blank_department_means_all_professors() {
    let stub: Arc<StubCatalog> = Arc::new(StubCatalog::default());
    stub.set_professors(None, Ok(math_professors()));
    let cache: CatalogCache = catalog_with(&stub);

    let professors = cache.fetch_professors(Some("  ")).await.unwrap();

    assert_eq!(professors.len(), 4);
    assert_eq!(stub.calls_for(&CatalogKey::Professors { department: None }), 1);
}

#[tokio::test]
async fn test_events_follow_each_list() {
    let stub: Arc<StubCatalog> = Arc::new(StubCatalog::default());
    stub.set_professors(Some("Math"), Err(unavailable()));
    let cache: CatalogCache = catalog_with(&stub);
    let mut events = cache.subscribe();

    let _ = cache.departments();
    assert_eq!(
        events.recv().await.unwrap(),
        CacheEvent::Loading {
            key: CatalogKey::Departments
        }
    );
    assert_eq!(
        settled(&mut events).await,
        CacheEvent::Ready {
            key: CatalogKey::Departments
        }
    );

    let _ = cache.professors(Some("Math"));
    assert_eq!(
        settled(&mut events).await,
        CacheEvent::Failed {
            key: professors_key("Math"),
            error: unavailable(),
        }
    );
}
