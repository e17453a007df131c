// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An in-process stand-in for the backend.

use crate::{BackendConfig, CatalogRoutes, HttpBackend, MetricsRoutes};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;

type Params = Query<HashMap<String, String>>;

async fn departments() -> Json<Value> {
    Json(json!([
        { "name": "Física", "professorCount": 2 },
        { "name": "Economía", "professor_count": 3 }
    ]))
}

fn professors_of(department: Option<&str>) -> Value {
    let department: &str = department.unwrap_or("Física");
    json!([
        { "id": 2, "name": "Zapata", "department": department },
        { "id": 1, "name": "Ávila", "department": department }
    ])
}

fn courses_of(professor_id: Option<&str>) -> Value {
    json!([
        { "id": 501, "name": format!("Curso de {}", professor_id.unwrap_or("todos")) }
    ])
}

fn metrics_for(scope: Option<&str>, value: Option<&str>) -> Value {
    let total: u64 = match (scope, value) {
        (Some(_), Some(v)) => v.chars().count() as u64,
        _ => 1000,
    };
    json!({
        "total_comments": total,
        "average_sentiment_score": 0.5,
        "sentiment_distribution": [
            { "sentiment": "positive", "count": 7 },
            { "sentiment": "negative", "count": 3 }
        ],
        "sentiment_trends": [
            { "date": "2026-01-01", "sentiment_score": 0.4, "count": 4 },
            { "date": "2026-01-02", "sentiment_score": 0.6, "count": 6 }
        ],
        "top_words": [ { "text": "claro", "value": 9 } ]
    })
}

/// A backend serving every catalog and metrics route.
pub fn catalog_router() -> Router {
    Router::new()
        .route("/catalog/departments", get(departments))
        .route(
            "/catalog/professors",
            get(|Query(params): Params| async move {
                Json(professors_of(params.get("department").map(String::as_str)))
            }),
        )
        .route(
            "/catalog/departments/{name}/professors",
            get(|Path(name): Path<String>| async move { Json(professors_of(Some(&name))) }),
        )
        .route(
            "/catalog/courses",
            get(|Query(params): Params| async move {
                Json(courses_of(params.get("professor_id").map(String::as_str)))
            }),
        )
        .route(
            "/catalog/professors/{id}/courses",
            get(|Path(id): Path<String>| async move { Json(courses_of(Some(&id))) }),
        )
        .route(
            "/api/dashboard/metrics",
            get(|Query(params): Params| async move {
                Json(metrics_for(
                    params.get("scope").map(String::as_str),
                    params.get("value").map(String::as_str),
                ))
            }),
        )
        .route(
            "/api/dashboard/metrics/{scope}/{value}",
            get(
                |Path((scope, value)): Path<(String, String)>| async move {
                    Json(metrics_for(Some(&scope), Some(&value)))
                },
            ),
        )
}

/// A backend that fails every request with `status` and a JSON detail.
pub fn failing_router(status: StatusCode) -> Router {
    Router::new()
        .fallback(move || async move { (status, Json(json!({ "detail": "backend down" }))) })
}

/// A backend that answers every request after `delay`.
pub fn slow_router(delay: std::time::Duration) -> Router {
    Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        Json(json!([]))
    })
}

/// A backend that answers every request with a body that is not JSON.
pub fn garbage_router() -> Router {
    Router::new().fallback(|| async { "<html>oops</html>" })
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

pub fn backend(base_url: &str, catalog: CatalogRoutes, metrics: MetricsRoutes) -> HttpBackend {
    HttpBackend::new(BackendConfig {
        base_url: base_url.to_string(),
        catalog_routes: catalog,
        metrics_routes: metrics,
        ..BackendConfig::default()
    })
    .unwrap()
}
