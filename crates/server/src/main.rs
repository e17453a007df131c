// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod live;
mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use senti_dash_api::{
    ApiError, ApplyResponse, CatalogListResponse, DashboardController, DashboardEvent,
    DashboardResponse, ListView, MetricsCache, MetricsSource, SelectionResponse,
    SetCourseRequest, SetDepartmentRequest, SetKindRequest, SetProfessorRequest,
    translate_domain_error,
};
use senti_dash_catalog::{CacheConfig, CatalogCache, CatalogSource, DEFAULT_EVENT_BUFFER};
use senti_dash_client::{
    BackendConfig, CatalogRoutes, DEFAULT_BASE_URL, HttpBackend, MetricsRoutes,
};
use senti_dash_domain::{CatalogList, ScopeKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::live::{LiveEventBroadcaster, live_events_handler};
use crate::session::{DEFAULT_SESSION_IDLE, DashboardSession, SessionStore};

/// Sentiment dashboard server - filter sessions over the evaluation backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Base URL of the catalog and metrics backend
    #[arg(short, long, default_value = DEFAULT_BASE_URL)]
    backend_url: String,

    /// Backend request timeout in seconds
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    /// Seconds before a cached option list is revalidated
    #[arg(long, default_value_t = 600)]
    catalog_stale_secs: u64,

    /// Seconds before cached metrics are revalidated
    #[arg(long, default_value_t = 300)]
    metrics_stale_secs: u64,

    /// Seconds a session may sit unused before it is closed
    #[arg(long, default_value_t = DEFAULT_SESSION_IDLE.as_secs())]
    session_idle_secs: u64,

    /// Request filtered lists as sub-resources
    /// (`/catalog/departments/{name}/professors`) instead of query filters
    #[arg(long)]
    sub_resource_catalog: bool,

    /// Request scoped metrics as `/api/dashboard/metrics/{scope}/{value}`
    /// instead of query parameters
    #[arg(long)]
    per_scope_metrics: bool,
}

impl Args {
    fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            catalog_stale_after: Duration::from_secs(self.catalog_stale_secs),
            metrics_stale_after: Duration::from_secs(self.metrics_stale_secs),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }

    const fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.backend_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            catalog_routes: if self.sub_resource_catalog {
                CatalogRoutes::SubResource
            } else {
                CatalogRoutes::QueryFilter
            },
            metrics_routes: if self.per_scope_metrics {
                MetricsRoutes::PerScope
            } else {
                MetricsRoutes::QueryFilter
            },
        }
    }
}

/// Application state shared across handlers.
///
/// The caches are shared by every session; each session owns only its
/// selection.
#[derive(Clone)]
struct AppState {
    /// Option lists.
    catalog: Arc<CatalogCache>,
    /// Dashboard metrics.
    metrics: Arc<MetricsCache>,
    /// Open dashboard sessions.
    sessions: Arc<SessionStore>,
    /// Cache events for session sockets.
    live: Arc<LiveEventBroadcaster>,
}

impl AppState {
    /// Builds the shared caches and starts forwarding their events.
    ///
    /// Must be called from within a Tokio runtime.
    fn new(
        catalog_source: Arc<dyn CatalogSource>,
        metrics_source: Arc<dyn MetricsSource>,
        config: &CacheConfig,
        session_idle: Duration,
    ) -> Self {
        let catalog: Arc<CatalogCache> = Arc::new(CatalogCache::new(catalog_source, config));
        let metrics: Arc<MetricsCache> = Arc::new(MetricsCache::new(metrics_source, config));
        let live: LiveEventBroadcaster = LiveEventBroadcaster::new(config.event_buffer);
        live.forward(catalog.subscribe(), DashboardEvent::Catalog);
        live.forward(metrics.subscribe(), DashboardEvent::Metrics);

        Self {
            catalog,
            metrics,
            sessions: Arc::new(SessionStore::new(session_idle)),
            live: Arc::new(live),
        }
    }
}

/// Query parameters shared by the read endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct WaitQuery {
    /// Wait for the fetch to settle instead of returning a loading state.
    #[serde(default)]
    wait: bool,
}

/// API response for session creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CreateSessionResponse {
    /// The new session's id.
    session_id: u64,
    /// Its initial selection.
    selection: SelectionResponse,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::BackendUnavailable { .. } => {
                error!(error = %err, "Backend unavailable");
                Self {
                    status: StatusCode::BAD_GATEWAY,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Builds the response for one option list under `controller`'s selection.
fn catalog_list_response(controller: &DashboardController, list: CatalogList) -> Response {
    let key = controller.catalog_key(list);
    match list {
        CatalogList::Departments => Json(CatalogListResponse {
            key,
            list: ListView::from(controller.department_options()),
        })
        .into_response(),
        CatalogList::Professors => Json(CatalogListResponse {
            key,
            list: ListView::from(controller.professor_options()),
        })
        .into_response(),
        CatalogList::Courses => Json(CatalogListResponse {
            key,
            list: ListView::from(controller.course_options()),
        })
        .into_response(),
    }
}

/// Handler for POST `/sessions`.
async fn handle_create_session(
    AxumState(app_state): AxumState<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let controller: DashboardController = DashboardController::new(
        Arc::clone(&app_state.catalog),
        Arc::clone(&app_state.metrics),
    );
    let selection: SelectionResponse = SelectionResponse::from_controller(&controller);
    let session_id: u64 = app_state.sessions.open(controller).await;

    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            selection,
        }),
    )
}

/// Handler for DELETE `/sessions/{id}`.
async fn handle_close_session(
    AxumState(app_state): AxumState<AppState>,
    DashboardSession(session_id, _): DashboardSession,
) -> StatusCode {
    app_state.sessions.close(session_id).await;
    StatusCode::NO_CONTENT
}

/// Handler for GET `/sessions/{id}/selection`.
async fn handle_get_selection(
    DashboardSession(_, controller): DashboardSession,
) -> Json<SelectionResponse> {
    let controller = controller.lock().await;
    Json(SelectionResponse::from_controller(&controller))
}

/// Handler for POST `/sessions/{id}/selection/kind`.
async fn handle_set_kind(
    DashboardSession(session_id, controller): DashboardSession,
    Json(req): Json<SetKindRequest>,
) -> Result<Json<SelectionResponse>, HttpError> {
    let kind: ScopeKind = req.kind()?;
    info!(session_id, %kind, "Setting filter type");

    let mut controller = controller.lock().await;
    controller.set_kind(kind);
    Ok(Json(SelectionResponse::from_controller(&controller)))
}

/// Handler for POST `/sessions/{id}/selection/department`.
async fn handle_set_department(
    DashboardSession(session_id, controller): DashboardSession,
    Json(req): Json<SetDepartmentRequest>,
) -> Json<SelectionResponse> {
    info!(session_id, department = ?req.department, "Setting department");

    let mut controller = controller.lock().await;
    controller.set_department(req.department);
    Json(SelectionResponse::from_controller(&controller))
}

/// Handler for POST `/sessions/{id}/selection/professor`.
async fn handle_set_professor(
    DashboardSession(session_id, controller): DashboardSession,
    Json(req): Json<SetProfessorRequest>,
) -> Json<SelectionResponse> {
    info!(session_id, professor = ?req.professor_id, "Setting professor");

    let mut controller = controller.lock().await;
    controller.set_professor(req.professor_id);
    Json(SelectionResponse::from_controller(&controller))
}

/// Handler for POST `/sessions/{id}/selection/course`.
async fn handle_set_course(
    DashboardSession(session_id, controller): DashboardSession,
    Json(req): Json<SetCourseRequest>,
) -> Json<SelectionResponse> {
    info!(session_id, course = ?req.course_id, "Setting course");

    let mut controller = controller.lock().await;
    controller.set_course(req.course_id);
    Json(SelectionResponse::from_controller(&controller))
}

/// Handler for POST `/sessions/{id}/apply`.
async fn handle_apply(
    DashboardSession(session_id, controller): DashboardSession,
) -> Json<ApplyResponse> {
    let mut controller = controller.lock().await;
    let scope = controller.apply();
    info!(session_id, %scope, "Applied selection");
    Json(ApplyResponse {
        scope,
        filter_active: controller.is_filter_active(),
    })
}

/// Handler for POST `/sessions/{id}/reset`.
async fn handle_reset(
    DashboardSession(session_id, controller): DashboardSession,
) -> Json<ApplyResponse> {
    let mut controller = controller.lock().await;
    let scope = controller.reset();
    info!(session_id, "Reset selection");
    Json(ApplyResponse {
        scope,
        filter_active: controller.is_filter_active(),
    })
}

/// Handler for GET `/sessions/{id}/catalog/{list}`.
async fn handle_get_catalog_list(
    DashboardSession(_, controller): DashboardSession,
    Path((_, list)): Path<(String, String)>,
    Query(query): Query<WaitQuery>,
) -> Result<Response, HttpError> {
    let list: CatalogList = list.parse().map_err(translate_domain_error)?;
    let controller = controller.lock().await;
    if query.wait {
        controller.load_options(list).await?;
    }
    Ok(catalog_list_response(&controller, list))
}

/// Handler for POST `/sessions/{id}/catalog/{list}/retry`.
async fn handle_retry_catalog_list(
    DashboardSession(session_id, controller): DashboardSession,
    Path((_, list)): Path<(String, String)>,
    Query(query): Query<WaitQuery>,
) -> Result<Response, HttpError> {
    let list: CatalogList = list.parse().map_err(translate_domain_error)?;
    info!(session_id, %list, "Retrying option list");

    let controller = controller.lock().await;
    controller.retry_list(list);
    if query.wait {
        controller.load_options(list).await?;
    }
    Ok(catalog_list_response(&controller, list))
}

/// Handler for GET `/sessions/{id}/dashboard`.
///
/// With `?wait=true` a failed fetch is a 502; otherwise it is reported as
/// the dashboard's `failed` state.
async fn handle_get_dashboard(
    DashboardSession(_, controller): DashboardSession,
    Query(query): Query<WaitQuery>,
) -> Result<Json<DashboardResponse>, HttpError> {
    let controller = controller.lock().await;
    let view = if query.wait {
        controller.load_dashboard().await?
    } else {
        controller.dashboard()
    };
    Ok(Json(DashboardResponse::from(view)))
}

/// Handler for POST `/sessions/{id}/dashboard/retry`.
async fn handle_retry_dashboard(
    DashboardSession(session_id, controller): DashboardSession,
    Query(query): Query<WaitQuery>,
) -> Result<Json<DashboardResponse>, HttpError> {
    info!(session_id, "Retrying dashboard");

    let controller = controller.lock().await;
    let view = controller.retry_metrics();
    let view = if query.wait {
        controller.load_dashboard().await?
    } else {
        view
    };
    Ok(Json(DashboardResponse::from(view)))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/sessions", post(handle_create_session))
        .route("/sessions/{id}", delete(handle_close_session))
        .route("/sessions/{id}/selection", get(handle_get_selection))
        .route("/sessions/{id}/selection/kind", post(handle_set_kind))
        .route(
            "/sessions/{id}/selection/department",
            post(handle_set_department),
        )
        .route(
            "/sessions/{id}/selection/professor",
            post(handle_set_professor),
        )
        .route("/sessions/{id}/selection/course", post(handle_set_course))
        .route("/sessions/{id}/apply", post(handle_apply))
        .route("/sessions/{id}/reset", post(handle_reset))
        .route("/sessions/{id}/catalog/{list}", get(handle_get_catalog_list))
        .route(
            "/sessions/{id}/catalog/{list}/retry",
            post(handle_retry_catalog_list),
        )
        .route("/sessions/{id}/dashboard", get(handle_get_dashboard))
        .route("/sessions/{id}/dashboard/retry", post(handle_retry_dashboard))
        .route("/sessions/{id}/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing sentiment dashboard server");

    let backend_config: BackendConfig = args.backend_config();
    info!(
        backend = %backend_config.base_url,
        catalog_routes = ?backend_config.catalog_routes,
        metrics_routes = ?backend_config.metrics_routes,
        "Using evaluation backend"
    );
    let backend: Arc<HttpBackend> = Arc::new(HttpBackend::new(backend_config)?);

    let session_idle: Duration = args.session_idle();
    let app_state: AppState =
        AppState::new(backend.clone(), backend, &args.cache_config(), session_idle);
    app_state.sessions.spawn_sweeper(session_idle / 2);
    info!(idle_secs = session_idle.as_secs(), "Expiring idle sessions");

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
