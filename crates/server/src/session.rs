// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dashboard sessions and their extractor.
//!
//! Every session owns one `DashboardController`; the catalog and metrics
//! caches behind the controllers are shared by all sessions.

use axum::{
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use senti_dash_api::DashboardController;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::AppState;

/// Idle time after which a session is closed.
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

/// A controller shared between the handlers of one session.
pub type SharedController = Arc<Mutex<DashboardController>>;

struct SessionEntry {
    controller: SharedController,
    last_seen: Instant,
}

/// The open dashboard sessions.
///
/// A session that has not been looked up for `idle_timeout` is expired: the
/// next lookup treats it as unknown, and [`SessionStore::sweep`] drops it.
pub struct SessionStore {
    next_id: AtomicU64,
    idle_timeout: Duration,
    sessions: RwLock<HashMap<u64, SessionEntry>>,
}

impl SessionStore {
    /// Creates an empty store expiring sessions after `idle_timeout`.
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            idle_timeout,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `controller` under a new session id.
    pub async fn open(&self, controller: DashboardController) -> u64 {
        let id: u64 = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.sessions.write().await.insert(
            id,
            SessionEntry {
                controller: Arc::new(Mutex::new(controller)),
                last_seen: Instant::now(),
            },
        );
        info!(session_id = id, "Opened dashboard session");
        id
    }

    /// Looks up a session and marks it as used.
    pub async fn get(&self, id: u64) -> Option<SharedController> {
        let mut sessions = self.sessions.write().await;
        let entry: &mut SessionEntry = sessions.get_mut(&id)?;
        if entry.last_seen.elapsed() < self.idle_timeout {
            entry.last_seen = Instant::now();
            return Some(Arc::clone(&entry.controller));
        }
        sessions.remove(&id);
        drop(sessions);
        info!(session_id = id, "Dashboard session expired");
        None
    }

    /// Removes a session. Returns whether it existed.
    pub async fn close(&self, id: u64) -> bool {
        let removed: bool = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = id, "Closed dashboard session");
        }
        removed
    }

    /// Drops every expired session. Returns how many were dropped.
    pub async fn sweep(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before: usize = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < self.idle_timeout);
        let expired: usize = before - sessions.len();
        drop(sessions);

        if expired > 0 {
            info!(expired, "Dropped idle dashboard sessions");
        }
        expired
    }

    /// Sweeps the store every `every` until the store is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let store = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(every.max(Duration::from_secs(1)));
            ticks.tick().await;
            loop {
                ticks.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                store.sweep().await;
            }
            debug!("Session sweeper stopped");
        })
    }
}

/// Extractor for the session named by the `{id}` path parameter.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     DashboardSession(id, controller): DashboardSession,
/// ) -> Result<Json<Response>, HttpError> {
///     let controller = controller.lock().await;
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 400 if the id is not a number and HTTP 404 if no such
/// session is open.
pub struct DashboardSession(pub u64, pub SharedController);

impl FromRequestParts<AppState> for DashboardSession {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(params): Path<HashMap<String, String>> =
            Path::from_request_parts(parts, state)
                .await
                .map_err(|_| SessionError::MissingSessionId)?;

        let raw: &String = params.get("id").ok_or(SessionError::MissingSessionId)?;
        let id: u64 = raw.parse().map_err(|_| {
            warn!(session_id = %raw, "Malformed session id");
            SessionError::InvalidSessionId(raw.clone())
        })?;

        let controller: SharedController = state.sessions.get(id).await.ok_or_else(|| {
            debug!(session_id = id, "Unknown session");
            SessionError::UnknownSession(id)
        })?;

        Ok(Self(id, controller))
    }
}

/// Session extraction errors.
///
/// These errors are returned when session lookup fails and are
/// automatically converted to HTTP responses.
#[derive(Debug)]
pub enum SessionError {
    /// The route has no session id.
    MissingSessionId,
    /// The session id is not a number.
    InvalidSessionId(String),
    /// No session with this id is open.
    UnknownSession(u64),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingSessionId => (
                StatusCode::BAD_REQUEST,
                String::from("Missing session id"),
            ),
            Self::InvalidSessionId(raw) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid session id: '{raw}'"),
            ),
            Self::UnknownSession(id) => {
                (StatusCode::NOT_FOUND, format!("Session {id} not found"))
            }
        };

        crate::HttpError { status, message }.into_response()
    }
}
