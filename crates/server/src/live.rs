// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live cache notifications for dashboard sessions.
//!
//! The catalog and metrics caches publish load, ready and failure events.
//! The broadcaster merges both streams into one channel of
//! [`DashboardEvent`]s, and every session socket forwards only the events
//! its controller currently reads from.
//!
//! # Architecture
//!
//! - Events are hints; clients re-read the list or dashboard over HTTP
//! - Nothing is executed over WebSocket connections
//! - A session never sees events for keys its selection has moved away from

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use senti_dash_api::{DashboardController, DashboardEvent};
use senti_dash_catalog::CacheEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::AppState;
use crate::session::{DashboardSession, SharedController};

/// Live event types sent to session sockets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// An option list started loading.
    CatalogLoading {
        /// The list key, e.g. `professors[department=Economía]`.
        key: String,
    },
    /// An option list has new data.
    CatalogReady {
        /// The list key.
        key: String,
    },
    /// An option list failed to load.
    CatalogFailed {
        /// The list key.
        key: String,
        /// What went wrong.
        error: String,
    },
    /// Metrics for the applied scope started loading.
    MetricsLoading {
        /// The scope, e.g. `professor=42`.
        scope: String,
    },
    /// Metrics for the applied scope have new data.
    MetricsReady {
        /// The scope.
        scope: String,
    },
    /// Metrics for the applied scope failed to load.
    MetricsFailed {
        /// The scope.
        scope: String,
        /// What went wrong.
        error: String,
    },
    /// The socket fell behind and dropped events; re-read everything.
    Lagged {
        /// Number of dropped events.
        missed: u64,
    },
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// The session this socket follows.
        session_id: u64,
        /// Server timestamp (ISO 8601).
        timestamp: String,
    },
}

impl From<DashboardEvent> for LiveEvent {
    fn from(event: DashboardEvent) -> Self {
        match event {
            DashboardEvent::Catalog(CacheEvent::Loading { key }) => Self::CatalogLoading {
                key: key.to_string(),
            },
            DashboardEvent::Catalog(CacheEvent::Ready { key }) => Self::CatalogReady {
                key: key.to_string(),
            },
            DashboardEvent::Catalog(CacheEvent::Failed { key, error }) => Self::CatalogFailed {
                key: key.to_string(),
                error: error.to_string(),
            },
            DashboardEvent::Metrics(CacheEvent::Loading { key }) => Self::MetricsLoading {
                scope: key.to_string(),
            },
            DashboardEvent::Metrics(CacheEvent::Ready { key }) => Self::MetricsReady {
                scope: key.to_string(),
            },
            DashboardEvent::Metrics(CacheEvent::Failed { key, error }) => Self::MetricsFailed {
                scope: key.to_string(),
                error: error.to_string(),
            },
        }
    }
}

/// Converts `event` for a socket following `controller`, or drops it when
/// the controller does not read the key it concerns.
#[must_use]
pub fn filter_event(controller: &DashboardController, event: DashboardEvent) -> Option<LiveEvent> {
    controller
        .is_relevant(&event)
        .then(|| LiveEvent::from(event))
}

/// Broadcaster for cache events.
///
/// A thin wrapper around `tokio::sync::broadcast` that every session socket
/// subscribes to.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    /// The broadcast channel sender.
    tx: broadcast::Sender<DashboardEvent>,
}

impl LiveEventBroadcaster {
    /// Creates a broadcaster buffering up to `buffer` events per receiver.
    /// Receivers that fall further behind skip the oldest events.
    #[must_use]
    pub fn new(buffer: usize) -> Self {
        let (tx, _rx) = broadcast::channel(buffer.max(1));
        Self { tx }
    }

    /// Broadcasts an event to all connected sockets.
    ///
    /// If no sockets are connected, the event is silently dropped.
    pub fn broadcast(&self, event: &DashboardEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast live event");
            }
            Err(_) => {
                debug!(?event, "No receivers for live event");
            }
        }
    }

    /// Subscribes to the event stream.
    ///
    /// Events sent before subscription are not received.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.tx.subscribe()
    }

    /// Re-broadcasts every event from `rx`, wrapped by `wrap`, until the
    /// cache behind `rx` is dropped.
    pub fn forward<K, F>(
        &self,
        mut rx: broadcast::Receiver<CacheEvent<K>>,
        wrap: F,
    ) -> JoinHandle<()>
    where
        K: Clone + Send + 'static,
        F: Fn(CacheEvent<K>) -> DashboardEvent + Send + 'static,
    {
        let broadcaster: Self = self.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => broadcaster.broadcast(&wrap(event)),
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "Live event forwarder fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("Cache event stream closed");
        })
    }
}

/// Handles WebSocket upgrade requests for a session's live events.
///
/// The subscription is taken before the upgrade so no event between the
/// request and the first frame is lost.
pub async fn live_events_handler(
    DashboardSession(session_id, controller): DashboardSession,
    AxumState(app_state): AxumState<AppState>,
    ws: WebSocketUpgrade,
) -> Response {
    let rx: broadcast::Receiver<DashboardEvent> = app_state.live.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, session_id, controller, rx))
}

async fn send_json(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    event: &LiveEvent,
) -> bool {
    match serde_json::to_string(event) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            error!(?e, "Failed to serialize live event");
            true
        }
    }
}

/// Handles an individual WebSocket connection.
///
/// Sends a connection confirmation, then streams the session's relevant
/// events until the client disconnects or an error occurs.
async fn handle_socket(
    socket: WebSocket,
    session_id: u64,
    controller: SharedController,
    mut rx: broadcast::Receiver<DashboardEvent>,
) {
    info!(session_id, "Client connected to live event stream");

    let (mut sender, mut receiver) = socket.split();

    let connected_event = LiveEvent::Connected {
        session_id,
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| String::from("unknown")),
    };

    if !send_json(&mut sender, &connected_event).await {
        warn!(session_id, "Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            let live: LiveEvent = match rx.recv().await {
                Ok(event) => {
                    let Some(live) = filter_event(&*controller.lock().await, event) else {
                        continue;
                    };
                    live
                }
                Err(RecvError::Lagged(missed)) => LiveEvent::Lagged { missed },
                Err(RecvError::Closed) => break,
            };
            if !send_json(&mut sender, &live).await {
                // Client disconnected
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!(session_id, "Client disconnected from live event stream");
}
