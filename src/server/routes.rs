//! Request dispatch
//!
//! | Route       | Reply                                        |
//! |-------------|----------------------------------------------|
//! | `/list`     | names of all sequences                       |
//! | `/update`   | refresh the registry, always acknowledged    |
//! | `/{name}`   | endless chunked animation, curl only         |
//! | anything else | not found                                  |

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_TYPE, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::registry::FrameRegistry;
use crate::server::classifier::ClientClassifier;
use crate::server::response;
use crate::session::{body_channel, SessionContext, StreamingSession};
use crate::stats::ServerStats;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    /// Frame registry
    pub registry: Arc<FrameRegistry>,
    /// Decides who gets a stream
    pub classifier: Arc<ClientClassifier>,
    /// Server-wide counters
    pub stats: Arc<ServerStats>,
    /// Parent of every session's cancellation token
    pub shutdown: CancellationToken,
    /// Session ID allocator
    pub next_session_id: Arc<AtomicU64>,
}

impl AppState {
    /// Create handler state around a registry
    pub fn new(registry: Arc<FrameRegistry>, classifier: ClientClassifier) -> Self {
        Self {
            registry,
            classifier: Arc::new(classifier),
            stats: Arc::new(ServerStats::new()),
            shutdown: CancellationToken::new(),
            next_session_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/list", get(list_handler))
        .route("/update", get(update_handler))
        .route("/{name}", get(stream_handler))
        .fallback(fallback_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// GET /list
async fn list_handler(State(state): State<AppState>) -> Response {
    response::listing(state.registry.names())
}

/// GET /update
///
/// Refresh failures are logged by the registry and the old frames stay live;
/// the caller is acknowledged either way.
async fn update_handler(State(state): State<AppState>) -> Response {
    match state.registry.refresh().await {
        Ok(_) => state.stats.refresh_succeeded(),
        Err(_) => state.stats.refresh_failed(),
    }

    response::updated()
}

/// GET /{name}
async fn stream_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    tracing::info!(sequence = %name, "Frame source requested");

    let Some(sequence) = state.registry.lookup(&name) else {
        return response::not_found();
    };

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !state.classifier.is_accepted(user_agent) {
        tracing::debug!(sequence = %name, user_agent = user_agent, "Client rejected");
        return response::not_curled();
    }

    let session_id = state.next_session_id.fetch_add(1, Ordering::Relaxed);
    let cancel = state.shutdown.child_token();
    let (sink, body) = body_channel(cancel.clone());
    let context = SessionContext::new(session_id, name).with_user_agent(user_agent);

    let session = match StreamingSession::new(context, sequence, sink, cancel.clone()) {
        Ok(session) => session.with_server_stats(Arc::clone(&state.stats)),
        Err(e) => {
            cancel.cancel();
            tracing::warn!(session_id = session_id, error = %e, "Cannot stream sequence");
            return response::empty_sequence();
        }
    };

    tokio::spawn(session.run());

    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response()
}

/// Unmatched paths
async fn fallback_handler() -> Response {
    response::not_found()
}
