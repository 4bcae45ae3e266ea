//! HTTP surface of the game.
//!
//! Handlers are thin: each one runs the matching controller call on the
//! blocking pool (upstream fetches use a blocking client) and maps the
//! result to a response.

use crate::config::Config;
use crate::error::GameError;
use crate::game::Game;
use crate::session::SessionStore;
use crate::wiki::Encyclopedia;
use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Error returned by a handler
#[derive(Debug)]
pub enum ApiError {
    Game(GameError),
    /// The blocking task panicked or was cancelled
    Internal(String),
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self::Game(err)
    }
}

/// Status code for a controller error
pub fn status_for(err: &GameError) -> StatusCode {
    match err {
        GameError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        GameError::Resolution(_) | GameError::Fetch(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Game(err) => {
                let status = status_for(&err);
                warn!(kind = err.kind(), status = status.as_u16(), "request failed: {}", err);
                (status, err.to_string()).into_response()
            }
            Self::Internal(msg) => {
                error!("handler task failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
        }
    }
}

async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, GameError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::Game)
}

/// GET /rand
pub async fn random_title<E: Encyclopedia + 'static>(
    State(game): State<Arc<Game<E>>>,
) -> Result<String, ApiError> {
    blocking(move || game.random_title()).await
}

/// GET /start
pub async fn start<E: Encyclopedia + 'static>(
    State(game): State<Arc<Game<E>>>,
) -> Result<Html<String>, ApiError> {
    let started = blocking(move || game.start()).await?;
    Ok(Html(started.html))
}

/// GET /wiki/{session_id}/{page}
pub async fn page<E: Encyclopedia + 'static>(
    State(game): State<Arc<Game<E>>>,
    Path((session_id, page)): Path<(String, String)>,
) -> Result<Html<String>, ApiError> {
    // Strip the separator if the wildcard kept it.
    let title = page.trim_start_matches('/').to_string();
    let outcome = blocking(move || game.navigate(&session_id, &title)).await?;
    Ok(Html(outcome.into_html()))
}

pub fn router<E: Encyclopedia + 'static>(game: Arc<Game<E>>) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/rand", get(random_title::<E>))
        .route("/start", get(start::<E>))
        // Titles may contain '/', so the page is a wildcard.
        .route("/wiki/:session_id/*page", get(page::<E>))
        .with_state(game)
        .layer(TraceLayer::new_for_http())
}

/// Periodically drop sessions older than `ttl`.
fn spawn_eviction(store: Arc<SessionStore>, ttl: Duration) -> Result<()> {
    let max_age = chrono::Duration::from_std(ttl).context("session TTL out of range")?;
    let period = (ttl / 4).max(Duration::from_secs(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let evicted = store.evict_older_than(max_age);
            if evicted > 0 {
                info!(evicted, live = store.len(), "evicted expired sessions");
            }
        }
    });
    Ok(())
}

/// Bind and serve until ctrl-c.
pub async fn serve<E: Encyclopedia + 'static>(config: &Config, game: Arc<Game<E>>) -> Result<()> {
    if let Some(ttl) = config.session_ttl() {
        spawn_eviction(Arc::clone(game.store()), ttl)?;
    }

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    info!(
        bind = %config.bind,
        language = %config.language,
        site = %config.site,
        session_ttl_secs = ?config.session_ttl_secs,
        "starting wikirace server"
    );

    axum::serve(listener, router(game))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("server failed")?;
    Ok(())
}
