use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{error, info};

use crate::bot::Dispatcher;
use crate::config::Config;
use crate::platform::IncomingUpdate;

const LIVENESS_TEXT: &str = "Recovery support bot is running.";

/// Shared, read-only state for every request
pub struct AppState {
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("request body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("request body is not a valid update: {0}")]
    Decode(#[from] serde_json::Error),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        error!("Error: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal Server Error" })),
        )
            .into_response()
    }
}

pub fn router(state: Arc<AppState>, webhook_path: &str) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route(webhook_path, get(webhook_status).post(receive_update))
        .with_state(state)
}

async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

async fn webhook_status() -> Json<serde_json::Value> {
    Json(json!({ "message": "Bot is running correctly!" }))
}

/// Decode one update and dispatch it before answering. Only a decode failure
/// produces a 500; dispatch outcomes never change the response.
async fn receive_update(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, WebhookError> {
    let text = std::str::from_utf8(&body)?;
    let update: IncomingUpdate = serde_json::from_str(text)?;

    state.dispatcher.dispatch(&update).await;

    Ok(Json(json!({ "message": "OK" })))
}

/// Bind and serve until Ctrl-C / SIGTERM
pub async fn serve(config: &Config, state: Arc<AppState>) -> Result<()> {
    let app = router(state, &config.server.webhook_path);

    let addr = &config.server.bind_address;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!(
        "Listening on {} (webhook path: {})",
        addr, config.server.webhook_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
