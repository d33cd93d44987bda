//! Local HTTP entrypoint.
//!
//! `GET /JobSearch` runs one aggregation per request and answers with the
//! serialized jobs. Every response carries the configured CORS origin.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use crate::config::{AppConfig, ConfigError};
use crate::error::{AppError, ServiceError};
use crate::orchestrator::JobAggregator;

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<JobAggregator>,
    pub cors_origin: HeaderValue,
}

impl AppState {
    pub fn new(aggregator: Arc<JobAggregator>, cors_origin: &str) -> Result<Self, ConfigError> {
        let cors_origin =
            HeaderValue::from_str(cors_origin).map_err(|_| ConfigError::InvalidCors {
                value: cors_origin.to_string(),
            })?;
        Ok(Self {
            aggregator,
            cors_origin,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/JobSearch", get(job_search))
        .route("/health", get(healthcheck))
        .with_state(state)
}

async fn job_search(State(state): State<AppState>) -> Response {
    let cors = [(header::ACCESS_CONTROL_ALLOW_ORIGIN, state.cors_origin.clone())];

    match state.aggregator.collect_json().await {
        Ok(body) => (
            cors,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            body,
        )
            .into_response(),
        Err(err) => (cors, ServiceError::from(err)).into_response(),
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Bind the configured address and serve until interrupted.
pub async fn serve(aggregator: Arc<JobAggregator>, config: &AppConfig) -> Result<(), AppError> {
    let state = AppState::new(aggregator, &config.cors_origin)?;
    let app = router(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "Running locally");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
