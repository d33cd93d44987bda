//! Error types for aggregation and the entrypoints.
//!
//! Callers of the HTTP and Lambda entrypoints only ever see a generic
//! message; the underlying error is logged here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sources::SourceError;
use thiserror::Error;
use tracing::error;

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

/// Errors from one aggregation call
#[derive(Error, Debug)]
pub enum AggregationError {
    /// A source failed while the fail-fast policy was active
    #[error("job source failed: {0}")]
    Source(#[from] SourceError),

    /// A source task panicked or was cancelled
    #[error("job source task failed: {reason}")]
    TaskFailed { reason: String },

    #[error("failed to serialize jobs: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Error returned by the local HTTP handler
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("job search failed: {0}")]
    Aggregation(#[from] AggregationError),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        error!(error = %self, "job search request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Error occurred").into_response()
    }
}

/// Error returned to the Lambda runtime
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("There was an issue with the jobservice API")]
pub struct JobServiceError;

/// Start-up and runtime failures of the process
#[derive(Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source setup error: {0}")]
    Source(#[from] SourceError),

    #[error("lambda runtime error: {0}")]
    Lambda(lambda_runtime::Error),
}
