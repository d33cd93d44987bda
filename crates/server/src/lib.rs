//! Server crate for the job aggregator.
//!
//! This crate contains the aggregator that fans out to every job source,
//! plus the thin adapters that expose it over HTTP or as a Lambda function.

pub mod config;
pub mod error;
pub mod lambda;
pub mod orchestrator;
pub mod routes;
pub mod telemetry;

use std::sync::Arc;

use sources::SourceSettings;
use tracing::info;

pub use config::{AppConfig, RunMode};
pub use error::{AggregationError, AppError, JobServiceError, ServiceError};
pub use orchestrator::{FailurePolicy, JobAggregator};

/// Build the aggregator from configuration and run the selected entrypoint.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let aggregator = Arc::new(build_aggregator(&config)?);

    match config.mode {
        RunMode::Lambda => {
            info!("Running lambda handler");
            let handler = lambda::LambdaHandler::new(aggregator, config.cors_origin.clone());
            lambda::run(handler).await
        }
        RunMode::Local => routes::serve(aggregator, &config).await,
    }
}

/// The production aggregator: every built-in source with configured limits.
pub fn build_aggregator(config: &AppConfig) -> Result<JobAggregator, AppError> {
    let settings =
        SourceSettings::default().with_request_timeout(config.aggregation.source_timeout);
    Ok(JobAggregator::with_default_sources(&settings)?
        .with_policy(config.aggregation.failure_policy))
}
