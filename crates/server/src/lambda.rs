//! Serverless entrypoint for API Gateway proxy invocations.

use std::collections::BTreeMap;
use std::sync::Arc;

use lambda_runtime::{LambdaEvent, service_fn};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{AppError, JobServiceError};
use crate::orchestrator::JobAggregator;

/// The parts of an API Gateway proxy event the handler reads
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    pub request_id: Option<String>,
}

/// API Gateway proxy response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// Answers every proxy invocation with one aggregation
#[derive(Clone)]
pub struct LambdaHandler {
    aggregator: Arc<JobAggregator>,
    cors_origin: String,
}

impl LambdaHandler {
    pub fn new(aggregator: Arc<JobAggregator>, cors_origin: String) -> Self {
        Self {
            aggregator,
            cors_origin,
        }
    }

    pub async fn handle_proxy_request(
        &self,
        request: ProxyRequest,
    ) -> Result<ProxyResponse, JobServiceError> {
        let request_id = request
            .request_context
            .and_then(|context| context.request_id)
            .unwrap_or_default();
        info!(
            request_id = %request_id,
            path = request.path.as_deref().unwrap_or("/"),
            "Handling job search invocation"
        );

        let body = self.aggregator.collect_json().await.map_err(|err| {
            error!(error = %err, request_id = %request_id, "job search invocation failed");
            JobServiceError
        })?;

        let mut headers = BTreeMap::new();
        headers.insert(
            "Access-Control-Allow-Origin".to_string(),
            self.cors_origin.clone(),
        );
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Ok(ProxyResponse {
            status_code: 200,
            headers,
            body,
            is_base64_encoded: false,
        })
    }
}

/// Hand the handler to the Lambda runtime loop.
pub async fn run(handler: LambdaHandler) -> Result<(), AppError> {
    let handler = &handler;
    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<ProxyRequest>| async move {
            handler
                .handle_proxy_request(event.payload)
                .await
                .map_err(lambda_runtime::Error::from)
        },
    ))
    .await
    .map_err(AppError::Lambda)
}
