//! Upstream HTTP access shared by all sources.

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, SourceError};
use crate::source::SourceSettings;

/// Build the HTTP client a source uses for its upstream.
pub fn build_client(source_name: &str, settings: &SourceSettings) -> Result<Client> {
    Client::builder()
        .timeout(settings.request_timeout)
        .user_agent(settings.user_agent.as_str())
        .build()
        .map_err(|error| SourceError::Client {
            source_name: source_name.to_string(),
            error,
        })
}

/// Issue one GET and return the body of a successful response.
pub async fn fetch_body(client: &Client, source_name: &str, url: &str) -> Result<Vec<u8>> {
    debug!("Fetching {} postings from {}", source_name, url);

    let fetch_error = |error: reqwest::Error| SourceError::Fetch {
        source_name: source_name.to_string(),
        error,
    };

    let response = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(fetch_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            source_name: source_name.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(fetch_error)?;
    debug!("{} response body: {} bytes", source_name, body.len());
    Ok(body.to_vec())
}

/// Decode a JSON body into a source's raw shape.
pub fn decode_json<T: DeserializeOwned>(source_name: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|error| SourceError::Decode {
        source_name: source_name.to_string(),
        error,
    })
}
