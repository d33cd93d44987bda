//! Error types for job sources.
//!
//! A failure here ends one source's contribution to an aggregation. Whether
//! that also ends the whole aggregation is decided by the caller.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching jobs from one upstream
#[derive(Error, Debug)]
pub enum SourceError {
    /// The HTTP client could not be constructed
    #[error("{source_name}: failed to build HTTP client: {error}")]
    Client {
        source_name: String,
        #[source]
        error: reqwest::Error,
    },

    /// Network or transport failure reaching the upstream
    #[error("{source_name}: request failed: {error}")]
    Fetch {
        source_name: String,
        #[source]
        error: reqwest::Error,
    },

    /// The upstream answered with a non-success status
    #[error("{source_name}: upstream returned HTTP {status}")]
    Status { source_name: String, status: u16 },

    /// The response body did not match the expected shape
    #[error("{source_name}: response could not be decoded: {error}")]
    Decode {
        source_name: String,
        #[source]
        error: serde_json::Error,
    },

    /// The upstream did not answer before the deadline
    #[error("{source_name}: no response within {after:?}")]
    Timeout { source_name: String, after: Duration },
}

impl SourceError {
    /// Name of the source that failed
    pub fn source_name(&self) -> &str {
        match self {
            SourceError::Client { source_name, .. }
            | SourceError::Fetch { source_name, .. }
            | SourceError::Status { source_name, .. }
            | SourceError::Decode { source_name, .. }
            | SourceError::Timeout { source_name, .. } => source_name,
        }
    }

    /// Transport-level failures: the upstream could not be reached or refused.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            SourceError::Fetch { .. } | SourceError::Status { .. } | SourceError::Timeout { .. }
        )
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, SourceError::Decode { .. })
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, SourceError>;
