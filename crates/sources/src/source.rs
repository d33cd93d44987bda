//! The capability every job source implements.

use async_trait::async_trait;
use model::Job;
use std::time::Duration;

use crate::error::Result;

/// One upstream job board.
///
/// Implementations fetch their upstream, decode it into a private raw
/// shape, run their own filter chain and map survivors into `Job`s.
/// New boards are added by implementing this trait; the aggregator only
/// ever sees `dyn JobSource`.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Employer name, also used in logs and errors
    fn name(&self) -> &str;

    /// Fetch, filter and normalize the current postings.
    ///
    /// Source order is preserved through filtering and mapping.
    async fn fetch_jobs(&self) -> Result<Vec<Job>>;
}

/// HTTP settings shared by the built-in sources.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    /// Upper bound for one upstream request, connect to last body byte
    pub request_timeout: Duration,

    pub user_agent: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            user_agent: concat!("job-aggregator/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SourceSettings {
    /// Configure the per-request timeout (default: 10s)
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
