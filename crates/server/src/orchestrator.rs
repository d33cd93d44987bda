//! # Job Aggregator
//!
//! This module coordinates one job search across every registered source:
//! 1. Spawn one task per source, each bounded by a deadline
//! 2. Wait for every task to report (jobs, error, timeout or panic)
//! 3. Apply the failure policy to failed sources
//! 4. Concatenate the surviving jobs in registration order
//! 5. Serialize the collection for the entrypoints
//!
//! Sources share no state. Each task hands its whole job list back in a
//! single join result, so merging needs no locking.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use model::Job;
use sources::{JobSource, SourceError, SourceSettings};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::AggregationError;

/// What a failed source does to the aggregation it is part of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure and continue with zero jobs from that source
    #[default]
    Isolate,

    /// Abort the remaining sources and fail the whole aggregation
    FailFast,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "isolate" | "partial" => Ok(Self::Isolate),
            "fail-fast" | "fail_fast" | "failfast" => Ok(Self::FailFast),
            other => Err(other.to_string()),
        }
    }
}

/// Fans a job search out to every source and merges the results
pub struct JobAggregator {
    sources: Vec<Arc<dyn JobSource>>,
    source_timeout: Duration,
    policy: FailurePolicy,
}

impl JobAggregator {
    /// Create an aggregator over a fixed set of sources.
    ///
    /// Defaults: 10 second deadline per source, failures isolated.
    pub fn new(sources: Vec<Arc<dyn JobSource>>) -> Self {
        Self {
            sources,
            source_timeout: Duration::from_secs(10),
            policy: FailurePolicy::default(),
        }
    }

    /// Aggregator over the built-in Amazon, League and Shopify sources
    pub fn with_default_sources(settings: &SourceSettings) -> Result<Self, SourceError> {
        Ok(Self::new(sources::default_sources(settings)?)
            .with_timeout(settings.request_timeout))
    }

    /// Configure the deadline for each source (default: 10s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    /// Configure the failure policy (default: isolate)
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn source_timeout(&self) -> Duration {
        self.source_timeout
    }

    /// Names of the registered sources, in registration order
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Query every source concurrently and merge their jobs.
    ///
    /// Jobs are grouped by source in registration order, whatever order the
    /// sources finish in. Dropping the returned future aborts any source
    /// still running.
    pub async fn collect(&self) -> Result<Vec<Job>, AggregationError> {
        let start_time = Instant::now();
        let mut join_set = JoinSet::new();

        for (index, source) in self.sources.iter().enumerate() {
            let source = Arc::clone(source);
            let deadline = self.source_timeout;
            join_set.spawn(async move {
                let result = match tokio::time::timeout(deadline, source.fetch_jobs()).await {
                    Ok(result) => result,
                    Err(_) => Err(SourceError::Timeout {
                        source_name: source.name().to_string(),
                        after: deadline,
                    }),
                };
                (index, result)
            });
        }

        let mut slots: Vec<Vec<Job>> = vec![Vec::new(); self.sources.len()];
        let mut failures = 0usize;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, Ok(jobs))) => {
                    debug!("{} returned {} jobs", self.sources[index].name(), jobs.len());
                    slots[index] = jobs;
                }
                Ok((_, Err(err))) => {
                    failures += 1;
                    if self.policy == FailurePolicy::FailFast {
                        join_set.abort_all();
                        return Err(AggregationError::Source(err));
                    }
                    warn!(error = %err, "Job source failed, continuing without it");
                }
                Err(join_error) => {
                    failures += 1;
                    if self.policy == FailurePolicy::FailFast {
                        join_set.abort_all();
                        return Err(AggregationError::TaskFailed {
                            reason: join_error.to_string(),
                        });
                    }
                    warn!(error = %join_error, "Job source task failed, continuing without it");
                }
            }
        }

        let jobs = self.merge(slots);

        info!("Jobs found: {}", jobs.len());
        info!(
            "Collected jobs from {} sources ({} failed) in {:.2?}",
            self.sources.len(),
            failures,
            start_time.elapsed()
        );
        Ok(jobs)
    }

    /// Collect and serialize to the JSON wire format.
    pub async fn collect_json(&self) -> Result<String, AggregationError> {
        let jobs = self.collect().await?;
        Ok(serde_json::to_string(&jobs)?)
    }

    /// Concatenate per-source results, dropping jobs that break the model contract
    fn merge(&self, slots: Vec<Vec<Job>>) -> Vec<Job> {
        slots
            .into_iter()
            .flatten()
            .filter(|job| match job.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!(error = %err, "Dropping invalid job");
                    false
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// Source returning fixed jobs after an optional delay
    struct StaticSource {
        name: String,
        count: usize,
        delay: Duration,
    }

    impl StaticSource {
        fn new(name: &str, count: usize) -> Self {
            Self {
                name: name.to_string(),
                count,
                delay: Duration::ZERO,
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl JobSource for StaticSource {
        fn name(&self) -> &str {
            &self.name
        }

        async fn fetch_jobs(&self) -> sources::Result<Vec<Job>> {
            tokio::time::sleep(self.delay).await;
            Ok((0..self.count)
                .map(|i| Job {
                    company: self.name.clone(),
                    title: format!("{} job {}", self.name, i),
                    qualifications: vec![],
                    preferred_qualifications: vec![],
                    description: String::new(),
                    url: format!("https://example.com/{}/{}", self.name, i),
                })
                .collect())
        }
    }

    /// Source that always fails to decode
    struct FailingSource;

    #[async_trait]
    impl JobSource for FailingSource {
        fn name(&self) -> &str {
            "Broken"
        }

        async fn fetch_jobs(&self) -> sources::Result<Vec<Job>> {
            let error = serde_json::from_str::<Vec<Job>>("not json").unwrap_err();
            Err(SourceError::Decode {
                source_name: "Broken".to_string(),
                error,
            })
        }
    }

    /// Source whose task panics
    struct PanickingSource;

    #[async_trait]
    impl JobSource for PanickingSource {
        fn name(&self) -> &str {
            "Panicking"
        }

        async fn fetch_jobs(&self) -> sources::Result<Vec<Job>> {
            panic!("upstream parser bug");
        }
    }

    /// Source that records whether its fetch ran to completion
    struct FlaggingSource {
        delay: Duration,
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl JobSource for FlaggingSource {
        fn name(&self) -> &str {
            "Flagging"
        }

        async fn fetch_jobs(&self) -> sources::Result<Vec<Job>> {
            tokio::time::sleep(self.delay).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(vec![])
        }
    }

    fn aggregator(sources: Vec<Arc<dyn JobSource>>) -> JobAggregator {
        JobAggregator::new(sources).with_timeout(Duration::from_millis(500))
    }

    fn companies(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(|j| j.company.as_str()).collect()
    }

    // ============================================================================
    // Merging
    // ============================================================================

    #[tokio::test]
    async fn test_collect_concatenates_all_sources() {
        let aggregator = aggregator(vec![
            Arc::new(StaticSource::new("Amazon", 2)),
            Arc::new(StaticSource::new("League", 0)),
            Arc::new(StaticSource::new("Shopify", 3)),
        ]);

        let jobs = aggregator.collect().await.unwrap();

        assert_eq!(jobs.len(), 5);
        assert_eq!(
            companies(&jobs),
            vec!["Amazon", "Amazon", "Shopify", "Shopify", "Shopify"]
        );
    }

    #[tokio::test]
    async fn test_collect_order_ignores_completion_order() {
        // First registered source finishes last
        let aggregator = aggregator(vec![
            Arc::new(StaticSource::new("Slow", 2).delayed(Duration::from_millis(80))),
            Arc::new(StaticSource::new("Fast", 2)),
        ]);

        let jobs = aggregator.collect().await.unwrap();
        assert_eq!(companies(&jobs), vec!["Slow", "Slow", "Fast", "Fast"]);

        let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles[..2], ["Slow job 0", "Slow job 1"]);
    }

    #[tokio::test]
    async fn test_collect_with_no_sources() {
        let jobs = aggregator(vec![]).collect().await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_collect_json_wire_format() {
        let aggregator = aggregator(vec![
            Arc::new(StaticSource::new("Amazon", 2)),
            Arc::new(StaticSource::new("League", 0)),
            Arc::new(StaticSource::new("Shopify", 3)),
        ]);

        let body = aggregator.collect_json().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let array = value.as_array().expect("top level is an array");

        assert_eq!(array.len(), 5);
        for object in array {
            let company = object["Company"].as_str().unwrap();
            assert!(!company.is_empty());
            assert!(object["Title"].as_str().unwrap().starts_with(company));
            assert!(object["Qualifications"].is_array());
            assert!(object["PreferredQualifications"].is_array());
        }
    }

    #[tokio::test]
    async fn test_empty_result_serializes_as_empty_array() {
        let body = aggregator(vec![]).collect_json().await.unwrap();
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_invalid_jobs_are_dropped() {
        let aggregator = aggregator(vec![Arc::new(StaticSource::new("", 2))]);
        let jobs = aggregator.collect().await.unwrap();
        assert!(jobs.is_empty());
    }

    // ============================================================================
    // Failure policy
    // ============================================================================

    #[tokio::test]
    async fn test_isolate_keeps_healthy_sources() {
        let aggregator = aggregator(vec![
            Arc::new(StaticSource::new("Amazon", 2)),
            Arc::new(FailingSource),
            Arc::new(StaticSource::new("Shopify", 1)),
        ]);

        let jobs = aggregator.collect().await.unwrap();
        assert_eq!(companies(&jobs), vec!["Amazon", "Amazon", "Shopify"]);
    }

    #[tokio::test]
    async fn test_fail_fast_returns_source_error() {
        let aggregator = aggregator(vec![
            Arc::new(StaticSource::new("Amazon", 2).delayed(Duration::from_millis(50))),
            Arc::new(FailingSource),
        ])
        .with_policy(FailurePolicy::FailFast);

        let err = aggregator.collect().await.unwrap_err();
        match err {
            AggregationError::Source(source_error) => {
                assert!(source_error.is_decode());
                assert_eq!(source_error.source_name(), "Broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_isolates_hanging_source() {
        let aggregator = aggregator(vec![
            Arc::new(StaticSource::new("Hanging", 4).delayed(Duration::from_secs(30))),
            Arc::new(StaticSource::new("League", 1)),
        ])
        .with_timeout(Duration::from_millis(100));

        let started = Instant::now();
        let jobs = aggregator.collect().await.unwrap();

        assert_eq!(companies(&jobs), vec!["League"]);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_timeout_under_fail_fast() {
        let aggregator = aggregator(vec![Arc::new(
            StaticSource::new("Hanging", 1).delayed(Duration::from_secs(30)),
        )])
        .with_timeout(Duration::from_millis(50))
        .with_policy(FailurePolicy::FailFast);

        let err = aggregator.collect().await.unwrap_err();
        assert!(matches!(
            err,
            AggregationError::Source(SourceError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_panicking_source_is_contained() {
        let aggregator = aggregator(vec![
            Arc::new(PanickingSource),
            Arc::new(StaticSource::new("Shopify", 2)),
        ]);

        let jobs = aggregator.collect().await.unwrap();
        assert_eq!(companies(&jobs), vec!["Shopify", "Shopify"]);

        let strict = aggregator_with_policy(FailurePolicy::FailFast);
        assert!(matches!(
            strict.collect().await.unwrap_err(),
            AggregationError::TaskFailed { .. }
        ));
    }

    fn aggregator_with_policy(policy: FailurePolicy) -> JobAggregator {
        aggregator(vec![Arc::new(PanickingSource)]).with_policy(policy)
    }

    #[tokio::test]
    async fn test_dropping_collect_cancels_outstanding_sources() {
        let finished = Arc::new(AtomicBool::new(false));
        let aggregator = JobAggregator::new(vec![Arc::new(FlaggingSource {
            delay: Duration::from_millis(150),
            finished: Arc::clone(&finished),
        })]);

        let outcome = tokio::time::timeout(Duration::from_millis(30), aggregator.collect()).await;
        assert!(outcome.is_err(), "collect should still be waiting on the source");

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_flagging_source_completes_when_awaited() {
        let finished = Arc::new(AtomicBool::new(false));
        let aggregator = JobAggregator::new(vec![Arc::new(FlaggingSource {
            delay: Duration::from_millis(20),
            finished: Arc::clone(&finished),
        })]);

        aggregator.collect().await.unwrap();
        assert!(finished.load(Ordering::SeqCst));
    }

    // ============================================================================
    // Configuration
    // ============================================================================

    #[test]
    fn test_failure_policy_parsing() {
        assert_eq!("isolate".parse(), Ok(FailurePolicy::Isolate));
        assert_eq!("Fail-Fast".parse(), Ok(FailurePolicy::FailFast));
        assert_eq!("fail_fast".parse(), Ok(FailurePolicy::FailFast));
        assert!("sometimes".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_source_names_in_registration_order() {
        let aggregator = aggregator(vec![
            Arc::new(StaticSource::new("Amazon", 0)),
            Arc::new(FailingSource),
        ]);
        assert_eq!(aggregator.source_names(), vec!["Amazon", "Broken"]);
        assert_eq!(aggregator.policy(), FailurePolicy::Isolate);
    }
}
