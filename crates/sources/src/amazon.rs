//! Amazon Source - amazon.jobs search API
//!
//! Fetches software development postings for the Toronto area and keeps the
//! ones suitable for early-career engineers.
//!
//! ## Pipeline
//! 1. GET the search JSON (`{"jobs": [...]}`)
//! 2. Drop postings not updated within the last month
//! 3. Drop senior titles and postings asking for 3+ years of experience
//! 4. Split `<br/>`-delimited qualification text into lines
//! 5. Build absolute posting links from `job_path`

use async_trait::async_trait;
use model::Job;
use pipeline::filters::{ExperienceCapFilter, TitleExcludesFilter, UpdatedRecencyFilter};
use pipeline::FilterPipeline;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::fetch::{build_client, decode_json, fetch_body};
use crate::source::{JobSource, SourceSettings};
use crate::text::BulletSplitter;

pub const AMAZON_SEARCH_URL: &str = "https://www.amazon.jobs/en/search.json?base_query=&category[]=software-development&job_function_id[]=job_function_corporate_80rdb4&normalized_location[]=Toronto,+Ontario,+CAN&offset=0&query_options=&radius=24km&region=&result_limit=200&sort=recent";
pub const AMAZON_BASE_URL: &str = "https://www.amazon.jobs";

const COMPANY: &str = "Amazon";

/// Subset of an amazon.jobs posting this source reads
#[derive(Debug, Clone, Deserialize)]
struct AmazonJob {
    title: String,
    #[serde(default)]
    description_short: Option<String>,
    #[serde(default)]
    basic_qualifications: Option<String>,
    #[serde(default)]
    preferred_qualifications: Option<String>,
    #[serde(default)]
    job_path: Option<String>,
    #[serde(default)]
    updated_time: Option<String>,
}

/// Top level of the search response
#[derive(Debug, Deserialize)]
struct AmazonJobList {
    jobs: Vec<AmazonJob>,
}

fn title(job: &AmazonJob) -> &str {
    &job.title
}

fn basic_qualifications(job: &AmazonJob) -> &str {
    job.basic_qualifications.as_deref().unwrap_or_default()
}

fn updated_time(job: &AmazonJob) -> &str {
    job.updated_time.as_deref().unwrap_or_default()
}

/// Amazon source backed by the amazon.jobs search API
pub struct AmazonSource {
    client: Client,
    search_url: String,
    base_url: String,
    splitter: BulletSplitter,
}

impl AmazonSource {
    /// Create a new Amazon source with the production endpoints
    pub fn new(settings: &SourceSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(COMPANY, settings)?,
            search_url: AMAZON_SEARCH_URL.to_string(),
            base_url: AMAZON_BASE_URL.to_string(),
            splitter: BulletSplitter::new(["<br/>", "<br>", "<br />"])
                .strip_tokens(["·", "*", "•"])
                .exclude_prefixes(["#", "Amazon is an", "Amazon is committed"]),
        })
    }

    /// Point the source at a different search endpoint
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    /// Configure the base URL posting paths are joined onto
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Filter chain, most selective first
    fn filters(&self) -> FilterPipeline<AmazonJob> {
        FilterPipeline::new()
            .add_filter(UpdatedRecencyFilter::new(updated_time, 1))
            .add_filter(TitleExcludesFilter::seniority(title))
            .add_filter(ExperienceCapFilter::new(basic_qualifications))
    }

    /// Decode, filter and map one search response body.
    pub fn jobs_from_body(&self, body: &[u8]) -> Result<Vec<Job>> {
        let list: AmazonJobList = decode_json(COMPANY, body)?;
        debug!("Decoded {} Amazon postings", list.jobs.len());

        let jobs = self
            .filters()
            .apply(list.jobs)
            .into_iter()
            .map(|job| self.to_job(job))
            .collect();
        Ok(jobs)
    }

    fn to_job(&self, job: AmazonJob) -> Job {
        Job {
            company: COMPANY.to_string(),
            qualifications: self.splitter.split(basic_qualifications(&job)),
            preferred_qualifications: self
                .splitter
                .split(job.preferred_qualifications.as_deref().unwrap_or_default()),
            description: job.description_short.unwrap_or_default(),
            url: Job::join_url(&self.base_url, job.job_path.as_deref().unwrap_or_default()),
            title: job.title,
        }
    }
}

#[async_trait]
impl JobSource for AmazonSource {
    fn name(&self) -> &str {
        COMPANY
    }

    #[instrument(skip(self), fields(source = COMPANY))]
    async fn fetch_jobs(&self) -> Result<Vec<Job>> {
        let body = fetch_body(&self.client, COMPANY, &self.search_url).await?;
        let jobs = self.jobs_from_body(&body)?;
        debug!("Amazon produced {} jobs", jobs.len());
        Ok(jobs)
    }
}
