//! Shopify Source - Greenhouse job board API
//!
//! Greenhouse returns absolute posting links and the full posting body as
//! HTML-escaped markup in `content`. Requirements are the list items of that
//! body and the description is its first paragraph.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use model::Job;
use pipeline::filters::{
    ExperienceCapFilter, KeywordFilter, MaxAgeFilter, SENIORITY_MARKERS, TitleExcludesFilter,
};
use pipeline::FilterPipeline;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::fetch::{build_client, decode_json, fetch_body};
use crate::source::{JobSource, SourceSettings};
use crate::text::{fragment_text, list_items, paragraphs, unescape_markup, BulletSplitter};

pub const SHOPIFY_SEARCH_URL: &str =
    "https://boards-api.greenhouse.io/v1/boards/shopify/jobs?content=true";
pub const SHOPIFY_BASE_URL: &str = "https://www.shopify.com/careers";

const COMPANY: &str = "Shopify";

/// Leadership titles on top of the common seniority markers
const LEADERSHIP_MARKERS: &[&str] = &["Staff", "Principal", "Lead", "Director"];

#[derive(Debug, Clone, Default, Deserialize)]
struct GreenhouseLocation {
    #[serde(default)]
    name: String,
}

/// Subset of a Greenhouse job this source reads
#[derive(Debug, Clone, Deserialize)]
struct GreenhouseJob {
    title: String,
    #[serde(default)]
    absolute_url: Option<String>,
    /// RFC 3339 timestamp
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    location: GreenhouseLocation,
    /// HTML-escaped posting body
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct GreenhouseBoard {
    jobs: Vec<GreenhouseJob>,
}

/// A Greenhouse job with its escaped body decoded.
///
/// Filters and mapping both work on decoded text, never on escaped markup.
#[derive(Debug, Clone)]
struct Posting {
    title: String,
    absolute_url: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    location: String,
    /// Whole body as plain text
    text: String,
    list_items: Vec<String>,
    summary: String,
}

impl From<GreenhouseJob> for Posting {
    fn from(job: GreenhouseJob) -> Self {
        let html = unescape_markup(&job.content);
        let updated_at = job
            .updated_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|at| at.with_timezone(&Utc));

        Self {
            title: job.title,
            absolute_url: job.absolute_url,
            updated_at,
            location: job.location.name,
            text: fragment_text(&html),
            list_items: list_items(&html),
            summary: paragraphs(&html).into_iter().next().unwrap_or_default(),
        }
    }
}

fn title(posting: &Posting) -> &str {
    &posting.title
}

fn location(posting: &Posting) -> &str {
    &posting.location
}

fn body_text(posting: &Posting) -> &str {
    &posting.text
}

fn updated_at(posting: &Posting) -> Option<DateTime<Utc>> {
    posting.updated_at
}

/// Shopify source backed by the Greenhouse board API
pub struct ShopifySource {
    client: Client,
    search_url: String,
    base_url: String,
    locations: Vec<String>,
    max_age: TimeDelta,
    reference_time: Option<DateTime<Utc>>,
    splitter: BulletSplitter,
}

impl ShopifySource {
    /// Create a new Shopify source with the production endpoints
    pub fn new(settings: &SourceSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(COMPANY, settings)?,
            search_url: SHOPIFY_SEARCH_URL.to_string(),
            base_url: SHOPIFY_BASE_URL.to_string(),
            locations: vec![
                "Toronto".to_string(),
                "Ottawa".to_string(),
                "Canada".to_string(),
            ],
            max_age: TimeDelta::days(60),
            reference_time: None,
            splitter: BulletSplitter::new(["\n"])
                .exclude_prefixes(["#", "Shopify is an", "At Shopify, we are committed"]),
        })
    }

    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Locations whose postings are kept (default: Toronto, Ottawa, Canada)
    pub fn with_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations = locations.into_iter().map(Into::into).collect();
        self
    }

    /// Measure posting age from a fixed instant instead of the current time
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference_time = Some(now);
        self
    }

    fn filters(&self) -> FilterPipeline<Posting> {
        let now = self.reference_time.unwrap_or_else(Utc::now);
        let markers = SENIORITY_MARKERS.iter().chain(LEADERSHIP_MARKERS).copied();
        FilterPipeline::new()
            .add_filter(KeywordFilter::new("LocationFilter", location, &self.locations))
            .add_filter(TitleExcludesFilter::new(title, markers))
            .add_filter(MaxAgeFilter::at(updated_at, self.max_age, now))
            .add_filter(ExperienceCapFilter::new(body_text))
    }

    /// Decode, filter and map one board response body.
    pub fn jobs_from_body(&self, body: &[u8]) -> Result<Vec<Job>> {
        let board: GreenhouseBoard = decode_json(COMPANY, body)?;
        debug!("Decoded {} Shopify postings", board.jobs.len());

        let postings = board.jobs.into_iter().map(Posting::from).collect();
        let jobs = self
            .filters()
            .apply(postings)
            .into_iter()
            .map(|posting| self.to_job(posting))
            .collect();
        Ok(jobs)
    }

    fn to_job(&self, posting: Posting) -> Job {
        Job {
            company: COMPANY.to_string(),
            qualifications: self.splitter.clean_lines(posting.list_items),
            preferred_qualifications: Vec::new(),
            description: posting.summary,
            url: Job::join_url(
                &self.base_url,
                posting.absolute_url.as_deref().unwrap_or_default(),
            ),
            title: posting.title,
        }
    }
}

#[async_trait]
impl JobSource for ShopifySource {
    fn name(&self) -> &str {
        COMPANY
    }

    #[instrument(skip(self), fields(source = COMPANY))]
    async fn fetch_jobs(&self) -> Result<Vec<Job>> {
        let body = fetch_body(&self.client, COMPANY, &self.search_url).await?;
        let jobs = self.jobs_from_body(&body)?;
        debug!("Shopify produced {} jobs", jobs.len());
        Ok(jobs)
    }
}
