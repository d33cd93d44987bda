//! League Source - Lever postings API
//!
//! Lever returns a JSON array of postings with requirements grouped into
//! titled HTML lists. Postings are kept when they belong to an engineering
//! team, are not senior, and were created recently.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use model::Job;
use pipeline::filters::{KeywordFilter, MaxAgeFilter, TitleExcludesFilter};
use pipeline::FilterPipeline;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::fetch::{build_client, decode_json, fetch_body};
use crate::source::{JobSource, SourceSettings};
use crate::text::{first_paragraph, list_items, BulletSplitter};

pub const LEAGUE_SEARCH_URL: &str = "https://api.lever.co/v0/postings/league?mode=json";
pub const LEAGUE_BASE_URL: &str = "https://jobs.lever.co/league";

const COMPANY: &str = "League";

/// Headings of lists holding required qualifications
const REQUIRED_HEADINGS: &[&str] = &["requirement", "qualification", "you have", "you bring", "need"];

/// Headings of lists holding nice-to-have qualifications
const PREFERRED_HEADINGS: &[&str] = &["bonus", "nice", "plus", "preferred"];

#[derive(Debug, Clone, Default, Deserialize)]
struct LeverCategories {
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LeverList {
    #[serde(default)]
    text: String,
    #[serde(default)]
    content: String,
}

/// Subset of a Lever posting this source reads
#[derive(Debug, Clone, Deserialize)]
struct LeverPosting {
    text: String,
    #[serde(default)]
    categories: LeverCategories,
    #[serde(rename = "descriptionPlain", default)]
    description_plain: Option<String>,
    #[serde(default)]
    lists: Vec<LeverList>,
    #[serde(rename = "hostedUrl", default)]
    hosted_url: Option<String>,
    /// Milliseconds since the epoch
    #[serde(rename = "createdAt", default)]
    created_at: Option<i64>,
}

fn title(posting: &LeverPosting) -> &str {
    &posting.text
}

fn team(posting: &LeverPosting) -> &str {
    posting.categories.team.as_deref().unwrap_or_default()
}

fn created_at(posting: &LeverPosting) -> Option<DateTime<Utc>> {
    posting.created_at.and_then(DateTime::from_timestamp_millis)
}

/// League source backed by the Lever postings API
pub struct LeagueSource {
    client: Client,
    search_url: String,
    base_url: String,
    teams: Vec<String>,
    max_age: TimeDelta,
    reference_time: Option<DateTime<Utc>>,
    splitter: BulletSplitter,
}

impl LeagueSource {
    /// Create a new League source with the production endpoints
    pub fn new(settings: &SourceSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(COMPANY, settings)?,
            search_url: LEAGUE_SEARCH_URL.to_string(),
            base_url: LEAGUE_BASE_URL.to_string(),
            teams: vec!["Engineering".to_string()],
            max_age: TimeDelta::days(60),
            reference_time: None,
            splitter: BulletSplitter::new(["\n"]).exclude_prefixes(["#"]),
        })
    }

    /// Point the source at a different postings endpoint
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Teams whose postings are kept (default: Engineering)
    pub fn with_teams<I, S>(mut self, teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teams = teams.into_iter().map(Into::into).collect();
        self
    }

    /// Measure posting age from a fixed instant instead of the current time
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference_time = Some(now);
        self
    }

    fn filters(&self) -> FilterPipeline<LeverPosting> {
        let now = self.reference_time.unwrap_or_else(Utc::now);
        FilterPipeline::new()
            .add_filter(KeywordFilter::new("TeamFilter", team, &self.teams))
            .add_filter(TitleExcludesFilter::seniority(title))
            .add_filter(MaxAgeFilter::at(created_at, self.max_age, now))
    }

    /// Decode, filter and map one postings response body.
    pub fn jobs_from_body(&self, body: &[u8]) -> Result<Vec<Job>> {
        let postings: Vec<LeverPosting> = decode_json(COMPANY, body)?;
        debug!("Decoded {} League postings", postings.len());

        let jobs = self
            .filters()
            .apply(postings)
            .into_iter()
            .map(|posting| self.to_job(posting))
            .collect();
        Ok(jobs)
    }

    /// Items of every list whose heading mentions one of `headings`
    fn list_lines(&self, posting: &LeverPosting, headings: &[&str]) -> Vec<String> {
        let items = posting
            .lists
            .iter()
            .filter(|list| {
                let heading = list.text.to_lowercase();
                headings.iter().any(|h| heading.contains(h))
            })
            .flat_map(|list| list_items(&list.content));
        self.splitter.clean_lines(items)
    }

    fn to_job(&self, posting: LeverPosting) -> Job {
        // "Nice to have" style headings win over generic ones like "Qualifications"
        let preferred_qualifications = self.list_lines(&posting, PREFERRED_HEADINGS);
        let qualifications = self
            .list_lines(&posting, REQUIRED_HEADINGS)
            .into_iter()
            .filter(|line| !preferred_qualifications.contains(line))
            .collect();

        let description = posting
            .description_plain
            .as_deref()
            .map(first_paragraph)
            .unwrap_or_default();
        let url = Job::join_url(&self.base_url, posting.hosted_url.as_deref().unwrap_or_default());

        if let Some(location) = posting.categories.location.as_deref() {
            debug!("League posting '{}' located in {}", posting.text, location);
        }

        Job {
            company: COMPANY.to_string(),
            title: posting.text,
            qualifications,
            preferred_qualifications,
            description,
            url,
        }
    }
}

#[async_trait]
impl JobSource for LeagueSource {
    fn name(&self) -> &str {
        COMPANY
    }

    #[instrument(skip(self), fields(source = COMPANY))]
    async fn fetch_jobs(&self) -> Result<Vec<Job>> {
        let body = fetch_body(&self.client, COMPANY, &self.search_url).await?;
        let jobs = self.jobs_from_body(&body)?;
        debug!("League produced {} jobs", jobs.len());
        Ok(jobs)
    }
}
