//! The normalized job record.
//!
//! Every source maps its upstream postings into `Job`. The serialized field
//! names are consumed by existing front ends and must not change.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ModelError, Result};

/// A job posting in the provider-agnostic shape returned to callers.
///
/// Jobs only live for the duration of one aggregation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Employer name, a constant chosen by the source
    #[serde(rename = "Company")]
    pub company: String,

    /// Title exactly as the upstream listed it
    #[serde(rename = "Title")]
    pub title: String,

    /// One entry per requirement line, in source order
    #[serde(rename = "Qualifications", default)]
    pub qualifications: Vec<String>,

    /// "Nice to have" lines, kept apart from `qualifications`
    #[serde(rename = "PreferredQualifications", default)]
    pub preferred_qualifications: Vec<String>,

    /// Short free-text summary
    #[serde(rename = "Description", default)]
    pub description: String,

    /// Absolute link to the original posting
    #[serde(rename = "URL", default)]
    pub url: String,
}

impl Job {
    /// Build a posting link from a source's base URL and a path it returned.
    ///
    /// Absolute paths are returned unchanged and an empty path gives an empty
    /// link, so a missing upstream field never produces a bare base URL.
    pub fn join_url(base: &str, path: &str) -> String {
        let path = path.trim();
        if path.is_empty() {
            return String::new();
        }
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match (base.ends_with('/'), path.starts_with('/')) {
            (true, true) => format!("{}{}", base, &path[1..]),
            (false, false) => format!("{}/{}", base, path),
            _ => format!("{}{}", base, path),
        }
    }

    /// Check the invariants the aggregator relies on.
    pub fn validate(&self) -> Result<()> {
        if self.company.trim().is_empty() {
            return Err(ModelError::MissingCompany {
                title: self.title.clone(),
            });
        }

        if self.url.is_empty() {
            return Ok(());
        }

        let invalid = |reason: String| ModelError::InvalidUrl {
            title: self.title.clone(),
            url: self.url.clone(),
            reason,
        };

        let parsed = Url::parse(&self.url).map_err(|e| invalid(e.to_string()))?;
        match parsed.scheme() {
            "http" | "https" if parsed.host_str().is_some() => Ok(()),
            "http" | "https" => Err(invalid("missing host".to_string())),
            other => Err(invalid(format!("unsupported scheme '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_with_url(url: &str) -> Job {
        Job {
            company: "Amazon".to_string(),
            title: "SDE".to_string(),
            qualifications: vec![],
            preferred_qualifications: vec![],
            description: String::new(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_join_url_relative_path() {
        assert_eq!(
            Job::join_url("https://www.amazon.jobs", "/en/jobs/123/sde"),
            "https://www.amazon.jobs/en/jobs/123/sde"
        );
    }

    #[test]
    fn test_join_url_normalizes_slashes() {
        assert_eq!(
            Job::join_url("https://www.amazon.jobs/", "/en/jobs/1"),
            "https://www.amazon.jobs/en/jobs/1"
        );
        assert_eq!(
            Job::join_url("https://www.amazon.jobs", "en/jobs/1"),
            "https://www.amazon.jobs/en/jobs/1"
        );
    }

    #[test]
    fn test_join_url_keeps_absolute_links() {
        assert_eq!(
            Job::join_url("https://www.amazon.jobs", "https://jobs.lever.co/league/1"),
            "https://jobs.lever.co/league/1"
        );
    }

    #[test]
    fn test_join_url_empty_path() {
        assert_eq!(Job::join_url("https://www.amazon.jobs", ""), "");
        assert_eq!(Job::join_url("https://www.amazon.jobs", "   "), "");
    }

    #[test]
    fn test_validate_accepts_empty_and_absolute_urls() {
        assert!(job_with_url("").validate().is_ok());
        assert!(job_with_url("https://www.amazon.jobs/en/jobs/1").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_relative_url() {
        let err = job_with_url("/en/jobs/1").validate().unwrap_err();
        assert!(matches!(err, ModelError::InvalidUrl { .. }));
    }

    #[test]
    fn test_validate_rejects_other_schemes() {
        let err = job_with_url("ftp://example.com/job").validate().unwrap_err();
        assert!(matches!(err, ModelError::InvalidUrl { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_company() {
        let mut job = job_with_url("");
        job.company = "  ".to_string();
        assert_eq!(
            job.validate().unwrap_err(),
            ModelError::MissingCompany {
                title: "SDE".to_string()
            }
        );
    }
}
