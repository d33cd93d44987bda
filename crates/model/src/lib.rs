//! # Model Crate
//!
//! The normalized job posting shared by every job source and the aggregator.
//!
//! ## Main Components
//!
//! - **types**: The `Job` record and its wire format
//! - **error**: Validation errors for `Job` values
//!
//! ## Example Usage
//!
//! ```ignore
//! use model::Job;
//!
//! let job = Job {
//!     company: "Amazon".to_string(),
//!     title: "Software Development Engineer".to_string(),
//!     qualifications: vec!["Bachelor's degree".to_string()],
//!     preferred_qualifications: vec![],
//!     description: "Build things".to_string(),
//!     url: Job::join_url("https://www.amazon.jobs", "/en/jobs/123"),
//! };
//! job.validate()?;
//! ```

pub mod error;
pub mod types;

pub use error::{ModelError, Result};
pub use types::Job;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_wire_field_names() {
        let job = Job {
            company: "League".to_string(),
            title: "Backend Developer".to_string(),
            qualifications: vec!["Rust".to_string(), "SQL".to_string()],
            preferred_qualifications: vec!["Kubernetes".to_string()],
            description: "Health platform".to_string(),
            url: "https://jobs.lever.co/league/abc".to_string(),
        };

        let value = serde_json::to_value(&job).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "Company",
                "Description",
                "PreferredQualifications",
                "Qualifications",
                "Title",
                "URL"
            ]
        );
        assert_eq!(object["Qualifications"], serde_json::json!(["Rust", "SQL"]));
    }

    #[test]
    fn test_empty_qualifications_serialize_as_arrays() {
        let job = Job {
            company: "Shopify".to_string(),
            title: "Developer".to_string(),
            qualifications: vec![],
            preferred_qualifications: vec![],
            description: String::new(),
            url: String::new(),
        };

        let json = serde_json::to_string(&job).unwrap();
        assert!(json.contains("\"Qualifications\":[]"));
        assert!(json.contains("\"PreferredQualifications\":[]"));
    }

    #[test]
    fn test_job_deserializes_from_wire_format() {
        let json = r#"{
            "Company": "Amazon",
            "Title": "SDE",
            "Qualifications": ["Bachelor's degree"],
            "PreferredQualifications": [],
            "Description": "short",
            "URL": "https://www.amazon.jobs/en/jobs/1"
        }"#;

        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.company, "Amazon");
        assert_eq!(job.qualifications, vec!["Bachelor's degree".to_string()]);
        assert!(job.validate().is_ok());
    }
}
