//! Error types for the model crate.

use thiserror::Error;

/// Ways a `Job` can break the contract every source must uphold
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Every job must name the employer it came from
    #[error("Job '{title}' has an empty company")]
    MissingCompany { title: String },

    /// The posting link must be empty or an absolute http(s) URL
    #[error("Job '{title}' has an invalid URL '{url}': {reason}")]
    InvalidUrl {
        title: String,
        url: String,
        reason: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ModelError>;
