//! # Sources Crate
//!
//! This crate implements the upstream job boards the aggregator queries.
//!
//! ## Components
//!
//! ### JobSource
//! The capability every board implements: fetch, decode, filter, map.
//!
//! ### Built-in boards
//! - **Amazon**: amazon.jobs search JSON, `<br/>`-delimited qualifications
//! - **League**: Lever postings API, requirements grouped in HTML lists
//! - **Shopify**: Greenhouse board API, HTML-escaped posting bodies
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{default_sources, SourceSettings};
//!
//! let sources = default_sources(&SourceSettings::default())?;
//! for source in &sources {
//!     let jobs = source.fetch_jobs().await?;
//!     println!("{}: {} jobs", source.name(), jobs.len());
//! }
//! ```

pub mod amazon;
pub mod error;
pub mod fetch;
pub mod league;
pub mod shopify;
pub mod source;
pub mod text;

use std::sync::Arc;

// Re-export commonly used types
pub use amazon::AmazonSource;
pub use error::{Result, SourceError};
pub use league::LeagueSource;
pub use shopify::ShopifySource;
pub use source::{JobSource, SourceSettings};

/// The boards queried on every aggregation, in registration order.
pub fn default_sources(settings: &SourceSettings) -> Result<Vec<Arc<dyn JobSource>>> {
    Ok(vec![
        Arc::new(AmazonSource::new(settings)?),
        Arc::new(LeagueSource::new(settings)?),
        Arc::new(ShopifySource::new(settings)?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_registration_order() {
        let sources = default_sources(&SourceSettings::default()).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Amazon", "League", "Shopify"]);
    }

    #[test]
    fn test_source_error_classification() {
        let err = SourceError::Status {
            source_name: "Amazon".to_string(),
            status: 503,
        };
        assert!(err.is_fetch());
        assert!(!err.is_decode());
        assert_eq!(err.source_name(), "Amazon");
        assert_eq!(err.to_string(), "Amazon: upstream returned HTTP 503");
    }
}
