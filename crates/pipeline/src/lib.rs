//! Composable filters for narrowing raw upstream postings.
//!
//! This crate provides:
//! - Filter trait for a single keep/reject predicate
//! - FilterPipeline for composing filters into an ordered chain
//! - Reusable filters (seniority markers, experience caps, recency, keywords)
//!
//! ## Architecture
//! Each job source decodes its upstream response into a private raw record
//! type and builds a `FilterPipeline` over that type. Filters read the fields
//! they need through plain accessor functions, so raw records never leave the
//! source that owns them.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//! use pipeline::filters::*;
//!
//! fn title(job: &RawJob) -> &str { &job.title }
//! fn updated(job: &RawJob) -> &str { &job.updated_time }
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(UpdatedRecencyFilter::new(updated, 1))
//!     .add_filter(TitleExcludesFilter::seniority(title));
//!
//! let relevant = pipeline.apply(raw_jobs);
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use traits::{filter_fn, Filter, FnFilter};
