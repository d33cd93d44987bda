//! Filter implementations for raw job postings.
//!
//! Every filter reads its input through an accessor function supplied by the
//! job source, so the same filter works over any upstream record shape.

pub mod experience;
pub mod keyword;
pub mod recency;
pub mod title;

// Re-export for convenience
pub use experience::ExperienceCapFilter;
pub use keyword::KeywordFilter;
pub use recency::{MaxAgeFilter, UpdatedRecencyFilter};
pub use title::{TitleExcludesFilter, SENIORITY_MARKERS};
