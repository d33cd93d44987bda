//! The FilterPipeline chains filters over one raw record type.
//!
//! Records survive only when every filter keeps them. Filters run left to
//! right and evaluation of a record stops at the first rejection, so the
//! cheapest and most selective filter belongs first.

use crate::traits::Filter;
use rayon::prelude::*;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(UpdatedRecencyFilter::new(updated, 1))
///     .add_filter(TitleExcludesFilter::seniority(title))
///     .add_filter(ExperienceCapFilter::new(qualifications));
///
/// let relevant = pipeline.apply(raw_jobs);
/// ```
pub struct FilterPipeline<T> {
    filters: Vec<Box<dyn Filter<T>>>,
}

impl<T> FilterPipeline<T> {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the end of the chain (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter<T> + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Number of filters in the chain.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Filter names in evaluation order.
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Whether a single record passes every filter.
    pub fn accepts(&self, record: &T) -> bool {
        self.filters.iter().all(|filter| filter.keep(record))
    }

    /// Apply the chain to a batch, keeping survivors in their original order.
    ///
    /// ## Algorithm
    /// 1. For each record, find the first filter that rejects it
    /// 2. Count the rejection against that filter
    /// 3. Keep the record when no filter rejects it
    /// 4. Log per-filter rejection counts
    pub fn apply(&self, records: Vec<T>) -> Vec<T> {
        let input_count = records.len();
        let mut rejected = vec![0usize; self.filters.len()];

        let kept: Vec<T> = records
            .into_iter()
            .filter(|record| {
                match self.filters.iter().position(|filter| !filter.keep(record)) {
                    Some(index) => {
                        rejected[index] += 1;
                        false
                    }
                    None => true,
                }
            })
            .collect();

        for (filter, count) in self.filters.iter().zip(&rejected) {
            tracing::debug!("Filter {} rejected {} records", filter.name(), count);
        }
        tracing::debug!(
            "Filter pipeline kept {} of {} records",
            kept.len(),
            input_count
        );

        kept
    }
}

impl<T: Send> FilterPipeline<T> {
    /// Same result as [`FilterPipeline::apply`], evaluated across records on
    /// the rayon pool. Used for large upstream pages.
    pub fn apply_par(&self, records: Vec<T>) -> Vec<T> {
        let input_count = records.len();
        let kept: Vec<T> = records
            .into_par_iter()
            .filter(|record| self.accepts(record))
            .collect();

        tracing::debug!(
            "Parallel filter pipeline kept {} of {} records",
            kept.len(),
            input_count
        );
        kept
    }
}

impl<T> Default for FilterPipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}
