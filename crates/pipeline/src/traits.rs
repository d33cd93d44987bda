//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that lets each job source compose
//! its own chain of predicates over its own raw record type.

use std::marker::PhantomData;

/// A single keep/reject predicate over a raw record of type `T`.
///
/// `Send + Sync` lets a pipeline be shared by concurrently running sources
/// and evaluated from rayon worker threads.
pub trait Filter<T>: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether `record` survives this filter.
    fn keep(&self, record: &T) -> bool;
}

/// A filter backed by a named closure.
pub struct FnFilter<T, F> {
    name: String,
    predicate: F,
    _record: PhantomData<fn(&T)>,
}

impl<T, F> Filter<T> for FnFilter<T, F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn keep(&self, record: &T) -> bool {
        (self.predicate)(record)
    }
}

/// Wrap a closure as a named filter.
pub fn filter_fn<T, F>(name: impl Into<String>, predicate: F) -> FnFilter<T, F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    FnFilter {
        name: name.into(),
        predicate,
        _record: PhantomData,
    }
}
