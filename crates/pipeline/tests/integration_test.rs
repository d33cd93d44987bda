//! Integration tests for the pipeline.
//!
//! These tests compose the reusable filters the way a job source does and
//! check the chain against a straightforward reference evaluation.

use pipeline::filters::*;
use pipeline::{filter_fn, FilterPipeline};

#[derive(Debug, Clone, PartialEq)]
struct Posting {
    title: String,
    qualifications: String,
    updated: String,
}

fn title(p: &Posting) -> &str {
    &p.title
}

fn qualifications(p: &Posting) -> &str {
    &p.qualifications
}

fn updated(p: &Posting) -> &str {
    &p.updated
}

fn posting(title: &str, qualifications: &str, updated: &str) -> Posting {
    Posting {
        title: title.to_string(),
        qualifications: qualifications.to_string(),
        updated: updated.to_string(),
    }
}

fn create_test_postings() -> Vec<Posting> {
    vec![
        posting("Software Development Engineer", "1+ years", "5 days ago"), // keep
        posting("Senior Software Engineer", "1+ years", "5 days ago"),      // senior
        posting("Software Development Engineer", "3+ years of experience", "1 day ago"), // experience
        posting("Software Development Engineer", "Bachelor's degree", "2 months ago"),   // stale
        posting("Software Development Engineer", "Bachelor's degree", "1 month ago"),    // keep
        posting("Data Engineer", "2 years", "1 year ago"),                  // stale
        posting("Support Engineer", "", "3 hours ago"),                     // keep
    ]
}

fn job_pipeline() -> FilterPipeline<Posting> {
    FilterPipeline::new()
        .add_filter(UpdatedRecencyFilter::new(updated, 1))
        .add_filter(TitleExcludesFilter::seniority(title))
        .add_filter(ExperienceCapFilter::new(qualifications))
}

#[test]
fn test_full_pipeline_filters_correctly() {
    let filtered = job_pipeline().apply(create_test_postings());

    let titles: Vec<(&str, &str)> = filtered
        .iter()
        .map(|p| (p.title.as_str(), p.updated.as_str()))
        .collect();
    assert_eq!(
        titles,
        vec![
            ("Software Development Engineer", "5 days ago"),
            ("Software Development Engineer", "1 month ago"),
            ("Support Engineer", "3 hours ago"),
        ]
    );
}

#[test]
fn test_output_is_order_preserving_subsequence() {
    let pipeline = job_pipeline();
    let input = create_test_postings();

    let expected_count = input.iter().filter(|p| pipeline.accepts(p)).count();
    let filtered = pipeline.apply(input.clone());
    assert_eq!(filtered.len(), expected_count);

    // Every survivor appears in the input after the previous survivor
    let mut cursor = 0;
    for kept in &filtered {
        let offset = input[cursor..]
            .iter()
            .position(|p| p == kept)
            .expect("survivor must come from the input");
        cursor += offset + 1;
    }
}

#[test]
fn test_filter_order_does_not_change_result() {
    let reversed = FilterPipeline::new()
        .add_filter(ExperienceCapFilter::new(qualifications))
        .add_filter(TitleExcludesFilter::seniority(title))
        .add_filter(UpdatedRecencyFilter::new(updated, 1));

    assert_eq!(
        reversed.apply(create_test_postings()),
        job_pipeline().apply(create_test_postings())
    );
}

#[test]
fn test_closure_filters_compose_with_builtins() {
    let pipeline = job_pipeline().add_filter(filter_fn("NoSupport", |p: &Posting| {
        !p.title.contains("Support")
    }));

    let filtered = pipeline.apply_par(create_test_postings());
    assert_eq!(filtered.len(), 2);
    assert!(filtered.iter().all(|p| p.title == "Software Development Engineer"));
}
