// src/query.rs

use crate::models::{Problem, ProblemQuery, SortKey};
use log::debug;

/// Splits a comma-separated tag filter into lowercase, trimmed, non-empty tags.
pub fn parse_tag_filter(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn matches_title(problem: &Problem, needle: &str) -> bool {
    needle.is_empty() || problem.title.to_lowercase().contains(&needle.to_lowercase())
}

/// OR semantics: one shared tag is enough. An empty filter passes everything.
pub fn matches_any_tag(problem: &Problem, filter_tags: &[String]) -> bool {
    filter_tags.is_empty()
        || problem
            .tags
            .iter()
            .any(|tag| filter_tags.contains(&tag.to_lowercase()))
}

/// Filtered and sorted view of the collection. The input is left untouched.
pub fn query_problems(problems: &[Problem], query: &ProblemQuery) -> Vec<Problem> {
    let title = query.title.as_deref().unwrap_or("");
    let filter_tags = query
        .tags
        .as_deref()
        .map(parse_tag_filter)
        .unwrap_or_default();

    let mut view: Vec<Problem> = problems
        .iter()
        .filter(|p| matches_title(p, title) && matches_any_tag(p, &filter_tags))
        .cloned()
        .collect();

    // All sorts are stable; ties keep collection order.
    match query.sort {
        Some(SortKey::Difficulty) => {
            view.sort_by(|a, b| a.difficulty.as_str().cmp(b.difficulty.as_str()))
        }
        Some(SortKey::ReviewCount) => view.sort_by(|a, b| b.reviewed.len().cmp(&a.reviewed.len())),
        // Unscheduled problems (None) sort before any day.
        Some(SortKey::NextReview) => view.sort_by_key(|p| p.next_review()),
        None => {}
    }

    debug!(
        "[Query] {} of {} problems match (title: {:?}, tags: {:?}, sort: {:?})",
        view.len(),
        problems.len(),
        title,
        filter_tags,
        query.sort
    );
    view
}
