// src/tracker.rs

use crate::error::{Result, TrackerError};
use crate::models::{InboundEvent, NewProblem, Problem, ProblemId};
use crate::scheduler;
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::path::Path;

// --- Input Normalization ---

/// Splits comma-separated tag input, trims, drops empties and repeats.
pub fn parse_tags(input: &str) -> Vec<String> {
    normalize_tags(input.split(',').map(str::to_string).collect())
}

pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

pub fn validate_candidate(candidate: &NewProblem) -> Result<()> {
    if candidate.title.trim().is_empty() || candidate.url.trim().is_empty() {
        return Err(TrackerError::MissingField);
    }
    if !candidate.url.starts_with("http://") && !candidate.url.starts_with("https://") {
        return Err(TrackerError::InvalidUrl(candidate.url.clone()));
    }
    Ok(())
}

/// Soft uniqueness: an existing problem with the same title or the same URL.
pub fn find_duplicate<'a>(problems: &'a [Problem], candidate: &NewProblem) -> Option<&'a Problem> {
    problems
        .iter()
        .find(|p| p.title == candidate.title || p.url == candidate.url)
}

pub fn next_problem_id(problems: &[Problem]) -> ProblemId {
    problems.iter().map(|p| p.id).max().map_or(1, |max| max + 1)
}

// --- Events ---

/// Adds a validated problem scheduled from `today`. Returns the new collection.
pub fn add_problem(problems: &[Problem], candidate: NewProblem, today: NaiveDate) -> Result<Vec<Problem>> {
    validate_candidate(&candidate)?;

    let problem = Problem {
        id: next_problem_id(problems),
        title: candidate.title,
        url: candidate.url,
        difficulty: candidate.difficulty,
        tags: normalize_tags(candidate.tags),
        reviews: scheduler::next_review_dates(today),
        reviewed: Vec::new(),
    };
    info!("Added problem: {} (ID: {})", problem.title, problem.id);

    let mut updated = problems.to_vec();
    updated.push(problem);
    Ok(updated)
}

/// Handles a message from another sender. Adds go through the duplicate check.
pub fn handle_inbound(problems: &[Problem], event: InboundEvent, today: NaiveDate) -> Result<Vec<Problem>> {
    match event {
        InboundEvent::AddProblem(candidate) => {
            if let Some(existing) = find_duplicate(problems, &candidate) {
                warn!(
                    "Inbound problem rejected, duplicate of {} (ID: {})",
                    existing.title, existing.id
                );
                return Err(TrackerError::Duplicate(existing.title.clone()));
            }
            add_problem(problems, candidate, today)
        }
    }
}

pub fn parse_inbound(message: &str) -> Result<InboundEvent> {
    Ok(serde_json::from_str(message)?)
}

pub fn mark_reviewed(
    problems: &[Problem],
    id: ProblemId,
    today: NaiveDate,
    success: bool,
) -> Result<Vec<Problem>> {
    if !problems.iter().any(|p| p.id == id) {
        return Err(TrackerError::ProblemNotFound(id));
    }
    info!(
        "Marked problem {} as {}",
        id,
        if success { "reviewed" } else { "failed" }
    );
    Ok(problems
        .iter()
        .map(|p| {
            if p.id == id {
                scheduler::record_outcome(p, today, success)
            } else {
                p.clone()
            }
        })
        .collect())
}

pub fn delete_problem(problems: &[Problem], id: ProblemId) -> Result<Vec<Problem>> {
    if !problems.iter().any(|p| p.id == id) {
        return Err(TrackerError::ProblemNotFound(id));
    }
    info!("Deleted problem {}", id);
    Ok(problems.iter().filter(|p| p.id != id).cloned().collect())
}

// --- Import / Export ---

/// Accepts a decoded value only if it is an array of well-formed problems.
/// Any bad entry rejects the whole import. Tags are normalized like new ones.
pub fn import_value(value: Value) -> Result<Vec<Problem>> {
    let Value::Array(entries) = value else {
        warn!("Import rejected: top-level value is not an array");
        return Err(TrackerError::ImportNotArray);
    };

    let mut problems = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let mut problem: Problem = serde_json::from_value(entry).map_err(|e| {
            warn!("Import rejected at entry {}: {}", index, e);
            TrackerError::ImportEntry {
                index,
                reason: e.to_string(),
            }
        })?;
        problem.tags = normalize_tags(problem.tags);
        problems.push(problem);
    }

    info!("Imported {} problems", problems.len());
    Ok(problems)
}

pub fn import_json(text: &str) -> Result<Vec<Problem>> {
    let value: Value = serde_json::from_str(text)?;
    import_value(value)
}

pub fn export_json(problems: &[Problem]) -> Result<String> {
    Ok(serde_json::to_string_pretty(problems)?)
}

pub fn export_to_path(problems: &[Problem], path: &Path) -> Result<()> {
    fs::write(path, export_json(problems)?)?;
    debug!("Exported {} problems to {:?}", problems.len(), path);
    Ok(())
}

pub fn import_from_path(path: &Path) -> Result<Vec<Problem>> {
    let text = fs::read_to_string(path)?;
    import_json(&text)
}
