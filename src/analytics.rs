// src/analytics.rs

use crate::constants::WEAK_TAG_MIN_REVIEWS;
use crate::models::{
    Difficulty, DifficultyCount, Problem, Recommendation, SuccessRate, Summary, TagCount,
};
use crate::scheduler;
use chrono::NaiveDate;
use log::debug;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

// --- Streak ---

/// Consecutive days, counting back from `today`, with at least one outcome.
pub fn streak(problems: &[Problem], today: NaiveDate) -> u32 {
    let active_days: HashSet<NaiveDate> = problems
        .iter()
        .flat_map(|p| p.reviewed.iter().map(|r| r.date))
        .collect();

    let mut count = 0;
    let mut cursor = Some(today);
    while let Some(day) = cursor {
        if !active_days.contains(&day) {
            break;
        }
        count += 1;
        cursor = day.pred_opt();
    }

    debug!("[Analytics] Streak as of {}: {} day(s)", today, count);
    count
}

// --- Weak Tag ---

/// Per-tag outcome totals in first-seen order.
///
/// A problem contributes its whole history once for every tag it carries.
pub fn tag_success_rates(problems: &[Problem]) -> Vec<(String, SuccessRate)> {
    let mut order: Vec<(String, SuccessRate)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for p in problems {
        let successes = p.reviewed.iter().filter(|r| r.success).count() as u32;
        let total = p.reviewed.len() as u32;

        for tag in &p.tags {
            let slot = *index.entry(tag.clone()).or_insert_with(|| {
                order.push((tag.clone(), SuccessRate::default()));
                order.len() - 1
            });
            let rate = &mut order[slot].1;
            rate.success += successes;
            rate.total += total;
        }
    }
    order
}

/// Tag with the lowest success ratio among tags with enough reviews.
pub fn weak_tag_recommendation(problems: &[Problem]) -> Recommendation {
    let weakest = tag_success_rates(problems)
        .into_iter()
        .filter(|(_, rate)| rate.total >= WEAK_TAG_MIN_REVIEWS)
        .min_by(|(_, a), (_, b)| compare_ratio(a, b));

    match weakest {
        Some((tag, rate)) => {
            debug!(
                "[Analytics] Weakest tag: {} ({}/{})",
                tag, rate.success, rate.total
            );
            Recommendation::WeakTag {
                tag,
                percent: rate.percent(),
            }
        }
        None => Recommendation::AllHealthy,
    }
}

// a.success / a.total vs b.success / b.total without floating point.
fn compare_ratio(a: &SuccessRate, b: &SuccessRate) -> Ordering {
    let lhs = a.success as u64 * b.total as u64;
    let rhs = b.success as u64 * a.total as u64;
    lhs.cmp(&rhs)
}

// --- Distribution ---

/// Problem count per difficulty, in Easy/Medium/Hard order, zero buckets included.
pub fn difficulty_distribution(problems: &[Problem]) -> Vec<DifficultyCount> {
    Difficulty::ALL
        .iter()
        .map(|&difficulty| DifficultyCount {
            difficulty,
            count: problems.iter().filter(|p| p.difficulty == difficulty).count(),
        })
        .collect()
}

/// Chart rows: like `difficulty_distribution` but without empty buckets.
pub fn difficulty_chart(problems: &[Problem]) -> Vec<DifficultyCount> {
    difficulty_distribution(problems)
        .into_iter()
        .filter(|row| row.count > 0)
        .collect()
}

/// Problem count per tag, most used first. Equal counts keep first-seen order.
pub fn tag_distribution(problems: &[Problem]) -> Vec<TagCount> {
    let mut rows: Vec<TagCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tag in problems.iter().flat_map(|p| p.tags.iter()) {
        match index.get(tag.as_str()) {
            Some(&i) => rows[i].count += 1,
            None => {
                index.insert(tag.as_str(), rows.len());
                rows.push(TagCount {
                    tag: tag.clone(),
                    count: 1,
                });
            }
        }
    }

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

// --- Per Problem ---

pub fn success_rate(problem: &Problem) -> SuccessRate {
    SuccessRate {
        success: problem.reviewed.iter().filter(|r| r.success).count() as u32,
        total: problem.reviewed.len() as u32,
    }
}

pub fn next_review_label(problem: &Problem) -> String {
    problem
        .next_review()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Dashboard header: streak, recommendation and today's workload.
pub fn summarize(problems: &[Problem], today: NaiveDate) -> Summary {
    Summary {
        streak: streak(problems, today),
        recommendation: weak_tag_recommendation(problems),
        due_today: scheduler::due_on(problems, today).len(),
        total_problems: problems.len(),
    }
}
