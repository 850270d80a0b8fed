// src/scheduler.rs

use crate::constants::REVIEW_OFFSETS_DAYS;
use crate::models::{Problem, ReviewOutcome};
use chrono::{Duration, NaiveDate};
use log::debug;
use std::collections::BTreeMap;

// --- Public Interface ---

/// Review days for a problem anchored at `start`: offsets 0, 1, 3, 7 and 14.
///
/// Offset 0 is `start` itself, so a freshly scheduled problem is due the
/// same day. Days past the end of the calendar range are dropped.
pub fn next_review_dates(start: NaiveDate) -> Vec<NaiveDate> {
    REVIEW_OFFSETS_DAYS
        .iter()
        .map_while(|&days| start.checked_add_signed(Duration::days(days)))
        .collect()
}

/// Records one review outcome and re-anchors the whole schedule at `today`,
/// whichever pending day was actually due.
pub fn record_outcome(problem: &Problem, today: NaiveDate, success: bool) -> Problem {
    let mut updated = problem.clone();
    updated.reviewed.push(ReviewOutcome {
        date: today,
        success,
    });
    updated.reviews = next_review_dates(today);

    debug!(
        "[Schedule] Problem {}: outcome {} on {}, next review {:?}",
        updated.id,
        if success { "success" } else { "fail" },
        today,
        updated.next_review()
    );
    updated
}

/// Problems with `day` anywhere in their pending schedule, collection order.
pub fn due_on(problems: &[Problem], day: NaiveDate) -> Vec<&Problem> {
    problems.iter().filter(|p| p.reviews.contains(&day)).collect()
}

/// Number of problems scheduled on each day.
pub fn review_calendar(problems: &[Problem]) -> BTreeMap<NaiveDate, usize> {
    let mut calendar = BTreeMap::new();
    for p in problems {
        for day in &p.reviews {
            *calendar.entry(*day).or_insert(0) += 1;
        }
    }
    calendar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn problem(id: i64, reviews: Vec<NaiveDate>) -> Problem {
        Problem {
            id,
            title: format!("Problem {}", id),
            url: format!("https://leetcode.com/problems/p{}", id),
            difficulty: Difficulty::Easy,
            tags: vec!["array".to_string()],
            reviews,
            reviewed: Vec::new(),
        }
    }

    #[test]
    fn test_schedule_for_new_year() {
        let dates = next_review_dates(day("2024-01-01"));
        assert_eq!(
            dates,
            vec![
                day("2024-01-01"),
                day("2024-01-02"),
                day("2024-01-04"),
                day("2024-01-08"),
                day("2024-01-15"),
            ]
        );
    }

    #[test]
    fn test_schedule_is_strictly_ascending_across_month_end() {
        let start = day("2024-02-27");
        let dates = next_review_dates(start);
        assert_eq!(dates.len(), 5);
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(dates[2], day("2024-03-01"));
        assert_eq!(dates[4], start + Duration::days(14));
    }

    #[test]
    fn test_schedule_stops_at_calendar_end() {
        let dates = next_review_dates(NaiveDate::MAX);
        assert_eq!(dates, vec![NaiveDate::MAX]);

        let near_end = NaiveDate::MAX - Duration::days(5);
        assert_eq!(next_review_dates(near_end).len(), 3);
    }

    #[test]
    fn test_record_outcome_appends_history() {
        let mut p = problem(1, next_review_dates(day("2024-01-01")));
        p.reviewed.push(ReviewOutcome {
            date: day("2024-01-02"),
            success: false,
        });

        let updated = record_outcome(&p, day("2024-01-05"), true);

        assert_eq!(updated.reviewed.len(), 2);
        assert_eq!(updated.reviewed[..1], p.reviewed[..]);
        assert_eq!(
            updated.reviewed[1],
            ReviewOutcome {
                date: day("2024-01-05"),
                success: true
            }
        );
        // input untouched
        assert_eq!(p.reviewed.len(), 1);
    }

    #[test]
    fn test_record_outcome_replaces_schedule() {
        let stale = vec![day("2023-12-01"), day("2023-12-31")];
        let p = problem(2, stale);

        let updated = record_outcome(&p, day("2024-03-10"), false);

        assert_eq!(updated.reviews, next_review_dates(day("2024-03-10")));
        assert_eq!(updated.id, p.id);
        assert_eq!(updated.title, p.title);
    }

    #[test]
    fn test_record_outcome_without_schedule() {
        let p = problem(3, Vec::new());
        let updated = record_outcome(&p, day("2024-03-10"), true);
        assert_eq!(updated.next_review(), Some(day("2024-03-10")));
    }

    #[test]
    fn test_due_on_matches_any_pending_day() {
        let problems = vec![
            problem(1, next_review_dates(day("2024-01-01"))),
            problem(2, next_review_dates(day("2024-01-03"))),
            problem(3, Vec::new()),
        ];

        let due: Vec<i64> = due_on(&problems, day("2024-01-04")).iter().map(|p| p.id).collect();
        assert_eq!(due, vec![1, 2]);

        assert!(due_on(&problems, day("2024-01-05")).is_empty());
    }

    #[test]
    fn test_review_calendar_counts() {
        let problems = vec![
            problem(1, next_review_dates(day("2024-01-01"))),
            problem(2, next_review_dates(day("2024-01-01"))),
            problem(3, vec![day("2024-01-02")]),
        ];

        let calendar = review_calendar(&problems);
        assert_eq!(calendar[&day("2024-01-01")], 2);
        assert_eq!(calendar[&day("2024-01-02")], 3);
        assert_eq!(calendar[&day("2024-01-15")], 2);
        assert_eq!(calendar.len(), 5);
        assert_eq!(calendar.keys().next(), Some(&day("2024-01-01")));
    }
}
