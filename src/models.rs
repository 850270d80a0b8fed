// src/models.rs

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

pub type ProblemId = i64;

// --- Data Models ---

/// Closed set of difficulty labels. Anything unrecognized folds into `Easy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Ok(Difficulty::Easy), // Default fallback, covers "" too
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label: Option<String> = Option::deserialize(deserializer)?;
        Ok(label
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or_default())
    }
}

/// One completed review attempt.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub date: NaiveDate,
    pub success: bool,
}

/// A tracked practice problem.
///
/// `reviews` is the pending schedule (index 0 is the next due day) and is
/// always replaced as a whole. `reviewed` is the append-only outcome history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub id: ProblemId,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    pub reviews: Vec<NaiveDate>,
    pub reviewed: Vec<ReviewOutcome>,
}

impl Problem {
    pub fn next_review(&self) -> Option<NaiveDate> {
        self.reviews.first().copied()
    }
}

/// Candidate problem as submitted by a form or an external sender.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct NewProblem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Message envelope delivered by another window or process.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum InboundEvent {
    #[serde(rename = "ADD_PROBLEM")]
    AddProblem(NewProblem),
}

// --- Query Models ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Difficulty,
    ReviewCount,
    NextReview,
}

impl FromStr for SortKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "difficulty" => Ok(SortKey::Difficulty),
            "reviewCount" => Ok(SortKey::ReviewCount),
            "nextReview" => Ok(SortKey::NextReview),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemQuery {
    pub title: Option<String>,
    /// Comma-separated tag list, OR semantics.
    pub tags: Option<String>,
    pub sort: Option<SortKey>,
}

// --- Analytics Models ---

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyCount {
    pub difficulty: Difficulty,
    pub count: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuccessRate {
    pub success: u32,
    pub total: u32,
}

impl SuccessRate {
    /// Percentage rounded half-up to the nearest integer.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let (s, t) = (self.success as u64, self.total as u64);
        ((s * 200 + t) / (2 * t)) as u32
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    WeakTag { tag: String, percent: u32 },
    AllHealthy,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::WeakTag { tag, percent } => write!(
                f,
                "📌 Review success rate for tag '{}' is only {}%. Focus your reviews there.",
                tag, percent
            ),
            Recommendation::AllHealthy => {
                f.write_str("All tags have a healthy review success rate! 🎉")
            }
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub streak: u32,
    pub recommendation: Recommendation,
    pub due_today: usize,
    pub total_problems: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(success: u32, total: u32) -> SuccessRate {
        SuccessRate { success, total }
    }

    #[test]
    fn test_percent_rounds_half_up() {
        assert_eq!(rate(1, 8).percent(), 13);
        assert_eq!(rate(2, 3).percent(), 67);
        assert_eq!(rate(1, 6).percent(), 17);
        assert_eq!(rate(1, 3).percent(), 33);
        assert_eq!(rate(1, 4).percent(), 25);
    }

    #[test]
    fn test_percent_bounds() {
        assert_eq!(rate(0, 0).percent(), 0);
        assert_eq!(rate(0, 5).percent(), 0);
        assert_eq!(rate(7, 7).percent(), 100);
    }

    #[test]
    fn test_difficulty_fallback() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" Medium ".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!("".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("Insane".parse::<Difficulty>(), Ok(Difficulty::Easy));
    }
}
