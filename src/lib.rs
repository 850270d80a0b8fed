//! Spaced repetition scheduling and progress analytics for algorithm
//! practice problems.
//!
//! The engine (`scheduler`, `analytics`, `query`, `tracker`) is pure: the
//! caller owns the collection and passes the current day into every call.
//! `repository` persists the collection in SQLite.

pub mod analytics;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod models;
pub mod query;
pub mod repository;
pub mod scheduler;
pub mod tracker;

pub use error::{Result, TrackerError};
pub use models::{
    Difficulty, InboundEvent, NewProblem, Problem, ProblemId, ProblemQuery, Recommendation,
    ReviewOutcome, SortKey,
};
