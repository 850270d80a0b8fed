// src/error.rs

use crate::models::ProblemId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Title and URL are required.")]
    MissingField,

    #[error("Please enter a valid URL starting with http:// or https:// (got {0})")]
    InvalidUrl(String),

    #[error("Problem already tracked: {0}")]
    Duplicate(String),

    #[error("Import rejected: expected a JSON array of problems")]
    ImportNotArray,

    #[error("Import rejected: entry {index} is malformed ({reason})")]
    ImportEntry { index: usize, reason: String },

    #[error("Problem not found: {0}")]
    ProblemNotFound(ProblemId),

    #[error("Could not determine an application data directory")]
    NoDataDir,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
