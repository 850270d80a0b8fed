// src/constants.rs

// --- Scheduling ---
pub const REVIEW_OFFSETS_DAYS: [i64; 5] = [0, 1, 3, 7, 14];

// --- Analytics ---
pub const WEAK_TAG_MIN_REVIEWS: u32 = 3;

// --- Dates ---
pub const DAY_FORMAT: &str = "%Y-%m-%d";

// --- Storage ---
pub const APP_DIR_NAME: &str = "algo-tracker";
pub const DB_FILE_NAME: &str = "algo_tracker.db";
pub const DB_PATH_ENV: &str = "ALGO_TRACKER_DB";
pub const EXPORT_FILE_NAME: &str = "problems_backup.json";
