// src/config.rs

use crate::constants::{APP_DIR_NAME, DB_FILE_NAME, DB_PATH_ENV};
use crate::error::{Result, TrackerError};
use chrono::{Local, NaiveDate};
use log::debug;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Runtime settings resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub today: NaiveDate,
}

impl Config {
    /// Flag, then `ALGO_TRACKER_DB`, then the platform data directory.
    /// `today` falls back to the local calendar day.
    pub fn resolve(db_flag: Option<PathBuf>, today_flag: Option<NaiveDate>) -> Result<Self> {
        let db_path = resolve_db_path(db_flag, env::var_os(DB_PATH_ENV), dirs::data_dir())?;
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let today = today_flag.unwrap_or_else(|| Local::now().date_naive());
        debug!("Config resolved: db {:?}, today {}", db_path, today);
        Ok(Config { db_path, today })
    }
}

pub fn resolve_db_path(
    flag: Option<PathBuf>,
    env_value: Option<OsString>,
    data_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(value));
    }
    data_dir
        .map(|dir| dir.join(APP_DIR_NAME).join(DB_FILE_NAME))
        .ok_or(TrackerError::NoDataDir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins() {
        let path = resolve_db_path(
            Some(PathBuf::from("/tmp/flag.db")),
            Some(OsString::from("/tmp/env.db")),
            Some(PathBuf::from("/data")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/flag.db"));
    }

    #[test]
    fn test_env_before_data_dir() {
        let path = resolve_db_path(None, Some(OsString::from("/tmp/env.db")), Some(PathBuf::from("/data"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/env.db"));

        let path = resolve_db_path(None, Some(OsString::new()), Some(PathBuf::from("/data"))).unwrap();
        assert_eq!(path, PathBuf::from("/data/algo-tracker/algo_tracker.db"));
    }

    #[test]
    fn test_no_location_available() {
        assert!(matches!(resolve_db_path(None, None, None), Err(TrackerError::NoDataDir)));
    }

    #[test]
    fn test_resolve_creates_parent_and_keeps_today() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("tracker.db");
        let today = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();

        let config = Config::resolve(Some(db.clone()), Some(today)).unwrap();
        assert_eq!(config.db_path, db);
        assert_eq!(config.today, today);
        assert!(dir.path().join("nested").exists());
    }
}
