// src/repository.rs

use crate::constants::DAY_FORMAT;
use crate::database;
use crate::models::{Problem, ReviewOutcome};
use chrono::NaiveDate;
use log::{debug, warn};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result};
use std::path::Path;

/// Load-all/save-all persistence of the problem collection.
pub struct ProblemStore {
    conn: Connection,
}

impl ProblemStore {
    pub fn new(conn: Connection) -> Self {
        ProblemStore { conn }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(database::open_db(path)?))
    }

    /// Stored collection. Rows that do not decode yield an empty collection;
    /// lock and I/O failures are returned so the caller never saves over
    /// data it could not read.
    pub fn load(&self) -> Result<Vec<Problem>> {
        match load_problems(&self.conn) {
            Ok(problems) => Ok(problems),
            Err(e) if is_malformed_data(&e) => {
                warn!("Stored problems unreadable, starting empty: {}", e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    pub fn save(&mut self, problems: &[Problem]) -> Result<()> {
        save_problems(&mut self.conn, problems)
    }
}

fn is_malformed_data(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
    )
}

fn parse_day(column: usize, raw: String) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&raw, DAY_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Reads the whole collection in stored order.
pub fn load_problems(conn: &Connection) -> Result<Vec<Problem>> {
    let mut stmt =
        conn.prepare("SELECT position, id, title, url, difficulty FROM problems ORDER BY position")?;

    let rows = stmt
        .query_map([], |row| {
            let difficulty: String = row.get(4)?;
            Ok((
                row.get::<_, i64>(0)?,
                Problem {
                    id: row.get(1)?,
                    title: row.get(2)?,
                    url: row.get(3)?,
                    difficulty: difficulty.parse().unwrap_or_default(),
                    tags: Vec::new(),
                    reviews: Vec::new(),
                    reviewed: Vec::new(),
                },
            ))
        })?
        .collect::<Result<Vec<_>>>()?;

    let mut problems = Vec::with_capacity(rows.len());
    for (pos, mut p) in rows {
        p.tags = get_tags(conn, pos)?;
        p.reviews = get_schedule(conn, pos)?;
        p.reviewed = get_outcomes(conn, pos)?;
        problems.push(p);
    }

    debug!("[DB] Loaded {} problems", problems.len());
    Ok(problems)
}

pub fn get_tags(conn: &Connection, problem_pos: i64) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT tag FROM problem_tags WHERE problem_pos = ? ORDER BY position")?;
    let tags = stmt
        .query_map([problem_pos], |row| row.get(0))?
        .collect::<Result<Vec<String>>>()?;
    Ok(tags)
}

pub fn get_schedule(conn: &Connection, problem_pos: i64) -> Result<Vec<NaiveDate>> {
    let mut stmt =
        conn.prepare("SELECT day FROM review_schedule WHERE problem_pos = ? ORDER BY position")?;
    let days = stmt
        .query_map([problem_pos], |row| parse_day(0, row.get(0)?))?
        .collect::<Result<Vec<NaiveDate>>>()?;
    Ok(days)
}

pub fn get_outcomes(conn: &Connection, problem_pos: i64) -> Result<Vec<ReviewOutcome>> {
    let mut stmt = conn.prepare(
        "SELECT day, success FROM review_outcomes WHERE problem_pos = ? ORDER BY position",
    )?;
    let outcomes = stmt
        .query_map([problem_pos], |row| {
            Ok(ReviewOutcome {
                date: parse_day(0, row.get(0)?)?,
                success: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<ReviewOutcome>>>()?;
    Ok(outcomes)
}

/// Replaces the stored collection in one transaction.
pub fn save_problems(conn: &mut Connection, problems: &[Problem]) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "DELETE FROM review_outcomes;
         DELETE FROM review_schedule;
         DELETE FROM problem_tags;
         DELETE FROM problems;",
    )?;

    {
        let mut p_stmt = tx.prepare(
            "INSERT INTO problems (position, id, title, url, difficulty) VALUES (?, ?, ?, ?, ?)",
        )?;
        let mut t_stmt =
            tx.prepare("INSERT INTO problem_tags (problem_pos, position, tag) VALUES (?, ?, ?)")?;
        let mut s_stmt =
            tx.prepare("INSERT INTO review_schedule (problem_pos, position, day) VALUES (?, ?, ?)")?;
        let mut o_stmt = tx.prepare(
            "INSERT INTO review_outcomes (problem_pos, position, day, success) VALUES (?, ?, ?, ?)",
        )?;

        for (pos, p) in problems.iter().enumerate() {
            let pos = pos as i64;
            p_stmt.execute(params![pos, p.id, p.title, p.url, p.difficulty.as_str()])?;
            for (i, tag) in p.tags.iter().enumerate() {
                t_stmt.execute(params![pos, i as i64, tag])?;
            }
            for (i, day) in p.reviews.iter().enumerate() {
                s_stmt.execute(params![pos, i as i64, day.format(DAY_FORMAT).to_string()])?;
            }
            for (i, r) in p.reviewed.iter().enumerate() {
                o_stmt.execute(params![
                    pos,
                    i as i64,
                    r.date.format(DAY_FORMAT).to_string(),
                    r.success
                ])?;
            }
        }
    }

    tx.commit()?;
    debug!("[DB] Saved {} problems", problems.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use crate::scheduler;
    use std::time::Duration;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn memory_store() -> ProblemStore {
        let conn = Connection::open_in_memory().unwrap();
        database::init_db(&conn).unwrap();
        ProblemStore::new(conn)
    }

    fn sample() -> Vec<Problem> {
        vec![
            Problem {
                id: 1718000000000,
                title: "Coin Change".to_string(),
                url: "https://leetcode.com/problems/coin-change".to_string(),
                difficulty: Difficulty::Medium,
                tags: vec!["dp".to_string(), "bfs".to_string()],
                reviews: scheduler::next_review_dates(day("2024-06-10")),
                reviewed: vec![
                    ReviewOutcome { date: day("2024-06-09"), success: false },
                    ReviewOutcome { date: day("2024-06-10"), success: true },
                ],
            },
            Problem {
                id: 7,
                title: "Two Sum".to_string(),
                url: "http://leetcode.com/problems/two-sum".to_string(),
                difficulty: Difficulty::Easy,
                tags: Vec::new(),
                reviews: Vec::new(),
                reviewed: Vec::new(),
            },
        ]
    }

    #[test]
    fn test_empty_store_loads_empty() {
        let store = memory_store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let mut store = memory_store();
        let problems = sample();
        store.save(&problems).unwrap();
        assert_eq!(store.load().unwrap(), problems);
    }

    #[test]
    fn test_save_replaces_previous_collection() {
        let mut store = memory_store();
        store.save(&sample()).unwrap();

        let remaining = vec![sample().remove(1)];
        store.save(&remaining).unwrap();
        assert_eq!(store.load().unwrap(), remaining);
    }

    #[test]
    fn test_malformed_rows_fall_back_to_empty() {
        let mut store = memory_store();
        store.save(&sample()).unwrap();
        store
            .conn
            .execute("UPDATE review_schedule SET day = 'not-a-day'", [])
            .unwrap();

        assert!(load_problems(&store.conn).is_err());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_missing_schema_is_an_error() {
        let store = ProblemStore::new(Connection::open_in_memory().unwrap());
        assert!(store.load().is_err());
    }

    #[test]
    fn test_locked_database_is_not_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("algo_tracker.db");

        let mut store = ProblemStore::open(&path).unwrap();
        store.save(&sample()).unwrap();
        store.conn.busy_timeout(Duration::from_millis(50)).unwrap();

        let writer = Connection::open(&path).unwrap();
        writer.execute_batch("BEGIN EXCLUSIVE").unwrap();
        assert!(store.load().is_err());
        writer.execute_batch("COMMIT").unwrap();

        assert_eq!(store.load().unwrap(), sample());
    }
}
