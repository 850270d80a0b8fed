// src/database.rs

use log::{debug, info};
use rusqlite::{Connection, Result};
use std::path::Path;

pub fn open_db(path: &Path) -> Result<Connection> {
    info!("Database path: {:?}", path);
    let conn = Connection::open(path)?;
    init_db(&conn)?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    debug!("init_db: Checking database schema...");

    // `position` keeps collection and list order; problem ids are not keys
    // because uniqueness is the caller's contract.
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS problems (
            position INTEGER PRIMARY KEY,
            id INTEGER NOT NULL,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            difficulty TEXT NOT NULL CHECK (difficulty IN ('Easy','Medium','Hard'))
        );
        CREATE TABLE IF NOT EXISTS problem_tags (
            problem_pos INTEGER NOT NULL,
            position INTEGER NOT NULL,
            tag TEXT NOT NULL,
            PRIMARY KEY (problem_pos, position)
        );
        CREATE TABLE IF NOT EXISTS review_schedule (
            problem_pos INTEGER NOT NULL,
            position INTEGER NOT NULL,
            day TEXT NOT NULL,
            PRIMARY KEY (problem_pos, position)
        );
        CREATE TABLE IF NOT EXISTS review_outcomes (
            problem_pos INTEGER NOT NULL,
            position INTEGER NOT NULL,
            day TEXT NOT NULL,
            success INTEGER NOT NULL,
            PRIMARY KEY (problem_pos, position)
        );
        ",
    )?;

    Ok(())
}
