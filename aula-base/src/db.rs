// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Database module.
//!
//! A single SQLite connection shared by every store. `tokio_rusqlite` runs
//! each closure on the connection's own thread, one at a time, so that
//! thread is also the only writer of the id sequences.

use std::{fs, path::Path};

use tokio_rusqlite::{Connection, OpenFlags};
use tracing::{debug, error};

use crate::{config::DbConfig, error::Error};

const TARGET_DB: &str = "Aula-Database";

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;
    CREATE TABLE IF NOT EXISTS questions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        statement TEXT NOT NULL,
        options TEXT NOT NULL,
        answer TEXT NOT NULL,
        subject TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS questions_subject ON questions (subject);
    CREATE TABLE IF NOT EXISTS exams (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        subject TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS exams_subject ON exams (subject);
    CREATE TABLE IF NOT EXISTS exam_questions (
        exam_id INTEGER NOT NULL REFERENCES exams (id) ON DELETE CASCADE,
        question_id INTEGER NOT NULL REFERENCES questions (id),
        position INTEGER NOT NULL,
        PRIMARY KEY (exam_id, question_id)
    );
";

#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens the database described by `config` and creates the schema.
    pub async fn open(config: &DbConfig) -> Result<Self, Error> {
        let conn = match config {
            DbConfig::SQLite { path } => {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent).map_err(|e| {
                            Error::Database(format!(
                                "Can not create database directory: {}",
                                e
                            ))
                        })?;
                    }
                }
                Connection::open_with_flags(path, OpenFlags::default())
                    .await
                    .map_err(|e| {
                        error!(TARGET_DB, "SQLite fail open connection: {}", e);
                        Error::Database(format!(
                            "SQLite fail open connection: {}",
                            e
                        ))
                    })?
            }
            DbConfig::Memory => Connection::open_in_memory().await.map_err(|e| {
                Error::Database(format!("SQLite fail open connection: {}", e))
            })?,
        };

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(|e| Error::Database(format!("Can not create tables: {}", e)))?;
        debug!(TARGET_DB, "Database ready: {:?}", config);

        Ok(Self { conn })
    }

    /// Runs `function` on the connection thread. Errors raised by the
    /// closure reach the caller unchanged.
    pub async fn call<F, R>(&self, function: F) -> Result<R, Error>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, Error> + Send + 'static,
        R: Send + 'static,
    {
        self.conn
            .call(move |conn| {
                function(conn)
                    .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
            })
            .await
            .map_err(from_connection_error)
    }
}

fn from_connection_error(error: tokio_rusqlite::Error) -> Error {
    match error {
        tokio_rusqlite::Error::Other(other) => match other.downcast::<Error>() {
            Ok(error) => *error,
            Err(other) => Error::Database(other.to_string()),
        },
        error => Error::Database(error.to_string()),
    }
}
