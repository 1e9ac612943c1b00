// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Configuration module

use serde::Deserialize;

/// Path that selects a private in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Service configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Database configuration.
    pub database: DbConfig,
}

impl Config {
    /// Creates a new `Config` backed by a SQLite file.
    pub fn new(path: &str) -> Self {
        Self {
            database: DbConfig::SQLite {
                path: path.to_owned(),
            },
        }
    }

    /// Creates a new `Config` backed by an in-memory database.
    pub fn in_memory() -> Self {
        Self {
            database: DbConfig::Memory,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum DbConfig {
    /// SQLite database file.
    SQLite {
        /// Path to the database.
        path: String,
    },
    /// SQLite database living only as long as the process.
    Memory,
}

impl DbConfig {
    pub fn build(path: &str) -> Self {
        if path == MEMORY_PATH {
            DbConfig::Memory
        } else {
            DbConfig::SQLite {
                path: path.to_owned(),
            }
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Logging {
    /// Enabled sinks.
    pub output: LoggingOutput,
    /// Directory for the rotating log file.
    pub file_path: String,
    /// Rotation policy of the log file.
    pub rotation: LoggingRotation,
    /// Maximum size in bytes when rotating by size.
    pub max_size: usize,
    /// Number of rotated files to keep.
    pub max_files: usize,
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
}

impl Logging {
    pub fn logs(&self) -> bool {
        self.output.stdout || self.output.file
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            output: LoggingOutput::default(),
            file_path: "logs".to_owned(),
            rotation: LoggingRotation::default(),
            max_size: 100 * 1024 * 1024,
            max_files: 3,
            level: "info".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LoggingOutput {
    pub stdout: bool,
    pub file: bool,
}

impl Default for LoggingOutput {
    fn default() -> Self {
        Self {
            stdout: true,
            file: false,
        }
    }
}

impl LoggingOutput {
    /// Parses a comma separated list such as `stdout,file`.
    pub fn parse(outputs: &str) -> Self {
        let mut output = Self {
            stdout: false,
            file: false,
        };
        for item in outputs.split(',').map(str::trim) {
            match item.to_ascii_lowercase().as_str() {
                "stdout" => output.stdout = true,
                "file" => output.file = true,
                _ => {}
            }
        }
        output
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub enum LoggingRotation {
    #[default]
    Size,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl LoggingRotation {
    pub fn parse(rotation: &str) -> Option<Self> {
        match rotation.to_ascii_lowercase().as_str() {
            "size" => Some(Self::Size),
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            "never" => Some(Self::Never),
            _ => None,
        }
    }
}
