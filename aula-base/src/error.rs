// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Error module.
//!

use thiserror::Error;

use serde::{Deserialize, Serialize};

/// Error type.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Error {
    /// A required field is missing, blank or has the wrong shape.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    /// The answer key of a question does not name one of its options.
    #[error("Invalid answer key: {0}")]
    InvalidAnswerKey(String),
    /// The requested entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Short, stable name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MalformedRequest(_) => "malformed_request",
            Error::InvalidAnswerKey(_) => "invalid_answer_key",
            Error::NotFound(_) => "not_found",
            Error::Database(_) => "database",
            Error::Config(_) => "config",
        }
    }

    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedRequest(_)
                | Error::InvalidAnswerKey(_)
                | Error::NotFound(_)
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Error::Database(error.to_string())
    }
}
