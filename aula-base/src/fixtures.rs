// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Fixture reset.
//!
//! Administrative purge used by end-to-end test suites. It is not reachable
//! through [`crate::Api`]; callers must build it explicitly from the
//! [`Database`].

use serde::Serialize;
use tracing::warn;

use crate::{db::Database, error::Error};

const TARGET_FIXTURES: &str = "Aula-Fixtures";

/// Rows removed by a purge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub questions: usize,
    pub exams: usize,
    pub associations: usize,
}

#[derive(Clone)]
pub struct FixtureReset {
    db: Database,
}

impl FixtureReset {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Deletes every exam, association and question. Id sequences are kept,
    /// so ids handed out before the purge are never reused.
    pub async fn purge(&self) -> Result<PurgeReport, Error> {
        let report = self
            .db
            .call(|conn| {
                let tx = conn.transaction()?;
                let associations = tx.execute("DELETE FROM exam_questions", [])?;
                let exams = tx.execute("DELETE FROM exams", [])?;
                let questions = tx.execute("DELETE FROM questions", [])?;
                tx.commit()?;
                Ok(PurgeReport {
                    questions,
                    exams,
                    associations,
                })
            })
            .await?;

        warn!(
            TARGET_FIXTURES,
            "Fixtures purged: {} questions, {} exams, {} associations",
            report.questions,
            report.exams,
            report.associations
        );
        Ok(report)
    }
}
