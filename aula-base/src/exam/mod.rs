// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Exam module.
//!
//! Exams are assembled from question ids. The id list must be non-empty and
//! every id must name a stored question; the check and the inserts share one
//! transaction, so a rejected exam leaves nothing behind.

use std::collections::HashSet;

use rusqlite::params;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::debug;

use crate::{db::Database, error::Error, subject::Subject};

pub use query::ExamQuery;

mod query;

const TARGET_EXAM: &str = "Aula-Exam";

/// Confirmation message returned when an exam is stored.
pub const EXAM_CREATED_MESSAGE: &str = "Examen creado correctamente";

/// Exam creation input, exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewExam {
    pub name: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub questions: Option<Vec<i64>>,
}

/// Result of a successful exam creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamCreated {
    pub exam_id: i64,
    pub message: String,
}

/// Exam without its questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub subject: Subject,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ExamDraft {
    name: String,
    description: String,
    subject: Subject,
    question_ids: Vec<i64>,
}

impl ExamDraft {
    fn validate(exam: NewExam) -> Result<Self, Error> {
        // Checked first: an empty exam never reaches the database.
        let question_ids = match exam.questions {
            Some(ids) if !ids.is_empty() => ids,
            _ => {
                return Err(Error::MalformedRequest(
                    "questions must contain at least one question id"
                        .to_owned(),
                ));
            }
        };

        let name = match exam.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(Error::MalformedRequest(
                    "name is required".to_owned(),
                ));
            }
        };
        let subject = Subject::new(exam.subject.as_deref().unwrap_or_default())?;

        let mut seen = HashSet::new();
        let question_ids =
            question_ids.into_iter().filter(|id| seen.insert(*id)).collect();

        Ok(Self {
            name,
            description: exam.description.unwrap_or_default(),
            subject,
            question_ids,
        })
    }
}

#[derive(Clone)]
pub struct ExamAssembler {
    db: Database,
}

impl ExamAssembler {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Validates and stores an exam with its question association.
    pub async fn create(&self, exam: NewExam) -> Result<ExamCreated, Error> {
        let draft = ExamDraft::validate(exam)?;
        let created_at = OffsetDateTime::now_utc().format(&Rfc3339).map_err(|e| {
            Error::Database(format!("Can not format creation time: {}", e))
        })?;

        let exam_id = self
            .db
            .call(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut exists =
                        tx.prepare("SELECT 1 FROM questions WHERE id = ?1")?;
                    for id in &draft.question_ids {
                        if !exists.exists(params![id])? {
                            return Err(Error::MalformedRequest(format!(
                                "question {} does not exist",
                                id
                            )));
                        }
                    }
                }

                tx.execute(
                    "INSERT INTO exams (name, description, subject, created_at) VALUES (?1, ?2, ?3, ?4)",
                    params![
                        draft.name,
                        draft.description,
                        draft.subject.as_str(),
                        created_at
                    ],
                )?;
                let exam_id = tx.last_insert_rowid();

                {
                    let mut insert = tx.prepare(
                        "INSERT INTO exam_questions (exam_id, question_id, position) VALUES (?1, ?2, ?3)",
                    )?;
                    for (position, id) in draft.question_ids.iter().enumerate() {
                        insert.execute(params![exam_id, id, position as i64])?;
                    }
                }

                tx.commit()?;
                Ok(exam_id)
            })
            .await?;

        debug!(TARGET_EXAM, "Exam {} stored", exam_id);
        Ok(ExamCreated {
            exam_id,
            message: EXAM_CREATED_MESSAGE.to_owned(),
        })
    }

    /// Exams of `subject`, newest first.
    pub async fn list_by_subject(
        &self,
        subject: &str,
    ) -> Result<Vec<ExamSummary>, Error> {
        let subject = Subject::new(subject)?;
        self.db
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, description, created_at FROM exams WHERE subject = ?1 ORDER BY id DESC",
                )?;
                let exams = stmt
                    .query_map(params![subject.as_str()], |row| {
                        Ok(ExamSummary {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            description: row.get(2)?,
                            subject: subject.clone(),
                            created_at: row.get(3)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(exams)
            })
            .await
    }
}
