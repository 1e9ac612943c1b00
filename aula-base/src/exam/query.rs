// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

use rusqlite::params;

use crate::{
    db::Database,
    error::Error,
    question::{QUESTION_COLUMNS, Question, read_question},
};

/// Resolves exams back to their questions.
#[derive(Clone)]
pub struct ExamQuery {
    db: Database,
}

impl ExamQuery {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Questions of `exam_id` in the order they were listed at creation.
    pub async fn questions_by_exam(
        &self,
        exam_id: i64,
    ) -> Result<Vec<Question>, Error> {
        self.db
            .call(move |conn| {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS (SELECT 1 FROM exams WHERE id = ?1)",
                    params![exam_id],
                    |row| row.get(0),
                )?;
                if !exists {
                    return Err(Error::NotFound(format!(
                        "exam {} does not exist",
                        exam_id
                    )));
                }

                let links: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM exam_questions WHERE exam_id = ?1",
                    params![exam_id],
                    |row| row.get(0),
                )?;

                let sql = format!(
                    "SELECT {} FROM exam_questions eq JOIN questions q ON q.id = eq.question_id WHERE eq.exam_id = ?1 ORDER BY eq.position",
                    QUESTION_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let questions = stmt
                    .query_map(params![exam_id], read_question)?
                    .collect::<Result<Vec<_>, _>>()?;

                if questions.len() as i64 != links {
                    return Err(Error::Database(format!(
                        "exam {} references {} questions but {} were found",
                        exam_id,
                        links,
                        questions.len()
                    )));
                }
                Ok(questions)
            })
            .await
    }
}
