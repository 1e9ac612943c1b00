// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod config;
pub mod db;
pub mod error;
pub mod exam;
pub mod fixtures;
pub mod metrics;
pub mod question;
pub mod subject;

use config::Config as AulaBaseConfig;
use db::Database;
use error::Error;
use exam::{ExamAssembler, ExamCreated, ExamQuery, ExamSummary, NewExam};
use metrics::Metrics;
use prometheus_client::registry::Registry;
use question::{NewQuestion, Question, QuestionStore};
use subject::{Subject, SubjectRegistry};
use tracing::{info, warn};

const TARGET_API: &str = "Aula-Api";

/// Entry point to the question bank.
#[derive(Clone)]
pub struct Api {
    questions: QuestionStore,
    exams: ExamAssembler,
    query: ExamQuery,
    subjects: SubjectRegistry,
    metrics: Metrics,
}

impl Api {
    /// Creates a new `Api`, opening the configured database.
    pub async fn new(
        config: AulaBaseConfig,
        registry: &mut Registry,
    ) -> Result<Self, Error> {
        let database = Database::open(&config.database).await?;
        Ok(Self::with_database(database, registry))
    }

    /// Creates a new `Api` on an already opened database.
    pub fn with_database(database: Database, registry: &mut Registry) -> Self {
        info!(TARGET_API, "Creating Api");
        Self {
            questions: QuestionStore::new(database.clone()),
            exams: ExamAssembler::new(database.clone()),
            query: ExamQuery::new(database.clone()),
            subjects: SubjectRegistry::new(database),
            metrics: Metrics::register(registry),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn observe<T>(
        &self,
        operation: &str,
        result: Result<T, Error>,
    ) -> Result<T, Error> {
        if let Err(e) = &result {
            if e.is_client_error() {
                info!(TARGET_API, "{} rejected ({}): {}", operation, e.kind(), e);
            } else {
                warn!(TARGET_API, "{} failed ({}): {}", operation, e.kind(), e);
            }
            self.metrics.rejected(operation, e);
        }
        result
    }

    pub async fn create_question(
        &self,
        subject: &str,
        question: NewQuestion,
    ) -> Result<Question, Error> {
        let result = self.questions.create(subject, question).await;
        if result.is_ok() {
            self.metrics.question_created();
        }
        self.observe("create_question", result)
    }

    pub async fn question(&self, id: i64) -> Result<Option<Question>, Error> {
        let result = self.questions.get(id).await;
        self.observe("question", result)
    }

    pub async fn questions_by_subject(
        &self,
        subject: &str,
    ) -> Result<Vec<Question>, Error> {
        let result = self.questions.list_by_subject(subject).await;
        self.observe("questions_by_subject", result)
    }

    pub async fn create_exam(
        &self,
        exam: NewExam,
    ) -> Result<ExamCreated, Error> {
        let result = self.exams.create(exam).await;
        if result.is_ok() {
            self.metrics.exam_created();
        }
        self.observe("create_exam", result)
    }

    pub async fn exams_by_subject(
        &self,
        subject: &str,
    ) -> Result<Vec<ExamSummary>, Error> {
        let result = self.exams.list_by_subject(subject).await;
        self.observe("exams_by_subject", result)
    }

    pub async fn questions_by_exam(
        &self,
        exam_id: i64,
    ) -> Result<Vec<Question>, Error> {
        let result = self.query.questions_by_exam(exam_id).await;
        self.observe("questions_by_exam", result)
    }

    pub async fn subjects(&self) -> Result<Vec<Subject>, Error> {
        let result = self.subjects.list().await;
        self.observe("subjects", result)
    }
}
