// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::future::Future;

pub use aula_base::{
    Api as AulaApi,
    config::{Config as AulaConfig, Logging, LoggingOutput, LoggingRotation},
    error::Error,
    exam::{ExamCreated, ExamSummary},
    fixtures::PurgeReport,
    question::{Difficulty, Question},
};
use aula_base::{db::Database, fixtures::FixtureReset};
use crate::config::Config;
use model::{BridgeExamRequest, BridgeQuestionRequest};
#[cfg(feature = "prometheus")]
use prometheus::run_prometheus;
use prometheus_client::registry::Registry;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub mod config;
pub mod model;
pub mod settings;
pub use clap;
#[cfg(feature = "prometheus")]
pub mod prometheus;

const TARGET_BRIDGE: &str = "Aula-Bridge";

#[derive(Clone)]
pub struct Bridge {
    api: AulaApi,
    fixtures: Option<FixtureReset>,
    cancellation: CancellationToken,
}

impl Bridge {
    pub async fn build(
        settings: Config,
        token: Option<CancellationToken>,
    ) -> Result<Self, Error> {
        let mut registry = <Registry>::default();

        let token = if let Some(token) = token {
            token
        } else {
            CancellationToken::new()
        };

        let database = Database::open(&settings.aula_config.database).await?;
        let api = AulaApi::with_database(database.clone(), &mut registry);

        let fixtures = if settings.test_hooks {
            info!(TARGET_BRIDGE, "Test hooks enabled");
            Some(FixtureReset::new(database))
        } else {
            None
        };

        #[cfg(feature = "prometheus")]
        if !settings.prometheus.is_empty() {
            run_prometheus(registry, &settings.prometheus);
        }

        Self::bind_with_shutdown(token.clone(), tokio::signal::ctrl_c());

        Ok(Self {
            api,
            fixtures,
            cancellation: token,
        })
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancellation
    }

    fn bind_with_shutdown(
        token: CancellationToken,
        shutdown_signal: impl Future + Send + 'static,
    ) {
        let cancellation_token = token.clone();
        tokio::spawn(async move {
            shutdown_signal.await;
            cancellation_token.cancel();
        });
    }

    pub async fn create_question(
        &self,
        subject: String,
        request: BridgeQuestionRequest,
    ) -> Result<Question, Error> {
        self.api.create_question(&subject, request.into()).await
    }

    pub async fn get_questions_by_subject(
        &self,
        subject: String,
    ) -> Result<Vec<Question>, Error> {
        self.api.questions_by_subject(&subject).await
    }

    pub async fn create_exam(
        &self,
        request: BridgeExamRequest,
    ) -> Result<ExamCreated, Error> {
        self.api.create_exam(request.into()).await
    }

    pub async fn get_exams_by_subject(
        &self,
        subject: String,
    ) -> Result<Vec<ExamSummary>, Error> {
        self.api.exams_by_subject(&subject).await
    }

    pub async fn get_questions_by_exam(
        &self,
        exam_id: String,
    ) -> Result<Vec<Question>, Error> {
        let exam_id = exam_id.parse::<i64>().map_err(|e| {
            Error::MalformedRequest(format!("Invalid exam id: {}", e))
        })?;
        self.api.questions_by_exam(exam_id).await
    }

    pub async fn get_subjects(&self) -> Result<Vec<String>, Error> {
        Ok(self
            .api
            .subjects()
            .await?
            .into_iter()
            .map(String::from)
            .collect())
    }

    /// Purges every record. `None` when test hooks are disabled.
    pub async fn purge_fixtures(&self) -> Option<Result<PurgeReport, Error>> {
        match &self.fixtures {
            Some(fixtures) => Some(fixtures.purge().await),
            None => None,
        }
    }

    pub fn test_hooks(&self) -> bool {
        self.fixtures.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_log::test;

    fn settings(test_hooks: bool) -> Config {
        Config {
            aula_config: AulaConfig::in_memory(),
            prometheus: String::default(),
            logging: Logging::default(),
            test_hooks,
        }
    }

    fn question() -> BridgeQuestionRequest {
        BridgeQuestionRequest {
            name: Some("Q1".to_owned()),
            difficulty: Some("easy".to_owned()),
            statement: Some("1+1?".to_owned()),
            options: Some(json!({"A": "1", "B": "2"})),
            answer: Some(json!("B")),
        }
    }

    #[test(tokio::test)]
    async fn test_bridge_round_trip() {
        let bridge = Bridge::build(settings(false), None).await.unwrap();
        let question = bridge
            .create_question("matematica".to_owned(), question())
            .await
            .unwrap();
        let created = bridge
            .create_exam(BridgeExamRequest {
                name: Some("E1".to_owned()),
                description: Some("d".to_owned()),
                subject: Some("matematica".to_owned()),
                questions: Some(vec![question.id]),
            })
            .await
            .unwrap();

        let questions = bridge
            .get_questions_by_exam(created.exam_id.to_string())
            .await
            .unwrap();
        assert_eq!(questions, vec![question]);
        assert_eq!(bridge.get_subjects().await.unwrap(), vec!["matematica"]);
    }

    #[test(tokio::test)]
    async fn test_invalid_exam_id() {
        let bridge = Bridge::build(settings(false), None).await.unwrap();
        assert!(matches!(
            bridge.get_questions_by_exam("abc".to_owned()).await,
            Err(Error::MalformedRequest(_))
        ));
    }

    #[test(tokio::test)]
    async fn test_fixtures_only_with_test_hooks() {
        let bridge = Bridge::build(settings(false), None).await.unwrap();
        assert!(!bridge.test_hooks());
        assert!(bridge.purge_fixtures().await.is_none());

        let bridge = Bridge::build(settings(true), None).await.unwrap();
        bridge
            .create_question("matematica".to_owned(), question())
            .await
            .unwrap();
        let report = bridge.purge_fixtures().await.unwrap().unwrap();
        assert_eq!(report.questions, 1);
        assert!(
            bridge
                .get_questions_by_subject("matematica".to_owned())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[test(tokio::test)]
    async fn test_cancellation_token_is_shared() {
        let token = CancellationToken::new();
        let bridge = Bridge::build(settings(false), Some(token.clone()))
            .await
            .unwrap();
        token.cancel();
        assert!(bridge.token().is_cancelled());
    }
}
