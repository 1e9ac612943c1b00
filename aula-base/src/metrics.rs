// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

use prometheus_client::{
    encoding::{EncodeLabelSet, EncodeLabelValue},
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};

use crate::error::Error;

/// Failure class of a rejected request.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Rejection {
    MalformedRequest,
    InvalidAnswerKey,
    NotFound,
    Internal,
}

impl From<&Error> for Rejection {
    fn from(error: &Error) -> Self {
        match error {
            Error::MalformedRequest(_) => Rejection::MalformedRequest,
            Error::InvalidAnswerKey(_) => Rejection::InvalidAnswerKey,
            Error::NotFound(_) => Rejection::NotFound,
            _ => Rejection::Internal,
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RejectionLabels {
    pub operation: String,
    pub kind: Rejection,
}

/// Service counters.
#[derive(Clone, Debug, Default)]
pub struct Metrics {
    questions_created: Counter,
    exams_created: Counter,
    rejected_requests: Family<RejectionLabels, Counter>,
}

impl Metrics {
    /// Creates the counters and registers them in `registry`.
    pub fn register(registry: &mut Registry) -> Self {
        let metrics = Self::default();
        registry.register(
            "questions_created",
            "Questions stored.",
            metrics.questions_created.clone(),
        );
        registry.register(
            "exams_created",
            "Exams stored.",
            metrics.exams_created.clone(),
        );
        registry.register(
            "rejected_requests",
            "Requests rejected, by operation and failure class.",
            metrics.rejected_requests.clone(),
        );
        metrics
    }

    pub fn question_created(&self) {
        self.questions_created.inc();
    }

    pub fn exam_created(&self) {
        self.exams_created.inc();
    }

    pub fn rejected(&self, operation: &str, error: &Error) {
        self.rejected_requests
            .get_or_create(&RejectionLabels {
                operation: operation.to_owned(),
                kind: Rejection::from(error),
            })
            .inc();
    }

    pub fn questions_created(&self) -> u64 {
        self.questions_created.get()
    }

    pub fn exams_created(&self) -> u64 {
        self.exams_created.get()
    }

    pub fn rejections(&self, operation: &str, kind: Rejection) -> u64 {
        self.rejected_requests
            .get_or_create(&RejectionLabels {
                operation: operation.to_owned(),
                kind,
            })
            .get()
    }
}
