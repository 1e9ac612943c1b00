// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Request bodies accepted by the bridge. Every field is optional so that a
//! missing value is reported by the domain validation, not by the decoder.

use aula_base::{exam::NewExam, question::NewQuestion};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Question creation request.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BridgeQuestionRequest {
    pub name: Option<String>,
    pub difficulty: Option<String>,
    pub statement: Option<String>,
    /// Label to text, may carry the answer key under `answer`.
    pub options: Option<Value>,
    pub answer: Option<Value>,
}

impl From<BridgeQuestionRequest> for NewQuestion {
    fn from(request: BridgeQuestionRequest) -> Self {
        Self {
            name: request.name,
            difficulty: request.difficulty,
            statement: request.statement,
            options: request.options,
            answer: request.answer,
        }
    }
}

/// Exam creation request.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BridgeExamRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    /// Ids of the questions that make up the exam.
    pub questions: Option<Vec<i64>>,
}

impl From<BridgeExamRequest> for NewExam {
    fn from(request: BridgeExamRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            subject: request.subject,
            questions: request.questions,
        }
    }
}
