use std::collections::BTreeMap;

use aula_bridge::{
    ExamCreated as ExamCreatedBridge, ExamSummary as ExamSummaryBridge,
    PurgeReport as PurgeReportBridge, Question as QuestionBridge,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub const QUESTION_SAVED_MESSAGE: &str = "Pregunta guardada correctamente ✅";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionInfo {
    pub id: i64,
    pub name: String,
    pub difficulty: String,
    pub statement: String,
    pub subject: String,
    pub options: BTreeMap<String, String>,
    pub answer: String,
}

impl From<QuestionBridge> for QuestionInfo {
    fn from(value: QuestionBridge) -> Self {
        Self {
            id: value.id,
            name: value.name,
            difficulty: value.difficulty.to_string(),
            statement: value.statement,
            subject: value.subject.to_string(),
            options: value.options,
            answer: value.answer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionSaved {
    pub message: String,
    pub saved: QuestionInfo,
}

impl From<QuestionBridge> for QuestionSaved {
    fn from(value: QuestionBridge) -> Self {
        Self {
            message: QUESTION_SAVED_MESSAGE.to_owned(),
            saved: QuestionInfo::from(value),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamCreatedInfo {
    pub exam_id: i64,
    pub message: String,
}

impl From<ExamCreatedBridge> for ExamCreatedInfo {
    fn from(value: ExamCreatedBridge) -> Self {
        Self {
            exam_id: value.exam_id,
            message: value.message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExamSummaryInfo {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub subject: String,
    pub created_at: String,
}

impl From<ExamSummaryBridge> for ExamSummaryInfo {
    fn from(value: ExamSummaryBridge) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            subject: value.subject.to_string(),
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurgeInfo {
    pub questions: usize,
    pub exams: usize,
    pub associations: usize,
}

impl From<PurgeReportBridge> for PurgeInfo {
    fn from(value: PurgeReportBridge) -> Self {
        Self {
            questions: value.questions,
            exams: value.exams,
            associations: value.associations,
        }
    }
}

/// Question creation body as documented. Decoding goes through the bridge
/// request type.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuestionRequest {
    pub name: String,
    pub difficulty: String,
    pub statement: String,
    /// Label to text, or a list of `{text, isCorrect}` labelled `A`, `B`, ...
    /// in order. A legacy `answer` entry is accepted when the top-level
    /// `answer` is absent.
    #[schema(value_type = Object)]
    pub options: Value,
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ExamRequest {
    pub name: String,
    pub description: Option<String>,
    pub subject: String,
    pub questions: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorInfo {
    pub error: String,
}
