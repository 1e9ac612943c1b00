use std::sync::Arc;

use crate::{
    enviroment::build_doc,
    error::Error,
    wrappers::{
        ErrorInfo, ExamCreatedInfo, ExamRequest, ExamSummaryInfo, PurgeInfo,
        QuestionInfo, QuestionRequest, QuestionSaved,
    },
};
use aula_bridge::{
    Bridge,
    model::{BridgeExamRequest, BridgeQuestionRequest},
};
use axum::{
    Extension, Json, Router,
    extract::{Path, rejection::JsonRejection},
    routing::{get, post},
};
use tower::ServiceBuilder;

use crate::doc::ApiDoc;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Create Question
///
/// Stores a question under a subject. The answer key must name one of the
/// option labels; a legacy body may carry it as `options.answer`.
#[utoipa::path(
    post,
    path = "/api/questions/{subject}",
    operation_id = "Create Question",
    tag = "Question",
    params(
        ("subject" = String, Path, description = "Subject identifier"),
    ),
    request_body(content = QuestionRequest, content_type = "application/json", description = "The question to store"),
    responses(
        (status = 200, description = "Question stored", body = QuestionSaved,
        example = json!(
            {
                "message": "Pregunta guardada correctamente ✅",
                "saved": {
                    "id": 1,
                    "name": "Q1",
                    "difficulty": "easy",
                    "statement": "2+2?",
                    "subject": "matematica",
                    "options": {"A": "3", "B": "4"},
                    "answer": "B"
                }
            }
        )),
        (status = 400, description = "Malformed request", body = ErrorInfo),
        (status = 422, description = "Answer key does not name an option", body = ErrorInfo),
        (status = 500, description = "Internal Server Error", body = ErrorInfo),
    )
)]
async fn create_question(
    Extension(bridge): Extension<Arc<Bridge>>,
    Path(subject): Path<String>,
    payload: Result<Json<BridgeQuestionRequest>, JsonRejection>,
) -> Result<Json<QuestionSaved>, Error> {
    let Json(request) = payload?;
    let question = bridge.create_question(subject, request).await?;
    Ok(Json(QuestionSaved::from(question)))
}

/// Questions of a subject
///
/// Latest questions stored under the subject, newest first.
#[utoipa::path(
    get,
    path = "/api/questions/{subject}",
    operation_id = "Questions of Subject",
    tag = "Question",
    params(
        ("subject" = String, Path, description = "Subject identifier"),
    ),
    responses(
        (status = 200, description = "Questions retrieved", body = [QuestionInfo]),
        (status = 400, description = "Invalid subject", body = ErrorInfo),
        (status = 500, description = "Internal Server Error", body = ErrorInfo),
    )
)]
async fn get_questions_by_subject(
    Extension(bridge): Extension<Arc<Bridge>>,
    Path(subject): Path<String>,
) -> Result<Json<Vec<QuestionInfo>>, Error> {
    match bridge.get_questions_by_subject(subject).await {
        Ok(questions) => Ok(Json(
            questions.into_iter().map(QuestionInfo::from).collect(),
        )),
        Err(e) => Err(Error::from(e)),
    }
}

/// Create Exam
///
/// Assembles an exam from existing question ids. Every id must resolve,
/// otherwise nothing is stored.
#[utoipa::path(
    post,
    path = "/api/exams",
    operation_id = "Create Exam",
    tag = "Exam",
    request_body(content = ExamRequest, content_type = "application/json", description = "The exam to assemble"),
    responses(
        (status = 200, description = "Exam created", body = ExamCreatedInfo,
        example = json!(
            {
                "examId": 1,
                "message": "Examen creado correctamente"
            }
        )),
        (status = 400, description = "Malformed request or unknown question id", body = ErrorInfo),
        (status = 500, description = "Internal Server Error", body = ErrorInfo),
    )
)]
async fn create_exam(
    Extension(bridge): Extension<Arc<Bridge>>,
    payload: Result<Json<BridgeExamRequest>, JsonRejection>,
) -> Result<Json<ExamCreatedInfo>, Error> {
    let Json(request) = payload?;
    let created = bridge.create_exam(request).await?;
    Ok(Json(ExamCreatedInfo::from(created)))
}

/// Exams of a subject
///
/// Exams stored under the subject, newest first.
#[utoipa::path(
    get,
    path = "/api/exams/{subject}",
    operation_id = "Exams of Subject",
    tag = "Exam",
    params(
        ("subject" = String, Path, description = "Subject identifier"),
    ),
    responses(
        (status = 200, description = "Exams retrieved", body = [ExamSummaryInfo]),
        (status = 400, description = "Invalid subject", body = ErrorInfo),
        (status = 500, description = "Internal Server Error", body = ErrorInfo),
    )
)]
async fn get_exams_by_subject(
    Extension(bridge): Extension<Arc<Bridge>>,
    Path(subject): Path<String>,
) -> Result<Json<Vec<ExamSummaryInfo>>, Error> {
    match bridge.get_exams_by_subject(subject).await {
        Ok(exams) => {
            Ok(Json(exams.into_iter().map(ExamSummaryInfo::from).collect()))
        }
        Err(e) => Err(Error::from(e)),
    }
}

/// Questions of an exam
///
/// Resolves an exam back to its questions, in the order they were listed.
#[utoipa::path(
    get,
    path = "/api/exams/questions/{exam_id}",
    operation_id = "Questions of Exam",
    tag = "Exam",
    params(
        ("exam_id" = i64, Path, description = "Exam's unique id"),
    ),
    responses(
        (status = 200, description = "Questions retrieved", body = [QuestionInfo]),
        (status = 400, description = "Non numeric exam id", body = ErrorInfo),
        (status = 404, description = "Exam not found", body = ErrorInfo),
        (status = 500, description = "Internal Server Error", body = ErrorInfo),
    )
)]
async fn get_questions_by_exam(
    Extension(bridge): Extension<Arc<Bridge>>,
    Path(exam_id): Path<String>,
) -> Result<Json<Vec<QuestionInfo>>, Error> {
    match bridge.get_questions_by_exam(exam_id).await {
        Ok(questions) => Ok(Json(
            questions.into_iter().map(QuestionInfo::from).collect(),
        )),
        Err(e) => Err(Error::from(e)),
    }
}

/// Subjects
///
/// Every subject with at least one question or exam.
#[utoipa::path(
    get,
    path = "/api/subjects",
    operation_id = "Subjects",
    tag = "Subject",
    responses(
        (status = 200, description = "Subjects retrieved", body = [String],
        example = json!(["fisica", "matematica"])),
        (status = 500, description = "Internal Server Error", body = ErrorInfo),
    )
)]
async fn get_subjects(
    Extension(bridge): Extension<Arc<Bridge>>,
) -> Result<Json<Vec<String>>, Error> {
    Ok(Json(bridge.get_subjects().await?))
}

async fn purge_fixtures(
    Extension(bridge): Extension<Arc<Bridge>>,
) -> Result<Json<PurgeInfo>, Error> {
    match bridge.purge_fixtures().await {
        Some(Ok(report)) => Ok(Json(PurgeInfo::from(report))),
        Some(Err(e)) => Err(Error::from(e)),
        None => Err(Error::from(aula_bridge::Error::NotFound(
            "test hooks are disabled".to_owned(),
        ))),
    }
}

pub fn build_routes(bridge: Bridge) -> Router {
    let test_hooks = bridge.test_hooks();
    let bridge = Arc::new(bridge);

    let mut routes = Router::new()
        .route(
            "/api/questions/{subject}",
            post(create_question).get(get_questions_by_subject),
        )
        .route("/api/exams", post(create_exam))
        .route("/api/exams/", post(create_exam))
        .route("/api/exams/{subject}", get(get_exams_by_subject))
        .route("/api/exams/questions/{exam_id}", get(get_questions_by_exam))
        .route("/api/subjects", get(get_subjects));

    if test_hooks {
        routes = routes.route("/api/_test/cleanup", post(purge_fixtures));
    }

    let routes = routes.layer(ServiceBuilder::new().layer(Extension(bridge)));

    if build_doc() {
        Router::new().merge(routes).merge(
            RapiDoc::with_openapi("/doc/aulaapi.json", ApiDoc::openapi())
                .path("/doc"),
        )
    } else {
        Router::new().merge(routes)
    }
}
