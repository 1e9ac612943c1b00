use crate::{
    server::*,
    wrappers::{
        ErrorInfo, ExamCreatedInfo, ExamRequest, ExamSummaryInfo,
        QuestionInfo, QuestionRequest, QuestionSaved,
    },
};
use utoipa::OpenApi;

/// Aula HTTP
///
/// Question bank and exam assembly over HTTP. Questions and exams are grouped
/// by subject; every failure is answered with an `{"error": ...}` body.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Aula HTTP",
        description = "Question bank and exam assembly service. Questions are stored per subject with a validated answer key; exams are assembled from existing questions and can be resolved back to them.",
        version = "0.1.0",
        contact(
            name = "Kore Information",
            url = "https://www.kore-ledger.net/",
            email = "info@kore-ledger.net"
        ),
        license(
            name = "AGPL-3.0-only",
            url = "https://www.gnu.org/licenses/agpl-3.0.html"
        )
    ),
    paths(
        create_question,
        get_questions_by_subject,
        create_exam,
        get_exams_by_subject,
        get_questions_by_exam,
        get_subjects
    ),
    components(
        schemas(
            QuestionInfo,
            QuestionSaved,
            QuestionRequest,
            ExamRequest,
            ExamCreatedInfo,
            ExamSummaryInfo,
            ErrorInfo
        )
    ),
    tags(
        (name = "Question", description = "Endpoints for storing and listing questions."),
        (name = "Exam", description = "Endpoints for assembling exams and resolving their questions."),
        (name = "Subject", description = "Endpoints related to subjects."),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/questions/{subject}",
            "/api/exams",
            "/api/exams/{subject}",
            "/api/exams/questions/{exam_id}",
            "/api/subjects",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
