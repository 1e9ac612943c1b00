use aula_bridge::Error as AulaError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

// Error
#[derive(Debug)]
pub enum Error {
    Aula(AulaError),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Aula(AulaError::MalformedRequest(_)) => StatusCode::BAD_REQUEST,
            Error::Aula(AulaError::InvalidAnswerKey(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::Aula(AulaError::NotFound(_)) => StatusCode::NOT_FOUND,
            Error::Aula(AulaError::Database(_) | AulaError::Config(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<AulaError> for Error {
    fn from(error: AulaError) -> Self {
        Error::Aula(error)
    }
}

// Bodies that do not decode are malformed requests, not 422.
impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Aula(AulaError::MalformedRequest(rejection.body_text()))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let Error::Aula(error) = self;
        (status, Json(json!({ "error": error.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AulaError::MalformedRequest("m".to_owned()), StatusCode::BAD_REQUEST),
            (
                AulaError::InvalidAnswerKey("a".to_owned()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AulaError::NotFound("n".to_owned()), StatusCode::NOT_FOUND),
            (
                AulaError::Database("d".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(Error::from(error).status(), status);
        }
    }
}
