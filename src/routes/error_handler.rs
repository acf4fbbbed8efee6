use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{error, warn};

use crate::core::error::AnalyzerError;
use crate::models::dto::ErrorResponse;

pub fn status_for(err: &AnalyzerError) -> StatusCode {
    match err {
        AnalyzerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AnalyzerError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        AnalyzerError::RecordNotFound(_) => StatusCode::NOT_FOUND,
        AnalyzerError::Io(_) | AnalyzerError::Processing(_) | AnalyzerError::Storage(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<PathRejection> for AnalyzerError {
    fn from(rejection: PathRejection) -> Self {
        AnalyzerError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AnalyzerError {
    fn from(rejection: QueryRejection) -> Self {
        AnalyzerError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AnalyzerError {
    fn into_response(self) -> Response {
        let status = status_for(&self);

        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind().to_string(),
            status: status.as_u16(),
            timestamp: Utc::now(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&AnalyzerError::InvalidInput("Uploaded file is empty".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AnalyzerError::PayloadTooLarge { limit: 10 }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(status_for(&AnalyzerError::RecordNotFound(1)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&AnalyzerError::Processing("Failed to read CSV file".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_response_status() {
        let response = AnalyzerError::RecordNotFound(9999).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
