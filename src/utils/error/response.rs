//! HTTP response handling for errors

use super::types::RollcallError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for RollcallError {
    fn status_code(&self) -> StatusCode {
        match self {
            RollcallError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            RollcallError::Forbidden(_) => StatusCode::FORBIDDEN,
            RollcallError::NotFound(_) => StatusCode::NOT_FOUND,
            RollcallError::Validation(_) => StatusCode::BAD_REQUEST,
            RollcallError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            RollcallError::Database(_) => "Database operation failed".to_string(),
            RollcallError::Config(_)
            | RollcallError::Yaml(_)
            | RollcallError::Io(_)
            | RollcallError::Internal(_) => "An internal error occurred".to_string(),
            _ => self.to_string(),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id: None, // This should be set by middleware
            },
        };

        HttpResponse::build(self.status_code()).json(error_response)
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}
