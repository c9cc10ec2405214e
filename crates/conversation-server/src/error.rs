use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use conversation_core::{ConversationError, ErrorKind};
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),
}

#[derive(Serialize)]
struct JsonError {
    message: String,
    r#type: String,
}

#[derive(Serialize)]
struct JsonErrorWrapper {
    error: JsonError,
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::Conversation(err) => match err.kind() {
                ErrorKind::NotFound => "not_found",
                ErrorKind::InvalidRequest => "invalid_request",
                ErrorKind::ReconciliationFault => "reconciliation_fault",
            },
            AppError::StorageError(_) => "storage_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Conversation(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
                ErrorKind::ReconciliationFault => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_response = JsonErrorWrapper {
            error: JsonError {
                message: self.to_string(),
                r#type: self.error_type().to_string(),
            },
        };
        HttpResponse::build(status_code).json(error_response)
    }
}
