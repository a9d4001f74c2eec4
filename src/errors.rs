use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidRequest(_) | DomainError::InsufficientStock(_) => {
                AppError::BadRequest(e.to_string())
            }
            DomainError::ProductNotFound(_) => AppError::NotFound(e.to_string()),
            DomainError::UserNotFound(_) => AppError::NotFound("User not found".to_string()),
            DomainError::OrderNotFound(_) => AppError::NotFound("Order not found".to_string()),
            DomainError::Cancelled => AppError::Internal(e.to_string()),
            DomainError::StorageUnavailable(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(serde_json::json!({
                "error": msg
            })),
            AppError::Internal(detail) => {
                log::error!("Request failed: {}", detail);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Database error"
                }))
            }
        }
    }
}
