use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::failure::{FailureBody, ReferralFailure};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Referral error: {0}")]
    Referral(#[from] ReferralFailure),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            AppError::Referral(failure) => {
                // Referral failures keep the structured body the checkout expects
                let status = failure.status_code();
                return (status, Json(FailureBody::from(*failure))).into_response();
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Json(e) => (StatusCode::BAD_REQUEST, format!("JSON error: {}", e)),
        };

        (status, Json(ErrorResponse { detail: message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn get_response_body(response: Response) -> (StatusCode, String) {
        let status = response.status();
        let body = response.into_body();
        let bytes = body.collect().await.unwrap().to_bytes();
        let body_str = String::from_utf8(bytes.to_vec()).unwrap();
        (status, body_str)
    }

    #[tokio::test]
    async fn test_not_found_error() {
        let error = AppError::NotFound("Outlet 7 not found".to_string());
        let (status, body) = get_response_body(error.into_response()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Outlet 7 not found"));
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let error = AppError::Database(sea_orm::DbErr::Custom("disk I/O error".to_string()));
        let (status, body) = get_response_body(error.into_response()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("disk I/O"));
        assert!(body.contains("Database error"));
    }

    #[tokio::test]
    async fn test_referral_error_renders_structured_body() {
        let error = AppError::from(ReferralFailure::FeatureDisabled);
        let (status, body) = get_response_body(error.into_response()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["success"], false);
        assert_eq!(parsed["reason"], "FEATURE_DISABLED");
        assert!(parsed["message"].as_str().unwrap().contains("disabled"));
    }

    #[tokio::test]
    async fn test_duplicate_code_is_conflict() {
        let error = AppError::from(ReferralFailure::DuplicateCode);
        let (status, _) = get_response_body(error.into_response()).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_error_display_impl() {
        assert_eq!(
            AppError::NotFound("test".to_string()).to_string(),
            "Not found: test"
        );
        assert_eq!(
            AppError::BadRequest("test".to_string()).to_string(),
            "Bad request: test"
        );
        assert_eq!(
            AppError::Referral(ReferralFailure::CodeExpired).to_string(),
            "Referral error: Referral code has expired"
        );
    }

    #[test]
    fn test_json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json");
        let app_error: AppError = json_err.unwrap_err().into();
        assert!(matches!(app_error, AppError::Json(_)));
    }
}
