// HTTP error mapping
use crate::domain::error::DomainError;
use crate::domain::notification::{Notification, Severity};
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub notification: Notification,
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MalformedPayload | DomainError::MissingCoconutId => {
                ApiError::BadRequest(err.to_string())
            }
            DomainError::UnknownSalesperson(_)
            | DomainError::UnknownGeofence(_)
            | DomainError::UnknownRoute(_)
            | DomainError::UnknownAllocation(_) => ApiError::NotFound(err.to_string()),
            DomainError::SpoilageNotClaimable(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        ApiError::Internal(anyhow::anyhow!("response encoding failed with {}", status))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => {
                tracing::warn!("Not found: {}", message);
                (StatusCode::NOT_FOUND, "Not Found", message)
            }
            ApiError::BadRequest(message) => {
                tracing::warn!("Bad request: {}", message);
                (StatusCode::BAD_REQUEST, "Bad Request", message)
            }
            ApiError::Conflict(message) => {
                tracing::warn!("Conflict: {}", message);
                (StatusCode::CONFLICT, "Conflict", message)
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            notification: Notification::new(error, message.clone(), Severity::Error),
            message,
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_domain_error_status() {
        assert!(matches!(ApiError::from(DomainError::MalformedPayload), ApiError::BadRequest(_)));
        assert!(matches!(ApiError::from(DomainError::MissingCoconutId), ApiError::BadRequest(_)));
        assert!(matches!(
            ApiError::from(DomainError::UnknownGeofence("geo9".into())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(DomainError::UnknownAllocation("ALLOC-9".into())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(DomainError::SpoilageNotClaimable("ALLOC-1".into())),
            ApiError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn test_error_body_carries_notification() {
        let response = ApiError::from(DomainError::MissingCoconutId).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Bad Request");
        assert_eq!(body["message"], "Invalid QR code: Missing coconut identifier");
        assert_eq!(body["notification"]["severity"], "error");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::from(anyhow::anyhow!("disk on fire")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "An unexpected error occurred");
    }
}
