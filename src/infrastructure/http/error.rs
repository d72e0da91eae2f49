//! HTTP Error Handling

use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const INTERNAL_ERROR: i32 = 500;
}

/// API 错误
///
/// 业务错误统一返回 HTTP 200，错误码放在 `errno`
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    fn errno(&self) -> i32 {
        match self {
            ApiError::NotFound(_) => errno::NOT_FOUND,
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.errno();
        let message = match self {
            ApiError::NotFound(msg) => {
                tracing::warn!(errno = code, error = %msg, "Resource not found");
                msg
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno = code, error = %msg, "Bad request");
                msg
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno = code, error = %msg, "Internal server error");
                msg
            }
        };

        (StatusCode::OK, Json(ErrorResponse::new(code, message))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_mapping() {
        let err: ApiError = ApplicationError::not_found("Topic", 9).into();
        assert!(matches!(&err, ApiError::NotFound(msg) if msg == "Topic not found: 9"));
        assert_eq!(err.errno(), errno::NOT_FOUND);
    }

    #[test]
    fn test_business_errors_use_http_ok() {
        let response = ApiError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
