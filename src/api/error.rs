//! HTTP 错误响应
//!
//! 所有错误类型到 HTTP 状态码的映射只在这里做一次。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{GradingError, SubmissionError};

/// 缺少文件时的提示
pub const MISSING_FILES_MESSAGE: &str = "Both solutionKey and studentSheet files are required.";

/// 意外错误时的通用提示
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred during grading.";

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API 层错误
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Both solutionKey and studentSheet files are required.")]
    MissingFiles,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Grading(#[from] GradingError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFiles | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Grading(GradingError::CredentialMissing) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Grading(GradingError::RemoteTransportFailure(_))
            | ApiError::Grading(GradingError::MalformedReply(_)) => StatusCode::BAD_GATEWAY,
            // 解码失败在流程内部回退，走到这里说明流程有 bug
            ApiError::Grading(GradingError::DecodeFailure { .. }) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::MissingFiles => ErrorBody {
                error: MISSING_FILES_MESSAGE.to_string(),
                details: None,
            },
            ApiError::BadRequest(detail) => ErrorBody {
                error: detail,
                details: None,
            },
            ApiError::Grading(e) => ErrorBody {
                error: e.to_string(),
                details: None,
            },
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "评分过程中发生意外错误");
                ErrorBody {
                    error: UNEXPECTED_ERROR_MESSAGE.to_string(),
                    details: Some(detail),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Grading(e) => ApiError::Grading(e),
            SubmissionError::Unexpected(detail) => ApiError::Internal(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingFiles.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(GradingError::CredentialMissing).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(GradingError::MalformedReply("x".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(SubmissionError::Unexpected("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(GradingError::DecodeFailure {
                filename: "s1.txt".into()
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
