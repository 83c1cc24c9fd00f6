use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gateway_core::RelayError;
use serde_json::{json, Value};
use std::any::Any;
use thiserror::Error;
use tracing::error;

/// API层错误，响应体统一为 {"detail": ...}
#[derive(Error, Debug)]
pub enum ApiError {
    /// 客户端错误 - 400 Bad Request
    #[error("{0}")]
    BadRequest(String),
    /// 请求体无法解析，状态码沿用axum的拒绝原因（400/415/422）
    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },
    /// 下游不可用 - 503，detail为结构化对象
    #[error("downstream service unavailable")]
    ServiceUnavailable(Value),
    /// 服务器内部错误 - 500
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody { status, .. } => *status,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> Value {
        match self {
            ApiError::ServiceUnavailable(detail) => detail.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(error: RelayError) -> Self {
        match error {
            RelayError::UnsupportedMethod(method) => {
                ApiError::BadRequest(format!("Unsupported HTTP method: {method}"))
            }
            other => ApiError::Internal(format!("Failed to call .NET API: {}", other.message())),
        }
    }
}

/// 处理器panic时返回JSON格式的500响应
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    error!("Handler panicked: {}", details);
    ApiError::Internal(format!("Internal server error: {details}")).into_response()
}
