//! 核心错误处理模块

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// 核心错误类型
///
/// 每个变体对应一个固定的 HTTP 状态码，由终端错误处理中间件统一输出。
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoreError {
    /// 字段校验、查询参数校验或请求体解析失败
    #[error("{0}")]
    Validation(String),

    /// 缺少或错误的 API Key
    #[error("{0}")]
    Authentication(String),

    /// 按 id 查找不到记录，或路由不存在
    #[error("{0}")]
    NotFound(String),

    /// 未分类的错误
    #[error("{0}")]
    Server(String),
}

impl CoreError {
    /// 把所有字段错误合并成一条校验错误
    pub fn validation_failed<I, S>(violations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = violations
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        CoreError::Validation(format!("Validation failed: {}", joined))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::Authentication(_) => StatusCode::UNAUTHORIZED,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "ValidationError",
            CoreError::Authentication(_) => "AuthenticationError",
            CoreError::NotFound(_) => "NotFoundError",
            CoreError::Server(_) => "ServerError",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CoreError::Validation(msg)
            | CoreError::Authentication(msg)
            | CoreError::NotFound(msg)
            | CoreError::Server(msg) => msg,
        }
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(_) => {
                CoreError::Validation("Invalid JSON format".to_string())
            }
            other => CoreError::Validation(other.body_text()),
        }
    }
}

impl From<QueryRejection> for CoreError {
    fn from(rejection: QueryRejection) -> Self {
        CoreError::Validation(rejection.body_text())
    }
}

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            stack: None,
        }
    }
}

/// 附加在错误响应上的扩展，供终端错误处理中间件记录日志和补充诊断信息
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub CoreError);

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if self.message().is_empty() {
            "Server Error".to_string()
        } else {
            self.message().to_string()
        };

        let mut response = (status, Json(ErrorResponse::new(message))).into_response();
        response.extensions_mut().insert(ErrorDetail(self));
        response
    }
}
