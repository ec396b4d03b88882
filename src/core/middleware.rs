//! 核心中间件模块

use std::any::Any;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{OriginalUri, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::error::{CoreError, ErrorDetail, ErrorResponse};
use crate::app::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

// 日志中不输出的请求体字段
const SENSITIVE_FIELDS: [&str; 2] = ["password", "apiKey"];

// 请求体日志的缓冲上限
const MAX_LOGGED_BODY: usize = 1024 * 1024;

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("Unknown")
        .to_string();

    let req = if method == Method::POST || method == Method::PUT {
        match log_request_body(req).await {
            Ok(req) => req,
            Err(err) => return err.into_response(),
        }
    } else {
        req
    };

    let response = next.run(req).await;
    let status = response.status();
    let duration = start.elapsed();

    info!(
        "{} {} - {} - {}ms - User-Agent: {}",
        method,
        uri,
        status,
        duration.as_millis(),
        user_agent
    );

    response
}

// 读出请求体记录日志后原样放回
async fn log_request_body(req: Request) -> Result<Request, CoreError> {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_LOGGED_BODY)
        .await
        .map_err(|e| CoreError::Validation(format!("Failed to read request body: {}", e)))?;

    if let Ok(Value::Object(mut fields)) = serde_json::from_slice::<Value>(&bytes) {
        for key in SENSITIVE_FIELDS {
            fields.remove(key);
        }
        let logged = Value::Object(fields);
        debug!("Request Body: {}", logged);
    }

    Ok(Request::from_parts(parts, Body::from(bytes)))
}

fn requires_api_key(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::DELETE)
}

/// 认证中间件，只拦截写操作
pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, CoreError> {
    if requires_api_key(req.method()) {
        let api_key = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|h| h.to_str().ok());

        match api_key {
            None => {
                return Err(CoreError::Authentication(
                    "API key is required. Please include x-api-key in headers.".to_string(),
                ))
            }
            Some(key) if key != state.config.api_key => {
                return Err(CoreError::Authentication("Invalid API key".to_string()))
            }
            Some(_) => {}
        }
    }

    Ok(next.run(req).await)
}

/// 终端错误处理中间件
///
/// 所有错误响应都在这里记录日志；开发模式下补充诊断信息。
pub async fn error_handling_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let Some(ErrorDetail(err)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    let status = response.status();
    if status.is_server_error() {
        error!("Error: {} {} - {}: {}", method, uri, err.kind(), err);
    } else {
        warn!("Error: {} {} - {}: {}", method, uri, err.kind(), err);
    }

    if !state.config.environment.is_development() {
        return response;
    }

    let mut body = ErrorResponse::new(err.message());
    body.stack = Some(format!(
        "{}: {}\n    at {} {}\n    {:?}",
        err.kind(),
        err.message(),
        method,
        uri,
        err
    ));

    let mut rebuilt = (status, Json(body)).into_response();
    rebuilt.extensions_mut().insert(ErrorDetail(err));
    rebuilt
}

/// 未匹配路由，嵌套路由下也使用完整路径
pub async fn not_found_handler(OriginalUri(uri): OriginalUri) -> CoreError {
    CoreError::NotFound(format!("Can't find {} on this server!", uri))
}

/// 处理器 panic 时返回 500，进程继续服务
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let reason = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("handler panicked: {}", reason);

    CoreError::Server("Server Error".to_string()).into_response()
}
