//! 核心响应处理模块

use serde::Serialize;

/// API 响应结构
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(data: T, message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data,
        }
    }
}

/// 分页列表响应
#[derive(Debug, Serialize)]
pub struct ListResponse<T, P> {
    pub success: bool,
    pub count: usize,
    pub pagination: P,
    pub data: Vec<T>,
}

impl<T, P> ListResponse<T, P> {
    pub fn new(data: Vec<T>, pagination: P) -> Self {
        Self {
            success: true,
            count: data.len(),
            pagination,
            data,
        }
    }
}

/// 搜索响应，回显查询词
#[derive(Debug, Serialize)]
pub struct SearchResponse<T> {
    pub success: bool,
    pub query: String,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> SearchResponse<T> {
    pub fn new(query: String, data: Vec<T>) -> Self {
        Self {
            success: true,
            query,
            count: data.len(),
            data,
        }
    }
}
