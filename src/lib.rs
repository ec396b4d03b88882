//! # 商品目录 REST 服务
//!
//! 基于 Axum 的内存商品目录：
//! - 商品的增删改查，写操作需要 `x-api-key`
//! - 组合过滤、全文搜索与分页
//! - 库存与价格统计
//! - 统一的错误分类与 JSON 错误响应

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::{router, AppState};
pub use infrastructure::AppConfig;
