//! 核心层：错误处理、统一响应与中间件

pub mod error;
pub mod middleware;
pub mod response;

pub use error::CoreError;
