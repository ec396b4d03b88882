//! 商品目录：存储、查询、统计、校验与 HTTP 处理器

pub mod handler;
pub mod model;
pub mod query;
pub mod service;
pub mod stats;
pub mod store;
pub mod validation;

pub use model::{NewProduct, Product, ProductPatch, ProductStats};
pub use service::ProductService;
pub use store::ProductStore;
