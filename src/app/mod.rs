//! 应用层

pub mod product;

use std::sync::Arc;

use axum::{
    middleware,
    response::Json,
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::core::middleware::{
    auth_middleware, error_handling_middleware, not_found_handler, panic_response,
    request_logging_middleware,
};
use crate::infrastructure::AppConfig;
use product::{handler, ProductService, ProductStore};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<ProductStore>) -> Self {
        Self {
            product_service: ProductService::new(store),
            config: Arc::new(config),
        }
    }

    /// 按配置决定是否写入示例数据
    pub fn from_config(config: AppConfig) -> Self {
        let store = if config.seed_sample_data {
            ProductStore::with_sample_data()
        } else {
            ProductStore::new()
        };
        Self::new(config, Arc::new(store))
    }
}

/// 构建完整路由
pub fn router(state: AppState) -> Router {
    // 认证只包住已注册的方法，方法级 404 fallback 挂在认证层之外
    let auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let products = Router::new()
        .route(
            "/",
            get(handler::list_products)
                .post(handler::create_product)
                .route_layer(auth.clone())
                .fallback(not_found_handler),
        )
        .route(
            "/search",
            get(handler::search_products).fallback(not_found_handler),
        )
        .route(
            "/stats",
            get(handler::product_stats).fallback(not_found_handler),
        )
        .route(
            "/:id",
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product)
                .route_layer(auth)
                .fallback(not_found_handler),
        );

    Router::new()
        .route("/", get(api_info))
        .nest("/api/products", products)
        .fallback(not_found_handler)
        // 由内向外
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error_handling_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// API 信息
async fn api_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "Welcome to the Products API!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "products": "/api/products",
            "search": "/api/products/search",
            "statistics": "/api/products/stats"
        },
        "documentation": "Please refer to README.md for complete API documentation"
    }))
}
