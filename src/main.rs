use product_catalog_api::infrastructure::{AppConfig, Logger};
use product_catalog_api::{router, AppState};
use tokio::net::TcpListener;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    Logger::init(Level::INFO);

    let config = AppConfig::from_env();
    let addr = config.socket_addr();
    info!(
        "启动商品目录服务 (environment: {:?}, sample data: {})",
        config.environment, config.seed_sample_data
    );

    let state = AppState::from_config(config);
    let app = router(state);

    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 服务器运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    /api/products          - 商品列表 (search, category, inStock, minPrice, maxPrice, page, limit)");
    info!("   GET    /api/products/search   - 搜索商品 (?q=)");
    info!("   GET    /api/products/stats    - 商品统计");
    info!("   GET    /api/products/:id      - 获取商品");
    info!("   POST   /api/products          - 创建商品 (需要 x-api-key)");
    info!("   PUT    /api/products/:id      - 更新商品 (需要 x-api-key)");
    info!("   DELETE /api/products/:id      - 删除商品 (需要 x-api-key)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务器已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("无法监听 Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到关闭信号");
}
