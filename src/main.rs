use parts_desk::api::{self, AppState};
use parts_desk::db::PgCatalog;
use parts_desk::service::FileSink;
use parts_desk::{create_pool, AppConfig, PartResolver};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 创建数据库连接池
    let pool = create_pool(&config.database).await?;
    info!("Database pool created");

    let resolver = PartResolver::new(Arc::new(PgCatalog::new(pool)));
    let sink = Arc::new(FileSink::new(config.labels.spool_dir.clone()));
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let app = api::router(AppState::new(resolver, sink, config)).layer(ServiceBuilder::new());

    // 启动服务器
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/parts/resolve          - SH / OEM 编码解析");
    info!("  POST /api/stock-moves/import     - 库存移动导入");
    info!("  POST /api/stock-moves/export     - 库存移动导出");
    info!("  POST /api/labels/part-sticker    - 零件贴纸");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
