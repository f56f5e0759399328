pub mod handlers;

use crate::config::AppConfig;
use crate::service::{LabelRenderer, PartResolver, PrintSink, StockImportService};
use axum::{routing::{get, post}, Router};
use std::sync::Arc;

/// 共享状态：各服务都是无状态的，只持有目录连接和配置
#[derive(Clone)]
pub struct AppState {
    pub resolver: PartResolver,
    pub importer: Arc<StockImportService>,
    pub labels: LabelRenderer,
    pub sink: Arc<dyn PrintSink>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(resolver: PartResolver, sink: Arc<dyn PrintSink>, config: AppConfig) -> Self {
        Self {
            importer: Arc::new(StockImportService::new(resolver.clone())),
            labels: LabelRenderer::new(config.labels.language, config.labels.width_chars),
            resolver,
            sink,
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/parts/resolve", post(handlers::resolve_part))
        .route("/api/parts/search-oem", post(handlers::search_oem))
        .route("/api/vehicles/variant-key", post(handlers::variant_key))
        .route("/api/vehicles/gov-matches", post(handlers::gov_matches))
        .route("/api/stock-moves/import", post(handlers::import_stock_moves))
        .route("/api/stock-moves/choose", post(handlers::choose_candidate))
        .route("/api/stock-moves/quantity", post(handlers::set_quantity))
        .route("/api/stock-moves/discard", post(handlers::discard_row))
        .route("/api/stock-moves/export", post(handlers::export_stock_moves))
        .route("/api/labels/part-sticker", post(handlers::print_part_sticker))
        .route("/api/labels/stock-move", post(handlers::print_stock_move_label))
        .with_state(state)
}
