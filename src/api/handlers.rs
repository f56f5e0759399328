use crate::api::AppState;
use crate::error::AppError;
use crate::models::{
    ExportHeader, GovVehicleRecord, ImportBatch, ImportLayout, PartSticker, ResolutionRequest,
    StockMoveLabel, Vehicle,
};
use crate::service::normalizer::split_oem_field;
use crate::service::{stock_export, stock_import, variant};
use crate::sheet::XlsxExportOptions;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// 失败响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

fn error_response(e: AppError) -> Response {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!("request failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let response = ErrorResponse {
        success: false,
        message: e.to_string(),
    };
    (status, Json(response)).into_response()
}

fn ok_json<T: Serialize>(value: T) -> Response {
    (StatusCode::OK, Json(value)).into_response()
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 解析单个 SH / OEM 编码
pub async fn resolve_part(
    State(state): State<AppState>,
    Json(req): Json<ResolutionRequest>,
) -> Response {
    match state.resolver.resolve(&req).await {
        Ok(result) => ok_json(result),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct OemSearchRequest {
    pub code: String,
}

/// OEM 查询（精确子编码匹配）
pub async fn search_oem(
    State(state): State<AppState>,
    Json(req): Json<OemSearchRequest>,
) -> Response {
    match state.resolver.search_oem(&req.code).await {
        Ok(parts) => ok_json(parts),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Serialize)]
pub struct VariantKeyResponse {
    pub key: String,
}

pub async fn variant_key(Json(vehicle): Json<Vehicle>) -> Response {
    ok_json(VariantKeyResponse {
        key: variant::variant_key(&vehicle),
    })
}

#[derive(Debug, Deserialize)]
pub struct GovMatchRequest {
    pub vehicle: Vehicle,
    pub records: Vec<GovVehicleRecord>,
}

/// 登记数据对照
pub async fn gov_matches(Json(req): Json<GovMatchRequest>) -> Response {
    let matches: Vec<&GovVehicleRecord> = variant::find_gov_matches(&req.vehicle, &req.records);
    ok_json(matches)
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub path: PathBuf,
    #[serde(default)]
    pub layout: Option<ImportLayout>,
}

/// 导入库存移动表格
pub async fn import_stock_moves(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Response {
    let layout = req.layout.unwrap_or_else(|| state.config.import.clone());
    match state.importer.import_file(&req.path, &layout).await {
        Ok(batch) => ok_json(batch),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ChooseRequest {
    pub batch: ImportBatch,
    pub row_number: usize,
    pub part_number: String,
}

/// 为歧义行选择零件，返回更新后的批次
pub async fn choose_candidate(Json(req): Json<ChooseRequest>) -> Response {
    let mut batch = req.batch;
    match stock_import::choose_candidate(&mut batch, req.row_number, &req.part_number) {
        Ok(()) => ok_json(batch),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct DiscardRequest {
    pub batch: ImportBatch,
    pub row_number: usize,
}

pub async fn discard_row(Json(req): Json<DiscardRequest>) -> Response {
    let mut batch = req.batch;
    match stock_import::discard(&mut batch, req.row_number) {
        Ok(()) => ok_json(batch),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub batch: ImportBatch,
    pub row_number: usize,
    pub quantity: String,
}

/// 修改已解析行的数量；数量合法时该行变为 Valid
pub async fn set_quantity(Json(req): Json<QuantityRequest>) -> Response {
    let mut batch = req.batch;
    match stock_import::set_quantity(&mut batch, req.row_number, &req.quantity) {
        Ok(()) => ok_json(batch),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub batch: ImportBatch,
    pub path: PathBuf,
    pub doc_number: String,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub account_key: Option<String>,
    #[serde(default)]
    pub named_range: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub success: bool,
    pub written: usize,
}

/// 导出已处理完的批次；未处理行存在时返回 400
pub async fn export_stock_moves(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Response {
    let defaults = &state.config.export;
    let header = ExportHeader {
        doc_type: req.doc_type.unwrap_or_else(|| defaults.doc_type.clone()),
        account_key: req.account_key.unwrap_or_else(|| defaults.account_key.clone()),
        doc_number: req.doc_number,
    };
    let options = XlsxExportOptions {
        sheet_name: defaults.sheet_name.clone(),
        named_range: req.named_range.or_else(|| defaults.named_range.clone()),
    };

    match stock_export::export_batch(&req.batch, &header, &req.path, &options) {
        Ok(written) => ok_json(ExportResponse {
            success: true,
            written,
        }),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Serialize)]
pub struct PrintResponse {
    pub success: bool,
    pub job_name: String,
    pub language: crate::models::LabelLanguage,
}

static JOB_SEQ: AtomicU64 = AtomicU64::new(0);

/// 任务名: 前缀-键-时间戳-进程内序号
fn job_name(prefix: &str, key: &str) -> String {
    let seq = JOB_SEQ.fetch_add(1, Ordering::Relaxed);
    format!(
        "{}-{}-{}-{}",
        prefix,
        key,
        chrono::Local::now().format("%Y%m%d%H%M%S%3f"),
        seq
    )
}

/// 打印零件贴纸；只给了零件号时从目录补全名称、厂商和 OEM 编码
pub async fn print_part_sticker(
    State(state): State<AppState>,
    Json(mut sticker): Json<PartSticker>,
) -> Response {
    if sticker.part_name.is_none() && sticker.oem_codes.is_empty() {
        match state.resolver.find_part(&sticker.part_number).await {
            Ok(Some(part)) => {
                sticker.oem_codes = part
                    .oem_fields()
                    .flat_map(split_oem_field)
                    .map(str::to_string)
                    .collect();
                sticker.part_name = part.part_name;
                sticker.manufacturer = sticker.manufacturer.or(part.manufacturer);
            }
            Ok(None) => tracing::warn!("零件 {} 不在目录中, 按原样打印", sticker.part_number),
            Err(e) => return error_response(e),
        }
    }

    let program = state.labels.render_part_sticker(&sticker);
    send_job(&state, job_name("sticker", &sticker.part_number), program)
}

pub async fn print_stock_move_label(
    State(state): State<AppState>,
    Json(label): Json<StockMoveLabel>,
) -> Response {
    let program = state.labels.render_stock_move_label(&label);
    send_job(&state, job_name("move", &label.doc_number), program)
}

fn send_job(state: &AppState, job_name: String, program: String) -> Response {
    match state.sink.send(&job_name, program.as_bytes()) {
        Ok(job_name) => ok_json(PrintResponse {
            success: true,
            job_name,
            language: state.labels.language(),
        }),
        Err(e) => error_response(e),
    }
}
