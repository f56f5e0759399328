use crate::error::{AppError, AppResult};
use crate::models::{ExportHeader, ExportLine, ImportBatch, RowStatus};
use crate::sheet::{write_stock_moves_csv, write_stock_moves_xlsx, SheetFormat, XlsxExportOptions};
use std::path::Path;

/// 由已处理完的批次生成导出行；每个 Valid 行一条，Discarded 行跳过
pub fn build_export_lines(batch: &ImportBatch, header: &ExportHeader) -> AppResult<Vec<ExportLine>> {
    if !batch.is_ready_for_export() {
        return Err(AppError::UnresolvedRows {
            count: batch.unresolved_count(),
        });
    }

    let mut lines = Vec::new();
    for row in batch.rows.iter().filter(|r| r.status == RowStatus::Valid) {
        // 批次由客户端回传，Valid 行也要确认编码和数量齐全
        let (Some(item_key), Some(quantity)) = (row.resolved_key.as_ref(), row.quantity.as_ref()) else {
            return Err(AppError::InvalidSelection {
                row_number: row.row_number,
                message: "valid row is missing its part or quantity".to_string(),
            });
        };
        lines.push(ExportLine {
            doc_type: header.doc_type.clone(),
            account_key: header.account_key.clone(),
            doc_number: header.doc_number.clone(),
            item_key: item_key.clone(),
            quantity: quantity.to_string(),
        });
    }
    Ok(lines)
}

/// 导出批次到 xlsx 或 csv（按扩展名）
pub fn export_batch(
    batch: &ImportBatch,
    header: &ExportHeader,
    out_path: &Path,
    options: &XlsxExportOptions,
) -> AppResult<usize> {
    let lines = build_export_lines(batch, header)?;
    match SheetFormat::from_path(out_path)? {
        SheetFormat::Excel => write_stock_moves_xlsx(out_path, &lines, options),
        SheetFormat::Csv => write_stock_moves_csv(out_path, &lines),
    }
}
