use crate::error::{AppError, AppResult};
use crate::models::{
    ImportBatch, ImportLayout, RawImportRow, ResolutionRequest, ResolutionResult, RowStatus,
    StockMoveRow,
};
use crate::service::PartResolver;
use crate::sheet::read_import_rows;
use bigdecimal::{BigDecimal, Zero};
use std::path::Path;
use std::str::FromStr;

/// 库存移动导入
///
/// 逐行解析；行级失败记录在行上，不中断整批。数据库错误直接返回。
pub struct StockImportService {
    resolver: PartResolver,
}

impl StockImportService {
    pub fn new(resolver: PartResolver) -> Self {
        Self { resolver }
    }

    pub async fn import_file(&self, path: &Path, layout: &ImportLayout) -> AppResult<ImportBatch> {
        let raws = read_import_rows(path, layout)?;
        self.import_rows(path.display().to_string(), raws).await
    }

    pub async fn import_rows(
        &self,
        source: impl Into<String>,
        raws: Vec<RawImportRow>,
    ) -> AppResult<ImportBatch> {
        let mut batch = ImportBatch::new(source);
        let total = raws.len();

        for (idx, raw) in raws.into_iter().enumerate() {
            if raw.is_blank() {
                continue;
            }
            let row_number = raw.row_number;
            let row = self.import_row(raw).await.map_err(|e| {
                tracing::error!("导入第 {} 行失败: {}", row_number, e);
                e
            })?;
            if !row.status.is_settled() {
                tracing::warn!("第 {} 行: {}", row.row_number, row.message);
            }
            batch.rows.push(row);

            let current = idx + 1;
            if current % 100 == 0 {
                tracing::info!("导入进度: {}/{}", current, total);
            }
        }

        tracing::info!(
            "导入完成: {} 行, 待处理 {} 行, 来源 {}",
            batch.rows.len(), batch.unresolved_count(), batch.source
        );
        Ok(batch)
    }

    async fn import_row(&self, raw: RawImportRow) -> AppResult<StockMoveRow> {
        let quantity = parse_quantity(raw.quantity_text.as_deref());
        let request = ResolutionRequest {
            sh_code: raw.sh_code.clone(),
            oem_code: raw.oem_code.clone(),
            quantity: quantity.clone().unwrap_or_else(BigDecimal::zero),
        };
        let result = self.resolver.resolve(&request).await?;

        let mut row = match result {
            ResolutionResult::Valid { resolved_key } => {
                let mut row = StockMoveRow::from_raw(raw, RowStatus::Valid, "");
                row.resolved_key = Some(resolved_key);
                row
            }
            ResolutionResult::NotFound { reason } => {
                let message = format!("code not found ({})", reason);
                StockMoveRow::from_raw(raw, RowStatus::NotFound, message)
            }
            ResolutionResult::AmbiguousMatches { candidates } => {
                let message = format!("OEM code matches {} parts", candidates.len());
                let mut row = StockMoveRow::from_raw(raw, RowStatus::Ambiguous, message);
                row.candidates = candidates;
                row
            }
        };

        row.quantity = quantity;
        if row.status == RowStatus::Valid {
            settle_quantity(&mut row);
        }
        Ok(row)
    }
}

/// 数量必须是正数
pub fn parse_quantity(text: Option<&str>) -> Option<BigDecimal> {
    let text = text.map(str::trim).filter(|t| !t.is_empty())?;
    BigDecimal::from_str(text)
        .ok()
        .filter(|q| *q > BigDecimal::zero())
}

/// 编码已确定后，按数量决定行状态
fn settle_quantity(row: &mut StockMoveRow) {
    if row.quantity.is_some() {
        row.status = RowStatus::Valid;
        row.message.clear();
    } else {
        row.status = RowStatus::InvalidQuantity;
        row.message = format!(
            "invalid quantity '{}'",
            row.quantity_text.as_deref().unwrap_or_default()
        );
    }
}

fn find_row(batch: &mut ImportBatch, row_number: usize) -> AppResult<&mut StockMoveRow> {
    batch.row_mut(row_number).ok_or_else(|| AppError::InvalidSelection {
        row_number,
        message: "row not in batch".to_string(),
    })
}

/// 为歧义行选定候选零件
pub fn choose_candidate(batch: &mut ImportBatch, row_number: usize, part_number: &str) -> AppResult<()> {
    let row = find_row(batch, row_number)?;
    if row.status != RowStatus::Ambiguous {
        return Err(AppError::InvalidSelection {
            row_number,
            message: "row is not ambiguous".to_string(),
        });
    }
    if !row.candidates.iter().any(|c| c.part_number == part_number) {
        return Err(AppError::InvalidSelection {
            row_number,
            message: format!("{} is not a candidate", part_number),
        });
    }

    row.resolved_key = Some(part_number.to_string());
    row.candidates.clear();
    settle_quantity(row);
    tracing::info!("第 {} 行选定 {}", row_number, part_number);
    Ok(())
}

/// 修正数量；只对编码已确定的行有效
pub fn set_quantity(batch: &mut ImportBatch, row_number: usize, text: &str) -> AppResult<()> {
    let row = find_row(batch, row_number)?;
    if row.resolved_key.is_none() || row.status == RowStatus::Discarded {
        return Err(AppError::InvalidSelection {
            row_number,
            message: "row has no resolved part".to_string(),
        });
    }
    row.quantity_text = Some(text.to_string());
    row.quantity = parse_quantity(Some(text));
    settle_quantity(row);
    Ok(())
}

/// 放弃该行，导出时跳过
pub fn discard(batch: &mut ImportBatch, row_number: usize) -> AppResult<()> {
    let row = find_row(batch, row_number)?;
    row.status = RowStatus::Discarded;
    row.message = "discarded".to_string();
    Ok(())
}
