use super::PartRecord;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 导入列映射
///
/// 列号从 0 开始；`first_data_row` 从 1 开始（与表格中显示的行号一致）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportLayout {
    pub sh_code_column: usize,
    pub oem_code_column: usize,
    pub quantity_column: usize,
    pub first_data_row: usize,
}

impl Default for ImportLayout {
    fn default() -> Self {
        Self {
            sh_code_column: 0,
            oem_code_column: 1,
            quantity_column: 2,
            first_data_row: 2,
        }
    }
}

/// 表格中读出的原始行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawImportRow {
    pub row_number: usize,
    pub sh_code: Option<String>,
    pub oem_code: Option<String>,
    pub quantity_text: Option<String>,
}

impl RawImportRow {
    pub fn is_blank(&self) -> bool {
        [&self.sh_code, &self.oem_code, &self.quantity_text]
            .iter()
            .all(|v| v.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Valid,
    NotFound,
    Ambiguous,
    InvalidQuantity,
    Discarded,
}

impl RowStatus {
    /// 导出前不需要再处理的状态
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Valid | Self::Discarded)
    }
}

/// 导入后的一行库存移动
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMoveRow {
    pub row_number: usize,
    pub sh_code: Option<String>,
    pub oem_code: Option<String>,
    pub quantity_text: Option<String>,
    pub quantity: Option<BigDecimal>,
    pub status: RowStatus,
    pub message: String,
    pub resolved_key: Option<String>,
    #[serde(default)]
    pub candidates: Vec<PartRecord>,
}

impl StockMoveRow {
    pub fn from_raw(raw: RawImportRow, status: RowStatus, message: impl Into<String>) -> Self {
        Self {
            row_number: raw.row_number,
            sh_code: raw.sh_code,
            oem_code: raw.oem_code,
            quantity_text: raw.quantity_text,
            quantity: None,
            status,
            message: message.into(),
            resolved_key: None,
            candidates: Vec::new(),
        }
    }
}

/// 一次导入的全部行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub source: String,
    pub imported_at: DateTime<Utc>,
    pub rows: Vec<StockMoveRow>,
}

impl ImportBatch {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            imported_at: Utc::now(),
            rows: Vec::new(),
        }
    }

    pub fn is_ready_for_export(&self) -> bool {
        self.rows.iter().all(|r| r.status.is_settled())
    }

    pub fn unresolved_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.status.is_settled()).count()
    }

    /// 各状态的行数
    pub fn summary(&self) -> BTreeMap<RowStatus, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.status).or_insert(0) += 1;
        }
        counts
    }

    pub fn row_mut(&mut self, row_number: usize) -> Option<&mut StockMoveRow> {
        self.rows.iter_mut().find(|r| r.row_number == row_number)
    }
}

/// 导出表头 (单据类型 / 客户账号 / 单据号)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportHeader {
    pub doc_type: String,
    pub account_key: String,
    pub doc_number: String,
}

/// 导出行: DocType, AccountKey, DocNumber, ItemKey, Quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportLine {
    pub doc_type: String,
    pub account_key: String,
    pub doc_number: String,
    pub item_key: String,
    pub quantity: String,
}

impl ExportLine {
    pub const HEADERS: [&'static str; 5] =
        ["DocType", "AccountKey", "DocNumber", "ItemKey", "Quantity"];

    pub fn to_record(&self) -> [&str; 5] {
        [
            self.doc_type.as_str(),
            self.account_key.as_str(),
            self.doc_number.as_str(),
            self.item_key.as_str(),
            self.quantity.as_str(),
        ]
    }
}
