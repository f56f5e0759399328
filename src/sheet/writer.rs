//! 库存移动导出
//!
//! 固定 5 列: DocType, AccountKey, DocNumber, ItemKey, Quantity；所有单元格写为文本。

use crate::error::AppResult;
use crate::models::ExportLine;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XlsxExportOptions {
    pub sheet_name: String,
    /// 覆盖已写数据行的命名区域
    pub named_range: Option<String>,
}

impl Default for XlsxExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            named_range: None,
        }
    }
}

/// 写出 xlsx，返回数据行数（不含表头）
pub fn write_stock_moves_xlsx(
    out_path: &Path,
    lines: &[ExportLine],
    options: &XlsxExportOptions,
) -> AppResult<usize> {
    let mut workbook = Workbook::new();

    let header_format = Format::new().set_bold().set_num_format("@");
    let text_format = Format::new().set_num_format("@");

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(&options.sheet_name)?;
        write_headers(sheet, &ExportLine::HEADERS, &header_format)?;

        let mut row: u32 = 1;
        for line in lines {
            for (col, value) in line.to_record().iter().enumerate() {
                sheet.write_string_with_format(row, col as u16, *value, &text_format)?;
            }
            row += 1;
        }

        for col in 0..ExportLine::HEADERS.len() as u16 {
            sheet.set_column_width(col, 16)?;
        }
    }

    if let Some(name) = options.named_range.as_deref().filter(|n| !n.is_empty()) {
        if !lines.is_empty() {
            let formula = named_range_formula(&options.sheet_name, lines.len());
            workbook.define_name(name, &formula)?;
        }
    }

    workbook.save(out_path)?;
    tracing::info!("导出 {} 行到 {}", lines.len(), out_path.display());
    Ok(lines.len())
}

/// 数据区域公式，例如 `='Sheet1'!$A$2:$E$4`
fn named_range_formula(sheet_name: &str, data_rows: usize) -> String {
    format!(
        "='{}'!$A$2:$E${}",
        sheet_name.replace('\'', "''"),
        data_rows + 1
    )
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, format)?;
    }
    Ok(())
}

/// 导出 CSV（同样的 5 列，含表头）
pub fn write_stock_moves_csv(out_path: &Path, lines: &[ExportLine]) -> AppResult<usize> {
    let mut writer = csv::Writer::from_path(out_path)?;
    writer.write_record(ExportLine::HEADERS)?;
    for line in lines {
        writer.write_record(line.to_record())?;
    }
    writer.flush()?;
    Ok(lines.len())
}
