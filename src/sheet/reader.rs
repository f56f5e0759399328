//! 导入表格读取（xlsx / xls / csv）
//!
//! 只按 [`ImportLayout`] 指定的列取值，其余列忽略。

use crate::error::{AppError, AppResult};
use crate::models::{ImportLayout, RawImportRow};
use calamine::{open_workbook_auto, DataType, Reader};
use std::path::Path;

/// 支持的表格格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Excel, // XLSX/XLS
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xls" => Ok(Self::Excel),
            _ => Err(AppError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// 读取导入行；行号从 1 开始，早于 `first_data_row` 的行跳过
pub fn read_import_rows(path: &Path, layout: &ImportLayout) -> AppResult<Vec<RawImportRow>> {
    let rows = match SheetFormat::from_path(path)? {
        SheetFormat::Csv => read_csv(path, layout)?,
        SheetFormat::Excel => read_excel(path, layout)?,
    };
    tracing::info!("读取 {}: {} 行", path.display(), rows.len());
    Ok(rows)
}

fn import_file_error(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::ImportFile {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn read_csv(path: &Path, layout: &ImportLayout) -> AppResult<Vec<RawImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| import_file_error(path, e))?;

    let first = layout.first_data_row.max(1);
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let row_number = idx + 1;
        let record = record.map_err(|e| import_file_error(path, e))?;
        if row_number < first {
            continue;
        }
        let cell = |col: usize| record.get(col).and_then(clean_text);
        rows.push(RawImportRow {
            row_number,
            sh_code: cell(layout.sh_code_column),
            oem_code: cell(layout.oem_code_column),
            quantity_text: cell(layout.quantity_column),
        });
    }
    Ok(rows)
}

fn read_excel(path: &Path, layout: &ImportLayout) -> AppResult<Vec<RawImportRow>> {
    if !path.is_file() {
        return Err(import_file_error(path, "file not found"));
    }
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| AppError::Spreadsheet(format!("failed to open {}: {}", path.display(), e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::Spreadsheet("no sheets found in workbook".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| AppError::Spreadsheet(format!("sheet {} not found", sheet_name)))?
        .map_err(|e| AppError::Spreadsheet(e.to_string()))?;

    // Range 不一定从 A1 开始
    let (start_row, start_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let first = layout.first_data_row.max(1);
    let mut rows = Vec::new();
    for (idx, cells) in range.rows().enumerate() {
        let row_number = start_row + idx + 1;
        if row_number < first {
            continue;
        }
        let cell = |col: usize| {
            col.checked_sub(start_col)
                .and_then(|c| cells.get(c))
                .and_then(cell_text)
        };
        rows.push(RawImportRow {
            row_number,
            sh_code: cell(layout.sh_code_column),
            oem_code: cell(layout.oem_code_column),
            quantity_text: cell(layout.quantity_column),
        });
    }
    Ok(rows)
}

fn clean_text(value: &str) -> Option<String> {
    let trimmed = value.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// 单元格转文本；整数值的浮点数不带小数部分
fn cell_text(cell: &DataType) -> Option<String> {
    match cell {
        DataType::Empty => None,
        DataType::String(s) => clean_text(s),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        DataType::Int(i) => Some(i.to_string()),
        other => clean_text(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn format_is_detected_from_extension() {
        assert_eq!(SheetFormat::from_path(Path::new("a.CSV")).unwrap(), SheetFormat::Csv);
        assert_eq!(SheetFormat::from_path(Path::new("a.xlsx")).unwrap(), SheetFormat::Excel);
        assert!(matches!(
            SheetFormat::from_path(Path::new("a.txt")),
            Err(AppError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_import_error() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["absent.csv", "absent.xlsx"] {
            let err = read_import_rows(&dir.path().join(name), &ImportLayout::default()).unwrap_err();
            assert!(matches!(err, AppError::ImportFile { .. }), "{name}: {err:?}");
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn non_utf8_csv_is_import_error() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"sh,oem,qty\nABC\xff\xfe,,1\n").unwrap();
        file.flush().unwrap();
        let err = read_import_rows(file.path(), &ImportLayout::default()).unwrap_err();
        assert!(matches!(err, AppError::ImportFile { .. }), "{err:?}");
    }

    #[test]
    fn csv_rows_follow_layout() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "qty,note,sh,oem").unwrap();
        writeln!(file, "3,x,ABC123,").unwrap();
        writeln!(file, "1.5,y,, 99-12 ").unwrap();
        writeln!(file, "2").unwrap();
        file.flush().unwrap();

        let layout = ImportLayout {
            sh_code_column: 2,
            oem_code_column: 3,
            quantity_column: 0,
            first_data_row: 2,
        };
        let rows = read_import_rows(file.path(), &layout).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[0].sh_code.as_deref(), Some("ABC123"));
        assert_eq!(rows[0].oem_code, None);
        assert_eq!(rows[1].oem_code.as_deref(), Some("99-12"));
        assert_eq!(rows[1].quantity_text.as_deref(), Some("1.5"));
        // 短行缺失的列为 None
        assert_eq!(rows[2].sh_code, None);
        assert_eq!(rows[2].quantity_text.as_deref(), Some("2"));
    }

    #[test]
    fn xlsx_rows_follow_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moves.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        {
            let sheet = workbook.add_worksheet();
            sheet.write_string(0, 0, "SH").unwrap();
            sheet.write_string(0, 1, "OEM").unwrap();
            sheet.write_string(0, 2, "QTY").unwrap();
            sheet.write_string(1, 0, "ABC123").unwrap();
            sheet.write_number(1, 2, 4.0).unwrap();
            sheet.write_string(2, 1, "1844.51").unwrap();
            sheet.write_number(2, 2, 2.5).unwrap();
        }
        workbook.save(&path).unwrap();

        let rows = read_import_rows(&path, &ImportLayout::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[0].sh_code.as_deref(), Some("ABC123"));
        assert_eq!(rows[0].quantity_text.as_deref(), Some("4"));
        assert_eq!(rows[1].oem_code.as_deref(), Some("1844.51"));
        assert_eq!(rows[1].quantity_text.as_deref(), Some("2.5"));
    }
}
