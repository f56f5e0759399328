pub mod reader;
pub mod writer;

pub use reader::{read_import_rows, SheetFormat};
pub use writer::{write_stock_moves_csv, write_stock_moves_xlsx, XlsxExportOptions};
