use thiserror::Error;

/// 应用错误
///
/// 行级校验失败（编码找不到、OEM 歧义、数量无法解析）不走这里，
/// 而是记录在导入行自身的 status / message 上。
#[derive(Debug, Error)]
pub enum AppError {
    /// 数据库访问失败，保留原始错误信息
    #[error("operation failed: {message}")]
    OperationFailed { message: String },

    #[error("batch has {count} unresolved rows")]
    UnresolvedRows { count: usize },

    #[error("row {row_number}: {message}")]
    InvalidSelection { row_number: usize, message: String },

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    /// 导入文件不存在或无法读取
    #[error("cannot read import file {path}: {message}")]
    ImportFile { path: String, message: String },

    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::OperationFailed {
            message: message.into(),
        }
    }

    /// 调用方输入有误（而非服务端故障）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedRows { .. }
                | Self::InvalidSelection { .. }
                | Self::UnsupportedFormat(_)
                | Self::Spreadsheet(_)
                | Self::ImportFile { .. }
        )
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!("database error: {:?}", e);
        Self::operation_failed(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
