use crate::models::{ImportLayout, LabelLanguage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub import: ImportLayout,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub labels: LabelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// 库存移动导出的默认表头
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub doc_type: String,
    pub account_key: String,
    pub sheet_name: String,
    /// 覆盖数据行的命名区域，为空则不创建
    pub named_range: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            doc_type: "1".to_string(),
            account_key: String::new(),
            sheet_name: "Sheet1".to_string(),
            named_range: Some("StockMoves".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    pub language: LabelLanguage,
    pub spool_dir: PathBuf,
    /// 单行最大字符数
    pub width_chars: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            language: LabelLanguage::Zpl,
            spool_dir: std::env::temp_dir().join("parts-desk-spool"),
            width_chars: 28,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgres://localhost/parts_catalog".to_string()),
                max_connections: 5,
            },
            import: ImportLayout::default(),
            export: ExportConfig::default(),
            labels: LabelConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            ..defaults
        }
    }

    /// 加载顺序: 默认值 -> `parts-desk.toml`（可选）-> `PARTS_DESK__*` 环境变量
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("parts-desk")
    }

    pub fn load_from(file_stem: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Config::try_from(&Self::from_env())?)
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(config::Environment::with_prefix("PARTS_DESK").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_survive_missing_file() {
        let cfg = AppConfig::load_from("/nonexistent/parts-desk-config").unwrap();
        assert_eq!(cfg.import.sh_code_column, 0);
        assert_eq!(cfg.export.sheet_name, "Sheet1");
        assert_eq!(cfg.labels.language, LabelLanguage::Zpl);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "[import]\nsh_code_column = 3\noem_code_column = 4\nquantity_column = 5\nfirst_data_row = 7\n\n[labels]\nlanguage = \"tspl\"\nspool_dir = \"/tmp/spool\"\nwidth_chars = 20"
        )
        .unwrap();

        let stem = dir.path().join("desk");
        let cfg = AppConfig::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(cfg.import.sh_code_column, 3);
        assert_eq!(cfg.import.first_data_row, 7);
        assert_eq!(cfg.labels.language, LabelLanguage::Tspl);
        assert_eq!(cfg.labels.width_chars, 20);
        // 未覆盖的段保持默认
        assert_eq!(cfg.export.doc_type, "1");
    }
}
