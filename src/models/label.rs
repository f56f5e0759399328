use serde::{Deserialize, Serialize};

/// 打印机语言: Zebra 使用 ZPL，TSC 使用 TSPL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelLanguage {
    Zpl,
    Tspl,
}

/// 零件贴纸
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartSticker {
    pub part_number: String,
    #[serde(default)]
    pub part_name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub oem_codes: Vec<String>,
    #[serde(default = "one")]
    pub copies: u32,
}

/// 库存移动标签
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMoveLabel {
    pub doc_number: String,
    pub item_key: String,
    pub quantity: String,
    #[serde(default)]
    pub account_key: Option<String>,
    #[serde(default = "one")]
    pub copies: u32,
}

fn one() -> u32 {
    1
}
