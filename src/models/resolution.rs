use super::PartRecord;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 解析请求: SH 编码 / OEM 编码至少一个非空
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionRequest {
    #[serde(default)]
    pub sh_code: Option<String>,
    #[serde(default)]
    pub oem_code: Option<String>,
    pub quantity: BigDecimal,
}

impl ResolutionRequest {
    pub fn new(sh_code: Option<&str>, oem_code: Option<&str>, quantity: BigDecimal) -> Self {
        Self {
            sh_code: sh_code.map(str::to_string),
            oem_code: oem_code.map(str::to_string),
            quantity,
        }
    }

    /// 去除首尾空白后的 SH 编码，空串视为缺失
    pub fn sh_code(&self) -> Option<&str> {
        non_blank(self.sh_code.as_deref())
    }

    pub fn oem_code(&self) -> Option<&str> {
        non_blank(self.oem_code.as_deref())
    }

    pub fn is_resolvable(&self) -> bool {
        self.sh_code().is_some() || self.oem_code().is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotFoundReason {
    ShCode,
    OemCode,
    MissingCode,
}

impl NotFoundReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShCode => "sh-code",
            Self::OemCode => "oem-code",
            Self::MissingCode => "missing-code",
        }
    }
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionResult {
    Valid { resolved_key: String },
    NotFound { reason: NotFoundReason },
    AmbiguousMatches { candidates: Vec<PartRecord> },
}

impl ResolutionResult {
    pub fn valid(key: impl Into<String>) -> Self {
        Self::Valid {
            resolved_key: key.into(),
        }
    }

    pub fn not_found(reason: NotFoundReason) -> Self {
        Self::NotFound { reason }
    }

    pub fn resolved_key(&self) -> Option<&str> {
        match self {
            Self::Valid { resolved_key } => Some(resolved_key),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}
