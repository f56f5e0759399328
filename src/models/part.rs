use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 零件目录视图 (parts_catalog_view) 的只读记录
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PartRecord {
    #[sqlx(rename = "PartNumber")]
    pub part_number: String, // SH 编码 (主键)
    #[sqlx(rename = "PartName")]
    pub part_name: Option<String>,
    #[sqlx(rename = "Manufacturer")]
    pub manufacturer: Option<String>,
    #[sqlx(rename = "Category")]
    pub category: Option<String>,
    // 每个字段可能包含多个以 "/" 分隔的 OEM 编码
    #[sqlx(rename = "OEMNumber1")]
    pub oem_number1: Option<String>,
    #[sqlx(rename = "OEMNumber2")]
    pub oem_number2: Option<String>,
    #[sqlx(rename = "OEMNumber3")]
    pub oem_number3: Option<String>,
    #[sqlx(rename = "OEMNumber4")]
    pub oem_number4: Option<String>,
    #[sqlx(rename = "OEMNumber5")]
    pub oem_number5: Option<String>,
}

impl PartRecord {
    /// 仅含主键的记录，其余字段为空
    pub fn new(part_number: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            part_name: None,
            manufacturer: None,
            category: None,
            oem_number1: None,
            oem_number2: None,
            oem_number3: None,
            oem_number4: None,
            oem_number5: None,
        }
    }

    /// 按顺序设置 OEM 字段 (最多 5 个，多余的忽略)
    pub fn with_oem_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots = [
            &mut self.oem_number1,
            &mut self.oem_number2,
            &mut self.oem_number3,
            &mut self.oem_number4,
            &mut self.oem_number5,
        ];
        for (slot, value) in slots.into_iter().zip(fields) {
            *slot = Some(value.into());
        }
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.part_name = Some(name.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// 非空的 OEM 字段（原始文本，未拆分）
    pub fn oem_fields(&self) -> impl Iterator<Item = &str> {
        [
            &self.oem_number1,
            &self.oem_number2,
            &self.oem_number3,
            &self.oem_number4,
            &self.oem_number5,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .filter(|f| !f.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oem_fields_skip_blank_slots() {
        let part = PartRecord::new("SH-1").with_oem_fields(["1844.51/1850-99", "  ", "7701"]);
        let fields: Vec<_> = part.oem_fields().collect();
        assert_eq!(fields, vec!["1844.51/1850-99", "7701"]);
    }

    #[test]
    fn extra_oem_fields_are_ignored() {
        let part = PartRecord::new("SH-2").with_oem_fields(["a", "b", "c", "d", "e", "f"]);
        assert_eq!(part.oem_fields().count(), 5);
        assert_eq!(part.oem_number5.as_deref(), Some("e"));
    }
}
