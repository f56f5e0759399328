use serde::{Deserialize, Serialize};

/// 适配编辑器中的车型
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub manufacturer: String,
    pub model: String,
    #[serde(default)]
    pub engine_volume: Option<String>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(default)]
    pub finish_level: Option<String>,
    #[serde(default)]
    pub trim_level: Option<String>,
}

impl Vehicle {
    pub fn new(manufacturer: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            model: model.into(),
            ..Default::default()
        }
    }
}

/// 政府车辆登记数据中的一条记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovVehicleRecord {
    pub manufacturer: String,
    pub model: String,
    #[serde(default)]
    pub engine_volume: Option<String>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub finish_level: Option<String>,
    #[serde(default)]
    pub trim_level: Option<String>,
    #[serde(default)]
    pub model_code: Option<String>,
}
