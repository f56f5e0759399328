//! 车型变体匹配
//!
//! 用于在适配编辑器中去重车型，并与政府登记数据对照。

use crate::models::{GovVehicleRecord, Vehicle};
use indexmap::IndexMap;

/// 去掉所有空白并转大写
fn compact_upper(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(compact_upper)
        .filter(|v| !v.is_empty())
}

/// 车型变体键: 厂商|车型|排量|燃料|变速箱|配置|内饰（缺失字段跳过）
pub fn variant_key(vehicle: &Vehicle) -> String {
    let mut parts = vec![
        compact_upper(&vehicle.manufacturer),
        compact_upper(&vehicle.model),
    ];
    parts.extend(
        [
            &vehicle.engine_volume,
            &vehicle.fuel_type,
            &vehicle.transmission,
            &vehicle.finish_level,
            &vehicle.trim_level,
        ]
        .into_iter()
        .filter_map(present),
    );
    parts.join("|")
}

pub fn same_variant(a: &Vehicle, b: &Vehicle) -> bool {
    variant_key(a) == variant_key(b)
}

/// 两边都有值时才比较；任一边缺失视为不关心
fn optional_matches(a: &Option<String>, b: &Option<String>) -> bool {
    match (present(a), present(b)) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

/// 车型与登记记录是否一致
///
/// 厂商和车型忽略空白和大小写后必须相等；排量、燃料、配置、内饰仅在两边都有值时比较。
pub fn is_exact_match(vehicle: &Vehicle, gov: &GovVehicleRecord) -> bool {
    compact_upper(&vehicle.manufacturer) == compact_upper(&gov.manufacturer)
        && compact_upper(&vehicle.model) == compact_upper(&gov.model)
        && optional_matches(&vehicle.engine_volume, &gov.engine_volume)
        && optional_matches(&vehicle.fuel_type, &gov.fuel_type)
        && optional_matches(&vehicle.finish_level, &gov.finish_level)
        && optional_matches(&vehicle.trim_level, &gov.trim_level)
}

/// 登记数据中与车型一致的记录
pub fn find_gov_matches<'a>(
    vehicle: &Vehicle,
    records: &'a [GovVehicleRecord],
) -> Vec<&'a GovVehicleRecord> {
    records.iter().filter(|r| is_exact_match(vehicle, r)).collect()
}

/// 按变体键分组，保持首次出现的顺序
pub fn group_variants(vehicles: &[Vehicle]) -> IndexMap<String, Vec<&Vehicle>> {
    let mut groups: IndexMap<String, Vec<&Vehicle>> = IndexMap::new();
    for vehicle in vehicles {
        groups.entry(variant_key(vehicle)).or_default().push(vehicle);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corolla() -> Vehicle {
        Vehicle {
            engine_volume: Some("1600".to_string()),
            fuel_type: Some("Petrol".to_string()),
            transmission: Some("Auto".to_string()),
            ..Vehicle::new("Toyota", "Corolla")
        }
    }

    #[test]
    fn key_ignores_case_and_whitespace() {
        assert_eq!(
            variant_key(&Vehicle::new("Toyota ", "Corolla")),
            variant_key(&Vehicle::new("toyota", "Corolla"))
        );
        assert_eq!(variant_key(&Vehicle::new("Land Rover", "Range  Rover")), "LANDROVER|RANGEROVER");
    }

    #[test]
    fn key_skips_absent_fields() {
        assert_eq!(variant_key(&corolla()), "TOYOTA|COROLLA|1600|PETROL|AUTO");

        let mut blank_fuel = corolla();
        blank_fuel.fuel_type = Some("  ".to_string());
        assert_eq!(variant_key(&blank_fuel), "TOYOTA|COROLLA|1600|AUTO");
        assert!(!same_variant(&corolla(), &blank_fuel));
    }

    #[test]
    fn absent_gov_fields_are_dont_care() {
        let gov = GovVehicleRecord {
            manufacturer: "TOYOTA".to_string(),
            model: "corolla".to_string(),
            engine_volume: Some("1600".to_string()),
            ..Default::default()
        };
        assert!(is_exact_match(&corolla(), &gov));
        assert!(is_exact_match(&Vehicle::new("Toyota", "Corolla"), &gov));

        let other_engine = GovVehicleRecord {
            engine_volume: Some("1800".to_string()),
            ..gov.clone()
        };
        assert!(!is_exact_match(&corolla(), &other_engine));

        let other_model = GovVehicleRecord {
            model: "Camry".to_string(),
            ..gov
        };
        assert!(!is_exact_match(&corolla(), &other_model));
    }

    #[test]
    fn gov_matches_filter_records() {
        let records = vec![
            GovVehicleRecord {
                manufacturer: "Toyota".to_string(),
                model: "Corolla".to_string(),
                fuel_type: Some("PETROL".to_string()),
                ..Default::default()
            },
            GovVehicleRecord {
                manufacturer: "Toyota".to_string(),
                model: "Corolla".to_string(),
                fuel_type: Some("Diesel".to_string()),
                ..Default::default()
            },
        ];
        let hits = find_gov_matches(&corolla(), &records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fuel_type.as_deref(), Some("PETROL"));
    }

    #[test]
    fn grouping_keeps_first_seen_order() {
        let vehicles = vec![
            corolla(),
            Vehicle::new("Mazda", "3"),
            Vehicle {
                manufacturer: " toyota".to_string(),
                model: "COROLLA".to_string(),
                ..corolla()
            },
        ];
        let groups = group_variants(&vehicles);
        assert_eq!(groups.len(), 2);
        let (first_key, first) = groups.get_index(0).unwrap();
        assert_eq!(first_key, "TOYOTA|COROLLA|1600|PETROL|AUTO");
        assert_eq!(first.len(), 2);
    }
}
