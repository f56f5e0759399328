//! OEM 编码归一化
//!
//! 同一零件号的不同书写方式（"1844.51"、"1844-51"、"1844 51"）归一化后相等。
//!
//! 数据库端的 OEM 粗筛（`db::queries`）必须删除同一组字符、只做 ASCII 小写，
//! 否则粗筛会漏掉应用端能精确匹配的记录。

use crate::models::PartRecord;

/// 归一化时删除的字符: `. - /` 加 POSIX `[:space:]` 的 6 个 ASCII 空白
///
/// U+00A0 等非 ASCII 空白保留。
pub const STRIPPED_CHARS: [char; 9] = ['.', '-', '/', ' ', '\t', '\n', '\x0B', '\x0C', '\r'];

/// 删除 [`STRIPPED_CHARS`] 并做 ASCII 小写；空输入返回空串
pub fn normalize_oem(raw: &str) -> String {
    raw.chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn normalize_opt(raw: Option<&str>) -> String {
    raw.map(normalize_oem).unwrap_or_default()
}

pub fn codes_match(a: &str, b: &str) -> bool {
    normalize_oem(a) == normalize_oem(b)
}

/// 按 "/" 拆分多值 OEM 字段，跳过空的子编码
pub fn split_oem_field(field: &str) -> impl Iterator<Item = &str> {
    field.split('/').map(str::trim).filter(|s| !s.is_empty())
}

/// 记录的任一 OEM 子编码与 `normalized` 完全相等（不是子串）
pub fn record_matches_oem(record: &PartRecord, normalized: &str) -> bool {
    if normalized.is_empty() {
        return false;
    }
    record
        .oem_fields()
        .flat_map(split_oem_field)
        .any(|code| normalize_oem(code) == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_formatting_and_lowercases() {
        assert_eq!(normalize_oem("1844.51"), "184451");
        assert_eq!(normalize_oem(" AB-12/c.d "), "ab12cd");
        assert_eq!(normalize_oem("99\t12"), "9912");
        assert_eq!(normalize_oem(""), "");
        assert_eq!(normalize_opt(None), "");
        assert!(codes_match("99-12", "9912"));
        assert!(!codes_match("99-12", "99-13"));
    }

    #[test]
    fn only_ascii_whitespace_is_stripped() {
        assert_eq!(normalize_oem("18\x0B44\x0C51\r\n"), "184451");
        // 不间断空格和非 ASCII 大写不处理，与数据库端一致
        assert_eq!(normalize_oem("1844\u{A0}51"), "1844\u{A0}51");
        assert_eq!(normalize_oem("ÄB-1"), "Äb1");

        let part = PartRecord::new("SH-9").with_oem_fields(["1844\u{A0}51"]);
        assert!(!record_matches_oem(&part, "184451"));
        assert!(record_matches_oem(&part, &normalize_oem("1844\u{A0}51")));
    }

    #[test]
    fn sub_code_match_is_exact() {
        let part = PartRecord::new("SH-1").with_oem_fields(["1844.51/1850-99"]);
        assert!(record_matches_oem(&part, "184451"));
        assert!(record_matches_oem(&part, "185099"));
        // "1850-99" -> "185099"，不是 "850991" 的子串匹配
        assert!(!record_matches_oem(&part, "850991"));
        assert!(!record_matches_oem(&part, "1844"));
        assert!(!record_matches_oem(&part, ""));
    }

    #[test]
    fn match_checks_all_five_fields() {
        let part = PartRecord::new("SH-2").with_oem_fields(["111", "222", "333", "444", "55-5/66"]);
        assert!(record_matches_oem(&part, "555"));
        assert!(record_matches_oem(&part, "66"));
    }

    #[test]
    fn split_skips_empty_sub_codes() {
        let codes: Vec<_> = split_oem_field("A1// B2 /").collect();
        assert_eq!(codes, vec!["A1", "B2"]);
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "[ -~\\t]{0,40}") {
            let once = normalize_oem(&s);
            prop_assert_eq!(normalize_oem(&once), once);
        }

        #[test]
        fn formatting_variants_normalize_equal(
            code in "[a-zA-Z0-9]{1,12}",
            inserts in proptest::collection::vec((0usize..12, prop_oneof![Just('.'), Just('-'), Just('/'), Just(' ')]), 0..6),
            upper in any::<bool>(),
        ) {
            let mut variant: Vec<char> = if upper {
                code.to_uppercase().chars().collect()
            } else {
                code.to_lowercase().chars().collect()
            };
            for (pos, ch) in inserts {
                let at = pos.min(variant.len());
                variant.insert(at, ch);
            }
            let variant: String = variant.into_iter().collect();
            prop_assert_eq!(normalize_oem(&code), normalize_oem(&variant));
        }
    }
}
