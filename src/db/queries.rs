use crate::models::PartRecord;
use sqlx::PgPool;

/// 按 SH 编码查询零件
pub async fn get_part(
    pool: &PgPool,
    part_number: &str,
) -> Result<Option<PartRecord>, sqlx::Error> {
    sqlx::query_as::<_, PartRecord>(
        r#"
        SELECT "PartNumber", "PartName", "Manufacturer", "Category",
               "OEMNumber1", "OEMNumber2", "OEMNumber3", "OEMNumber4", "OEMNumber5"
        FROM parts_catalog_view
        WHERE "PartNumber" = $1
        "#
    )
    .bind(part_number)
    .fetch_optional(pool)
    .await
}

/// 删除字符的正则类，与 `normalizer::STRIPPED_CHARS` 逐一对应
const SQL_STRIP_CLASS: &str = r"[./ \t\n\v\f\r-]";

const OEM_COLUMNS: [&str; 5] = ["OEMNumber1", "OEMNumber2", "OEMNumber3", "OEMNumber4", "OEMNumber5"];

/// 单个 OEM 列的 SQL 归一化表达式；用 translate 只做 ASCII 小写，不受数据库 locale 影响
fn normalized_column(column: &str) -> String {
    format!(
        "translate(regexp_replace(coalesce(\"{column}\", ''), '{SQL_STRIP_CLASS}', '', 'g'), \
         'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz')"
    )
}

fn oem_search_sql() -> String {
    let conditions: Vec<String> = OEM_COLUMNS
        .iter()
        .map(|c| format!("{} LIKE $1", normalized_column(c)))
        .collect();
    format!(
        r#"
        SELECT "PartNumber", "PartName", "Manufacturer", "Category",
               "OEMNumber1", "OEMNumber2", "OEMNumber3", "OEMNumber4", "OEMNumber5"
        FROM parts_catalog_view
        WHERE {}
        ORDER BY "PartNumber"
        "#,
        conditions.join("\n           OR ")
    )
}

/// OEM 候选粗筛
///
/// 每个 OEM 字段在 SQL 端按与应用相同的规则归一化，再做 `LIKE '%term%'` 子串匹配。
/// 结果只能作为候选集。
pub async fn search_parts_by_oem(
    pool: &PgPool,
    normalized: &str,
) -> Result<Vec<PartRecord>, sqlx::Error> {
    let pattern = format!("%{}%", escape_like(normalized));
    tracing::debug!("OEM 粗筛: pattern={}", pattern);

    let sql = oem_search_sql();
    sqlx::query_as::<_, PartRecord>(&sql)
        .bind(pattern)
        .fetch_all(pool)
        .await
}

/// 转义 LIKE 通配符 (默认转义符为反斜杠)
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::normalizer::STRIPPED_CHARS;
    use std::collections::BTreeSet;

    /// 把正则类中的字符（含 \t 等转义）展开
    fn class_chars(class: &str) -> BTreeSet<char> {
        let inner = &class[1..class.len() - 1];
        let mut chars = BTreeSet::new();
        let mut iter = inner.chars();
        while let Some(c) = iter.next() {
            if c == '\\' {
                let escaped = match iter.next() {
                    Some('t') => '\t',
                    Some('n') => '\n',
                    Some('v') => '\x0B',
                    Some('f') => '\x0C',
                    Some('r') => '\r',
                    other => panic!("unexpected escape {other:?}"),
                };
                chars.insert(escaped);
            } else {
                chars.insert(c);
            }
        }
        chars
    }

    #[test]
    fn sql_strips_same_chars_as_normalizer() {
        let expected: BTreeSet<char> = STRIPPED_CHARS.into_iter().collect();
        assert_eq!(class_chars(SQL_STRIP_CLASS), expected);
        assert!(!class_chars(SQL_STRIP_CLASS).contains(&'\u{A0}'));
    }

    #[test]
    fn search_sql_covers_all_oem_columns() {
        let sql = oem_search_sql();
        for column in OEM_COLUMNS {
            assert!(sql.contains(&format!("coalesce(\"{column}\", '')")));
        }
        assert_eq!(sql.matches("LIKE $1").count(), 5);
        // locale 相关的 lower() 不参与归一化
        assert!(!sql.contains("lower("));
        assert!(sql.contains("'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz'"));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("ab_1%"), "ab\\_1\\%");
        assert_eq!(escape_like("9912"), "9912");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
