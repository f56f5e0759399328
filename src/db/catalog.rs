use crate::db::queries;
use crate::error::AppResult;
use crate::models::PartRecord;
use crate::service::normalizer::normalize_oem;
use async_trait::async_trait;
use sqlx::PgPool;

/// 零件目录读取接口
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// 按主键 (SH 编码) 精确查找
    async fn find_by_part_number(&self, part_number: &str) -> AppResult<Option<PartRecord>>;

    /// 候选过滤: 任一 OEM 字段归一化后包含 `normalized` 的记录
    ///
    /// 只是粗筛，调用方必须再做子编码精确比较。
    async fn search_by_oem(&self, normalized: &str) -> AppResult<Vec<PartRecord>>;
}

/// 基于 parts_catalog_view 的目录
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogReader for PgCatalog {
    async fn find_by_part_number(&self, part_number: &str) -> AppResult<Option<PartRecord>> {
        Ok(queries::get_part(&self.pool, part_number).await?)
    }

    async fn search_by_oem(&self, normalized: &str) -> AppResult<Vec<PartRecord>> {
        Ok(queries::search_parts_by_oem(&self.pool, normalized).await?)
    }
}

/// 内存目录，用于离线场景和测试；粗筛语义与 SQL 一致
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    parts: Vec<PartRecord>,
}

impl InMemoryCatalog {
    pub fn new(parts: Vec<PartRecord>) -> Self {
        Self { parts }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn find_by_part_number(&self, part_number: &str) -> AppResult<Option<PartRecord>> {
        Ok(self
            .parts
            .iter()
            .find(|p| p.part_number == part_number)
            .cloned())
    }

    async fn search_by_oem(&self, normalized: &str) -> AppResult<Vec<PartRecord>> {
        Ok(self
            .parts
            .iter()
            .filter(|p| p.oem_fields().any(|f| normalize_oem(f).contains(normalized)))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prefilter_is_substring_based() {
        let catalog = InMemoryCatalog::new(vec![
            PartRecord::new("A").with_oem_fields(["1844.51/1850-99"]),
            PartRecord::new("B").with_oem_fields(["7701"]),
        ]);
        // 粗筛会命中跨子编码的子串，精确比较由解析器负责
        let hits = catalog.search_by_oem("5118").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].part_number, "A");
        assert!(catalog.find_by_part_number("B").await.unwrap().is_some());
        assert!(catalog.find_by_part_number("b").await.unwrap().is_none());
    }
}
