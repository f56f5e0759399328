use crate::db::CatalogReader;
use crate::error::AppResult;
use crate::models::{NotFoundReason, PartRecord, ResolutionRequest, ResolutionResult};
use crate::service::normalizer::{normalize_oem, record_matches_oem};
use indexmap::IndexMap;
use std::sync::Arc;

/// 零件解析服务
///
/// 无状态：每次解析只读目录，不缓存结果。
#[derive(Clone)]
pub struct PartResolver {
    catalog: Arc<dyn CatalogReader>,
}

impl PartResolver {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self { catalog }
    }

    /// 解析一行输入
    ///
    /// 1. 有 SH 编码时按主键精确查找，命中即 `Valid`，不再查 OEM
    /// 2. 未命中且有 OEM 编码时回退到 OEM 查找；0 个 / 1 个 / 多个精确匹配
    ///    分别得到 `NotFound` / `Valid` / `AmbiguousMatches`
    /// 3. 两个编码都没有时 `NotFound(MissingCode)`
    pub async fn resolve(&self, request: &ResolutionRequest) -> AppResult<ResolutionResult> {
        let oem_code = request.oem_code();

        if let Some(sh_code) = request.sh_code() {
            if let Some(part) = self.catalog.find_by_part_number(sh_code).await? {
                return Ok(ResolutionResult::valid(part.part_number));
            }
            if oem_code.is_none() {
                tracing::debug!("SH 编码 {} 不存在", sh_code);
                return Ok(ResolutionResult::not_found(NotFoundReason::ShCode));
            }
            tracing::debug!("SH 编码 {} 不存在, 回退到 OEM 查找", sh_code);
        }

        let Some(oem_code) = oem_code else {
            return Ok(ResolutionResult::not_found(NotFoundReason::MissingCode));
        };

        let mut matches = self.search_oem(oem_code).await?;
        let result = match matches.len() {
            0 => ResolutionResult::not_found(NotFoundReason::OemCode),
            1 => ResolutionResult::valid(matches.remove(0).part_number),
            n => {
                tracing::info!("OEM 编码 {} 匹配到 {} 个零件, 需要人工选择", oem_code, n);
                ResolutionResult::AmbiguousMatches { candidates: matches }
            }
        };
        Ok(result)
    }

    pub async fn find_part(&self, part_number: &str) -> AppResult<Option<PartRecord>> {
        self.catalog.find_by_part_number(part_number.trim()).await
    }

    /// 所有 OEM 子编码与输入精确相等的零件，按零件号排序、去重
    pub async fn search_oem(&self, oem_code: &str) -> AppResult<Vec<PartRecord>> {
        let normalized = normalize_oem(oem_code);
        if normalized.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self.catalog.search_by_oem(&normalized).await?;
        let prefiltered = candidates.len();

        // 粗筛结果可能包含跨子编码的子串命中，逐条复核
        let mut exact: IndexMap<String, PartRecord> = IndexMap::new();
        for part in candidates {
            if record_matches_oem(&part, &normalized) {
                exact.entry(part.part_number.clone()).or_insert(part);
            }
        }
        exact.sort_keys();

        tracing::debug!(
            "OEM {} -> 粗筛 {} 条, 精确匹配 {} 条",
            normalized, prefiltered, exact.len()
        );
        Ok(exact.into_values().collect())
    }
}
