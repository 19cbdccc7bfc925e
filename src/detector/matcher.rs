//! 指纹匹配器：按指纹库顺序扫描，返回第一个命中的指纹
use once_cell::sync::Lazy;
use tracing::{debug, warn};

use super::evaluator::EvaluatorRegistry;
use super::result::{CatalogDiagnostic, MatchResult};
use crate::probe::ProbeRecord;
use crate::rule::Fingerprint;
use crate::rule::decoder;

/// 全局默认匹配器（只读）
static DEFAULT_MATCHER: Lazy<FingerprintMatcher> = Lazy::new(FingerprintMatcher::new);

/// 指纹匹配器（无状态，可跨任务共享）
#[derive(Debug, Clone, Default)]
pub struct FingerprintMatcher {
    registry: EvaluatorRegistry,
}

impl FingerprintMatcher {
    /// 使用默认判定器创建匹配器
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义判定器表创建匹配器
    pub fn with_registry(registry: EvaluatorRegistry) -> Self {
        Self { registry }
    }

    /// 判定单个指纹的所有条件（严格合取）
    ///
    /// 缺失数据对应的条件同样参与合取并贡献 false；
    /// 没有判定器的条件不计入。没有任何可判定条件时不命中。
    pub fn evaluate(&self, fingerprint: &Fingerprint, record: &ProbeRecord) -> bool {
        let results: Vec<bool> = fingerprint
            .conditions
            .iter()
            .filter_map(|condition| {
                self.registry
                    .evaluate(condition.kind, record, &condition.value)
                    .as_bool()
            })
            .collect();

        debug!("指纹 {} 条件判定结果：{:?}", fingerprint.service, results);
        !results.is_empty() && results.iter().all(|r| *r)
    }

    /// 扫描已编码的指纹库
    pub fn match_catalog<S: AsRef<str>>(&self, record: &ProbeRecord, mode: &str, catalog: &[S]) -> MatchResult {
        self.match_catalog_with_diagnostics(record, mode, catalog).0
    }

    /// 扫描已编码的指纹库，同时返回无法解码的条目
    pub fn match_catalog_with_diagnostics<S: AsRef<str>>(
        &self,
        record: &ProbeRecord,
        mode: &str,
        catalog: &[S],
    ) -> (MatchResult, Vec<CatalogDiagnostic>) {
        let mut diagnostics = Vec::new();

        for (index, blob) in catalog.iter().enumerate() {
            let fingerprint = match decoder::decode(blob.as_ref()) {
                Ok(fingerprint) => fingerprint,
                Err(error) => {
                    warn!("第{}条指纹解码失败，已跳过：{}", index, error);
                    diagnostics.push(CatalogDiagnostic { index, error });
                    continue;
                }
            };

            if self.try_fingerprint(&fingerprint, record) {
                return (matched(fingerprint, record, mode), diagnostics);
            }
        }

        debug!("指纹库扫描完成，未命中，无效条目数：{}", diagnostics.len());
        (unmatched(record, mode), diagnostics)
    }

    /// 扫描已解码的指纹库
    pub fn match_fingerprints(&self, record: &ProbeRecord, mode: &str, fingerprints: &[Fingerprint]) -> MatchResult {
        fingerprints
            .iter()
            .find(|fingerprint| self.try_fingerprint(fingerprint, record))
            .map(|fingerprint| matched(fingerprint.clone(), record, mode))
            .unwrap_or_else(|| unmatched(record, mode))
    }

    /// 跳过停用指纹后判定
    fn try_fingerprint(&self, fingerprint: &Fingerprint, record: &ProbeRecord) -> bool {
        if !fingerprint.is_active() {
            debug!("指纹 {} 已停用（status={}），跳过", fingerprint.service, fingerprint.status);
            return false;
        }

        let hit = self.evaluate(fingerprint, record);
        if hit {
            debug!("指纹命中：服务={}，目标={}", fingerprint.service, record.subdomain());
        }
        hit
    }
}

/// 使用共享的默认匹配器扫描已编码的指纹库
pub fn match_fingerprint<S: AsRef<str>>(record: &ProbeRecord, mode: &str, catalog: &[S]) -> MatchResult {
    DEFAULT_MATCHER.match_catalog(record, mode, catalog)
}

fn matched(fingerprint: Fingerprint, record: &ProbeRecord, mode: &str) -> MatchResult {
    MatchResult::Matched {
        fingerprint,
        record: record.clone(),
        mode: mode.to_string(),
    }
}

fn unmatched(record: &ProbeRecord, mode: &str) -> MatchResult {
    MatchResult::Unmatched {
        record: record.clone(),
        mode: mode.to_string(),
    }
}
