//! 匹配结果结构

use std::fmt;
use serde::Serialize;

use crate::probe::ProbeRecord;
use crate::rule::Fingerprint;
use crate::rule::decoder::DecodeError;

/// 单次匹配的结果
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    Matched {
        fingerprint: Fingerprint,
        record: ProbeRecord,
        mode: String,
    },
    Unmatched {
        record: ProbeRecord,
        mode: String,
    },
}

impl MatchResult {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }

    /// 命中的指纹
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        match self {
            MatchResult::Matched { fingerprint, .. } => Some(fingerprint),
            MatchResult::Unmatched { .. } => None,
        }
    }

    pub fn record(&self) -> &ProbeRecord {
        match self {
            MatchResult::Matched { record, .. } | MatchResult::Unmatched { record, .. } => record,
        }
    }

    pub fn mode(&self) -> &str {
        match self {
            MatchResult::Matched { mode, .. } | MatchResult::Unmatched { mode, .. } => mode,
        }
    }

    /// 转为扫描接口的响应结构
    pub fn to_response(&self) -> MatchResponse<'_> {
        MatchResponse {
            success: true,
            is_matched: self.is_matched(),
            service: self.fingerprint(),
            website_data: self.record(),
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Matched { fingerprint, record, .. } => {
                write!(f, "[VULN] {} | {}", record.subdomain(), fingerprint)
            }
            MatchResult::Unmatched { record, .. } => write!(f, "[NOT VULN] {} | ", record.subdomain()),
        }
    }
}

/// 扫描接口响应（字段名与原有接口保持一致）
#[derive(Debug, Serialize)]
pub struct MatchResponse<'a> {
    pub success: bool,
    #[serde(rename = "isMatched")]
    pub is_matched: bool,
    pub service: Option<&'a Fingerprint>,
    pub website_data: &'a ProbeRecord,
}

/// 指纹库中无法解码的条目
#[derive(Debug)]
pub struct CatalogDiagnostic {
    /// 条目在指纹库中的位置
    pub index: usize,
    pub error: DecodeError,
}

impl fmt::Display for CatalogDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "第{}条指纹无效：{}", self.index, self.error)
    }
}
