//! rsubdosec - 基于声明式指纹规则的子域名接管检测引擎

// 导出全局错误类型
pub use self::error::{RsubdosecError, RsdResult};

// 导出配置模块
pub use self::config::{CatalogSource, GlobalConfig, ConfigManager, CustomConfigBuilder};

// 导出规则模块核心接口
pub use self::rule::{
    Condition, ConditionKind, Fingerprint, RuleValue, RulePattern, DecodeError,
    CatalogLoader, DISABLED_STATUS
};

// 导出探测模块核心接口
pub use self::probe::{
    ProbeRecord, ProbeRecordBuilder, RecordKind, RecordLookup, DnsResolver, HttpProber
};

// 导出提取模块核心接口
pub use self::extractor::{TitleExtractor, extract_title};

// 导出检测模块核心接口
pub use self::detector::{
    FingerprintMatcher,
    EvaluatorRegistry,
    ConditionOutcome,
    MatchResult,
    MatchResponse,
    CatalogDiagnostic,
    match_fingerprint,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod probe;
pub mod extractor;
pub mod utils;
pub mod detector;
