//! 检测模块：条件判定与指纹匹配核心逻辑
pub mod evaluator;
pub mod matcher;
pub mod result;

// 导出核心接口
pub use self::evaluator::{ConditionOutcome, EvaluatorFn, EvaluatorRegistry};
pub use self::matcher::{FingerprintMatcher, match_fingerprint};
pub use self::result::{CatalogDiagnostic, MatchResponse, MatchResult};
