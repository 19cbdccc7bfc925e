//! 规则模块：指纹数据模型、解码与指纹库加载
pub mod model;
pub mod pattern;
pub mod decoder;
pub mod loader;

// 导出核心接口
pub use self::model::{Condition, ConditionKind, Fingerprint, RuleValue, DISABLED_STATUS};
pub use self::pattern::RulePattern;
pub use self::decoder::DecodeError;
pub use self::loader::CatalogLoader;
