//! 探测模块：采集目标的页面与DNS信息
pub mod record;
pub mod resolver;
pub mod collector;

// 导出核心接口
pub use self::record::{ProbeRecord, ProbeRecordBuilder};
pub use self::resolver::{DnsResolver, RecordKind, RecordLookup, resolve_cname_chain};
pub use self::collector::{HttpProber, normalize_target};
