//! DNS记录查询
//! 解析器由调用方显式创建并传入，不使用进程级单例；
//! 无记录、解析失败、超时统一返回 None，不向匹配引擎抛出错误

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};
use trust_dns_resolver::TokioAsyncResolver;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::ResolveErrorKind;
use trust_dns_resolver::proto::rr::{RData, RecordType};

use crate::config::GlobalConfig;

/// 查询的记录类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Cname,
    A,
}

impl RecordKind {
    fn record_type(&self) -> RecordType {
        match self {
            RecordKind::Cname => RecordType::CNAME,
            RecordKind::A => RecordType::A,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Cname => write!(f, "CNAME"),
            RecordKind::A => write!(f, "A"),
        }
    }
}

/// 记录查询接口
pub trait RecordLookup: Send + Sync {
    /// 查询主机的指定类型记录，无记录或查询失败返回 None
    fn resolve_records(&self, kind: RecordKind, host: &str) -> impl Future<Output = Option<Vec<String>>> + Send;
}

/// 基于 trust-dns 的异步解析器
#[derive(Clone)]
pub struct DnsResolver {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl DnsResolver {
    /// 按配置创建解析器（优先读取系统DNS配置）
    pub fn new(config: &GlobalConfig) -> Self {
        let timeout = Duration::from_secs(config.dns_timeout.max(1));

        let (resolver_config, mut opts) = match trust_dns_resolver::system_conf::read_system_conf() {
            Ok(conf) => conf,
            Err(e) => {
                warn!("读取系统DNS配置失败，使用默认上游：{}", e);
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        opts.timeout = timeout;

        Self {
            resolver: TokioAsyncResolver::tokio(resolver_config, opts),
            timeout,
        }
    }
}

impl RecordLookup for DnsResolver {
    async fn resolve_records(&self, kind: RecordKind, host: &str) -> Option<Vec<String>> {
        let lookup = match tokio::time::timeout(self.timeout, self.resolver.lookup(host, kind.record_type())).await {
            Ok(Ok(lookup)) => lookup,
            Ok(Err(e)) => {
                match e.kind() {
                    ResolveErrorKind::NoRecordsFound { .. } => debug!("{} 没有 {} 记录", host, kind),
                    _ => warn!("查询 {} 的 {} 记录失败：{}", host, kind, e),
                }
                return None;
            }
            Err(_) => {
                warn!("查询 {} 的 {} 记录超时（{:?}）", host, kind, self.timeout);
                return None;
            }
        };

        let records: Vec<String> = lookup
            .iter()
            .filter_map(|rdata| match (kind, rdata) {
                (RecordKind::Cname, RData::CNAME(name)) => Some(name.to_string().trim_end_matches('.').to_string()),
                (RecordKind::A, RData::A(addr)) => Some(addr.to_string()),
                _ => None,
            })
            .collect();

        if records.is_empty() { None } else { Some(records) }
    }
}

/// 查询CNAME链并合并为单个字符串
pub async fn resolve_cname_chain<R: RecordLookup>(resolver: &R, host: &str) -> Option<String> {
    resolver
        .resolve_records(RecordKind::Cname, host)
        .await
        .map(|names| names.join(","))
}
