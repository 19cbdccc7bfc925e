//! 目标探测器
//! 请求目标页面、查询DNS记录，汇总为探测记录

use std::time::Duration;

use reqwest::Client;
use reqwest::redirect::Policy;
use tracing::debug;
use url::{Host, Url};

use super::record::ProbeRecord;
use super::resolver::{DnsResolver, RecordKind, RecordLookup, resolve_cname_chain};
use crate::config::GlobalConfig;
use crate::error::{RsdResult, RsubdosecError};
use crate::extractor::extract_title;
use crate::utils::domain::split_host;

/// 最大跟随跳转次数
const MAX_REDIRECTS: usize = 10;
/// 响应体最多读取的字节数，超出部分丢弃
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// HTTP探测器
pub struct HttpProber<R: RecordLookup = DnsResolver> {
    client: Client,
    resolver: R,
}

impl HttpProber<DnsResolver> {
    /// 按配置创建探测器（使用系统DNS）
    pub fn new(config: &GlobalConfig) -> RsdResult<Self> {
        Self::with_resolver(config, DnsResolver::new(config))
    }
}

impl<R: RecordLookup> HttpProber<R> {
    /// 使用指定解析器创建探测器
    pub fn with_resolver(config: &GlobalConfig, resolver: R) -> RsdResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout))
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self { client, resolver })
    }

    /// 探测单个目标
    pub async fn probe(&self, target: &str) -> RsdResult<ProbeRecord> {
        let url = normalize_target(target)?;
        let host = host_of(&url)?;

        let mut response = self.client.get(url.clone()).send().await?;
        let status_code = response.status().as_u16();
        let final_url = response.url().clone();

        let mut body = CappedBody::new(MAX_BODY_BYTES);
        while let Some(chunk) = response.chunk().await? {
            if !body.push(&chunk) {
                debug!("响应体超过{}字节，已截断：{}", MAX_BODY_BYTES, url);
                break;
            }
        }
        let body = body.into_inner();

        debug!(
            "探测完成：目标={}，状态码={}，最终地址={}，响应体{}字节",
            url, status_code, final_url, body.len()
        );

        let (cname_records, a_records) = self.resolve_dns(&host).await;

        Ok(assemble_record(&host, &url, &final_url, status_code, &body, cname_records, a_records))
    }

    /// 查询主机的CNAME与A记录
    pub async fn resolve_dns(&self, host: &str) -> (Option<String>, Option<Vec<String>>) {
        tokio::join!(
            resolve_cname_chain(&self.resolver, host),
            self.resolver.resolve_records(RecordKind::A, host),
        )
    }
}

/// 限长响应体缓冲
struct CappedBody {
    buf: Vec<u8>,
    limit: usize,
}

impl CappedBody {
    fn new(limit: usize) -> Self {
        Self { buf: Vec::new(), limit }
    }

    /// 追加数据块，达到上限时截断并返回 false
    fn push(&mut self, chunk: &[u8]) -> bool {
        let remaining = self.limit - self.buf.len();
        if chunk.len() >= remaining {
            self.buf.extend_from_slice(&chunk[..remaining]);
            return false;
        }
        self.buf.extend_from_slice(chunk);
        true
    }

    fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// 规范化目标：缺少协议时补全 http://
pub fn normalize_target(target: &str) -> RsdResult<Url> {
    let target = target.trim();
    if target.is_empty() {
        return Err(RsubdosecError::InvalidInput("目标为空".to_string()));
    }

    let with_scheme = if target.contains("://") {
        target.to_string()
    } else {
        format!("http://{}", target)
    };

    let url = Url::parse(&with_scheme)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RsubdosecError::InvalidInput(format!("不支持的协议：{}", other))),
    }
}

/// 提取URL中的主机名（IPv6不带方括号）
fn host_of(url: &Url) -> RsdResult<String> {
    match url.host() {
        Some(Host::Domain(domain)) => Ok(domain.to_string()),
        Some(Host::Ipv4(ip)) => Ok(ip.to_string()),
        Some(Host::Ipv6(ip)) => Ok(ip.to_string()),
        None => Err(RsubdosecError::InvalidInput(format!("目标缺少主机名：{}", url))),
    }
}

/// 汇总探测数据（最终地址与请求地址不同才记为跳转）
fn assemble_record(
    host: &str,
    requested: &Url,
    final_url: &Url,
    status_code: u16,
    body: &[u8],
    cname_records: Option<String>,
    a_records: Option<Vec<String>>,
) -> ProbeRecord {
    let (subdomain, root_domain) = split_host(host);
    let redirect_url = (final_url != requested).then(|| final_url.to_string());

    ProbeRecord::builder(subdomain, root_domain)
        .title(extract_title(body))
        .status_code(status_code)
        .redirect_url(redirect_url)
        .cname_records(cname_records)
        .a_records(a_records)
        .response_body(body)
        .build()
}
