//! 探测记录数据模型
//! 单个目标的标准化观测数据，构建后不可变

use serde::{Deserialize, Serialize};

/// 旧版客户端在无跳转时上报的占位值
pub const NO_REDIRECT_SENTINEL: &str = "No redirects";
/// 旧版客户端在无标题时上报的占位值
pub const NO_TITLE_SENTINEL: &str = "No title found";

/// 探测记录
///
/// 缺失字段统一用 `None` 表示，不使用空字符串，
/// 以便条件判断区分“无数据”与“空匹配目标”。
/// 反序列化同样经过构建器，保证占位值被归一化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProbeRecordWire")]
pub struct ProbeRecord {
    response_body_base64: Option<String>,
    title: Option<String>,
    status_code: u16,
    redirect_url: Option<String>,
    cname_records: Option<String>,
    a_records: Option<Vec<String>>,
    subdomain: String,
    rootdomain: String,
}

impl ProbeRecord {
    /// 创建构建器（子域名与根域名为必填项）
    pub fn builder(subdomain: impl Into<String>, root_domain: impl Into<String>) -> ProbeRecordBuilder {
        ProbeRecordBuilder::new(subdomain, root_domain)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref()
    }

    pub fn cname_records(&self) -> Option<&str> {
        self.cname_records.as_deref()
    }

    pub fn a_records(&self) -> Option<&[String]> {
        self.a_records.as_deref()
    }

    pub fn response_body_base64(&self) -> Option<&str> {
        self.response_body_base64.as_deref()
    }

    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    pub fn root_domain(&self) -> &str {
        &self.rootdomain
    }
}

/// 外部上报的探测记录（字段名与响应中的 website_data 一致）
#[derive(Deserialize)]
struct ProbeRecordWire {
    response_body_base64: Option<String>,
    title: Option<String>,
    #[serde(default)]
    status_code: u16,
    redirect_url: Option<String>,
    cname_records: Option<String>,
    a_records: Option<Vec<String>>,
    subdomain: String,
    rootdomain: String,
}

impl From<ProbeRecordWire> for ProbeRecord {
    fn from(wire: ProbeRecordWire) -> Self {
        ProbeRecord::builder(wire.subdomain, wire.rootdomain)
            .response_body_base64(wire.response_body_base64)
            .title(wire.title)
            .status_code(wire.status_code)
            .redirect_url(wire.redirect_url)
            .cname_records(wire.cname_records)
            .a_records(wire.a_records)
            .build()
    }
}

/// 探测记录构建器
#[derive(Debug, Clone)]
pub struct ProbeRecordBuilder {
    record: ProbeRecord,
}

impl ProbeRecordBuilder {
    pub fn new(subdomain: impl Into<String>, root_domain: impl Into<String>) -> Self {
        Self {
            record: ProbeRecord {
                response_body_base64: None,
                title: None,
                status_code: 0,
                redirect_url: None,
                cname_records: None,
                a_records: None,
                subdomain: subdomain.into(),
                rootdomain: root_domain.into(),
            },
        }
    }

    /// 页面标题，旧版占位值归一化为 None
    pub fn title(mut self, title: Option<String>) -> Self {
        self.record.title = title.filter(|t| t != NO_TITLE_SENTINEL);
        self
    }

    pub fn status_code(mut self, status_code: u16) -> Self {
        self.record.status_code = status_code;
        self
    }

    /// 跳转地址，旧版占位值与空串归一化为 None
    pub fn redirect_url(mut self, redirect_url: Option<String>) -> Self {
        self.record.redirect_url = redirect_url
            .filter(|u| !u.is_empty() && u != NO_REDIRECT_SENTINEL);
        self
    }

    pub fn cname_records(mut self, cname_records: Option<String>) -> Self {
        self.record.cname_records = cname_records;
        self
    }

    pub fn a_records(mut self, a_records: Option<Vec<String>>) -> Self {
        self.record.a_records = a_records;
        self
    }

    /// 已编码（base64）的响应体
    pub fn response_body_base64(mut self, body: Option<String>) -> Self {
        self.record.response_body_base64 = body;
        self
    }

    /// 原始响应体，内部完成base64编码
    pub fn response_body(mut self, body: &[u8]) -> Self {
        self.record.response_body_base64 = Some(crate::utils::body_codec::encode_body(body));
        self
    }

    pub fn build(self) -> ProbeRecord {
        self.record
    }
}
