//! 指纹库加载管理器
//! 负责从本地文件或远程接口读取指纹库，并统一转换为 base64(JSON) 条目

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::decoder;
use crate::config::{CatalogSource, GlobalConfig};
use crate::error::{RsdResult, RsubdosecError};

/// 指纹接口返回的列表字段
const FINGERPRINTS_KEY: &str = "fingerprints";

/// 指纹库加载管理器
pub struct CatalogLoader;

impl CatalogLoader {
    /// 按配置加载指纹库
    pub async fn load(config: &GlobalConfig) -> RsdResult<Vec<String>> {
        let catalog = match &config.catalog_source {
            CatalogSource::LocalFile(path) => Self::load_local(path).await?,
            CatalogSource::Remote(url) => Self::fetch_remote(config, url).await?,
        };

        if catalog.is_empty() {
            warn!("指纹库为空，所有目标都将判定为未命中");
        } else {
            debug!("指纹库加载完成，条目数：{}", catalog.len());
        }
        Ok(catalog)
    }

    /// 读取本地指纹库文件
    pub async fn load_local(path: &Path) -> RsdResult<Vec<String>> {
        debug!("读取本地指纹库：{}", path.display());
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            RsubdosecError::CatalogLoadError(format!("读取 {} 失败：{}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// 拉取远程指纹库
    pub async fn fetch_remote(config: &GlobalConfig, url: &str) -> RsdResult<Vec<String>> {
        debug!("拉取远程指纹库：{}", url);
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout))
            .user_agent(config.user_agent.clone())
            .build()?;

        let response = client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(RsubdosecError::CatalogLoadError(format!(
                "URL {} 返回状态码 {}",
                url,
                response.status()
            )));
        }

        let document: Value = response.json().await?;
        Self::parse_catalog(&document)
    }

    /// 从JSON文本解析指纹库
    pub fn from_json_str(content: &str) -> RsdResult<Vec<String>> {
        let document: Value = serde_json::from_str(content)?;
        Self::parse_catalog(&document)
    }

    /// 解析指纹库文档（`{"fingerprints": [...]}` 或数组）
    ///
    /// 条目在此只做形状检查，语义校验留给解码器逐条处理，
    /// 这样文件加载与接口调用走同一条不可信输入路径。
    pub fn parse_catalog(document: &Value) -> RsdResult<Vec<String>> {
        let entries = match document {
            Value::Array(entries) => entries,
            Value::Object(object) => match object.get(FINGERPRINTS_KEY) {
                Some(Value::Array(entries)) => entries,
                Some(other) => {
                    return Err(RsubdosecError::CatalogParseError(format!(
                        "{} 必须是数组，实际为：{}",
                        FINGERPRINTS_KEY,
                        json_type(other)
                    )));
                }
                None => {
                    return Err(RsubdosecError::CatalogParseError(format!(
                        "缺少 {} 字段",
                        FINGERPRINTS_KEY
                    )));
                }
            },
            other => {
                return Err(RsubdosecError::CatalogParseError(format!(
                    "顶层必须是对象或数组，实际为：{}",
                    json_type(other)
                )));
            }
        };

        let mut catalog = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match entry {
                Value::Object(_) => catalog.push(decoder::encode(entry)),
                // 已是 base64 形式的条目原样保留
                Value::String(blob) => catalog.push(blob.clone()),
                other => warn!("第{}条指纹类型不支持（{}），已跳过", index, json_type(other)),
            }
        }

        Ok(catalog)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
