//! 全局配置管理,存储所有可配置项

use std::path::PathBuf;

/// 指纹库来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// 本地JSON文件
    LocalFile(PathBuf),
    /// 远程指纹接口（如 /api/getfinger）
    Remote(String),
}

impl CatalogSource {
    /// 根据输入自动判断来源（http/https 前缀视为远程）
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.starts_with("http://") || input.starts_with("https://") {
            CatalogSource::Remote(input.to_string())
        } else {
            CatalogSource::LocalFile(PathBuf::from(input))
        }
    }
}

/// 全局配置
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    // 指纹库来源
    pub catalog_source: CatalogSource,
    // HTTP超时（单位：秒）
    pub http_timeout: u64,
    // 单次DNS查询超时（单位：秒）
    pub dns_timeout: u64,
    // 探测请求使用的User-Agent
    pub user_agent: String,
    // 同时探测的目标数
    pub concurrency: usize,
    // 是否忽略证书校验
    pub accept_invalid_certs: bool,
    // 是否启用详细日志
    pub verbose: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            catalog_source: CatalogSource::LocalFile(PathBuf::from("fingerprints.json")),
            http_timeout: 15,
            dns_timeout: 5,
            user_agent: "Rsubdosec/0.1.0".to_string(),
            concurrency: 10,
            accept_invalid_certs: true,
            verbose: false,
        }
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> GlobalConfig {
        GlobalConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GlobalConfig::default(),
        }
    }

    pub fn catalog_source(mut self, source: CatalogSource) -> Self {
        self.config.catalog_source = source;
        self
    }

    pub fn http_timeout(mut self, timeout: u64) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn dns_timeout(mut self, timeout: u64) -> Self {
        self.config.dns_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// 并发数至少为1
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency.max(1);
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn build(self) -> GlobalConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_source_parse() {
        assert_eq!(
            CatalogSource::parse("https://scan.example/api/getfinger"),
            CatalogSource::Remote("https://scan.example/api/getfinger".to_string())
        );
        assert_eq!(
            CatalogSource::parse(" ./data/fingerprints.json "),
            CatalogSource::LocalFile(PathBuf::from("./data/fingerprints.json"))
        );
    }

    #[test]
    fn test_builder_overrides_defaults() {
        let config = ConfigManager::custom()
            .http_timeout(3)
            .dns_timeout(1)
            .concurrency(0)
            .verbose(true)
            .build();

        assert_eq!(config.http_timeout, 3);
        assert_eq!(config.dns_timeout, 1);
        assert_eq!(config.concurrency, 1);
        assert!(config.verbose);
        assert_eq!(config.user_agent, ConfigManager::get_default().user_agent);
    }
}
