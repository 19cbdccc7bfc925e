//! rsubdosec 命令行扫描器
//! 从标准输入逐行读取目标，探测后与指纹库匹配并输出结果

use std::pin::pin;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use futures::stream::{self, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use rsubdosec::{
    CatalogLoader, CatalogSource, ConfigManager, FingerprintMatcher, HttpProber, MatchResult, RsubdosecError,
};

/// 扫描结果是否公开
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScanMode {
    Public,
    Private,
}

impl ScanMode {
    fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Public => "public",
            ScanMode::Private => "private",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "rsubdosec", version, about = "子域名接管指纹检测")]
struct Args {
    /// 指纹库（本地JSON文件或 http(s) 地址）
    #[arg(long, value_name = "PATH|URL")]
    catalog: String,

    /// 扫描模式
    #[arg(long, value_enum, default_value_t = ScanMode::Public)]
    mode: ScanMode,

    /// 按行输出JSON响应
    #[arg(long)]
    json: bool,

    /// HTTP超时（秒）
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    /// 单次DNS查询超时（秒）
    #[arg(long, default_value_t = 5)]
    dns_timeout: u64,

    /// 同时探测的目标数
    #[arg(long, default_value_t = 10)]
    concurrency: usize,

    /// 输出调试日志
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = ConfigManager::custom()
        .catalog_source(CatalogSource::parse(&args.catalog))
        .http_timeout(args.timeout)
        .dns_timeout(args.dns_timeout)
        .concurrency(args.concurrency)
        .verbose(args.verbose)
        .build();

    let catalog = CatalogLoader::load(&config)
        .await
        .with_context(|| format!("无法加载指纹库：{}", args.catalog))?;
    let prober = HttpProber::new(&config).context("无法创建探测器")?;
    let matcher = FingerprintMatcher::new();
    let mode = args.mode;

    if mode == ScanMode::Public {
        eprintln!("[!] 当前为 public 模式，扫描结果将被公开；如需私有结果请使用 --mode private");
    }

    let lines = BufReader::new(tokio::io::stdin()).lines();
    let targets = stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            Ok(None) => None,
            Err(e) => {
                warn!("读取标准输入失败，停止读取目标：{}", e);
                None
            }
        }
    })
    .filter_map(|line| async move {
        let target = line.trim().to_string();
        (!target.is_empty()).then_some(target)
    });

    // 同时最多探测 concurrency 个目标，结果按输入顺序边完成边输出
    let (prober, matcher, catalog) = (&prober, &matcher, &catalog);
    let mut results = pin!(
        targets
            .map(|target| async move {
                let outcome = prober
                    .probe(&target)
                    .await
                    .map(|record| matcher.match_catalog(&record, mode.as_str(), catalog.as_slice()));
                (target, outcome)
            })
            .buffered(config.concurrency)
    );

    while let Some((target, outcome)) = results.next().await {
        let line = match outcome {
            Ok(result) => format_result(&target, &result, args.json)?,
            Err(e) => format_error(&target, &e),
        };
        println!("{}", line);
    }

    debug!("扫描结束");
    Ok(())
}

fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn format_result(target: &str, result: &MatchResult, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string(&result.to_response())?);
    }

    Ok(match result.fingerprint() {
        Some(fingerprint) => format!("[VULN] {} | {}", target, fingerprint.service),
        None => format!("[NOT VULN] {} | ", target),
    })
}

fn format_error(target: &str, error: &RsubdosecError) -> String {
    format!("[{}] {} : {}", error_label(error), target, error)
}

/// 按失败类型给出输出标签（4xx/5xx 是正常探测数据，不算失败）
fn error_label(error: &RsubdosecError) -> &'static str {
    match error {
        RsubdosecError::HttpError(e) if e.is_connect() => "Connection Error",
        RsubdosecError::HttpError(_) => "Request Error",
        _ => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsubdosec::ProbeRecord;
    use rsubdosec::rule::decoder::decode_value;
    use serde_json::json;

    fn record() -> ProbeRecord {
        ProbeRecord::builder("app.example.com", "example.com").status_code(404).build()
    }

    #[test]
    fn test_text_output() {
        let fingerprint = decode_value(&json!({ "service": "heroku", "rules": { "status_code": 404 } })).unwrap();
        let matched = MatchResult::Matched {
            fingerprint,
            record: record(),
            mode: "public".to_string(),
        };
        let unmatched = MatchResult::Unmatched {
            record: record(),
            mode: "public".to_string(),
        };

        assert_eq!(
            format_result("http://app.example.com", &matched, false).unwrap(),
            "[VULN] http://app.example.com | heroku"
        );
        assert_eq!(
            format_result("http://app.example.com", &unmatched, false).unwrap(),
            "[NOT VULN] http://app.example.com | "
        );
    }

    #[test]
    fn test_json_output() {
        let unmatched = MatchResult::Unmatched {
            record: record(),
            mode: "private".to_string(),
        };

        let line = format_result("app.example.com", &unmatched, true).unwrap();
        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["isMatched"], false);
        assert!(value["service"].is_null());
        assert_eq!(value["website_data"]["subdomain"], "app.example.com");
    }

    #[test]
    fn test_error_labels() {
        let invalid = RsubdosecError::InvalidInput("目标为空".to_string());
        assert_eq!(error_label(&invalid), "Error");
        assert_eq!(format_error("", &invalid), "[Error]  : 无效输入：目标为空");

        let request = reqwest::Client::new().get("not a url").build().unwrap_err();
        assert!(!request.is_connect());
        assert_eq!(error_label(&RsubdosecError::HttpError(request)), "Request Error");
    }
}
