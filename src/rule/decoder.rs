//! 指纹解码器
//! 指纹库条目以 base64(JSON) 形式传递，视为不可信输入：
//! 每个条目独立解码，失败只影响该条目本身

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use super::model::{Condition, ConditionKind, Fingerprint, RuleValue};
use super::pattern::RulePattern;

/// 服务名称可用的字段（按优先级）
const SERVICE_KEYS: [&str; 3] = ["service", "name", "id"];
const STATUS_KEY: &str = "status_fingerprint";
const RULES_KEY: &str = "rules";

/// 单条指纹解码失败的原因
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("base64解码失败：{0}")]
    Base64(#[from] base64::DecodeError),
    #[error("指纹内容不是合法UTF-8：{0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("指纹JSON解析失败：{0}")]
    Json(#[from] serde_json::Error),
    #[error("指纹结构不合法：{0}")]
    InvalidShape(String),
    #[error("条件 {kind} 的规则值不合法：{value}")]
    InvalidRuleValue { kind: ConditionKind, value: String },
    #[error("条件 {kind} 的匹配模式编译失败：{reason}")]
    InvalidPattern { kind: ConditionKind, reason: String },
    #[error("指纹 {0} 不包含任何可识别的条件")]
    EmptyConditions(String),
}

/// 解码 base64(JSON) 形式的指纹
pub fn decode(blob: &str) -> Result<Fingerprint, DecodeError> {
    let bytes = STANDARD.decode(blob.trim())?;
    let text = String::from_utf8(bytes)?;
    let value: Value = serde_json::from_str(&text)?;
    decode_value(&value)
}

/// 将指纹JSON编码为 base64 形式
pub fn encode(fingerprint: &Value) -> String {
    STANDARD.encode(fingerprint.to_string())
}

/// 从JSON值解码指纹，完成规则值的定型与校验
pub fn decode_value(value: &Value) -> Result<Fingerprint, DecodeError> {
    let Value::Object(object) = value else {
        return Err(DecodeError::InvalidShape("顶层必须是对象".to_string()));
    };

    let service_key = SERVICE_KEYS.iter().find(|k| object.contains_key(**k)).copied();
    let service = match service_key.and_then(|k| object.get(k)) {
        Some(v) => scalar_to_string(v)
            .ok_or_else(|| DecodeError::InvalidShape(format!("服务名称类型不支持：{}", v)))?,
        None => "unknown".to_string(),
    };

    let status = match object.get(STATUS_KEY) {
        None | Some(Value::Null) => 0,
        Some(v) => parse_integer(v)
            .ok_or_else(|| DecodeError::InvalidShape(format!("status_fingerprint 不是整数：{}", v)))?,
    };

    let rules = match object.get(RULES_KEY) {
        Some(Value::Object(rules)) => rules,
        Some(other) => {
            return Err(DecodeError::InvalidShape(format!("rules 必须是对象，实际为：{}", other)));
        }
        None => return Err(DecodeError::InvalidShape("缺少 rules 字段".to_string())),
    };

    let conditions = decode_conditions(&service, rules)?;
    if conditions.is_empty() {
        return Err(DecodeError::EmptyConditions(service));
    }

    let metadata: Map<String, Value> = object
        .iter()
        .filter(|(k, _)| Some(k.as_str()) != service_key && *k != STATUS_KEY && *k != RULES_KEY)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(Fingerprint {
        service,
        status,
        conditions,
        metadata,
    })
}

/// 解码规则集合，未识别的键直接忽略
fn decode_conditions(service: &str, rules: &Map<String, Value>) -> Result<Vec<Condition>, DecodeError> {
    let mut conditions = Vec::with_capacity(rules.len());

    for (key, raw_value) in rules {
        let Some(kind) = ConditionKind::from_key(key) else {
            debug!("指纹 {} 包含未识别的条件 {}，已忽略", service, key);
            continue;
        };

        let value = decode_rule_value(kind, raw_value)?;
        conditions.push(Condition { kind, value });
    }

    Ok(conditions)
}

/// 按条件类型定型规则值
fn decode_rule_value(kind: ConditionKind, raw: &Value) -> Result<RuleValue, DecodeError> {
    let invalid = || DecodeError::InvalidRuleValue {
        kind,
        value: raw.to_string(),
    };

    match kind {
        ConditionKind::StatusCode => match raw {
            Value::Number(_) | Value::String(_) => Ok(parse_integer(raw)
                .map(RuleValue::Integer)
                // 非数字状态码保留原文，判定时视为不满足
                .unwrap_or_else(|| RuleValue::Text(scalar_to_string(raw).unwrap_or_default()))),
            _ => Err(invalid()),
        },
        ConditionKind::Cname => {
            let fragment = scalar_to_string(raw).ok_or_else(invalid)?;
            RulePattern::compile(&fragment)
                .map(RuleValue::Pattern)
                .map_err(|e| DecodeError::InvalidPattern {
                    kind,
                    reason: e.to_string(),
                })
        }
        ConditionKind::Title
        | ConditionKind::BodyContains
        | ConditionKind::ARecord
        | ConditionKind::Redirect => scalar_to_string(raw).map(RuleValue::Text).ok_or_else(invalid),
    }
}

/// 标量值转字符串（对象、数组、null 返回 None）
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 解析整数（兼容数字字符串）
fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
