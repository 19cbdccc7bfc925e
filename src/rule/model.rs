//! 指纹规则数据模型定义
//! 仅存储解码后的规则数据，无任何匹配逻辑

use std::fmt;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::pattern::RulePattern;

/// 停用指纹的状态值（status_fingerprint == 1 的指纹不参与匹配）
pub const DISABLED_STATUS: i64 = 1;

/// 条件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    Title,
    Cname,
    StatusCode,
    BodyContains,
    ARecord,
    Redirect,
}

impl ConditionKind {
    /// 全部已识别的条件类型
    pub const ALL: [ConditionKind; 6] = [
        ConditionKind::Title,
        ConditionKind::Cname,
        ConditionKind::StatusCode,
        ConditionKind::BodyContains,
        ConditionKind::ARecord,
        ConditionKind::Redirect,
    ];

    /// 从规则键名解析（兼容 snake_case 与 camelCase 两种写法）
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "title" => Some(ConditionKind::Title),
            "cname" => Some(ConditionKind::Cname),
            "status_code" | "statusCode" => Some(ConditionKind::StatusCode),
            "in_body" | "bodyContains" => Some(ConditionKind::BodyContains),
            "a_record" | "aRecord" => Some(ConditionKind::ARecord),
            "redirect" => Some(ConditionKind::Redirect),
            _ => None,
        }
    }

    /// 规则文件中的标准键名
    pub fn as_key(&self) -> &'static str {
        match self {
            ConditionKind::Title => "title",
            ConditionKind::Cname => "cname",
            ConditionKind::StatusCode => "status_code",
            ConditionKind::BodyContains => "in_body",
            ConditionKind::ARecord => "a_record",
            ConditionKind::Redirect => "redirect",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// 规则值（解码时一次性校验并定型）
#[derive(Debug, Clone, PartialEq)]
pub enum RuleValue {
    Text(String),
    Integer(i64),
    Pattern(RulePattern),
}

impl RuleValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RuleValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RuleValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&RulePattern> {
        match self {
            RuleValue::Pattern(r) => Some(r),
            _ => None,
        }
    }

    /// 还原为规则文件中的JSON值（正则还原为原始片段）
    pub fn to_json(&self) -> Value {
        match self {
            RuleValue::Text(s) => Value::String(s.clone()),
            RuleValue::Integer(n) => Value::from(*n),
            RuleValue::Pattern(p) => Value::String(p.raw().to_string()),
        }
    }
}


/// 单个匹配条件
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub kind: ConditionKind,
    pub value: RuleValue,
}

/// 解码后的指纹
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    /// 服务名称（指纹库定义的标签）
    pub service: String,
    /// 指纹状态值
    pub status: i64,
    /// 条件列表
    pub conditions: Vec<Condition>,
    /// 其余顶层字段，原样透传
    pub metadata: Map<String, Value>,
}

impl Fingerprint {
    /// 是否参与匹配
    pub fn is_active(&self) -> bool {
        self.status != DISABLED_STATUS
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.service)
    }
}

// 序列化回指纹库的原始结构（service / status_fingerprint / rules + 透传字段）
impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut rules = Map::new();
        for condition in &self.conditions {
            rules.insert(condition.kind.as_key().to_string(), condition.value.to_json());
        }

        let mut object = self.metadata.clone();
        object.insert("service".to_string(), Value::String(self.service.clone()));
        object.insert("status_fingerprint".to_string(), Value::from(self.status));
        object.insert("rules".to_string(), Value::Object(rules));
        object.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_kind_keys() {
        assert_eq!(ConditionKind::from_key("status_code"), Some(ConditionKind::StatusCode));
        assert_eq!(ConditionKind::from_key("statusCode"), Some(ConditionKind::StatusCode));
        assert_eq!(ConditionKind::from_key("in_body"), Some(ConditionKind::BodyContains));
        assert_eq!(ConditionKind::from_key("aRecord"), Some(ConditionKind::ARecord));
        assert_eq!(ConditionKind::from_key("headers"), None);

        for kind in ConditionKind::ALL {
            assert_eq!(ConditionKind::from_key(kind.as_key()), Some(kind));
        }
    }

    #[test]
    fn test_fingerprint_status() {
        let mut fingerprint = Fingerprint {
            service: "github-pages".to_string(),
            status: 0,
            conditions: Vec::new(),
            metadata: Map::new(),
        };
        assert!(fingerprint.is_active());

        fingerprint.status = DISABLED_STATUS;
        assert!(!fingerprint.is_active());
    }

    #[test]
    fn test_fingerprint_serialize() {
        let mut metadata = Map::new();
        metadata.insert("author".to_string(), Value::String("xcapri".to_string()));
        let fingerprint = Fingerprint {
            service: "heroku".to_string(),
            status: 0,
            conditions: vec![Condition {
                kind: ConditionKind::StatusCode,
                value: RuleValue::Integer(404),
            }],
            metadata,
        };

        let json = serde_json::to_value(&fingerprint).unwrap();
        assert_eq!(json["service"], "heroku");
        assert_eq!(json["status_fingerprint"], 0);
        assert_eq!(json["rules"]["status_code"], 404);
        assert_eq!(json["author"], "xcapri");
    }
}
