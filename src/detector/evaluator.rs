//! 条件判定器：每种条件类型对应一个纯函数
//! 判定器不会报错，缺失数据一律判定为不满足

use std::collections::HashMap;
use std::net::IpAddr;

use crate::probe::ProbeRecord;
use crate::rule::{ConditionKind, RuleValue};
use crate::utils::body_codec::decode_body;

/// 单个条件的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOutcome {
    Satisfied,
    Unsatisfied,
    /// 没有对应的判定器，不计入合取
    Inapplicable,
}

impl ConditionOutcome {
    fn from_bool(satisfied: bool) -> Self {
        if satisfied {
            ConditionOutcome::Satisfied
        } else {
            ConditionOutcome::Unsatisfied
        }
    }

    /// 转为参与合取的布尔值（不适用返回 None）
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConditionOutcome::Satisfied => Some(true),
            ConditionOutcome::Unsatisfied => Some(false),
            ConditionOutcome::Inapplicable => None,
        }
    }
}

/// 判定函数签名
pub type EvaluatorFn = fn(&ProbeRecord, &RuleValue) -> ConditionOutcome;

/// 条件判定器注册表
#[derive(Debug, Clone)]
pub struct EvaluatorRegistry {
    evaluators: HashMap<ConditionKind, EvaluatorFn>,
}

impl Default for EvaluatorRegistry {
    fn default() -> Self {
        Self::empty()
            .register(ConditionKind::Title, TitleEvaluator::evaluate)
            .register(ConditionKind::Cname, CnameEvaluator::evaluate)
            .register(ConditionKind::StatusCode, StatusCodeEvaluator::evaluate)
            .register(ConditionKind::BodyContains, BodyEvaluator::evaluate)
            .register(ConditionKind::ARecord, ARecordEvaluator::evaluate)
            .register(ConditionKind::Redirect, RedirectEvaluator::evaluate)
    }
}

impl EvaluatorRegistry {
    /// 空注册表
    pub fn empty() -> Self {
        Self {
            evaluators: HashMap::new(),
        }
    }

    /// 注册（或替换）某类条件的判定器
    pub fn register(mut self, kind: ConditionKind, evaluator: EvaluatorFn) -> Self {
        self.evaluators.insert(kind, evaluator);
        self
    }

    pub fn supports(&self, kind: ConditionKind) -> bool {
        self.evaluators.contains_key(&kind)
    }

    /// 判定单个条件
    pub fn evaluate(&self, kind: ConditionKind, record: &ProbeRecord, value: &RuleValue) -> ConditionOutcome {
        match self.evaluators.get(&kind) {
            Some(evaluator) => evaluator(record, value),
            None => ConditionOutcome::Inapplicable,
        }
    }
}

/// 标题判定：两侧去空白后忽略大小写包含
pub struct TitleEvaluator;

impl TitleEvaluator {
    pub fn evaluate(record: &ProbeRecord, value: &RuleValue) -> ConditionOutcome {
        let (Some(title), Some(needle)) = (record.title(), value.as_text()) else {
            return ConditionOutcome::Unsatisfied;
        };
        let title = title.trim().to_lowercase();
        let needle = needle.trim().to_lowercase();
        ConditionOutcome::from_bool(title.contains(&needle))
    }
}

/// CNAME判定：编译后的模式匹配CNAME链
pub struct CnameEvaluator;

impl CnameEvaluator {
    pub fn evaluate(record: &ProbeRecord, value: &RuleValue) -> ConditionOutcome {
        let (Some(cname), Some(pattern)) = (record.cname_records(), value.as_pattern()) else {
            return ConditionOutcome::Unsatisfied;
        };
        ConditionOutcome::from_bool(pattern.is_match(cname))
    }
}

/// 状态码判定：整数相等
pub struct StatusCodeEvaluator;

impl StatusCodeEvaluator {
    pub fn evaluate(record: &ProbeRecord, value: &RuleValue) -> ConditionOutcome {
        let Some(expected) = value.as_integer() else {
            return ConditionOutcome::Unsatisfied;
        };
        ConditionOutcome::from_bool(i64::from(record.status_code()) == expected)
    }
}

/// 响应体判定：解码后区分大小写包含
pub struct BodyEvaluator;

impl BodyEvaluator {
    pub fn evaluate(record: &ProbeRecord, value: &RuleValue) -> ConditionOutcome {
        let (Some(encoded), Some(needle)) = (record.response_body_base64(), value.as_text()) else {
            return ConditionOutcome::Unsatisfied;
        };
        let Some(body) = decode_body(encoded) else {
            return ConditionOutcome::Unsatisfied;
        };
        ConditionOutcome::from_bool(body.contains(needle))
    }
}

/// A记录判定：IP字面量精确相等，其余按子串包含
pub struct ARecordEvaluator;

impl ARecordEvaluator {
    pub fn evaluate(record: &ProbeRecord, value: &RuleValue) -> ConditionOutcome {
        let (Some(records), Some(expected)) = (record.a_records(), value.as_text()) else {
            return ConditionOutcome::Unsatisfied;
        };
        let expected = expected.trim();

        let matched = if expected.parse::<IpAddr>().is_ok() {
            records.iter().any(|r| r.trim() == expected)
        } else {
            records.iter().any(|r| r.contains(expected))
        };
        ConditionOutcome::from_bool(matched)
    }
}

/// 跳转判定：跳转地址精确相等，无跳转即不满足
pub struct RedirectEvaluator;

impl RedirectEvaluator {
    pub fn evaluate(record: &ProbeRecord, value: &RuleValue) -> ConditionOutcome {
        let (Some(redirect), Some(expected)) = (record.redirect_url(), value.as_text()) else {
            return ConditionOutcome::Unsatisfied;
        };
        ConditionOutcome::from_bool(redirect == expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RulePattern;
    use crate::utils::body_codec::encode_body;

    fn text(s: &str) -> RuleValue {
        RuleValue::Text(s.to_string())
    }

    fn base_record() -> crate::probe::ProbeRecordBuilder {
        ProbeRecord::builder("shop.example.com", "example.com")
    }

    #[test]
    fn test_title() {
        let record = base_record().title(Some("  WordPress Admin ".to_string())).build();
        assert_eq!(TitleEvaluator::evaluate(&record, &text(" wordpress ")), ConditionOutcome::Satisfied);
        assert_eq!(TitleEvaluator::evaluate(&record, &text("joomla")), ConditionOutcome::Unsatisfied);

        let untitled = base_record().build();
        assert_eq!(TitleEvaluator::evaluate(&untitled, &text("")), ConditionOutcome::Unsatisfied);
    }

    #[test]
    fn test_cname() {
        let pattern = RuleValue::Pattern(RulePattern::compile("herokudns.com").unwrap());
        let record = base_record()
            .cname_records(Some("shop.example.com.herokudns.com.".to_string()))
            .build();
        assert_eq!(CnameEvaluator::evaluate(&record, &pattern), ConditionOutcome::Satisfied);

        let no_cname = base_record().build();
        assert_eq!(CnameEvaluator::evaluate(&no_cname, &pattern), ConditionOutcome::Unsatisfied);
    }

    #[test]
    fn test_status_code() {
        let record = base_record().status_code(404).build();
        assert_eq!(StatusCodeEvaluator::evaluate(&record, &RuleValue::Integer(404)), ConditionOutcome::Satisfied);
        assert_eq!(StatusCodeEvaluator::evaluate(&record, &RuleValue::Integer(200)), ConditionOutcome::Unsatisfied);
        assert_eq!(StatusCodeEvaluator::evaluate(&record, &text("404x")), ConditionOutcome::Unsatisfied);
    }

    #[test]
    fn test_body_contains() {
        let record = base_record()
            .response_body_base64(Some(encode_body(b"<h1>NoSuchBucket</h1>")))
            .build();
        assert_eq!(BodyEvaluator::evaluate(&record, &text("NoSuchBucket")), ConditionOutcome::Satisfied);
        assert_eq!(BodyEvaluator::evaluate(&record, &text("nosuchbucket")), ConditionOutcome::Unsatisfied);

        let garbage = base_record().response_body_base64(Some("@@@".to_string())).build();
        assert_eq!(BodyEvaluator::evaluate(&garbage, &text("")), ConditionOutcome::Unsatisfied);

        let no_body = base_record().build();
        assert_eq!(BodyEvaluator::evaluate(&no_body, &text("NoSuchBucket")), ConditionOutcome::Unsatisfied);
    }

    #[test]
    fn test_a_record() {
        let record = base_record()
            .a_records(Some(vec!["11.2.3.45".to_string(), "185.199.108.153".to_string()]))
            .build();
        assert_eq!(ARecordEvaluator::evaluate(&record, &text("185.199.108.153")), ConditionOutcome::Satisfied);
        // IP字面量不做子串匹配
        assert_eq!(ARecordEvaluator::evaluate(&record, &text("1.2.3.4")), ConditionOutcome::Unsatisfied);
        assert_eq!(ARecordEvaluator::evaluate(&record, &text("185.199.")), ConditionOutcome::Satisfied);

        let empty = base_record().a_records(Some(Vec::new())).build();
        assert_eq!(ARecordEvaluator::evaluate(&empty, &text("185.199.")), ConditionOutcome::Unsatisfied);

        let absent = base_record().build();
        assert_eq!(ARecordEvaluator::evaluate(&absent, &text("185.199.108.153")), ConditionOutcome::Unsatisfied);
    }

    #[test]
    fn test_redirect() {
        let record = base_record()
            .redirect_url(Some("https://example.com/login".to_string()))
            .build();
        assert_eq!(
            RedirectEvaluator::evaluate(&record, &text("https://example.com/login")),
            ConditionOutcome::Satisfied
        );
        assert_eq!(
            RedirectEvaluator::evaluate(&record, &text("https://example.com/login/")),
            ConditionOutcome::Unsatisfied
        );

        let no_redirect = base_record().redirect_url(Some("No redirects".to_string())).build();
        assert_eq!(
            RedirectEvaluator::evaluate(&no_redirect, &text("No redirects")),
            ConditionOutcome::Unsatisfied
        );
    }

    #[test]
    fn test_registry_without_evaluator_is_inapplicable() {
        let registry = EvaluatorRegistry::empty().register(ConditionKind::Title, TitleEvaluator::evaluate);
        let record = base_record().title(Some("Heroku | No such app".to_string())).build();

        assert!(registry.supports(ConditionKind::Title));
        assert!(!registry.supports(ConditionKind::Cname));
        assert_eq!(
            registry.evaluate(ConditionKind::Title, &record, &text("no such app")),
            ConditionOutcome::Satisfied
        );
        assert_eq!(
            registry.evaluate(ConditionKind::StatusCode, &record, &RuleValue::Integer(404)),
            ConditionOutcome::Inapplicable
        );
        assert_eq!(ConditionOutcome::Inapplicable.as_bool(), None);
    }

    #[test]
    fn test_default_registry_covers_all_kinds() {
        let registry = EvaluatorRegistry::default();
        for kind in ConditionKind::ALL {
            assert!(registry.supports(kind));
        }
    }
}
