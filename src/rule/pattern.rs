//! 编译后的CNAME匹配模式
//! 规则片段中的 `.` 只匹配字面点号，其余正则语法保留，忽略大小写

use regex::{Regex, RegexBuilder};

use crate::error::RsdResult;

/// 编译后的规则模式
#[derive(Debug, Clone)]
pub struct RulePattern {
    raw: String,
    regex: Regex,
}

impl RulePattern {
    /// 编译规则片段
    pub fn compile(raw: &str) -> RsdResult<Self> {
        let escaped = raw.replace('.', "\\.");
        let regex = RegexBuilder::new(&escaped)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            raw: raw.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// 规则中的原始片段
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// 实际参与匹配的正则
    pub fn describe(&self) -> &str {
        self.regex.as_str()
    }
}

// 同一片段编译结果一致，按原始片段比较
impl PartialEq for RulePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_is_literal() {
        let pattern = RulePattern::compile("herokuapp.com").unwrap();
        assert!(pattern.is_match("myapp.HerokuApp.com"));
        assert!(!pattern.is_match("herokuappxcom"));
        assert_eq!(pattern.describe(), r"herokuapp\.com");
        assert_eq!(pattern.raw(), "herokuapp.com");
    }

    #[test]
    fn test_other_syntax_kept() {
        let pattern = RulePattern::compile("(s3|s3-website).amazonaws.com$").unwrap();
        assert!(pattern.is_match("bucket.s3-website.amazonaws.com"));
        assert!(!pattern.is_match("bucket.s3.amazonaws.com.evil"));
    }

    #[test]
    fn test_invalid_fragment() {
        assert!(RulePattern::compile("azure(websites.net").is_err());
    }
}
