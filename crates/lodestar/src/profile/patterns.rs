//! Prioritized semantic-type detection rules.

use regex::Regex;

use crate::error::Result;
use crate::schema::SemanticType;

/// One detection rule: values matching `pattern` vote for `semantic_type`
/// with weight `base_confidence`.
///
/// Rule order is priority order; when two types tie on total weight, the
/// first-declared one wins.
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Semantic type the rule votes for.
    pub semantic_type: SemanticType,
    /// Pattern a value must fully match.
    pub pattern: Regex,
    /// Weight of one matching value (defaults to 1.0).
    pub base_confidence: f64,
}

impl PatternRule {
    /// Build a rule from a pattern string.
    pub fn new(semantic_type: SemanticType, pattern: &str, base_confidence: f64) -> Result<Self> {
        Ok(Self {
            semantic_type,
            pattern: Regex::new(pattern)?,
            base_confidence,
        })
    }
}

/// The default rule set, in priority order.
pub fn default_rules() -> Vec<PatternRule> {
    [
        (
            SemanticType::Email,
            r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$",
        ),
        (
            SemanticType::Phone,
            r"^\+?1?[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}$",
        ),
        (
            SemanticType::Currency,
            r"^-?[$€£]\s?\d{1,3}(,\d{3})*(\.\d{1,2})?$",
        ),
        (
            SemanticType::Date,
            r"^(\d{4}-\d{2}-\d{2}|\d{2}/\d{2}/\d{4}|\d{2}-\d{2}-\d{4}|\d{4}/\d{2}/\d{2})$",
        ),
        (SemanticType::Time, r"^\d{1,2}:\d{2}(:\d{2})?(\s?[APap][Mm])?$"),
        (SemanticType::Url, r"^https?://[^\s]+$"),
        (SemanticType::ZipCode, r"^\d{5}(-\d{4})?$"),
        (SemanticType::Ssn, r"^\d{3}-\d{2}-\d{4}$"),
    ]
    .into_iter()
    .map(|(semantic_type, pattern)| PatternRule {
        semantic_type,
        pattern: Regex::new(pattern).expect("default pattern compiles"),
        base_confidence: 1.0,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_for(semantic_type: SemanticType) -> PatternRule {
        default_rules()
            .into_iter()
            .find(|r| r.semantic_type == semantic_type)
            .expect("rule exists")
    }

    #[test]
    fn test_email_pattern() {
        let rule = rule_for(SemanticType::Email);
        assert!(rule.pattern.is_match("user@example.com"));
        assert!(rule.pattern.is_match("first.last+tag@sub.domain.org"));
        assert!(!rule.pattern.is_match("not-an-email"));
    }

    #[test]
    fn test_currency_pattern() {
        let rule = rule_for(SemanticType::Currency);
        assert!(rule.pattern.is_match("$12.34"));
        assert!(rule.pattern.is_match("$1,234,567.89"));
        assert!(rule.pattern.is_match("-$5"));
        assert!(!rule.pattern.is_match("12.34"));
    }

    #[test]
    fn test_date_pattern_formats() {
        let rule = rule_for(SemanticType::Date);
        assert!(rule.pattern.is_match("2024-01-15"));
        assert!(rule.pattern.is_match("01/15/2024"));
        assert!(rule.pattern.is_match("15-01-2024"));
        assert!(!rule.pattern.is_match("Jan 15, 2024"));
    }

    #[test]
    fn test_zip_and_ssn_do_not_overlap() {
        let zip = rule_for(SemanticType::ZipCode);
        let ssn = rule_for(SemanticType::Ssn);
        assert!(zip.pattern.is_match("90210"));
        assert!(zip.pattern.is_match("90210-1234"));
        assert!(!zip.pattern.is_match("123-45-6789"));
        assert!(ssn.pattern.is_match("123-45-6789"));
        assert!(!ssn.pattern.is_match("90210"));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        assert!(PatternRule::new(SemanticType::Email, "(unclosed", 1.0).is_err());
    }
}
