//! Pattern-based rewrite rules.
//!
//! A small stand-in for a full static analyzer. Each rule scans the source and
//! reports span rewrites; the [`PatternAnalyzer`] applies every rewrite on its
//! own, so two occurrences of the same problem become two separate candidate
//! texts. Exploration and merging then recombine them.

use crate::analyzer::{AnalyzeError, Analyzer, Rewrite, RewriteSet, RuleId};
use crate::config::{LiteralRuleConfig, RuleSettings};

/// A rule that can propose rewrites for a source text.
pub trait RewriteRule: Send + Sync {
    fn id(&self) -> &RuleId;

    /// Every rewrite this rule would make, one per occurrence.
    fn find_rewrites(&self, source: &str) -> Vec<Rewrite>;
}

/// Replace each non-overlapping occurrence of `find` with `replace`.
#[derive(Debug, Clone)]
pub struct LiteralRule {
    id: RuleId,
    find: String,
    replace: String,
}

impl LiteralRule {
    pub fn new(id: impl Into<RuleId>, find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            find: find.into(),
            replace: replace.into(),
        }
    }
}

impl From<&LiteralRuleConfig> for LiteralRule {
    fn from(config: &LiteralRuleConfig) -> Self {
        Self::new(config.id.as_str(), config.find.as_str(), config.replace.as_str())
    }
}

impl RewriteRule for LiteralRule {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn find_rewrites(&self, source: &str) -> Vec<Rewrite> {
        if self.find.is_empty() || self.find == self.replace {
            return Vec::new();
        }
        source
            .match_indices(&self.find)
            .map(|(start, matched)| Rewrite {
                rule: self.id.clone(),
                start,
                end: start + matched.len(),
                replacement: self.replace.clone(),
            })
            .collect()
    }
}

/// Java clean-ups shipped with the analyzer.
pub fn builtin_rules() -> Vec<LiteralRule> {
    vec![
        LiteralRule::new("empty-statement", ";;", ";"),
        LiteralRule::new("boolean-literal-comparison", " == true", ""),
        LiteralRule::new("double-negation", "!!", ""),
        LiteralRule::new("collection-is-empty", ".size() == 0", ".isEmpty()"),
    ]
}

/// Registry of rewrite rules acting as an [`Analyzer`].
#[derive(Default)]
pub struct PatternAnalyzer {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl PatternAnalyzer {
    /// An analyzer with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// An analyzer with all built-in rules.
    pub fn with_builtin_rules() -> Self {
        let mut analyzer = Self::new();
        for rule in builtin_rules() {
            analyzer.register(rule);
        }
        analyzer
    }

    pub fn from_settings(settings: &RuleSettings) -> Self {
        let mut analyzer = if settings.builtin {
            Self::with_builtin_rules()
        } else {
            Self::new()
        };
        for rule in &settings.literal {
            analyzer.register(LiteralRule::from(rule));
        }
        analyzer
            .rules
            .retain(|r| !settings.disabled.iter().any(|d| d == r.id().as_str()));
        analyzer
    }

    pub fn register(&mut self, rule: impl RewriteRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    pub fn rule_ids(&self) -> Vec<&RuleId> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Analyzer for PatternAnalyzer {
    fn analyze(&self, source: &str) -> Result<RewriteSet, AnalyzeError> {
        let mut rewrites = RewriteSet::new();
        for rule in &self.rules {
            for rewrite in rule.find_rewrites(source) {
                let text = rewrite.apply(source)?;
                if text != source {
                    rewrites.insert((rewrite.rule, text));
                }
            }
        }
        Ok(rewrites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(set: &RewriteSet, rule: &str) -> Vec<String> {
        set.iter()
            .filter(|(r, _)| r.as_str() == rule)
            .map(|(_, t)| t.clone())
            .collect()
    }

    #[test]
    fn test_literal_rule_one_rewrite_per_occurrence() {
        let rule = LiteralRule::new("semi", ";;", ";");
        let rewrites = rule.find_rewrites("a;; b;;");
        assert_eq!(rewrites.len(), 2);
        assert_eq!(rewrites[0].start, 1);
        assert_eq!(rewrites[1].start, 5);
    }

    #[test]
    fn test_literal_rule_ignores_noops() {
        assert!(LiteralRule::new("x", "", "y").find_rewrites("abc").is_empty());
        assert!(LiteralRule::new("x", "a", "a").find_rewrites("abc").is_empty());
    }

    #[test]
    fn test_pattern_analyzer_separates_occurrences() {
        let analyzer = PatternAnalyzer::with_builtin_rules();
        let out = analyzer.analyze("f();; g();;").unwrap();
        let mut got = texts(&out, "empty-statement");
        got.sort();
        assert_eq!(got, vec!["f(); g();;".to_string(), "f();; g();".to_string()]);
    }

    #[test]
    fn test_pattern_analyzer_multiple_rules() {
        let analyzer = PatternAnalyzer::with_builtin_rules();
        let out = analyzer
            .analyze("if (xs.size() == 0 && ok == true) { run();; }")
            .unwrap();
        assert_eq!(
            texts(&out, "collection-is-empty"),
            vec!["if (xs.isEmpty() && ok == true) { run();; }".to_string()]
        );
        assert_eq!(
            texts(&out, "boolean-literal-comparison"),
            vec!["if (xs.size() == 0 && ok) { run();; }".to_string()]
        );
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_from_settings() {
        let settings = RuleSettings {
            builtin: true,
            literal: vec![LiteralRuleConfig {
                id: "no-tabs".into(),
                find: "\t".into(),
                replace: "    ".into(),
            }],
            disabled: vec!["double-negation".into()],
        };
        let analyzer = PatternAnalyzer::from_settings(&settings);
        let rule_ids = analyzer.rule_ids();
        let ids: Vec<&str> = rule_ids.iter().map(|r| r.as_str()).collect();
        assert!(ids.contains(&"no-tabs"));
        assert!(ids.contains(&"empty-statement"));
        assert!(!ids.contains(&"double-negation"));
        assert_eq!(analyzer.len(), 4);
    }

    #[test]
    fn test_builtin_can_be_turned_off() {
        let settings = RuleSettings {
            builtin: false,
            ..RuleSettings::default()
        };
        assert!(PatternAnalyzer::from_settings(&settings).is_empty());
    }
}
