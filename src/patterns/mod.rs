//! Pattern registry for configuration-driven tagging
//!
//! This module provides:
//! - Free-text build detectors (category, tag, regex, optional bundle)
//! - Catalog tagging keyword rules for runes, passive nodes and unique mods
//! - Conditional-mod trigger detectors for unique items
//!
//! The default rule set ships in config-templates/tag_rules.toml and is
//! embedded at compile time; a replacement file can be supplied at runtime.

use crate::error::{BuildForgeError, Result};
use crate::tags::TagCategory;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Embedded default rule set
pub const BUILTIN_RULES: &str = include_str!("../../config-templates/tag_rules.toml");

/// Free-text detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRuleConfig {
    pub category: TagCategory,
    pub tag: String,
    pub pattern: String,
    /// Extra tags injected whenever this detector fires
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bundle: Vec<BundledTag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundledTag {
    pub category: TagCategory,
    pub tag: String,
}

/// Plain keyword rule: the tag is added when the pattern matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRuleConfig {
    pub tag: String,
    pub pattern: String,
}

/// Rules file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagRulesConfig {
    #[serde(default)]
    pub build: Vec<BuildRuleConfig>,
    #[serde(default)]
    pub rune: Vec<KeywordRuleConfig>,
    #[serde(default)]
    pub passive: Vec<KeywordRuleConfig>,
    #[serde(default)]
    pub unique: Vec<KeywordRuleConfig>,
    #[serde(default)]
    pub condition: Vec<KeywordRuleConfig>,
}

/// Compiled free-text detector
#[derive(Debug, Clone)]
pub struct CompiledBuildRule {
    pub category: TagCategory,
    pub tag: String,
    pub regex: Regex,
    pub bundle: Vec<(TagCategory, String)>,
}

/// Compiled keyword rule
#[derive(Debug, Clone)]
pub struct CompiledKeywordRule {
    pub tag: String,
    pub regex: Regex,
}

impl CompiledKeywordRule {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Pattern registry with all pre-compiled rules
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    /// Build description detectors, in evaluation order
    pub build: Vec<CompiledBuildRule>,
    /// Rune tagging rules
    pub rune: Vec<CompiledKeywordRule>,
    /// Passive node tagging rules
    pub passive: Vec<CompiledKeywordRule>,
    /// Unique item mod tagging rules
    pub unique: Vec<CompiledKeywordRule>,
    /// Conditional mod triggers
    pub condition: Vec<CompiledKeywordRule>,
}

impl PatternRegistry {
    /// Compile the embedded default rules
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_RULES)
    }

    /// Load pattern registry from a rules file
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BuildForgeError::Io {
            source: e,
            context: format!("Failed to read tag rules: {:?}", path),
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from a rules file when one is configured, otherwise the defaults
    pub fn from_optional_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_config_file(path),
            None => Self::builtin(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TagRulesConfig = toml::from_str(content)?;
        Self::from_config(config)
    }

    /// Build pattern registry from parsed configuration
    pub fn from_config(config: TagRulesConfig) -> Result<Self> {
        let build = config
            .build
            .iter()
            .map(|rule| {
                compile(&rule.pattern, "build", &rule.tag).map(|regex| CompiledBuildRule {
                    category: rule.category,
                    tag: rule.tag.clone(),
                    regex,
                    bundle: rule
                        .bundle
                        .iter()
                        .map(|b| (b.category, b.tag.clone()))
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let registry = Self {
            build,
            rune: compile_keywords(&config.rune, "rune")?,
            passive: compile_keywords(&config.passive, "passive")?,
            unique: compile_keywords(&config.unique, "unique")?,
            condition: compile_keywords(&config.condition, "condition")?,
        };

        tracing::debug!(
            "Compiled tag rules: {} build, {} rune, {} passive, {} unique, {} condition",
            registry.build.len(),
            registry.rune.len(),
            registry.passive.len(),
            registry.unique.len(),
            registry.condition.len()
        );

        Ok(registry)
    }

    /// Tags of every keyword rule matching `text`, in rule order
    pub fn matching_tags<'a>(
        rules: &'a [CompiledKeywordRule],
        text: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        rules
            .iter()
            .filter(move |rule| rule.is_match(text))
            .map(|rule| rule.tag.as_str())
    }
}

fn compile(pattern: &str, section: &str, tag: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| {
            BuildForgeError::Config(format!(
                "Invalid {} pattern for tag '{}': {}",
                section, tag, e
            ))
        })
}

fn compile_keywords(rules: &[KeywordRuleConfig], section: &str) -> Result<Vec<CompiledKeywordRule>> {
    rules
        .iter()
        .map(|rule| {
            compile(&rule.pattern, section, &rule.tag).map(|regex| CompiledKeywordRule {
                tag: rule.tag.clone(),
                regex,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules_compile() {
        let registry = PatternRegistry::builtin().unwrap();

        assert!(!registry.build.is_empty());
        assert!(!registry.rune.is_empty());
        assert!(!registry.passive.is_empty());
        assert!(!registry.unique.is_empty());
        assert_eq!(registry.condition.len(), 17);
    }

    #[test]
    fn test_nature_rule_carries_bundle() {
        let registry = PatternRegistry::builtin().unwrap();
        let nature = registry
            .build
            .iter()
            .find(|r| r.regex.is_match("nature"))
            .unwrap();

        assert_eq!(nature.category, TagCategory::Mechanics);
        assert_eq!(nature.tag, "poison");
        assert_eq!(nature.bundle.len(), 3);
    }

    #[test]
    fn test_invalid_pattern_names_rule() {
        let config = TagRulesConfig {
            rune: vec![KeywordRuleConfig {
                tag: "broken".to_string(),
                pattern: "(unclosed".to_string(),
            }],
            ..Default::default()
        };

        let err = PatternRegistry::from_config(config).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_matching_tags_in_rule_order() {
        let registry = PatternRegistry::builtin().unwrap();
        let tags: Vec<&str> =
            PatternRegistry::matching_tags(&registry.rune, "rune of fire and life").collect();

        assert_eq!(tags, vec!["fire", "life"]);
    }

    #[test]
    fn test_custom_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(
            &path,
            r#"
[[build]]
category = "mechanics"
tag = "stun"
pattern = 'stun'
"#,
        )
        .unwrap();

        let registry = PatternRegistry::from_optional_file(Some(&path)).unwrap();
        assert_eq!(registry.build.len(), 1);
        assert!(registry.rune.is_empty());
    }

    #[test]
    fn test_uppercase_patterns_match_lowercased_text() {
        let registry = PatternRegistry::from_toml_str(
            r#"
[[rune]]
tag = "energy_shield"
pattern = 'Energy Shield'
"#,
        )
        .unwrap();

        let tags: Vec<&str> =
            PatternRegistry::matching_tags(&registry.rune, "+30 to maximum energy shield").collect();
        assert_eq!(tags, vec!["energy_shield"]);
    }
}
