//! Catalog-side tag derivation
//!
//! Entities arrive from the upstream extraction step with optional `tags`.
//! Tags are normalized once at load time; entities that carry none get them
//! derived from their text through the registry's keyword rules.

use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

use crate::catalog::types::{
    ConditionalMod, PassiveNode, Rune, Skill, SkillGrant, SkillLevelBoost, UniqueItem,
};
use crate::patterns::PatternRegistry;

/// Implicit mods beyond this count are dropped
pub const MAX_IMPLICITS: usize = 5;

lazy_static! {
    static ref TAGS_MARKUP_RE: Regex = Regex::new(r"\{tags:([^}]+)\}").unwrap();
    static ref VARIANT_MARKUP_RE: Regex = Regex::new(r"\{variant:[\d,]+\}").unwrap();
    static ref GRANT_RE: Regex =
        Regex::new(r"(?i)Grants Skill:\s*(?:Level\s*\((\d+)-(\d+)\)\s*)?([A-Za-z'\s-]+)").unwrap();
    static ref TYPED_BOOST_RE: Regex =
        Regex::new(r"(?i)\+(\d+)\s+to\s+Level\s+of\s+all\s+([A-Za-z]+)\s+Skills").unwrap();
    static ref ALL_BOOST_RE: Regex =
        Regex::new(r"(?i)\+(\d+)\s+to\s+Level\s+of\s+all\s+Skills").unwrap();
    static ref MORE_DAMAGE_RE: Regex = Regex::new(r"more\s+damage").unwrap();
    static ref INCREASED_DAMAGE_RE: Regex = Regex::new(r"increased\s+damage").unwrap();
    static ref NON_ALNUM_RE: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

const DAMAGE_WORDS: [&str; 5] = ["fire", "cold", "lightning", "chaos", "physical"];

/// Lowercase, trim, drop empties and duplicates (first occurrence wins)
pub fn normalize_tags(tags: &mut Vec<String>) {
    let mut seen: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags.drain(..) {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    *tags = seen;
}

fn push_unique(tags: &mut Vec<String>, tag: impl Into<String>) {
    let tag = tag.into();
    if !tags.contains(&tag) {
        tags.push(tag);
    }
}

/// "Lightning Bolt" -> "lightning_bolt"
pub fn slugify(text: &str) -> String {
    NON_ALNUM_RE
        .replace_all(&text.to_lowercase(), "_")
        .trim_matches('_')
        .to_string()
}

/// Strip `{variant:N}` and `{tags:...}` markers from mod text
pub fn clean_mod(text: &str) -> String {
    let without_variant = VARIANT_MARKUP_RE.replace_all(text, "");
    TAGS_MARKUP_RE
        .replace_all(&without_variant, "")
        .trim()
        .to_string()
}

/// Everything one mod line contributes to its item
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ModAnalysis {
    pub tags: Vec<String>,
    pub granted_skills: Vec<SkillGrant>,
    pub skill_level_boosts: Vec<SkillLevelBoost>,
    pub conditional_mods: Vec<ConditionalMod>,
}

/// Applies keyword rules to catalog entities
#[derive(Debug, Clone)]
pub struct CatalogTagger {
    patterns: Arc<PatternRegistry>,
}

impl CatalogTagger {
    pub fn new(patterns: Arc<PatternRegistry>) -> Self {
        Self { patterns }
    }

    /// Skills keep their gem tags; untagged gems fall back to the display tag string
    pub fn tag_skill(&self, skill: &mut Skill) {
        if skill.tags.is_empty() {
            skill.tags = skill
                .tag_string
                .split(',')
                .map(|t| t.trim().replace(' ', "_"))
                .collect();
        }
        normalize_tags(&mut skill.tags);
    }

    pub fn tag_passive(&self, node: &mut PassiveNode) {
        // Blank owner means the node is not ascendancy-exclusive
        node.ascendancy_name = node
            .ascendancy_name
            .take()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        if node.tags.is_empty() {
            let text = format!("{} {}", node.name, node.stats.join(" ")).to_lowercase();
            let mut tags: Vec<String> = PatternRegistry::matching_tags(&self.patterns.passive, &text)
                .map(str::to_string)
                .collect();

            if node.is_keystone {
                tags.push("keystone".to_string());
            }
            if node.is_notable {
                tags.push("notable".to_string());
            }
            if node.ascendancy_name.is_some() {
                tags.push("ascendancy".to_string());
            }
            node.tags = tags;
        }
        normalize_tags(&mut node.tags);
    }

    pub fn tag_rune(&self, rune: &mut Rune) {
        if rune.tags.is_empty() {
            let stats: Vec<&str> = rune.all_stats().collect();
            let text = format!("{} {}", rune.name, stats.join(" ")).to_lowercase();
            rune.tags = PatternRegistry::matching_tags(&self.patterns.rune, &text)
                .map(str::to_string)
                .collect();
        }
        normalize_tags(&mut rune.tags);
    }

    /// Derive tags and sub-records from mod text, then clean the stored mods
    pub fn tag_unique(&self, item: &mut UniqueItem) {
        if item.id.is_empty() {
            item.id = slugify(&item.name);
        }

        let analyses: Vec<ModAnalysis> = item.all_mods().map(|m| self.analyze_mod(m)).collect();

        if item.tags.is_empty() {
            for analysis in &analyses {
                for tag in &analysis.tags {
                    push_unique(&mut item.tags, tag.as_str());
                }
            }
            item.tags.sort();
        }
        normalize_tags(&mut item.tags);

        let has_derived = !item.granted_skills.is_empty()
            || !item.skill_level_boosts.is_empty()
            || !item.conditional_mods.is_empty();
        if !has_derived {
            for analysis in analyses {
                item.granted_skills.extend(analysis.granted_skills);
                item.skill_level_boosts.extend(analysis.skill_level_boosts);
                item.conditional_mods.extend(analysis.conditional_mods);
            }
        }

        item.implicits.truncate(MAX_IMPLICITS);
        clean_mods(&mut item.implicits);
        clean_mods(&mut item.explicits);
        for variant in &mut item.variants {
            clean_mods(&mut variant.mods);
        }
    }

    /// Analyze one raw mod line
    pub fn analyze_mod(&self, raw: &str) -> ModAnalysis {
        let mut analysis = ModAnalysis::default();
        let lower = raw.to_lowercase();

        for caps in TAGS_MARKUP_RE.captures_iter(&lower) {
            for tag in caps[1].split(',') {
                let tag = tag.trim();
                if !tag.is_empty() {
                    push_unique(&mut analysis.tags, tag);
                }
            }
        }

        for tag in PatternRegistry::matching_tags(&self.patterns.unique, &lower) {
            push_unique(&mut analysis.tags, tag);
        }

        self.extract_grant(raw, &mut analysis);
        self.extract_boosts(raw, &mut analysis);
        self.extract_conditionals(raw, &lower, &mut analysis);

        analysis
    }

    fn extract_grant(&self, raw: &str, analysis: &mut ModAnalysis) {
        let Some(caps) = GRANT_RE.captures(raw) else {
            return;
        };

        let min_level = caps
            .get(1)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(1);
        let max_level = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(20);
        let skill_name = caps[3].trim().to_string();

        push_unique(&mut analysis.tags, format!("grants_{}", slugify(&skill_name)));
        push_unique(&mut analysis.tags, "grants_skill");
        analysis.granted_skills.push(SkillGrant {
            skill_name,
            min_level,
            max_level,
        });
    }

    fn extract_boosts(&self, raw: &str, analysis: &mut ModAnalysis) {
        if let Some(caps) = TYPED_BOOST_RE.captures(raw) {
            let bonus = caps[1].parse().unwrap_or(0);
            let skill_type = caps[2].to_lowercase();

            push_unique(&mut analysis.tags, format!("boosts_{}_skills", skill_type));
            push_unique(&mut analysis.tags, "boosts_skill_level");
            analysis.skill_level_boosts.push(SkillLevelBoost {
                skill_types: vec![skill_type],
                bonus,
            });
        }

        if let Some(caps) = ALL_BOOST_RE.captures(raw) {
            let bonus = caps[1].parse().unwrap_or(0);

            push_unique(&mut analysis.tags, "boosts_all_skills");
            push_unique(&mut analysis.tags, "boosts_skill_level");
            analysis.skill_level_boosts.push(SkillLevelBoost {
                skill_types: vec!["all".to_string()],
                bonus,
            });
        }
    }

    fn extract_conditionals(&self, raw: &str, lower: &str, analysis: &mut ModAnalysis) {
        for rule in &self.patterns.condition {
            if !rule.is_match(lower) {
                continue;
            }

            let effect_tags = conditional_effect_tags(lower);

            push_unique(&mut analysis.tags, rule.tag.as_str());
            push_unique(&mut analysis.tags, "conditional");
            for tag in &effect_tags {
                push_unique(&mut analysis.tags, tag.as_str());
            }

            analysis.conditional_mods.push(ConditionalMod {
                condition: rule.tag.clone(),
                effect: clean_mod(raw),
                tags: effect_tags,
            });
        }
    }
}

fn conditional_effect_tags(lower: &str) -> Vec<String> {
    let mut tags: Vec<String> = DAMAGE_WORDS
        .iter()
        .filter(|word| lower.contains(*word))
        .map(|word| word.to_string())
        .collect();

    if MORE_DAMAGE_RE.is_match(lower) {
        tags.push("more_damage".to_string());
    }
    if INCREASED_DAMAGE_RE.is_match(lower) {
        tags.push("increased_damage".to_string());
    }
    tags
}

fn clean_mods(mods: &mut Vec<String>) {
    for m in mods.iter_mut() {
        *m = clean_mod(m);
    }
    mods.retain(|m| !m.is_empty());
}
