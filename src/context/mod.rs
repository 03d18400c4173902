//! Build context assembly
//!
//! Turns one build request into the bounded per-catalog lists handed to the
//! downstream prompt: extract tags once, run every relevance query, then apply
//! the class hints (attribute narrowing and ascendancy choices).

use serde::{Deserialize, Serialize};

use crate::catalog::{
    find_class, parse_attribute_label, Attribute, CharacterClass, PassiveNode, Rune, Skill,
    SkillType, UniqueItem,
};
use crate::config::LimitsConfig;
use crate::error::{BuildForgeError, Result};
use crate::filtering::RelevanceFilter;
use crate::tags::{BuildTagSet, TagExtractor};

/// Skills with every requirement below this are usable by any class
const GENERIC_REQUIREMENT: u32 = 40;

/// What the user asked for
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildRequest {
    /// Free-text playstyle description
    pub description: String,
    /// Class name ("Monk") or attribute label ("Dex/Int")
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub ascendancy: Option<String>,
}

impl BuildRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_ascendancy(mut self, ascendancy: impl Into<String>) -> Self {
        self.ascendancy = Some(ascendancy.into());
        self
    }
}

/// Significant nodes shown for one ascendancy
#[derive(Debug, Clone, Serialize)]
pub struct AscendancyChoice<'a> {
    pub name: String,
    pub nodes: Vec<&'a PassiveNode>,
}

/// Everything selected for one request
#[derive(Debug, Clone, Serialize)]
pub struct BuildContext<'a> {
    pub description: String,
    pub tags: BuildTagSet,
    /// Flattened relevance view of `tags`
    pub matched_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<&'static CharacterClass>,
    pub active_skills: Vec<&'a Skill>,
    pub support_gems: Vec<&'a Skill>,
    pub unique_items: Vec<&'a UniqueItem>,
    pub passives: Vec<&'a PassiveNode>,
    pub runes: Vec<&'a Rune>,
    pub ascendancies: Vec<AscendancyChoice<'a>>,
}

impl<'a> BuildContext<'a> {
    pub fn keystones(&self) -> impl Iterator<Item = &&'a PassiveNode> {
        self.passives.iter().filter(|n| n.is_keystone)
    }

    pub fn notables(&self) -> impl Iterator<Item = &&'a PassiveNode> {
        self.passives.iter().filter(|n| n.is_notable)
    }
}

/// Runs every relevance query for a request
pub struct ContextBuilder<'a> {
    extractor: &'a TagExtractor,
    filter: RelevanceFilter<'a>,
    limits: &'a LimitsConfig,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(
        extractor: &'a TagExtractor,
        filter: RelevanceFilter<'a>,
        limits: &'a LimitsConfig,
    ) -> Self {
        Self {
            extractor,
            filter,
            limits,
        }
    }

    /// Assemble the context for one request
    ///
    /// Fails only when the description is blank.
    pub fn build(&self, request: &BuildRequest) -> Result<BuildContext<'a>> {
        let description = request.description.trim();
        if description.is_empty() {
            return Err(BuildForgeError::InvalidRequest(
                "Playstyle description must not be empty".to_string(),
            ));
        }

        let tags = self.extractor.extract(description);
        let class = request.class.as_deref().and_then(find_class);
        let attributes = class_attributes(request.class.as_deref(), class);

        let candidates = self.filter.filter_skills(&tags, self.limits.skills);

        let active_skills: Vec<&'a Skill> = candidates
            .iter()
            .copied()
            .filter(|skill| attributes.is_empty() || fits_attributes(skill, &attributes))
            .filter(|skill| {
                matches!(
                    skill.skill_type,
                    SkillType::Attack | SkillType::Spell | SkillType::Minion
                )
            })
            .take(self.limits.active_skills)
            .collect();

        let support_gems = self.support_gems(&candidates, active_skills.first().copied());

        let context = BuildContext {
            description: description.to_string(),
            matched_tags: tags.all_tags().into_iter().map(str::to_string).collect(),
            class,
            active_skills,
            support_gems,
            unique_items: self.filter.filter_unique_items(&tags, self.limits.unique_items),
            passives: self.filter.filter_passives(&tags, self.limits.passives),
            runes: self.filter.filter_runes(&tags, self.limits.runes),
            ascendancies: self.ascendancy_choices(&tags, class, request.ascendancy.as_deref()),
            tags,
        };

        tracing::info!(
            "Assembled context: {} tags, {} actives, {} supports, {} uniques, {} passives, {} runes, {} ascendancies",
            context.matched_tags.len(),
            context.active_skills.len(),
            context.support_gems.len(),
            context.unique_items.len(),
            context.passives.len(),
            context.runes.len(),
            context.ascendancies.len()
        );

        Ok(context)
    }

    /// Supports compatible with the top active skill, else the candidate supports
    fn support_gems(&self, candidates: &[&'a Skill], main: Option<&'a Skill>) -> Vec<&'a Skill> {
        let max = self.limits.support_gems;

        if let Some(main) = main {
            let compatible = self.filter.support_gems(main, max);
            if !compatible.is_empty() {
                return compatible;
            }
            tracing::debug!("No supports share tags with {}, using candidates", main.name);
        }

        candidates
            .iter()
            .copied()
            .filter(|skill| skill.skill_type == SkillType::Support)
            .take(max)
            .collect()
    }

    fn ascendancy_choices(
        &self,
        tags: &BuildTagSet,
        class: Option<&'static CharacterClass>,
        requested: Option<&str>,
    ) -> Vec<AscendancyChoice<'a>> {
        let names: Vec<String> = match (requested, class) {
            (Some(name), _) => vec![name.trim().to_string()],
            (None, Some(class)) => class.ascendancies.iter().map(|a| a.to_string()).collect(),
            (None, None) => Vec::new(),
        };

        names
            .into_iter()
            .map(|name| {
                let mut nodes = self.filter.ascendancy_nodes(&name, Some(tags));
                nodes.truncate(self.limits.ascendancy_nodes);
                AscendancyChoice { name, nodes }
            })
            .collect()
    }
}

/// Class hint to attributes: a known class name, else an attribute label
fn class_attributes(hint: Option<&str>, class: Option<&CharacterClass>) -> Vec<Attribute> {
    match (class, hint) {
        (Some(class), _) => class.attributes(),
        (None, Some(label)) => parse_attribute_label(label),
        (None, None) => Vec::new(),
    }
}

/// Requires any of the attributes, or is generic enough for anyone
fn fits_attributes(skill: &Skill, attributes: &[Attribute]) -> bool {
    attributes
        .iter()
        .any(|a| skill.requirements.get(*a) >= 1)
        || skill
            .requirements
            .values()
            .iter()
            .all(|v| *v < GENERIC_REQUIREMENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttributeRequirements, Catalog, CatalogLoader};
    use crate::patterns::PatternRegistry;
    use std::sync::Arc;

    fn catalog() -> Catalog {
        let loader = CatalogLoader::new(Arc::new(PatternRegistry::builtin().unwrap()));
        Catalog {
            skills: loader
                .skills_from_json(
                    r#"[
                    { "id": "Fireball", "name": "Fireball", "type": "Spell",
                      "tags": ["spell", "fire", "projectile"], "requirements": { "int": 100 } },
                    { "id": "Boneshatter", "name": "Boneshatter", "type": "Attack",
                      "tags": ["attack", "physical", "melee"], "requirements": { "str": 100 } },
                    { "id": "Fork", "name": "Fork", "type": "Support",
                      "tags": ["support", "projectile"], "requirements": { "dex": 50, "int": 50 } },
                    { "id": "Brutality", "name": "Brutality", "type": "Support",
                      "tags": ["support", "physical"], "requirements": { "str": 100 } },
                    { "id": "FlameWall", "name": "Flame Wall", "type": "Spell",
                      "tags": ["spell", "fire"], "requirements": { "int": 60, "str": 40 } }
                ]"#,
                )
                .unwrap(),
            passive_nodes: loader
                .passives_from_json(
                    r#"[
                    { "id": "a1", "name": "Heavy Buffer", "isNotable": true, "ascendancyName": "Stormweaver",
                      "stats": ["Gain Energy Shield"] },
                    { "id": "b1", "name": "Temporal Rift", "isNotable": true, "ascendancyName": "Chronomancer",
                      "stats": ["Cast Speed"] },
                    { "id": "b2", "name": "Apex of the Moment", "isKeystone": true, "ascendancyName": "Chronomancer",
                      "stats": ["Spell damage"] }
                ]"#,
                )
                .unwrap(),
            ..Default::default()
        }
    }

    fn limits() -> LimitsConfig {
        LimitsConfig::default()
    }

    #[test]
    fn test_empty_description_rejected() {
        let catalog = catalog();
        let extractor = TagExtractor::builtin().unwrap();
        let limits = limits();
        let builder = ContextBuilder::new(&extractor, RelevanceFilter::new(&catalog), &limits);

        let err = builder.build(&BuildRequest::new("   ")).unwrap_err();
        assert!(matches!(err, BuildForgeError::InvalidRequest(_)));
    }

    #[test]
    fn test_class_narrows_actives() {
        let catalog = catalog();
        let extractor = TagExtractor::builtin().unwrap();
        let limits = limits();
        let builder = ContextBuilder::new(&extractor, RelevanceFilter::new(&catalog), &limits);

        let request = BuildRequest::new("fire spell caster").with_class("Sorceress");
        let context = builder.build(&request).unwrap();

        let names: Vec<&str> = context.active_skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Fireball", "Flame Wall"]);
        assert_eq!(context.matched_tags, vec!["fire", "spell", "caster"]);
        assert_eq!(context.class.unwrap().name, "Sorceress");
    }

    #[test]
    fn test_supports_follow_top_active() {
        let catalog = catalog();
        let extractor = TagExtractor::builtin().unwrap();
        let limits = limits();
        let builder = ContextBuilder::new(&extractor, RelevanceFilter::new(&catalog), &limits);

        let context = builder.build(&BuildRequest::new("fire spell")).unwrap();
        let supports: Vec<&str> = context.support_gems.iter().map(|s| s.name.as_str()).collect();

        // Fireball is the top active and shares "projectile" with Fork
        assert_eq!(context.active_skills[0].name, "Fireball");
        assert_eq!(supports, vec!["Fork"]);
    }

    #[test]
    fn test_ascendancy_choices_cover_class() {
        let catalog = catalog();
        let extractor = TagExtractor::builtin().unwrap();
        let limits = limits();
        let builder = ContextBuilder::new(&extractor, RelevanceFilter::new(&catalog), &limits);

        let context = builder
            .build(&BuildRequest::new("spell caster").with_class("sorceress"))
            .unwrap();
        let names: Vec<&str> = context.ascendancies.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Stormweaver", "Chronomancer"]);

        // the keystone's "spell" tag ranks it first
        assert_eq!(context.ascendancies[1].nodes[0].id, "b2");

        let requested = builder
            .build(&BuildRequest::new("spell caster").with_ascendancy("Stormweaver"))
            .unwrap();
        assert_eq!(requested.ascendancies.len(), 1);
        assert_eq!(requested.ascendancies[0].nodes.len(), 1);
    }

    #[test]
    fn test_attribute_label_hint() {
        let generic = Skill {
            id: "x".to_string(),
            name: "x".to_string(),
            skill_type: SkillType::Attack,
            tags: vec![],
            tag_string: String::new(),
            requirements: AttributeRequirements {
                strength: 100,
                dexterity: 0,
                intelligence: 0,
            },
            weapon_requirements: None,
            tier: 1,
            gem_family: None,
        };
        let attrs = class_attributes(Some("Dex/Int"), None);

        assert_eq!(attrs, vec![Attribute::Dexterity, Attribute::Intelligence]);
        assert!(!fits_attributes(&generic, &attrs));
        assert!(fits_attributes(&generic, &[Attribute::Strength]));
    }
}
