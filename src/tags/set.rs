// Seven-category tag set produced by build text analysis
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tags::pool::PoolSelector;

/// One of the seven independent tag categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    DamageTypes,
    SkillTypes,
    DefenseTypes,
    Attributes,
    Mechanics,
    Archetypes,
    ItemClasses,
}

impl TagCategory {
    pub const ALL: [TagCategory; 7] = [
        TagCategory::DamageTypes,
        TagCategory::SkillTypes,
        TagCategory::DefenseTypes,
        TagCategory::Attributes,
        TagCategory::Mechanics,
        TagCategory::Archetypes,
        TagCategory::ItemClasses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagCategory::DamageTypes => "damage_types",
            TagCategory::SkillTypes => "skill_types",
            TagCategory::DefenseTypes => "defense_types",
            TagCategory::Attributes => "attributes",
            TagCategory::Mechanics => "mechanics",
            TagCategory::Archetypes => "archetypes",
            TagCategory::ItemClasses => "item_classes",
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured tags extracted from a playstyle description
///
/// Each category holds lowercase tags at most once, in first-detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildTagSet {
    /// fire, cold, lightning, chaos, physical
    pub damage_types: Vec<String>,
    /// attack, spell, minion, totem, trap
    pub skill_types: Vec<String>,
    /// armor, evasion, es, life, mana
    pub defense_types: Vec<String>,
    /// strength, dexterity, intelligence
    pub attributes: Vec<String>,
    /// crit, poison, bleed, ignite, freeze, shock, curse, aura
    pub mechanics: Vec<String>,
    /// melee, ranged, summoner, tank, caster
    pub archetypes: Vec<String>,
    /// ring, amulet, belt, helmet, body, gloves, boots, weapon, shield
    pub item_classes: Vec<String>,
}

impl BuildTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: TagCategory) -> &[String] {
        match category {
            TagCategory::DamageTypes => &self.damage_types,
            TagCategory::SkillTypes => &self.skill_types,
            TagCategory::DefenseTypes => &self.defense_types,
            TagCategory::Attributes => &self.attributes,
            TagCategory::Mechanics => &self.mechanics,
            TagCategory::Archetypes => &self.archetypes,
            TagCategory::ItemClasses => &self.item_classes,
        }
    }

    fn get_mut(&mut self, category: TagCategory) -> &mut Vec<String> {
        match category {
            TagCategory::DamageTypes => &mut self.damage_types,
            TagCategory::SkillTypes => &mut self.skill_types,
            TagCategory::DefenseTypes => &mut self.defense_types,
            TagCategory::Attributes => &mut self.attributes,
            TagCategory::Mechanics => &mut self.mechanics,
            TagCategory::Archetypes => &mut self.archetypes,
            TagCategory::ItemClasses => &mut self.item_classes,
        }
    }

    /// Add a tag to a category; returns false if it was already present
    pub fn insert(&mut self, category: TagCategory, tag: impl Into<String>) -> bool {
        let tag = tag.into().to_lowercase();
        let tags = self.get_mut(category);
        if tags.contains(&tag) {
            return false;
        }
        tags.push(tag);
        true
    }

    pub fn contains(&self, category: TagCategory, tag: &str) -> bool {
        self.get(category).iter().any(|t| t == tag)
    }

    /// True when every category is empty
    pub fn is_empty(&self) -> bool {
        TagCategory::ALL.iter().all(|c| self.get(*c).is_empty())
    }

    /// Total number of tags across all seven categories
    pub fn len(&self) -> usize {
        TagCategory::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    /// Flattened general-relevance view: every category except item classes
    pub fn all_tags(&self) -> Vec<&str> {
        PoolSelector::RELEVANCE.tags(self).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_deduplicates_and_lowercases() {
        let mut tags = BuildTagSet::new();

        assert!(tags.insert(TagCategory::Mechanics, "Poison"));
        assert!(!tags.insert(TagCategory::Mechanics, "poison"));
        assert!(tags.insert(TagCategory::Mechanics, "crit"));

        assert_eq!(tags.mechanics, vec!["poison", "crit"]);
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_all_tags_excludes_item_classes() {
        let mut tags = BuildTagSet::new();
        tags.insert(TagCategory::DamageTypes, "fire");
        tags.insert(TagCategory::Archetypes, "caster");
        tags.insert(TagCategory::ItemClasses, "ring");

        assert_eq!(tags.all_tags(), vec!["fire", "caster"]);
    }

    #[test]
    fn test_all_tags_category_order() {
        let mut tags = BuildTagSet::new();
        tags.insert(TagCategory::Archetypes, "tank");
        tags.insert(TagCategory::Mechanics, "aura");
        tags.insert(TagCategory::Attributes, "strength");
        tags.insert(TagCategory::DefenseTypes, "armor");
        tags.insert(TagCategory::SkillTypes, "attack");
        tags.insert(TagCategory::DamageTypes, "physical");

        assert_eq!(
            tags.all_tags(),
            vec!["physical", "attack", "armor", "strength", "aura", "tank"]
        );
    }

    #[test]
    fn test_empty_set() {
        let tags = BuildTagSet::default();
        assert!(tags.is_empty());
        assert!(tags.all_tags().is_empty());
    }

    #[test]
    fn test_serializes_snake_case_categories() {
        let mut tags = BuildTagSet::new();
        tags.insert(TagCategory::ItemClasses, "boots");
        let json = serde_json::to_value(&tags).unwrap();

        assert_eq!(json["item_classes"][0], "boots");
        assert!(json["damage_types"].as_array().unwrap().is_empty());
    }
}
