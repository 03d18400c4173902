//! Game-data catalogs
//!
//! This module provides:
//! - Entity shapes for skills, unique items, passive nodes and runes
//! - JSON loading with load-time tag normalization
//! - The static character class table
//! - Read-only lookup helpers over the loaded catalogs

mod classes;
mod loader;
mod tagging;
mod types;

pub use classes::{find_class, parse_attribute_label, CharacterClass, CLASSES};
pub use loader::CatalogLoader;
pub use tagging::{clean_mod, normalize_tags, slugify, CatalogTagger, ModAnalysis, MAX_IMPLICITS};
pub use types::{
    Attribute, AttributeRequirements, ConditionalMod, ItemVariant, PassiveNode, Position, Rune,
    RuneSlot, Skill, SkillGrant, SkillLevelBoost, SkillType, UniqueItem,
};

/// The four loaded catalogs; never mutated after loading
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub skills: Vec<Skill>,
    pub unique_items: Vec<UniqueItem>,
    pub passive_nodes: Vec<PassiveNode>,
    pub runes: Vec<Rune>,
}

impl Catalog {
    pub fn skill_by_id(&self, id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    /// Case-insensitive name lookup
    pub fn skill_by_name(&self, name: &str) -> Option<&Skill> {
        self.skills
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Attack and Spell skills, catalog order
    pub fn active_skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter().filter(|s| s.skill_type.is_active())
    }

    pub fn skills_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Skill> + 'a {
        self.skills.iter().filter(move |s| has_tag(&s.tags, tag))
    }

    pub fn uniques_by_class<'a>(
        &'a self,
        item_class: &'a str,
    ) -> impl Iterator<Item = &'a UniqueItem> + 'a {
        self.unique_items
            .iter()
            .filter(move |i| i.item_class.eq_ignore_ascii_case(item_class))
    }

    pub fn uniques_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a UniqueItem> + 'a {
        self.unique_items.iter().filter(move |i| has_tag(&i.tags, tag))
    }

    pub fn uniques_in_league<'a>(
        &'a self,
        league: &'a str,
    ) -> impl Iterator<Item = &'a UniqueItem> + 'a {
        self.unique_items.iter().filter(move |i| {
            i.league
                .as_deref()
                .is_some_and(|l| l.eq_ignore_ascii_case(league))
        })
    }

    /// Uniques whose granted skills include `skill_name` (case-insensitive)
    pub fn uniques_granting<'a>(
        &'a self,
        skill_name: &'a str,
    ) -> impl Iterator<Item = &'a UniqueItem> + 'a {
        self.unique_items.iter().filter(move |i| {
            i.granted_skills
                .iter()
                .any(|g| g.skill_name.eq_ignore_ascii_case(skill_name))
        })
    }

    /// Uniques boosting `skill_type` levels; "+N to all Skills" boosts count too
    pub fn uniques_boosting<'a>(
        &'a self,
        skill_type: &'a str,
    ) -> impl Iterator<Item = &'a UniqueItem> + 'a {
        self.unique_items.iter().filter(move |i| {
            i.skill_level_boosts.iter().any(|b| {
                b.skill_types
                    .iter()
                    .any(|t| t == "all" || t.eq_ignore_ascii_case(skill_type))
            })
        })
    }

    /// Substring search over name, base type and mods
    pub fn search_uniques(&self, query: &str) -> Vec<&UniqueItem> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.unique_items
            .iter()
            .filter(|i| {
                i.name.to_lowercase().contains(&query)
                    || i.base_type.to_lowercase().contains(&query)
                    || i.all_mods().any(|m| m.to_lowercase().contains(&query))
            })
            .collect()
    }

    pub fn keystones(&self) -> impl Iterator<Item = &PassiveNode> {
        self.passive_nodes.iter().filter(|n| n.is_keystone)
    }

    /// Every node owned by the ascendancy, significant or not
    pub fn nodes_of_ascendancy<'a>(
        &'a self,
        ascendancy: &'a str,
    ) -> impl Iterator<Item = &'a PassiveNode> + 'a {
        self.passive_nodes
            .iter()
            .filter(move |n| n.belongs_to(ascendancy))
    }

    /// Runes with at least one stat line for the slot
    pub fn runes_for_slot<'a>(&'a self, slot: &'a str) -> impl Iterator<Item = &'a Rune> + 'a {
        self.runes
            .iter()
            .filter(move |r| !r.stats_for(slot).is_empty())
    }
}

fn has_tag(tags: &[String], tag: &str) -> bool {
    tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        let loader = CatalogLoader::new(std::sync::Arc::new(
            crate::patterns::PatternRegistry::builtin().unwrap(),
        ));

        Catalog {
            skills: loader
                .skills_from_json(
                    r#"[
                    { "id": "Fireball", "name": "Fireball", "type": "Spell", "tags": ["spell", "fire"] },
                    { "id": "Boneshatter", "name": "Boneshatter", "type": "Attack", "tags": ["attack", "melee"] },
                    { "id": "Inspiration", "name": "Inspiration", "type": "Support", "tags": ["support"] }
                ]"#,
                )
                .unwrap(),
            unique_items: loader
                .uniques_from_json(
                    r#"[
                    { "name": "The Whispering Ice", "baseType": "Vile Staff", "itemClass": "weapon",
                      "explicits": ["Grants Skill: Level (1-20) Icestorm", "+1 to Level of all Skills"] },
                    { "name": "Kalandra's Touch", "itemClass": "ring", "league": "Dawn",
                      "explicits": ["+2 to Level of all Minion Skills"] }
                ]"#,
                )
                .unwrap(),
            passive_nodes: loader
                .passives_from_json(
                    r#"[
                    { "id": "1", "name": "Resolute Technique", "isKeystone": true },
                    { "id": "2", "name": "Far Shot", "isNotable": true, "ascendancyName": "Deadeye" },
                    { "id": "3", "name": "Minor", "ascendancyName": "Deadeye" }
                ]"#,
                )
                .unwrap(),
            runes: loader
                .runes_from_json(
                    r#"[
                    { "name": "Desert Rune", "slots": { "weapon": { "stats": ["Adds 7 to 11 Fire Damage"] } } }
                ]"#,
                )
                .unwrap(),
        }
    }

    #[test]
    fn test_skill_lookups() {
        let catalog = sample();

        assert_eq!(catalog.skill_by_name("fireball").unwrap().id, "Fireball");
        assert!(catalog.skill_by_id("Missing").is_none());
        assert_eq!(catalog.active_skills().count(), 2);
        assert_eq!(catalog.skills_with_tag("melee").count(), 1);
    }

    #[test]
    fn test_unique_lookups() {
        let catalog = sample();

        assert_eq!(catalog.uniques_by_class("Ring").count(), 1);
        assert_eq!(catalog.uniques_in_league("dawn").count(), 1);
        assert_eq!(
            catalog.uniques_granting("icestorm").next().unwrap().name,
            "The Whispering Ice"
        );

        // "+1 to all Skills" counts for every skill type
        let minion: Vec<&str> = catalog
            .uniques_boosting("minion")
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(minion, vec!["The Whispering Ice", "Kalandra's Touch"]);

        assert_eq!(catalog.search_uniques("staff").len(), 1);
        assert!(catalog.search_uniques("  ").is_empty());
    }

    #[test]
    fn test_passive_and_rune_lookups() {
        let catalog = sample();

        assert_eq!(catalog.keystones().count(), 1);
        assert_eq!(catalog.nodes_of_ascendancy("Deadeye").count(), 2);
        assert_eq!(catalog.runes_for_slot("weapon").count(), 1);
        assert_eq!(catalog.runes_for_slot("armour").count(), 0);
    }
}
