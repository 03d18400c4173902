// Relevance filtering over the loaded catalogs
//
// Every query builds a tag pool from a declared PoolSelector, scores the
// eligible entities, then ranks them stably. Queries differ in their
// empty-pool fallback and in whether zero scores survive.

mod ranking;

pub use ranking::{rank, rank_items, Scored, ZeroScore};

use crate::catalog::{Catalog, PassiveNode, Rune, Skill, SkillType, UniqueItem};
use crate::tags::{BuildTagSet, PoolSelector};

const SKILL_TAG_WEIGHT: u32 = 3;
const SKILL_TYPE_BONUS: u32 = 5;
const ACTIVE_SKILL_BONUS: u32 = 1;
const SUPPORT_TAG_WEIGHT: u32 = 2;
const UNIQUE_TAG_WEIGHT: u32 = 2;
const UNIQUE_CLASS_BONUS: u32 = 3;
const ASCENDANCY_PASSIVE_WEIGHT: u32 = 10;
const KEYSTONE_WEIGHT: u32 = 5;
const NOTABLE_WEIGHT: u32 = 2;
const ASCENDANCY_NODE_WEIGHT: u32 = 3;

/// Read-only scoring view over a catalog
///
/// Holds no state of its own; build one per request or share it freely.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceFilter<'a> {
    catalog: &'a Catalog,
}

impl<'a> RelevanceFilter<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Skills ranked against damage, skill-type and mechanic tags
    ///
    /// With nothing to score against, returns the first `max` Attack or
    /// Spell skills in catalog order.
    pub fn filter_skills(&self, tags: &BuildTagSet, max: usize) -> Vec<&'a Skill> {
        let pool = PoolSelector::SKILLS.select(tags);

        if pool.is_empty() {
            tracing::debug!("Skill pool empty, falling back to first {} actives", max);
            return self.catalog.active_skills().take(max).collect();
        }

        let scored = self
            .catalog
            .skills
            .iter()
            .map(|skill| {
                let mut score = SKILL_TAG_WEIGHT * pool.count_matches(&skill.tags);
                if tags.skill_types.iter().any(|t| t == skill.skill_type.tag()) {
                    score += SKILL_TYPE_BONUS;
                }
                if skill.skill_type.is_active() {
                    score += ACTIVE_SKILL_BONUS;
                }
                Scored::new(skill, score)
            })
            .collect();

        let ranked = rank_items(scored, ZeroScore::Drop, Some(max));
        tracing::debug!(
            "Ranked {} of {} skills against {} tags",
            ranked.len(),
            self.catalog.skills.len(),
            pool.len()
        );
        ranked
    }

    /// Support gems sharing tags with `main_skill`; no fallback
    pub fn support_gems(&self, main_skill: &Skill, max: usize) -> Vec<&'a Skill> {
        let scored = self
            .catalog
            .skills
            .iter()
            .filter(|skill| skill.skill_type == SkillType::Support)
            .map(|gem| {
                let shared = gem
                    .tags
                    .iter()
                    .filter(|tag| main_skill.tags.contains(tag))
                    .count() as u32;
                Scored::new(gem, SUPPORT_TAG_WEIGHT * shared)
            })
            .collect();

        rank_items(scored, ZeroScore::Drop, Some(max))
    }

    /// Unique items; an empty pool returns the first `max` items unscored
    pub fn filter_unique_items(&self, tags: &BuildTagSet, max: usize) -> Vec<&'a UniqueItem> {
        let pool = PoolSelector::UNIQUE_ITEMS.select(tags);

        if pool.is_empty() {
            return self.catalog.unique_items.iter().take(max).collect();
        }

        let scored = self
            .catalog
            .unique_items
            .iter()
            .map(|item| {
                let mut score = UNIQUE_TAG_WEIGHT * pool.count_matches(&item.tags);
                if tags.item_classes.contains(&item.item_class) {
                    score += UNIQUE_CLASS_BONUS;
                }
                Scored::new(item, score)
            })
            .collect();

        rank_items(scored, ZeroScore::Drop, Some(max))
    }

    /// Notables and keystones; ascendancy nodes outrank keystones, which outrank notables
    pub fn filter_passives(&self, tags: &BuildTagSet, max: usize) -> Vec<&'a PassiveNode> {
        let pool = PoolSelector::PASSIVES.select(tags);

        if pool.is_empty() {
            return Vec::new();
        }

        let scored = self
            .catalog
            .passive_nodes
            .iter()
            .map(|node| {
                if !node.is_significant() {
                    return Scored::new(node, 0);
                }
                let weight = if node.ascendancy_name.is_some() {
                    ASCENDANCY_PASSIVE_WEIGHT
                } else if node.is_keystone {
                    KEYSTONE_WEIGHT
                } else {
                    NOTABLE_WEIGHT
                };
                Scored::new(node, weight * pool.count_matches(&node.tags))
            })
            .collect();

        rank_items(scored, ZeroScore::Drop, Some(max))
    }

    /// Significant nodes of one ascendancy, never hidden for scoring zero
    ///
    /// Without tags the catalog order is kept; with tags nodes are ranked
    /// but none are dropped and the list is not truncated.
    pub fn ascendancy_nodes(
        &self,
        ascendancy: &str,
        tags: Option<&BuildTagSet>,
    ) -> Vec<&'a PassiveNode> {
        let nodes = self
            .catalog
            .passive_nodes
            .iter()
            .filter(|node| node.belongs_to(ascendancy) && node.is_significant());

        let Some(tags) = tags else {
            return nodes.collect();
        };

        let pool = PoolSelector::ASCENDANCY.select(tags);
        let scored = nodes
            .map(|node| Scored::new(node, ASCENDANCY_NODE_WEIGHT * pool.count_matches(&node.tags)))
            .collect();

        rank_items(scored, ZeroScore::Keep, None)
    }

    /// Runes with any tag in the pool, catalog order; an empty pool selects nothing
    pub fn filter_runes(&self, tags: &BuildTagSet, max: usize) -> Vec<&'a Rune> {
        let pool = PoolSelector::RUNES.select(tags);

        if pool.is_empty() {
            return Vec::new();
        }

        self.catalog
            .runes
            .iter()
            .filter(|rune| pool.any_match(&rune.tags))
            .take(max)
            .collect()
    }

    /// Unique items of one slot, optionally ranked by damage and skill-type overlap
    pub fn items_by_slot(
        &self,
        slot: &str,
        tags: Option<&BuildTagSet>,
        max: usize,
    ) -> Vec<&'a UniqueItem> {
        let items = self
            .catalog
            .unique_items
            .iter()
            .filter(|item| item.item_class == slot);

        let Some(tags) = tags else {
            return items.take(max).collect();
        };

        let pool = PoolSelector::SLOT_ITEMS.select(tags);
        let scored = items
            .map(|item| Scored::new(item, pool.count_matches(&item.tags)))
            .collect();

        rank_items(scored, ZeroScore::Keep, Some(max))
    }
}
