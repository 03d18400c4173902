// Relevance pools: which tag categories each catalog query scores against
use ahash::{HashSet, HashSetExt};

use crate::tags::set::{BuildTagSet, TagCategory};

/// Named, declared set of categories that make up a query's relevance pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSelector {
    pub name: &'static str,
    pub categories: &'static [TagCategory],
}

impl PoolSelector {
    /// General relevance view (everything but item classes)
    pub const RELEVANCE: Self = Self {
        name: "relevance",
        categories: &[
            TagCategory::DamageTypes,
            TagCategory::SkillTypes,
            TagCategory::DefenseTypes,
            TagCategory::Attributes,
            TagCategory::Mechanics,
            TagCategory::Archetypes,
        ],
    };

    pub const SKILLS: Self = Self {
        name: "skills",
        categories: &[
            TagCategory::DamageTypes,
            TagCategory::SkillTypes,
            TagCategory::Mechanics,
        ],
    };

    pub const UNIQUE_ITEMS: Self = Self {
        name: "unique_items",
        categories: &[
            TagCategory::DamageTypes,
            TagCategory::SkillTypes,
            TagCategory::DefenseTypes,
            TagCategory::Attributes,
            TagCategory::Mechanics,
        ],
    };

    pub const PASSIVES: Self = Self {
        name: "passives",
        categories: &[
            TagCategory::DamageTypes,
            TagCategory::SkillTypes,
            TagCategory::Mechanics,
            TagCategory::DefenseTypes,
            TagCategory::Attributes,
        ],
    };

    pub const ASCENDANCY: Self = Self {
        name: "ascendancy",
        categories: &[
            TagCategory::DamageTypes,
            TagCategory::SkillTypes,
            TagCategory::Mechanics,
        ],
    };

    pub const RUNES: Self = Self {
        name: "runes",
        categories: &[
            TagCategory::DamageTypes,
            TagCategory::SkillTypes,
            TagCategory::Mechanics,
        ],
    };

    pub const SLOT_ITEMS: Self = Self {
        name: "slot_items",
        categories: &[TagCategory::DamageTypes, TagCategory::SkillTypes],
    };

    /// Tags of the selected categories, in category then detection order
    pub fn tags<'a>(&self, set: &'a BuildTagSet) -> impl Iterator<Item = &'a str> + 'a {
        let categories = self.categories;
        categories
            .iter()
            .flat_map(move |c| set.get(*c).iter().map(String::as_str))
    }

    pub fn select<'a>(&self, set: &'a BuildTagSet) -> TagPool<'a> {
        TagPool::from_tags(self.tags(set))
    }
}

/// Flattened tag pool with O(1) membership
#[derive(Debug, Clone)]
pub struct TagPool<'a> {
    members: HashSet<&'a str>,
}

impl<'a> TagPool<'a> {
    pub fn from_tags(tags: impl IntoIterator<Item = &'a str>) -> Self {
        let mut members = HashSet::new();
        members.extend(tags);
        Self { members }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.members.contains(tag)
    }

    /// Number of `tags` found in the pool (duplicates in `tags` count each time)
    pub fn count_matches<S: AsRef<str>>(&self, tags: &[S]) -> u32 {
        tags.iter().filter(|t| self.contains(t.as_ref())).count() as u32
    }

    pub fn any_match<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().any(|t| self.contains(t.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BuildTagSet {
        let mut tags = BuildTagSet::new();
        tags.insert(TagCategory::DamageTypes, "cold");
        tags.insert(TagCategory::SkillTypes, "spell");
        tags.insert(TagCategory::DefenseTypes, "es");
        tags.insert(TagCategory::Attributes, "intelligence");
        tags.insert(TagCategory::Mechanics, "freeze");
        tags.insert(TagCategory::Archetypes, "caster");
        tags.insert(TagCategory::ItemClasses, "amulet");
        tags
    }

    #[test]
    fn test_selectors_pick_declared_categories() {
        let tags = sample();

        let skills: Vec<&str> = PoolSelector::SKILLS.tags(&tags).collect();
        assert_eq!(skills, vec!["cold", "spell", "freeze"]);

        let slot: Vec<&str> = PoolSelector::SLOT_ITEMS.tags(&tags).collect();
        assert_eq!(slot, vec!["cold", "spell"]);

        let passives: Vec<&str> = PoolSelector::PASSIVES.tags(&tags).collect();
        assert_eq!(
            passives,
            vec!["cold", "spell", "freeze", "es", "intelligence"]
        );
    }

    #[test]
    fn test_no_selector_uses_item_classes() {
        let all = [
            PoolSelector::RELEVANCE,
            PoolSelector::SKILLS,
            PoolSelector::UNIQUE_ITEMS,
            PoolSelector::PASSIVES,
            PoolSelector::ASCENDANCY,
            PoolSelector::RUNES,
            PoolSelector::SLOT_ITEMS,
        ];
        for selector in all {
            assert!(!selector.categories.contains(&TagCategory::ItemClasses));
        }
    }

    #[test]
    fn test_pool_matching() {
        let tags = sample();
        let pool = PoolSelector::SKILLS.select(&tags);

        assert_eq!(pool.len(), 3);
        assert!(pool.contains("freeze"));
        assert!(!pool.contains("es"));
        assert_eq!(pool.count_matches(&["cold", "fire", "spell"]), 2);
        assert!(!pool.any_match(&["fire"]));
    }

    #[test]
    fn test_empty_pool() {
        let tags = BuildTagSet::default();
        let pool = PoolSelector::RUNES.select(&tags);
        assert!(pool.is_empty());
        assert_eq!(pool.count_matches(&["fire"]), 0);
    }
}
