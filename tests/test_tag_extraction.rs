// Integration tests for build tag extraction with the shipped rule set
use buildforge::patterns::PatternRegistry;
use buildforge::tags::{calculate_relevance, BuildTagSet, TagCategory, TagExtractor};
use std::path::PathBuf;
use std::sync::Arc;

fn shipped_rules() -> Arc<PatternRegistry> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("config-templates")
        .join("tag_rules.toml");
    Arc::new(PatternRegistry::from_config_file(&path).unwrap())
}

#[test]
fn test_template_file_matches_embedded_rules() {
    let from_file = shipped_rules();
    let builtin = PatternRegistry::builtin().unwrap();

    assert_eq!(from_file.build.len(), builtin.build.len());
    assert_eq!(from_file.condition.len(), builtin.condition.len());
}

#[test]
fn test_fire_spellcaster_with_crit() {
    let extractor = TagExtractor::new(shipped_rules());
    let tags = extractor.extract("a fire-based spellcaster with crit");

    assert_eq!(tags.damage_types, vec!["fire"]);
    assert_eq!(tags.skill_types, vec!["spell"]);
    assert_eq!(tags.mechanics, vec!["crit"]);
    assert_eq!(tags.archetypes, vec!["caster"]);
    assert!(tags.defense_types.is_empty());
    assert!(tags.attributes.is_empty());
    assert!(tags.item_classes.is_empty());
}

#[test]
fn test_empty_description_yields_empty_categories() {
    let extractor = TagExtractor::new(shipped_rules());
    let tags = extractor.extract("");

    for category in TagCategory::ALL {
        assert!(tags.get(category).is_empty(), "{} not empty", category);
    }
}

#[test]
fn test_nature_theme_bundle() {
    let extractor = TagExtractor::new(shipped_rules());
    let tags = extractor.extract("thorny nature vine build");

    assert!(tags.contains(TagCategory::Mechanics, "poison"));
    assert!(tags.contains(TagCategory::DamageTypes, "chaos"));
    assert!(tags.contains(TagCategory::DamageTypes, "physical"));
    assert!(tags.contains(TagCategory::Attributes, "dexterity"));
}

#[test]
fn test_many_categories_from_one_description() {
    let extractor = TagExtractor::new(shipped_rules());
    let tags = extractor.extract("ranged crit bow build");

    assert_eq!(tags.attributes, vec!["dexterity"]);
    assert_eq!(tags.mechanics, vec!["crit"]);
    assert_eq!(tags.archetypes, vec!["ranged"]);
    assert_eq!(tags.item_classes, vec!["weapon"]);
}

#[test]
fn test_extraction_is_deterministic() {
    let extractor = TagExtractor::new(shipped_rules());
    let text = "Tanky minion summoner with curses, auras and a big shield";

    let first = extractor.extract(text);
    let second = extractor.extract(text);
    assert_eq!(first, second);
    assert!(first.contains(TagCategory::SkillTypes, "minion"));
    assert!(first.contains(TagCategory::Archetypes, "summoner"));
    assert!(first.contains(TagCategory::Archetypes, "tank"));
    assert!(first.contains(TagCategory::Mechanics, "curse"));
    assert!(first.contains(TagCategory::Mechanics, "aura"));
}

#[test]
fn test_all_tags_never_contains_item_classes() {
    let extractor = TagExtractor::new(shipped_rules());
    let tags = extractor.extract("lightning ring amulet belt boots helmet");

    assert!(!tags.item_classes.is_empty());
    let all = tags.all_tags();
    assert_eq!(all, vec!["lightning"]);
    for item_class in &tags.item_classes {
        assert!(!all.contains(&item_class.as_str()));
    }
}

#[test]
fn test_relevance_against_extracted_tags() {
    let extractor = TagExtractor::new(shipped_rules());
    let tags = extractor.extract("cold nova");
    // "nova" implies spell but not the caster archetype
    assert_eq!(tags.all_tags(), vec!["cold", "spell"]);

    assert_eq!(calculate_relevance(&["cold", "spell", "aoe"], &tags), 1.0);
    assert_eq!(calculate_relevance(&["cold"], &tags), 0.5);
    assert_eq!(calculate_relevance(&["fire"], &tags), 0.0);
    assert_eq!(calculate_relevance(&["cold"], &BuildTagSet::default()), 0.0);
}
