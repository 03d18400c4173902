//! JSON catalog loading with load-time normalization
//!
//! Reads the four pre-extracted catalogs and runs every entity through the
//! `CatalogTagger` once, so filters never see missing or unnormalized tags.

use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::tagging::CatalogTagger;
use crate::catalog::types::{PassiveNode, Rune, Skill, UniqueItem};
use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::error::{BuildForgeError, Result};
use crate::patterns::PatternRegistry;

/// Attribute requirements are percentages
const MAX_REQUIREMENT: u32 = 100;

pub struct CatalogLoader {
    tagger: CatalogTagger,
}

impl CatalogLoader {
    pub fn new(patterns: Arc<PatternRegistry>) -> Self {
        Self {
            tagger: CatalogTagger::new(patterns),
        }
    }

    /// Load and normalize all four catalogs from the configured directory
    pub fn load(&self, config: &CatalogConfig) -> Result<Catalog> {
        let start = Instant::now();

        let skills = self.skills_from_json(&read_catalog(&config.skills_path())?)?;
        let unique_items = self.uniques_from_json(&read_catalog(&config.uniques_path())?)?;
        let passive_nodes = self.passives_from_json(&read_catalog(&config.passives_path())?)?;
        let runes = self.runes_from_json(&read_catalog(&config.runes_path())?)?;

        let catalog = Catalog {
            skills,
            unique_items,
            passive_nodes,
            runes,
        };

        tracing::info!(
            "Loaded catalogs from {:?}: {} skills, {} uniques, {} passive nodes, {} runes in {}ms",
            config.data_dir,
            catalog.skills.len(),
            catalog.unique_items.len(),
            catalog.passive_nodes.len(),
            catalog.runes.len(),
            start.elapsed().as_millis()
        );

        Ok(catalog)
    }

    pub fn skills_from_json(&self, json: &str) -> Result<Vec<Skill>> {
        let mut skills: Vec<Skill> = parse(json, "skills")?;
        for skill in &mut skills {
            let req = &mut skill.requirements;
            req.strength = req.strength.min(MAX_REQUIREMENT);
            req.dexterity = req.dexterity.min(MAX_REQUIREMENT);
            req.intelligence = req.intelligence.min(MAX_REQUIREMENT);
            self.tagger.tag_skill(skill);
        }
        Ok(skills)
    }

    pub fn uniques_from_json(&self, json: &str) -> Result<Vec<UniqueItem>> {
        let mut items: Vec<UniqueItem> = parse(json, "unique items")?;
        for item in &mut items {
            item.item_class = item.item_class.trim().to_lowercase();
            self.tagger.tag_unique(item);
        }

        let untagged = items.iter().filter(|i| i.tags.is_empty()).count();
        if untagged > 0 {
            tracing::debug!("{} unique items carry no tags", untagged);
        }
        Ok(items)
    }

    pub fn passives_from_json(&self, json: &str) -> Result<Vec<PassiveNode>> {
        let mut nodes: Vec<PassiveNode> = parse(json, "passive nodes")?;
        for node in &mut nodes {
            self.tagger.tag_passive(node);
        }
        Ok(nodes)
    }

    pub fn runes_from_json(&self, json: &str) -> Result<Vec<Rune>> {
        let mut runes: Vec<Rune> = parse(json, "runes")?;
        for rune in &mut runes {
            self.tagger.tag_rune(rune);
        }
        Ok(runes)
    }
}

fn read_catalog(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(BuildForgeError::CatalogNotFound {
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|e| BuildForgeError::Io {
        source: e,
        context: format!("Failed to read catalog: {:?}", path),
    })
}

fn parse<T: DeserializeOwned>(json: &str, what: &str) -> Result<Vec<T>> {
    serde_json::from_str(json).map_err(|e| BuildForgeError::Json {
        source: e,
        context: format!("Failed to parse {} catalog", what),
    })
}
