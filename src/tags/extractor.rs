//! Build tag extraction using PatternRegistry
//!
//! Maps a free-text playstyle description to a `BuildTagSet`. Detectors come
//! from the registry's `[[build]]` rules; none are hardcoded here.

use std::sync::Arc;

use crate::error::Result;
use crate::patterns::PatternRegistry;
use crate::tags::set::BuildTagSet;

/// Stateless tag extractor over pre-compiled detectors
#[derive(Debug, Clone)]
pub struct TagExtractor {
    patterns: Arc<PatternRegistry>,
}

impl TagExtractor {
    /// Create new tag extractor with pattern registry
    pub fn new(patterns: Arc<PatternRegistry>) -> Self {
        Self { patterns }
    }

    /// Extractor over the embedded default rules
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Arc::new(PatternRegistry::builtin()?)))
    }

    pub fn patterns(&self) -> &Arc<PatternRegistry> {
        &self.patterns
    }

    /// Extract tags from a build description
    ///
    /// Never fails: text with no recognised vocabulary yields empty categories.
    pub fn extract(&self, description: &str) -> BuildTagSet {
        let text = description.to_lowercase();
        let mut tags = BuildTagSet::new();

        for rule in &self.patterns.build {
            if !rule.regex.is_match(&text) {
                continue;
            }
            tags.insert(rule.category, rule.tag.as_str());
            for (category, tag) in &rule.bundle {
                tags.insert(*category, tag.as_str());
            }
        }

        tracing::debug!(
            "Extracted {} tags from {} chars of description",
            tags.len(),
            description.len()
        );

        tags
    }
}

/// Share of the build's flattened tags that `entity_tags` hits
///
/// Returns 0.0 for an empty build tag set.
pub fn calculate_relevance<S: AsRef<str>>(entity_tags: &[S], build_tags: &BuildTagSet) -> f32 {
    let all = build_tags.all_tags();
    if all.is_empty() {
        return 0.0;
    }

    let matches = entity_tags
        .iter()
        .filter(|tag| all.contains(&tag.as_ref()))
        .count();

    (matches as f32 / all.len() as f32).min(1.0)
}
