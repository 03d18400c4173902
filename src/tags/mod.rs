//! Tag extraction from playstyle descriptions
//!
//! This module provides:
//! - `BuildTagSet`, the seven-category extraction result
//! - `PoolSelector` constants declaring which categories each catalog query scores on
//! - `TagExtractor`, the rule-driven text classifier

mod extractor;
mod pool;
mod set;

pub use extractor::{calculate_relevance, TagExtractor};
pub use pool::{PoolSelector, TagPool};
pub use set::{BuildTagSet, TagCategory};
