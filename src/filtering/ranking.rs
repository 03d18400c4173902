// Shared scoring and ranking helpers for catalog filters
use serde::Serialize;

/// What to do with entities that scored nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroScore {
    /// Exclude zero scores from the result
    Drop,
    /// Keep them, ranked after everything that matched
    Keep,
}

/// Entity paired with its relevance score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scored<T> {
    pub item: T,
    pub score: u32,
}

impl<T> Scored<T> {
    pub fn new(item: T, score: u32) -> Self {
        Self { item, score }
    }
}

/// Sort by score descending and truncate
///
/// The sort is stable: equal scores keep their input (catalog) order.
pub fn rank<T>(mut scored: Vec<Scored<T>>, zero: ZeroScore, max: Option<usize>) -> Vec<Scored<T>> {
    if zero == ZeroScore::Drop {
        scored.retain(|s| s.score > 0);
    }

    scored.sort_by(|a, b| b.score.cmp(&a.score));

    if let Some(max) = max {
        scored.truncate(max);
    }
    scored
}

/// `rank` without the scores
pub fn rank_items<T>(scored: Vec<Scored<T>>, zero: ZeroScore, max: Option<usize>) -> Vec<T> {
    rank(scored, zero, max)
        .into_iter()
        .map(|s| s.item)
        .collect()
}
