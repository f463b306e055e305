//! Input/output types shared by every reranker.

use serde::{Deserialize, Serialize};

/// A candidate item with the relevance score assigned by the base recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem<I> {
    pub id: I,
    pub score: f64,
}

impl<I> ScoredItem<I> {
    pub fn new(id: I, score: f64) -> Self {
        Self { id, score }
    }
}

/// A user's candidate list, sorted by descending score upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation<U, I> {
    pub user: U,
    pub items: Vec<ScoredItem<I>>,
}

impl<U, I> Recommendation<U, I> {
    pub fn new(user: U, items: Vec<ScoredItem<I>>) -> Self {
        Self { user, items }
    }

    /// Reject scores that would corrupt normalization or aspect probabilities.
    pub fn validate(&self) -> Result<(), RerankError> {
        for (position, item) in self.items.iter().enumerate() {
            if !item.score.is_finite() || item.score < 0.0 {
                return Err(RerankError::InvalidScore {
                    position,
                    score: item.score,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RerankError {
    #[error("invalid relevance score {score} at position {position}; scores must be finite and >= 0")]
    InvalidScore { position: usize, score: f64 },
    #[error("novelty strategy produced non-finite value {novelty} at position {position}")]
    NonFiniteNovelty { position: usize, novelty: f64 },
    #[error("selection index {index} out of range for {remaining} remaining items")]
    SelectionOutOfRange { index: usize, remaining: usize },
}
