//! Greedy, position-by-position permutation construction.
//!
//! ```text
//! Init:      pool = candidates, reranked = []
//! Select:    idx = user_reranker.select_item(user, pool, reranked)
//!            perm.push(original position of pool[idx])
//!            reranked.push(pool.remove(idx))
//! Terminate: pool empty or perm.len() == cutoff
//! ```
//!
//! Removal keeps the pool in its current order, so a selector that breaks
//! ties by lowest index is deterministic across runs.

use tracing::trace;

use super::types::{Recommendation, RerankError, ScoredItem};

/// Per-user selection state supplied by a diversification policy.
pub trait UserReranker<U, I> {
    /// Pick the next item to place. Returns an index into `remaining`.
    fn select_item(
        &mut self,
        user: &U,
        remaining: &[&ScoredItem<I>],
        reranked: &[&ScoredItem<I>],
    ) -> Result<usize, RerankError>;
}

/// Drives a [`UserReranker`] until the cutoff or the candidate pool is exhausted.
#[derive(Debug, Clone, Copy)]
pub struct GreedyReranker {
    cutoff: usize,
}

impl GreedyReranker {
    pub fn new(cutoff: usize) -> Self {
        Self { cutoff }
    }

    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    pub fn rerank<U, I, R>(
        &self,
        recommendation: &Recommendation<U, I>,
        mut user_reranker: R,
    ) -> Result<Vec<usize>, RerankError>
    where
        R: UserReranker<U, I>,
    {
        let n = self.cutoff.min(recommendation.items.len());
        let mut positions: Vec<usize> = (0..recommendation.items.len()).collect();
        let mut pool: Vec<&ScoredItem<I>> = recommendation.items.iter().collect();
        let mut reranked: Vec<&ScoredItem<I>> = Vec::with_capacity(n);
        let mut perm = Vec::with_capacity(n);

        while perm.len() < n && !pool.is_empty() {
            let idx = user_reranker.select_item(&recommendation.user, &pool, &reranked)?;
            if idx >= pool.len() {
                return Err(RerankError::SelectionOutOfRange {
                    index: idx,
                    remaining: pool.len(),
                });
            }
            let position = positions.remove(idx);
            let item = pool.remove(idx);
            trace!(step = perm.len(), position, "greedy selection");
            perm.push(position);
            reranked.push(item);
        }

        Ok(perm)
    }
}
