//! The permutation-producing reranker abstraction.

use super::types::{Recommendation, RerankError};

/// Identity permutation `[0, 1, .., k-1]`.
pub fn base_perm(k: usize) -> Vec<usize> {
    (0..k).collect()
}

/// A reranker that reorders a recommendation by returning original positions.
///
/// The returned permutation has length `min(cutoff, items.len())` and holds
/// distinct indices into `recommendation.items`.
pub trait PermutationReranker<U, I> {
    /// Maximum output length.
    fn cutoff(&self) -> usize;

    fn rerank_permutation(
        &self,
        recommendation: &Recommendation<U, I>,
    ) -> Result<Vec<usize>, RerankError>;

    /// Rerank and materialize the reordered, truncated recommendation.
    fn rerank_recommendation(
        &self,
        recommendation: &Recommendation<U, I>,
    ) -> Result<Recommendation<U, I>, RerankError>
    where
        U: Clone,
        I: Clone,
    {
        let perm = self.rerank_permutation(recommendation)?;
        let items = perm
            .iter()
            .map(|&idx| recommendation.items[idx].clone())
            .collect();
        Ok(Recommendation::new(recommendation.user.clone(), items))
    }
}
