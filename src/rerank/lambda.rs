//! Lambda-weighted relevance/novelty tradeoff.
//!
//! At every greedy step each remaining item is scored as
//!
//! ```text
//! value(i) = (1 - λ) · norm(rel(i)) + λ · norm(nov(i))
//! norm(x)  = (x - mean) / sd      when normalization is on and sd > 0
//!          = 0                    when normalization is on and sd == 0
//!          = x                    otherwise
//! ```
//!
//! where the mean and standard deviation are taken over the items still in the
//! pool at that step. The novelty signal is pluggable through [`NoveltyModel`].

use tracing::debug;

use super::greedy::{GreedyReranker, UserReranker};
use super::permutation::{base_perm, PermutationReranker};
use super::types::{Recommendation, RerankError, ScoredItem};
use crate::stats::Stats;

/// A diversification strategy: builds per-user novelty state.
pub trait NoveltyModel<U, I> {
    type User: UserNovelty<I>;

    fn user_novelty(&self, recommendation: &Recommendation<U, I>) -> Self::User;
}

/// Novelty of a candidate given the items already placed.
pub trait UserNovelty<I> {
    fn novelty(&self, item: &ScoredItem<I>, reranked: &[&ScoredItem<I>]) -> f64;
}

/// Greedy reranker trading relevance against a novelty strategy.
///
/// `lambda` is not range-checked; values outside `[0, 1]` extrapolate the
/// linear combination. With `lambda == 0` the input order is returned as-is,
/// which assumes the candidates arrive sorted by descending score.
#[derive(Debug, Clone)]
pub struct LambdaReranker<N> {
    lambda: f64,
    cutoff: usize,
    normalize: bool,
    novelty: N,
}

impl<N> LambdaReranker<N> {
    pub fn new(novelty: N, lambda: f64, cutoff: usize, normalize: bool) -> Self {
        Self {
            lambda,
            cutoff,
            normalize,
            novelty,
        }
    }
}

impl<U, I, N> PermutationReranker<U, I> for LambdaReranker<N>
where
    N: NoveltyModel<U, I>,
{
    fn cutoff(&self) -> usize {
        self.cutoff
    }

    fn rerank_permutation(
        &self,
        recommendation: &Recommendation<U, I>,
    ) -> Result<Vec<usize>, RerankError> {
        recommendation.validate()?;
        let n = recommendation.items.len();

        if self.lambda == 0.0 {
            debug!(candidates = n, cutoff = self.cutoff, "lambda is zero, keeping input order");
            return Ok(base_perm(self.cutoff.min(n)));
        }

        debug!(
            candidates = n,
            cutoff = self.cutoff,
            lambda = self.lambda,
            normalize = self.normalize,
            "greedy rerank"
        );
        let user_reranker = LambdaUserReranker::new(
            self.novelty.user_novelty(recommendation),
            self.lambda,
            self.normalize,
        );
        GreedyReranker::new(self.cutoff).rerank(recommendation, user_reranker)
    }
}

/// Per-user selection context for [`LambdaReranker`].
pub struct LambdaUserReranker<V> {
    lambda: f64,
    normalize: bool,
    novelty: V,
}

impl<V> LambdaUserReranker<V> {
    pub fn new(novelty: V, lambda: f64, normalize: bool) -> Self {
        Self {
            lambda,
            normalize,
            novelty,
        }
    }

    fn norm(&self, x: f64, stats: &Stats) -> f64 {
        if !self.normalize {
            return x;
        }
        let sd = stats.standard_deviation();
        if sd == 0.0 {
            return 0.0;
        }
        (x - stats.mean()) / sd
    }
}

impl<U, I, V> UserReranker<U, I> for LambdaUserReranker<V>
where
    V: UserNovelty<I>,
{
    fn select_item(
        &mut self,
        _user: &U,
        remaining: &[&ScoredItem<I>],
        reranked: &[&ScoredItem<I>],
    ) -> Result<usize, RerankError> {
        let mut novelties = Vec::with_capacity(remaining.len());
        let mut rel_stats = Stats::new();
        let mut nov_stats = Stats::new();
        for (position, item) in remaining.iter().enumerate() {
            let nov = self.novelty.novelty(item, reranked);
            if !nov.is_finite() {
                return Err(RerankError::NonFiniteNovelty {
                    position,
                    novelty: nov,
                });
            }
            novelties.push(nov);
            rel_stats.increment(item.score);
            nov_stats.increment(nov);
        }

        let mut best = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (idx, (item, nov)) in remaining.iter().zip(&novelties).enumerate() {
            let value = (1.0 - self.lambda) * self.norm(item.score, &rel_stats)
                + self.lambda * self.norm(*nov, &nov_stats);
            // Strict comparison keeps the earliest item on ties.
            if value > best_value {
                best = idx;
                best_value = value;
            }
        }
        Ok(best)
    }
}
