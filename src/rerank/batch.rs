//! Multi-user reranking.
//!
//! Users are independent, so recommendations are fanned out over the rayon
//! pool. Each user's rerank stays sequential; results come back in input order.

use rayon::prelude::*;
use tracing::{info, warn};

use super::permutation::PermutationReranker;
use super::types::{Recommendation, RerankError};

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchOutcome<U, I> {
    /// One entry per input recommendation, in input order.
    pub results: Vec<Result<Recommendation<U, I>, RerankError>>,
}

impl<U, I> BatchOutcome<U, I> {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Rerank every recommendation in parallel.
pub fn rerank_batch<U, I, R>(
    reranker: &R,
    recommendations: &[Recommendation<U, I>],
) -> BatchOutcome<U, I>
where
    R: PermutationReranker<U, I> + Sync + ?Sized,
    U: Clone + Send + Sync,
    I: Clone + Send + Sync,
{
    let results: Vec<Result<Recommendation<U, I>, RerankError>> = recommendations
        .par_iter()
        .enumerate()
        .map(|(index, recommendation)| {
            reranker
                .rerank_recommendation(recommendation)
                .map_err(|err| {
                    warn!(index, error = %err, "rerank failed");
                    err
                })
        })
        .collect();

    let outcome = BatchOutcome { results };
    info!(
        users = recommendations.len(),
        succeeded = outcome.succeeded(),
        failed = outcome.failed(),
        "batch rerank finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rerank::types::ScoredItem;

    struct KeepFirst(usize);

    impl PermutationReranker<u32, u32> for KeepFirst {
        fn cutoff(&self) -> usize {
            self.0
        }

        fn rerank_permutation(
            &self,
            recommendation: &Recommendation<u32, u32>,
        ) -> Result<Vec<usize>, RerankError> {
            recommendation.validate()?;
            Ok((0..self.0.min(recommendation.items.len())).collect())
        }
    }

    #[test]
    fn preserves_input_order_and_reports_failures() {
        let recs: Vec<Recommendation<u32, u32>> = (0..50)
            .map(|user| {
                let score = if user == 7 { f64::NAN } else { 1.0 };
                Recommendation::new(
                    user,
                    vec![ScoredItem::new(user * 10, score), ScoredItem::new(user * 10 + 1, 0.5)],
                )
            })
            .collect();

        let outcome = rerank_batch(&KeepFirst(1), &recs);
        assert_eq!(outcome.results.len(), 50);
        assert_eq!(outcome.failed(), 1);
        assert_eq!(outcome.succeeded(), 49);
        for (user, result) in outcome.results.iter().enumerate() {
            match result {
                Ok(rec) => {
                    assert_eq!(rec.user, user as u32);
                    assert_eq!(rec.items.len(), 1);
                    assert_eq!(rec.items[0].id, user as u32 * 10);
                }
                Err(err) => {
                    assert_eq!(user, 7);
                    assert!(matches!(err, RerankError::InvalidScore { position: 0, .. }));
                }
            }
        }
    }
}
