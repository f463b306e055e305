//! xQuAD aspect-coverage novelty.
//!
//! ```text
//! nov(i) = Σ_f p(f|u) · pi_f(i, f) · Π_{j ∈ reranked, f ∈ aspects(j)} (1 - pi_f(j, f))
//! ```
//!
//! An item is novel when it is likely to satisfy aspects the user cares about
//! that the items already placed have left uncovered. Combined with
//! [`LambdaReranker`](super::LambdaReranker) this is the xQuAD diversifier of
//! Santos, Macdonald and Ounis (WWW 2010).

use std::collections::HashMap;
use std::hash::Hash;

use super::lambda::{NoveltyModel, UserNovelty};
use super::types::{Recommendation, ScoredItem};
use crate::intent::{AspectModel, UserAspectModel};

/// xQuAD novelty over an aspect model.
#[derive(Debug, Clone)]
pub struct XQuad<A> {
    aspect_model: A,
}

impl<A> XQuad<A> {
    pub fn new(aspect_model: A) -> Self {
        Self { aspect_model }
    }
}

impl<U, I, A> NoveltyModel<U, I> for XQuad<A>
where
    A: AspectModel<U, I>,
{
    type User = XQuadUserNovelty<A::User, <A::User as UserAspectModel<I>>::Aspect>;

    fn user_novelty(&self, recommendation: &Recommendation<U, I>) -> Self::User {
        let model = self
            .aspect_model
            .user_model(&recommendation.user, &recommendation.items);
        XQuadUserNovelty::new::<I>(model)
    }
}

/// A user's aspect model plus their p(f|u) lookup.
pub struct XQuadUserNovelty<M, F> {
    model: M,
    weights: HashMap<F, f64>,
}

impl<M, F> XQuadUserNovelty<M, F> {
    pub fn new<I>(model: M) -> Self
    where
        M: UserAspectModel<I, Aspect = F>,
        F: Eq + Hash + Clone,
    {
        let weights = model.user_intents().iter().cloned().collect();
        Self { model, weights }
    }
}

impl<I, M> UserNovelty<I> for XQuadUserNovelty<M, <M as UserAspectModel<I>>::Aspect>
where
    M: UserAspectModel<I>,
{
    fn novelty(&self, item: &ScoredItem<I>, reranked: &[&ScoredItem<I>]) -> f64 {
        self.model
            .item_intents(&item.id)
            .iter()
            .filter_map(|f| self.weights.get(f).map(|p_f| (f, *p_f)))
            .map(|(f, p_f)| {
                let not_covered: f64 = reranked
                    .iter()
                    .filter(|j| self.model.item_intents(&j.id).contains(f))
                    .map(|j| 1.0 - self.model.pi_f(j, f))
                    .product();
                p_f * self.model.pi_f(item, f) * not_covered
            })
            .sum()
    }
}
