//! Maximal Marginal Relevance novelty.
//!
//! The novelty of a candidate is its distance to the closest item already
//! placed; before anything is placed every candidate scores 0, so the first
//! pick is driven by relevance alone.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use super::lambda::{NoveltyModel, UserNovelty};
use super::types::{Recommendation, ScoredItem};
use crate::intent::IntentModel;

/// Dissimilarity between two items, in `[0, 1]` for the provided implementations.
pub trait ItemDistance<I> {
    fn distance(&self, a: &I, b: &I) -> f64;
}

/// Jaccard distance between the aspect sets of two items.
///
/// Two items without any aspects are treated as identical (distance 0).
pub struct AspectJaccardDistance<M, U> {
    intents: Arc<M>,
    _user: PhantomData<fn(&U)>,
}

impl<M, U> AspectJaccardDistance<M, U> {
    pub fn new(intents: Arc<M>) -> Self {
        Self {
            intents,
            _user: PhantomData,
        }
    }
}

impl<M, U, I> ItemDistance<I> for AspectJaccardDistance<M, U>
where
    M: IntentModel<U, I>,
{
    fn distance(&self, a: &I, b: &I) -> f64 {
        let a: HashSet<&M::Aspect> = self.intents.item_intents(a).iter().collect();
        let b: HashSet<&M::Aspect> = self.intents.item_intents(b).iter().collect();
        let union = a.union(&b).count();
        if union == 0 {
            return 0.0;
        }
        let shared = a.intersection(&b).count();
        1.0 - shared as f64 / union as f64
    }
}

#[derive(Debug)]
pub struct Mmr<D> {
    distance: Arc<D>,
}

impl<D> Mmr<D> {
    pub fn new(distance: Arc<D>) -> Self {
        Self { distance }
    }
}

impl<D> Clone for Mmr<D> {
    fn clone(&self) -> Self {
        Self {
            distance: Arc::clone(&self.distance),
        }
    }
}

impl<U, I, D> NoveltyModel<U, I> for Mmr<D>
where
    D: ItemDistance<I>,
{
    type User = MmrUserNovelty<D>;

    fn user_novelty(&self, _recommendation: &Recommendation<U, I>) -> Self::User {
        MmrUserNovelty {
            distance: Arc::clone(&self.distance),
        }
    }
}

pub struct MmrUserNovelty<D> {
    distance: Arc<D>,
}

impl<I, D> UserNovelty<I> for MmrUserNovelty<D>
where
    D: ItemDistance<I>,
{
    fn novelty(&self, item: &ScoredItem<I>, reranked: &[&ScoredItem<I>]) -> f64 {
        reranked
            .iter()
            .map(|j| self.distance.distance(&item.id, &j.id))
            .reduce(f64::min)
            .unwrap_or(0.0)
    }
}
