//! Aspect-coverage models.
//!
//! A user aspect model turns a candidate's relevance score into `pi_f(i, f)`,
//! the probability that item `i` alone satisfies aspect `f`, relative to the
//! other candidates covering `f`. The model is built per user from the current
//! candidate list and discarded after the rerank call.
//!
//! Two curves are provided:
//!
//! | Model | prob_norm[f] | pi_f(i, f) |
//! |-------|--------------|------------|
//! | [`RelevanceAspectModel`] | max score over items covering f | (2^(s / norm) - 1) / 2 |
//! | [`ScoresAspectModel`] | sum of scores over items covering f | s / norm |
//!
//! The relevance curve follows the explicit relevance models of Vargas,
//! Castells and Vallet (SIGIR 2012): the best item for an aspect gets 0.5, a
//! zero-score item gets 0, and near-best items are rewarded more than
//! proportionally. An aspect with no positive evidence has `prob_norm` of zero
//! and every `pi_f` for it is 0.

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{user_distribution, IntentModel};
use crate::rerank::ScoredItem;

/// Per-user aspect-coverage state.
pub trait UserAspectModel<I> {
    type Aspect: Eq + Hash + Clone;

    /// Rebuild the model from a candidate list, discarding previous state.
    fn initialize_with_items(&mut self, items: &[ScoredItem<I>]);

    /// Aspects covered by an item.
    fn item_intents(&self, item: &I) -> &[Self::Aspect];

    /// The user's aspect distribution p(f|u) over the current candidates.
    fn user_intents(&self) -> &[(Self::Aspect, f64)];

    /// Probability that `item` satisfies `aspect`.
    fn pi_f(&self, item: &ScoredItem<I>, aspect: &Self::Aspect) -> f64;
}

/// Factory for per-user aspect models.
pub trait AspectModel<U, I> {
    type User: UserAspectModel<I>;

    /// Build and initialize a user's model over their candidate list.
    fn user_model(&self, user: &U, items: &[ScoredItem<I>]) -> Self::User;
}

// ---------------------------------------------------------------------
//  Relevance (exponential) curve
// ---------------------------------------------------------------------

#[derive(Debug)]
pub struct RelevanceAspectModel<M> {
    intents: Arc<M>,
}

impl<M> RelevanceAspectModel<M> {
    pub fn new(intents: Arc<M>) -> Self {
        Self { intents }
    }
}

impl<M> Clone for RelevanceAspectModel<M> {
    fn clone(&self) -> Self {
        Self {
            intents: Arc::clone(&self.intents),
        }
    }
}

impl<U, I, M> AspectModel<U, I> for RelevanceAspectModel<M>
where
    U: Clone,
    M: IntentModel<U, I>,
{
    type User = UserRelevanceAspectModel<U, I, M>;

    fn user_model(&self, user: &U, items: &[ScoredItem<I>]) -> Self::User {
        let mut model = UserRelevanceAspectModel::new(Arc::clone(&self.intents), user.clone());
        model.initialize_with_items(items);
        model
    }
}

pub struct UserRelevanceAspectModel<U, I, M: IntentModel<U, I>> {
    intents: Arc<M>,
    user: U,
    prob_norm: HashMap<M::Aspect, f64>,
    distribution: Vec<(M::Aspect, f64)>,
    _item: PhantomData<fn(&I)>,
}

impl<U, I, M: IntentModel<U, I>> UserRelevanceAspectModel<U, I, M> {
    /// An empty model; call [`UserAspectModel::initialize_with_items`] before use.
    pub fn new(intents: Arc<M>, user: U) -> Self {
        Self {
            intents,
            user,
            prob_norm: HashMap::new(),
            distribution: Vec::new(),
            _item: PhantomData,
        }
    }

    /// Highest candidate score observed for `aspect`, if any.
    pub fn prob_norm(&self, aspect: &M::Aspect) -> Option<f64> {
        self.prob_norm.get(aspect).copied()
    }
}

impl<U, I, M: IntentModel<U, I>> UserAspectModel<I> for UserRelevanceAspectModel<U, I, M> {
    type Aspect = M::Aspect;

    fn initialize_with_items(&mut self, items: &[ScoredItem<I>]) {
        self.prob_norm.clear();
        for item in items {
            for aspect in self.intents.item_intents(&item.id) {
                let norm = self.prob_norm.entry(aspect.clone()).or_insert(0.0);
                if item.score > *norm {
                    *norm = item.score;
                }
            }
        }
        self.distribution = user_distribution(self.intents.as_ref(), &self.user, items);
    }

    fn item_intents(&self, item: &I) -> &[M::Aspect] {
        self.intents.item_intents(item)
    }

    fn user_intents(&self) -> &[(M::Aspect, f64)] {
        &self.distribution
    }

    fn pi_f(&self, item: &ScoredItem<I>, aspect: &M::Aspect) -> f64 {
        match self.prob_norm.get(aspect) {
            Some(&norm) if norm > 0.0 => (2f64.powf(item.score / norm) - 1.0) / 2.0,
            _ => 0.0,
        }
    }
}

// ---------------------------------------------------------------------
//  Scores (linear) curve
// ---------------------------------------------------------------------

#[derive(Debug)]
pub struct ScoresAspectModel<M> {
    intents: Arc<M>,
}

impl<M> ScoresAspectModel<M> {
    pub fn new(intents: Arc<M>) -> Self {
        Self { intents }
    }
}

impl<M> Clone for ScoresAspectModel<M> {
    fn clone(&self) -> Self {
        Self {
            intents: Arc::clone(&self.intents),
        }
    }
}

impl<U, I, M> AspectModel<U, I> for ScoresAspectModel<M>
where
    U: Clone,
    M: IntentModel<U, I>,
{
    type User = UserScoresAspectModel<U, I, M>;

    fn user_model(&self, user: &U, items: &[ScoredItem<I>]) -> Self::User {
        let mut model = UserScoresAspectModel {
            intents: Arc::clone(&self.intents),
            user: user.clone(),
            prob_norm: HashMap::new(),
            distribution: Vec::new(),
            _item: PhantomData,
        };
        model.initialize_with_items(items);
        model
    }
}

pub struct UserScoresAspectModel<U, I, M: IntentModel<U, I>> {
    intents: Arc<M>,
    user: U,
    prob_norm: HashMap<M::Aspect, f64>,
    distribution: Vec<(M::Aspect, f64)>,
    _item: PhantomData<fn(&I)>,
}

impl<U, I, M: IntentModel<U, I>> UserAspectModel<I> for UserScoresAspectModel<U, I, M> {
    type Aspect = M::Aspect;

    fn initialize_with_items(&mut self, items: &[ScoredItem<I>]) {
        self.prob_norm.clear();
        for item in items {
            for aspect in self.intents.item_intents(&item.id) {
                *self.prob_norm.entry(aspect.clone()).or_insert(0.0) += item.score;
            }
        }
        self.distribution = user_distribution(self.intents.as_ref(), &self.user, items);
    }

    fn item_intents(&self, item: &I) -> &[M::Aspect] {
        self.intents.item_intents(item)
    }

    fn user_intents(&self) -> &[(M::Aspect, f64)] {
        &self.distribution
    }

    fn pi_f(&self, item: &ScoredItem<I>, aspect: &M::Aspect) -> f64 {
        match self.prob_norm.get(aspect) {
            Some(&norm) if norm > 0.0 => item.score / norm,
            _ => 0.0,
        }
    }
}
