//! Intent (aspect) collaborators.
//!
//! An [`IntentModel`] answers two questions: which aspects does an item cover,
//! and how is a user's interest spread across aspects. Aspect mining is outside
//! this crate; [`StaticIntentModel`] serves a precomputed assignment from memory.
//! Aspect-coverage models built on top of it live in [`aspect`].

pub mod aspect;

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::rerank::ScoredItem;

pub use aspect::{
    AspectModel, RelevanceAspectModel, ScoresAspectModel, UserAspectModel,
    UserRelevanceAspectModel, UserScoresAspectModel,
};

/// Source of item → aspect assignments and user → aspect distributions.
pub trait IntentModel<U, I> {
    type Aspect: Eq + Hash + Clone;

    /// Aspects covered by `item`, each listed once. Unknown items cover nothing.
    fn item_intents(&self, item: &I) -> &[Self::Aspect];

    /// Explicit p(f|u) weights for `user`, if the model has any.
    fn user_intents(&self, user: &U) -> Option<&[(Self::Aspect, f64)]>;
}

/// In-memory intent model.
#[derive(Debug, Clone)]
pub struct StaticIntentModel<U, I, F> {
    items: HashMap<I, Vec<F>>,
    users: HashMap<U, Vec<(F, f64)>>,
}

impl<U, I, F> Default for StaticIntentModel<U, I, F> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            users: HashMap::new(),
        }
    }
}

impl<U, I, F> StaticIntentModel<U, I, F>
where
    U: Eq + Hash,
    I: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: I, aspects: Vec<F>) -> Self
    where
        F: PartialEq,
    {
        self.insert_item(item, aspects);
        self
    }

    pub fn with_user(mut self, user: U, weights: Vec<(F, f64)>) -> Self {
        self.insert_user(user, weights);
        self
    }

    /// Repeated aspects are kept once, in first-seen order.
    pub fn insert_item(&mut self, item: I, aspects: Vec<F>)
    where
        F: PartialEq,
    {
        let mut unique = Vec::with_capacity(aspects.len());
        for aspect in aspects {
            if !unique.contains(&aspect) {
                unique.push(aspect);
            }
        }
        self.items.insert(item, unique);
    }

    pub fn insert_user(&mut self, user: U, weights: Vec<(F, f64)>) {
        self.users.insert(user, weights);
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl<U, I, F> IntentModel<U, I> for StaticIntentModel<U, I, F>
where
    U: Eq + Hash,
    I: Eq + Hash,
    F: Eq + Hash + Clone,
{
    type Aspect = F;

    fn item_intents(&self, item: &I) -> &[F] {
        self.items.get(item).map(Vec::as_slice).unwrap_or(&[])
    }

    fn user_intents(&self, user: &U) -> Option<&[(F, f64)]> {
        self.users.get(user).map(Vec::as_slice)
    }
}

/// Resolve p(f|u) for a user over a candidate list.
///
/// Explicit weights are normalized to sum to one after dropping non-positive
/// and non-finite entries. Users without usable weights get a uniform
/// distribution over the aspects their candidates cover, in first-seen order.
pub fn user_distribution<U, I, M>(
    intents: &M,
    user: &U,
    items: &[ScoredItem<I>],
) -> Vec<(M::Aspect, f64)>
where
    M: IntentModel<U, I> + ?Sized,
{
    if let Some(weights) = intents.user_intents(user) {
        let usable: Vec<(M::Aspect, f64)> = weights
            .iter()
            .filter(|(_, w)| w.is_finite() && *w > 0.0)
            .cloned()
            .collect();
        let total: f64 = usable.iter().map(|(_, w)| w).sum();
        if total > 0.0 {
            return usable.into_iter().map(|(f, w)| (f, w / total)).collect();
        }
    }

    let mut seen = HashSet::new();
    let mut covered = Vec::new();
    for item in items {
        for aspect in intents.item_intents(&item.id) {
            if seen.insert(aspect.clone()) {
                covered.push(aspect.clone());
            }
        }
    }
    let uniform = 1.0 / covered.len().max(1) as f64;
    covered.into_iter().map(|f| (f, uniform)).collect()
}
