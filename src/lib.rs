#![forbid(unsafe_code)]

//! # diversity-harness
//!
//! Aspect-aware reranking of recommendation lists.
//!
//! A base recommender hands over a relevance-sorted candidate list per user.
//! This crate rebuilds that list greedily, one position at a time, so that it
//! also covers the different aspects (intents, topics) the user may hold. Each
//! step weighs the candidate's relevance against a novelty signal, both
//! z-scored over the candidates still in play, under a single tradeoff weight
//! lambda.
//!
//! Novelty comes from a pluggable strategy. The xQuAD strategy scores how much
//! uncovered aspect mass an item would add, using a per-user aspect model that
//! maps relevance to a saturating satisfaction probability. The MMR strategy
//! scores distance to the items already placed.

pub mod data;
pub mod intent;
pub mod rerank;
pub mod stats;

pub use intent::{IntentModel, StaticIntentModel};
pub use rerank::{
    rerank_batch, LambdaReranker, Mmr, PermutationReranker, Recommendation, RerankError,
    RerankerConfig, ScoredItem, XQuad,
};
pub use stats::Stats;
