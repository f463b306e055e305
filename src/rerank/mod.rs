//! Reranking API module.
//!
//! Greedy diversification of relevance-sorted candidate lists:
//! - [`PermutationReranker`]: the common interface, returning original positions
//! - [`GreedyReranker`]: position-by-position construction driven by a [`UserReranker`]
//! - [`LambdaReranker`]: relevance vs novelty tradeoff with per-step z-scores
//! - Novelty strategies: [`XQuad`] (aspect coverage) and [`Mmr`] (distance to placed items)
//!
//! ```text
//! Recommendation ─► LambdaReranker ─┬─ λ == 0 ─► base_perm
//!                                   └─ GreedyReranker loop
//!                                        └─ LambdaUserReranker::select_item
//!                                             ├─ NoveltyModel (XQuad / Mmr)
//!                                             └─ Stats (relevance, novelty)
//! ```

pub mod batch;
pub mod config;
pub mod greedy;
pub mod lambda;
pub mod mmr;
pub mod permutation;
pub mod types;
pub mod xquad;

pub use batch::{rerank_batch, BatchOutcome};
pub use config::{
    load_config_from_path, reranker_from_config, validate_config, AspectModelKind, ConfigError,
    RerankerConfig, StrategySpec,
};
pub use greedy::{GreedyReranker, UserReranker};
pub use lambda::{LambdaReranker, LambdaUserReranker, NoveltyModel, UserNovelty};
pub use mmr::{AspectJaccardDistance, ItemDistance, Mmr, MmrUserNovelty};
pub use permutation::{base_perm, PermutationReranker};
pub use types::*;
pub use xquad::{XQuad, XQuadUserNovelty};
