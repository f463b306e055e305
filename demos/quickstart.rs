//! Minimal xQuAD rerank over an in-memory intent model.
//!
//! Run with: `cargo run --example quickstart`

use std::sync::Arc;

use diversity_harness::intent::RelevanceAspectModel;
use diversity_harness::{
    LambdaReranker, PermutationReranker, Recommendation, ScoredItem, StaticIntentModel, XQuad,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let intents = StaticIntentModel::new()
        .with_item("pasta", vec!["italian"])
        .with_item("pizza", vec!["italian"])
        .with_item("risotto", vec!["italian"])
        .with_item("ramen", vec!["japanese"])
        .with_item("tacos", vec!["mexican"])
        .with_user("ana", vec![("italian", 0.5), ("japanese", 0.3), ("mexican", 0.2)]);

    let rec = Recommendation::new(
        "ana",
        vec![
            ScoredItem::new("pasta", 0.95),
            ScoredItem::new("pizza", 0.93),
            ScoredItem::new("risotto", 0.90),
            ScoredItem::new("ramen", 0.70),
            ScoredItem::new("tacos", 0.65),
        ],
    );

    let reranker = LambdaReranker::new(
        XQuad::new(RelevanceAspectModel::new(Arc::new(intents))),
        0.5,
        4,
        true,
    );
    let reranked = reranker.rerank_recommendation(&rec)?;

    println!("before: {:?}", rec.items.iter().map(|i| i.id).collect::<Vec<_>>());
    println!("after:  {:?}", reranked.items.iter().map(|i| i.id).collect::<Vec<_>>());
    Ok(())
}
