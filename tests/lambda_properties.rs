use std::collections::HashSet;
use std::sync::Arc;

use diversity_harness::intent::{AspectModel, RelevanceAspectModel, UserAspectModel};
use diversity_harness::rerank::{
    AspectJaccardDistance, LambdaReranker, Mmr, NoveltyModel, PermutationReranker, UserNovelty,
    XQuad,
};
use diversity_harness::{Recommendation, ScoredItem, StaticIntentModel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type Intents = StaticIntentModel<u32, u32, u8>;

fn random_case(rng: &mut StdRng, n: usize) -> (Arc<Intents>, Recommendation<u32, u32>) {
    let mut intents = StaticIntentModel::new();
    let mut scores: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..10.0)).collect();
    scores.sort_by(|a, b| b.total_cmp(a));
    let items = scores
        .into_iter()
        .enumerate()
        .map(|(i, score)| {
            let aspects: Vec<u8> = (0..4u8).filter(|_| rng.gen_bool(0.4)).collect();
            intents.insert_item(i as u32, aspects);
            ScoredItem::new(i as u32, score)
        })
        .collect();
    if rng.gen_bool(0.5) {
        intents.insert_user(7, vec![(0, 0.4), (1, 0.3), (2, 0.2), (3, 0.1)]);
    }
    (Arc::new(intents), Recommendation::new(7, items))
}

fn assert_valid_perm(perm: &[usize], n: usize, cutoff: usize) {
    assert_eq!(perm.len(), cutoff.min(n));
    let distinct: HashSet<_> = perm.iter().collect();
    assert_eq!(distinct.len(), perm.len());
    assert!(perm.iter().all(|&p| p < n));
}

#[test]
fn permutations_are_valid_for_random_inputs() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let n = rng.gen_range(0..15);
        let cutoff = rng.gen_range(0..20);
        let lambda = rng.gen_range(0.0..=1.0);
        let normalize = rng.gen_bool(0.5);
        let (intents, rec) = random_case(&mut rng, n);

        let xquad = LambdaReranker::new(
            XQuad::new(RelevanceAspectModel::new(Arc::clone(&intents))),
            lambda,
            cutoff,
            normalize,
        );
        assert_valid_perm(&xquad.rerank_permutation(&rec).unwrap(), n, cutoff);

        let mmr = LambdaReranker::new(
            Mmr::new(Arc::new(AspectJaccardDistance::<Intents, u32>::new(intents))),
            lambda,
            cutoff,
            normalize,
        );
        assert_valid_perm(&mmr.rerank_permutation(&rec).unwrap(), n, cutoff);
    }
}

#[test]
fn lambda_zero_returns_identity_prefix() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let n = rng.gen_range(0..12);
        let cutoff = rng.gen_range(0..15);
        let (intents, rec) = random_case(&mut rng, n);
        let reranker = LambdaReranker::new(
            XQuad::new(RelevanceAspectModel::new(intents)),
            0.0,
            cutoff,
            true,
        );
        let perm = reranker.rerank_permutation(&rec).unwrap();
        assert_eq!(perm, (0..cutoff.min(n)).collect::<Vec<_>>());
    }
}

#[test]
fn tiny_lambda_with_normalization_agrees_with_relevance_order() {
    // Strictly decreasing distinct scores: the relevance z-score dominates.
    let (intents, _) = random_case(&mut StdRng::seed_from_u64(3), 0);
    let rec = Recommendation::new(
        7,
        (0..8u32).map(|i| ScoredItem::new(i, 10.0 - i as f64)).collect(),
    );
    let reranker = LambdaReranker::new(
        XQuad::new(RelevanceAspectModel::new(intents)),
        1e-9,
        8,
        true,
    );
    assert_eq!(reranker.rerank_permutation(&rec).unwrap(), (0..8).collect::<Vec<_>>());
}

#[test]
fn identical_inputs_give_identical_permutations() {
    let mut rng = StdRng::seed_from_u64(99);
    let (intents, rec) = random_case(&mut rng, 14);
    let build = || {
        LambdaReranker::new(
            XQuad::new(RelevanceAspectModel::new(Arc::clone(&intents))),
            0.6,
            10,
            true,
        )
    };
    let first = build().rerank_permutation(&rec).unwrap();
    for _ in 0..10 {
        assert_eq!(build().rerank_permutation(&rec).unwrap(), first);
    }
}

#[test]
fn pure_novelty_picks_current_argmax_each_step() {
    // Single aspect, lambda 1, raw scores: every pick must be the remaining
    // item with the highest novelty as recomputed after each placement.
    let intents = Arc::new(
        StaticIntentModel::<u32, u32, u8>::new()
            .with_item(0, vec![0])
            .with_item(1, vec![])
            .with_item(2, vec![0])
            .with_item(3, vec![0])
            .with_item(4, vec![])
            .with_user(1, vec![(0, 1.0)]),
    );
    let rec = Recommendation::new(
        1,
        vec![
            ScoredItem::new(0, 9.0),
            ScoredItem::new(1, 8.0),
            ScoredItem::new(2, 3.0),
            ScoredItem::new(3, 6.0),
            ScoredItem::new(4, 1.0),
        ],
    );
    let xquad = XQuad::new(RelevanceAspectModel::new(Arc::clone(&intents)));
    let perm = LambdaReranker::new(xquad.clone(), 1.0, 5, false)
        .rerank_permutation(&rec)
        .unwrap();

    let user = xquad.user_novelty(&rec);
    let mut remaining: Vec<usize> = (0..rec.items.len()).collect();
    let mut placed: Vec<&ScoredItem<u32>> = Vec::new();
    for &chosen in &perm {
        let mut best = remaining[0];
        let mut best_nov = f64::NEG_INFINITY;
        for &idx in &remaining {
            let nov = user.novelty(&rec.items[idx], &placed);
            if nov > best_nov {
                best = idx;
                best_nov = nov;
            }
        }
        assert_eq!(chosen, best);
        remaining.retain(|&idx| idx != chosen);
        placed.push(&rec.items[chosen]);
    }
    assert_eq!(perm, vec![0, 3, 2, 1, 4]);
}

#[test]
fn aspect_model_scenario_values() {
    let intents = Arc::new(
        StaticIntentModel::<&str, &str, &str>::new()
            .with_item("A", vec!["f1"])
            .with_item("B", vec!["f1", "f2"])
            .with_item("C", vec!["f2"]),
    );
    let items = vec![
        ScoredItem::new("A", 10.0),
        ScoredItem::new("B", 6.0),
        ScoredItem::new("C", 4.0),
    ];
    let model = RelevanceAspectModel::new(intents).user_model(&"u", &items);

    assert_eq!(model.prob_norm(&"f1"), Some(10.0));
    assert_eq!(model.prob_norm(&"f2"), Some(6.0));
    assert_eq!(model.pi_f(&items[0], &"f1"), 0.5);
    assert!((model.pi_f(&items[1], &"f1") - 0.2579).abs() < 1e-4);
    assert_eq!(model.pi_f(&items[1], &"f2"), 0.5);
    assert!((model.pi_f(&items[2], &"f2") - 0.2937).abs() < 1e-4);
}
