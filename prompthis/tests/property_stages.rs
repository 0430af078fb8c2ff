use prompthis::algorithms::similarity::{jaccard, SimilarityMatrix};
use prompthis::algorithms::stages::StageSegmenter;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Append { sim: u8 },
    Segment { at: u16 },
    Rethreshold { threshold: u8 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(|sim| Op::Append { sim }),
        any::<u16>().prop_map(|at| Op::Segment { at }),
        any::<u8>().prop_map(|threshold| Op::Rethreshold { threshold }),
    ]
}

fn chain(sims: &[f64]) -> SimilarityMatrix {
    SimilarityMatrix::from_fn(sims.len() + 1, |i, j| if j == i + 1 { sims[i] } else { 0.0 })
}

fn assert_partition(s: &StageSegmenter, n: usize) {
    let flat: Vec<usize> = s.stages().iter().flatten().copied().collect();
    assert_eq!(flat, (0..n).collect::<Vec<_>>());
    assert!(s.stages().iter().all(|st| !st.is_empty()));
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn stages_stay_a_partition(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut s = StageSegmenter::new();
        let mut sims: Vec<f64> = Vec::new();
        let mut threshold = 0.6;
        s.update(&chain(&sims), threshold);
        for op in ops {
            match op {
                Op::Append { sim } => {
                    sims.push(sim as f64 / 255.0);
                    s.update(&chain(&sims), threshold);
                }
                Op::Segment { at } => {
                    let n = sims.len() + 1;
                    let at = at as usize % (n + 2);
                    let before = s.stages().to_vec();
                    if s.segment(at).is_err() {
                        prop_assert!(at >= n);
                        prop_assert_eq!(s.stages(), &before[..]);
                    }
                }
                Op::Rethreshold { threshold: t } => {
                    threshold = t as f64 / 255.0;
                    s.update(&chain(&sims), threshold);
                }
            }
            assert_partition(&s, sims.len() + 1);
        }
    }

    #[test]
    fn jaccard_is_symmetric_and_bounded(
        a in proptest::collection::vec(0u8..12, 0..10),
        b in proptest::collection::vec(0u8..12, 0..10),
    ) {
        let ab = jaccard(&a, &b);
        prop_assert_eq!(ab, jaccard(&b, &a));
        prop_assert!((0.0..=1.0).contains(&ab));
        if !a.is_empty() {
            prop_assert_eq!(jaccard(&a, &a), 1.0);
        }
    }

    #[test]
    fn matrix_lower_triangle_is_zero(docs in proptest::collection::vec(proptest::collection::vec("[a-d]", 0..5), 0..8)) {
        let m = SimilarityMatrix::from_tokens(&docs);
        for i in 0..m.len() {
            for j in 0..=i {
                prop_assert_eq!(m.get(i, j), 0.0);
            }
        }
    }
}
