//! Token-set similarity between prompts.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

/// Jaccard similarity of two token sequences, treated as sets.
/// Two empty sequences have similarity 0.
pub fn jaccard<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let sa: HashSet<&T> = a.iter().collect();
    let sb: HashSet<&T> = b.iter().collect();
    set_jaccard(&sa, &sb)
}

fn set_jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let inter = a.intersection(b).count();
    let union = a.len() + b.len() - inter;
    if union == 0 { 0.0 } else { inter as f64 / union as f64 }
}

/// Square matrix with only the strict upper triangle populated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f64>, // row-major n*n
}

impl SimilarityMatrix {
    pub fn from_tokens<D: AsRef<[String]>>(docs: &[D]) -> Self {
        let sets: Vec<HashSet<&str>> = docs
            .iter()
            .map(|d| d.as_ref().iter().map(|s| s.as_str()).collect())
            .collect();
        Self::from_fn(sets.len(), |i, j| set_jaccard(&sets[i], &sets[j]))
    }

    /// Build from a pair function evaluated once per `i < j`.
    pub fn from_fn(n: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                data[i * n + j] = f(i, j);
            }
        }
        SimilarityMatrix { n, data }
    }

    pub fn len(&self) -> usize { self.n }
    pub fn is_empty(&self) -> bool { self.n == 0 }

    /// Entry `[i][j]`; 0 on and below the diagonal and out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i < self.n && j < self.n { self.data[i * self.n + j] } else { 0.0 }
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        if self.n == 0 {
            return Vec::new();
        }
        self.data.chunks(self.n).map(|r| r.to_vec()).collect()
    }

    pub fn as_slice(&self) -> &[f64] { &self.data }
}

/// Pairs `(i, j)`, `i < j`, whose similarity exceeds `min_similarity`;
/// these are the prompt pairs sent for edge derivation.
pub fn prompt_pairs(m: &SimilarityMatrix, min_similarity: f64) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..m.len() {
        for j in (i + 1)..m.len() {
            if m.get(i, j) > min_similarity {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn jaccard_basics() {
        assert_eq!(jaccard(&toks("a b c"), &toks("a b c")), 1.0);
        assert_eq!(jaccard(&toks("a b"), &toks("c d")), 0.0);
        assert_eq!(jaccard(&toks("a b c"), &toks("b c d")), 0.5);
        // duplicates collapse
        assert_eq!(jaccard(&toks("a a a b"), &toks("a b")), 1.0);
    }

    #[test]
    fn empty_sets_are_dissimilar() {
        let e: Vec<String> = Vec::new();
        assert_eq!(jaccard(&e, &e), 0.0);
        assert_eq!(jaccard(&e, &toks("a")), 0.0);
    }

    #[test]
    fn matrix_is_strict_upper_triangular() {
        let docs = vec![toks("a b"), toks("a b"), toks("a c"), toks("d")];
        let m = SimilarityMatrix::from_tokens(&docs);
        assert_eq!(m.len(), 4);
        for i in 0..4 {
            for j in 0..=i {
                assert_eq!(m.get(i, j), 0.0);
            }
        }
        assert_eq!(m.get(0, 1), 1.0);
        assert!((m.get(0, 2) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(m.rows().len(), 4);
    }

    #[test]
    fn pairs_above_threshold() {
        let docs = vec![toks("a b"), toks("a b"), toks("a c"), toks("d")];
        let m = SimilarityMatrix::from_tokens(&docs);
        assert_eq!(prompt_pairs(&m, 0.6), vec![(0, 1)]);
        assert_eq!(prompt_pairs(&m, 0.3), vec![(0, 1), (0, 2), (1, 2)]);
        // strictly greater
        assert_eq!(prompt_pairs(&m, 1.0), Vec::<(usize, usize)>::new());
    }
}
