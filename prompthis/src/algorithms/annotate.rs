//! TF-IDF term salience used to label stages and clusters with their
//! characteristic words.

use std::collections::{HashMap, HashSet};

/// Number of ranked terms kept in an annotation.
pub const TOP_TERMS: usize = 8;
/// Terms never used as labels.
pub const IGNORED_TERMS: &[&str] = &[","];

#[derive(Clone, Debug, Default)]
pub struct Annotator {
    docs: Vec<Vec<String>>,
    candidates: Vec<Vec<String>>,
    idf: HashMap<String, f64>,
}

/// Distinct items of `seq` in first-occurrence order.
fn distinct(seq: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    seq.iter().map(String::as_str).filter(|t| seen.insert(*t)).collect()
}

impl Annotator {
    pub fn new() -> Self {
        Annotator::default()
    }

    /// Add documents to the base corpus and refresh the idf table.
    pub fn documents(&mut self, docs: impl IntoIterator<Item = Vec<String>>) -> &mut Self {
        self.docs.extend(docs);
        self.recompute_idf();
        self
    }

    /// Replace the documents scored by `annotate`.
    pub fn documents_to_annotate(&mut self, docs: impl IntoIterator<Item = Vec<String>>) -> &mut Self {
        self.candidates.clear();
        self.candidates.extend(docs);
        self
    }

    pub fn clear(&mut self) {
        self.docs.clear();
        self.candidates.clear();
        self.idf.clear();
    }

    /// `ln(N / (1 + df))`, df counting documents that contain the term.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    fn recompute_idf(&mut self) {
        let total = self.docs.len() as f64;
        let mut df: HashMap<&str, usize> = HashMap::new();
        for doc in &self.docs {
            for t in distinct(doc) {
                *df.entry(t).or_insert(0) += 1;
            }
        }
        let idf: HashMap<String, f64> = df
            .into_iter()
            .map(|(t, n)| (t.to_string(), (total / (1.0 + n as f64)).ln()))
            .collect();
        self.idf = idf;
    }

    /// Term weights over the pooled candidate tokens: frequency in the pool
    /// times corpus idf. Terms unknown to the corpus weigh 0.
    fn pooled_tfidf(&self) -> HashMap<&str, f64> {
        let pool_len: usize = self.candidates.iter().map(Vec::len).sum();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for t in self.candidates.iter().flatten() {
            *counts.entry(t.as_str()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|(t, c)| {
                let tf = c as f64 / pool_len as f64;
                (t, tf * self.idf.get(t).copied().unwrap_or(0.0))
            })
            .collect()
    }

    /// Index of the candidate with the highest summed token tfidf; the first
    /// maximum wins.
    pub fn best_candidate(&self) -> Option<usize> {
        let tfidf = self.pooled_tfidf();
        let mut best: Option<(usize, f64)> = None;
        for (i, doc) in self.candidates.iter().enumerate() {
            let score: f64 = doc.iter().map(|t| tfidf.get(t.as_str()).copied().unwrap_or(0.0)).sum();
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((i, score));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Distinct terms of candidate `i` ranked by tfidf, ignored terms removed.
    pub fn ranked_terms(&self, i: usize) -> Vec<&str> {
        let Some(doc) = self.candidates.get(i) else {
            return Vec::new();
        };
        let tfidf = self.pooled_tfidf();
        let score = |t: &str| tfidf.get(t).copied().unwrap_or(0.0);
        let mut terms = distinct(doc);
        terms.sort_by(|a, b| score(b).total_cmp(&score(a)));
        terms.retain(|t| !IGNORED_TERMS.contains(t));
        terms
    }

    /// Tokens of the most salient candidate restricted to its top terms, in
    /// their original order with repeats kept. Empty without candidates.
    pub fn annotate(&self) -> Vec<String> {
        let Some(best) = self.best_candidate() else {
            return Vec::new();
        };
        let mut top = self.ranked_terms(best);
        top.truncate(TOP_TERMS);
        self.candidates[best]
            .iter()
            .filter(|t| top.contains(&t.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(ds: &[&str]) -> Vec<Vec<String>> {
        ds.iter().map(|d| d.split_whitespace().map(String::from).collect()).collect()
    }

    #[test]
    fn idf_counts_presence_not_occurrences() {
        let mut a = Annotator::new();
        a.documents(docs(&["a b", "a c", "b b"]));
        assert_eq!(a.idf("a"), Some((3.0f64 / 3.0).ln()));
        assert_eq!(a.idf("b"), Some((3.0f64 / 3.0).ln()));
        assert_eq!(a.idf("c"), Some((3.0f64 / 2.0).ln()));
        assert_eq!(a.idf("z"), None);
    }

    #[test]
    fn annotates_the_salient_document() {
        let corpus = docs(&["a b", "a c", "b b"]);
        let mut a = Annotator::new();
        a.documents(corpus.clone()).documents_to_annotate(corpus);
        assert_eq!(a.best_candidate(), Some(1));
        assert_eq!(a.annotate(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn keeps_order_and_duplicates_and_drops_commas() {
        let mut a = Annotator::new();
        a.documents(docs(&["x", "y", "z", "red , red car"]));
        a.documents_to_annotate(docs(&["red , red car"]));
        assert_eq!(a.annotate(), vec!["red", "red", "car"]);
    }

    #[test]
    fn at_most_eight_terms() {
        let mut a = Annotator::new();
        a.documents(docs(&["q", "r", "s"]));
        a.documents_to_annotate(docs(&["t1 t2 t3 t4 t5 t6 t7 t8 t9 t10"]));
        assert_eq!(a.annotate().len(), TOP_TERMS);
    }

    #[test]
    fn first_maximum_wins_ties() {
        let mut a = Annotator::new();
        a.documents(docs(&["p", "q"]));
        a.documents_to_annotate(docs(&["m", "n"]));
        assert_eq!(a.best_candidate(), Some(0));
        assert_eq!(a.annotate(), vec!["m"]);
    }

    #[test]
    fn no_candidates_is_empty() {
        let mut a = Annotator::new();
        a.documents(docs(&["a"]));
        assert!(a.annotate().is_empty());
        a.clear();
        assert_eq!(a.idf("a"), None);
    }

    #[test]
    fn documents_accumulate() {
        let mut a = Annotator::new();
        a.documents(docs(&["a"]));
        a.documents(docs(&["b"]));
        assert_eq!(a.idf("a"), Some((2.0f64 / 2.0).ln()));
    }
}
