//! Backend payloads and their conversion into core types.
//!
//! Every struct here mirrors a request or the `data` object of a response
//! exchanged with the session service. Keys follow whatever case the
//! service uses for that endpoint.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{image_id, DiffWord, ImageRef, PromptRecord, RawEdgeGroup, Vec2, WordChange, WordEdge};

/// Image id to backend-side image payload (usually a data URL).
pub type ImageMap = BTreeMap<String, String>;
pub type Projection = BTreeMap<String, Vec2>;
pub type ClusterMap = BTreeMap<String, i64>;

/// Session payload as fetched: projections are `[x, y]` pairs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSessionData {
    #[serde(default)]
    pub records: Vec<PromptRecord>,
    #[serde(default)]
    pub images: ImageMap,
    #[serde(default)]
    pub image_projection: BTreeMap<String, [f32; 2]>,
    #[serde(default)]
    pub text_projection: BTreeMap<String, [f32; 2]>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub records: Vec<PromptRecord>,
    pub images: ImageMap,
    pub image_projection: Projection,
    pub text_projection: Projection,
}

fn to_points(raw: BTreeMap<String, [f32; 2]>) -> Projection {
    raw.into_iter().map(|(k, p)| (k, Vec2::from(p))).collect()
}

impl From<RawSessionData> for SessionData {
    fn from(raw: RawSessionData) -> Self {
        SessionData {
            records: raw.records,
            images: raw.images,
            image_projection: to_points(raw.image_projection),
            text_projection: to_points(raw.text_projection),
        }
    }
}

impl SessionData {
    /// Apply a poll result: records are replaced, the keyed maps are merged
    /// with new entries winning.
    pub fn merge_new(&mut self, new: SessionData) {
        self.records = new.records;
        self.images.extend(new.images);
        self.image_projection.extend(new.image_projection);
        self.text_projection.extend(new.text_projection);
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.images.clear();
        self.image_projection.clear();
        self.text_projection.clear();
    }
}

/// One prompt as returned by the tokenizer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenizedPrompt {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub words: Vec<DiffWord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenizeResponse {
    pub prompts: Vec<TokenizedPrompt>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromptText {
    pub prompt: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenizeRequest {
    pub prompts: Vec<PromptText>,
}

impl TokenizeRequest {
    pub fn from_records(records: &[PromptRecord]) -> Self {
        TokenizeRequest { prompts: records.iter().map(|r| PromptText { prompt: r.prompt.clone() }).collect() }
    }
}

/// Diff action the tokenizer uses for words removed since the previous prompt.
pub const REMOVED: &str = "r";

/// Attach tokenizer output to the records, one prompt per record in order.
/// Removed words stay in the diff but not in the token list. On a count
/// mismatch nothing is modified.
pub fn add_tokens(records: &mut [PromptRecord], prompts: Vec<TokenizedPrompt>) -> Result<()> {
    if prompts.len() != records.len() {
        return Err(Error::Mismatch { what: "tokenized prompts", expected: records.len(), got: prompts.len() });
    }
    for (r, p) in records.iter_mut().zip(prompts) {
        r.prompt_tokens = p.words.iter().filter(|w| w.action != REMOVED).map(|w| w.text.clone()).collect();
        r.prompt_token_diff = p.words;
    }
    Ok(())
}

/// Every output image of every record, in record order.
pub fn image_refs(records: &[PromptRecord]) -> Vec<ImageRef> {
    records
        .iter()
        .enumerate()
        .flat_map(|(pi, r)| r.output_filenames.iter().map(move |f| (pi, image_id(f).to_string())))
        .enumerate()
        .map(|(index, (prompt_index, id))| ImageRef { index, prompt_index, id })
        .collect()
}

/// Edge endpoints arrive either as image ids or as flat image indices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageKey {
    Index(usize),
    Id(String),
}

impl ImageKey {
    fn resolve(&self, ids: &HashMap<&str, usize>, image_count: usize) -> Result<usize> {
        match self {
            ImageKey::Index(i) if *i < image_count => Ok(*i),
            ImageKey::Index(i) => Err(Error::UnknownImage(i.to_string())),
            ImageKey::Id(id) => ids.get(id.as_str()).copied().ok_or_else(|| Error::UnknownImage(id.clone())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawWordEdge {
    pub word: String,
    pub action: String,
    #[serde(default)]
    pub changes: Vec<WordChange>,
    pub src: ImageKey,
    pub tgt: ImageKey,
    pub src_clu: i64,
    pub tgt_clu: i64,
    #[serde(default)]
    pub src_pmt: usize,
    #[serde(default)]
    pub tgt_pmt: usize,
    #[serde(default)]
    pub ratio: f64,
    pub weight: f64,
}

/// Map edge endpoints onto `images`. Fails on the first unknown endpoint.
pub fn resolve_edges(raw: Vec<RawWordEdge>, images: &[ImageRef]) -> Result<Vec<WordEdge>> {
    let ids: HashMap<&str, usize> = images.iter().map(|r| (r.id.as_str(), r.index)).collect();
    raw.into_iter()
        .map(|e| {
            Ok(WordEdge {
                src: e.src.resolve(&ids, images.len())?,
                tgt: e.tgt.resolve(&ids, images.len())?,
                word: e.word,
                action: e.action,
                changes: e.changes,
                src_clu: e.src_clu,
                tgt_clu: e.tgt_clu,
                src_pmt: e.src_pmt,
                tgt_pmt: e.tgt_pmt,
                ratio: e.ratio,
                weight: e.weight,
            })
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDeriveResponse {
    pub edges: Vec<RawWordEdge>,
    pub edge_groups: Vec<RawEdgeGroup>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedWord {
    pub text: String,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromptWords {
    pub words: Vec<WeightedWord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDeriveRequest {
    pub prompts: Vec<PromptWords>,
    pub prompt_pairs: Vec<(usize, usize)>,
    pub image_clusters: ClusterMap,
    pub image_indices: Vec<Vec<String>>,
}

impl EdgeDeriveRequest {
    /// Every token is sent with weight 1.
    pub fn new(records: &[PromptRecord], prompt_pairs: Vec<(usize, usize)>, clusters: ClusterMap) -> Self {
        EdgeDeriveRequest {
            prompts: records
                .iter()
                .map(|r| PromptWords {
                    words: r.prompt_tokens.iter().map(|t| WeightedWord { text: t.clone(), weight: 1.0 }).collect(),
                })
                .collect(),
            prompt_pairs,
            image_clusters: clusters,
            image_indices: records
                .iter()
                .map(|r| r.output_filenames.iter().map(|f| image_id(f).to_string()).collect())
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterRequest {
    pub embeddings: Projection,
    pub threshold: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterResponse {
    pub clusters: ClusterMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: i64, files: &[&str]) -> PromptRecord {
        PromptRecord {
            prompt_id: id,
            prompt: format!("prompt {}", id),
            output_filenames: files.iter().map(|f| f.to_string()).collect(),
            ..PromptRecord::default()
        }
    }

    #[test]
    fn raw_projections_become_points() {
        let raw: RawSessionData = serde_json::from_value(json!({
            "records": [{ "prompt_id": 1, "prompt": "a cat", "output_filenames": ["x.png"] }],
            "images": { "x": "data:..." },
            "image_projection": { "x": [1.0, 2.0] },
            "text_projection": { "1": [3.0, 4.0] }
        }))
        .unwrap();
        let data = SessionData::from(raw);
        assert_eq!(data.records[0].prompt, "a cat");
        assert_eq!(data.image_projection["x"], Vec2::new(1.0, 2.0));
        assert_eq!(data.text_projection["1"], Vec2::new(3.0, 4.0));
    }

    #[test]
    fn merge_replaces_records_and_merges_maps() {
        let mut a = SessionData {
            records: vec![record(1, &["a.png"])],
            images: [("a".to_string(), "old".to_string()), ("b".to_string(), "keep".to_string())].into(),
            ..SessionData::default()
        };
        let b = SessionData {
            records: vec![record(1, &["a.png"]), record(2, &["c.png"])],
            images: [("a".to_string(), "new".to_string())].into(),
            ..SessionData::default()
        };
        a.merge_new(b);
        assert_eq!(a.records.len(), 2);
        assert_eq!(a.images["a"], "new");
        assert_eq!(a.images["b"], "keep");
    }

    #[test]
    fn tokens_skip_removed_words() {
        let mut recs = vec![record(1, &[])];
        let prompts: Vec<TokenizedPrompt> = serde_json::from_value(json!([{
            "words": [
                { "text": "a", "action": "" },
                { "text": "dog", "action": "r" },
                { "text": "cat", "action": "a" }
            ]
        }]))
        .unwrap();
        add_tokens(&mut recs, prompts).unwrap();
        assert_eq!(recs[0].prompt_tokens, vec!["a", "cat"]);
        assert_eq!(recs[0].prompt_token_diff.len(), 3);
    }

    #[test]
    fn token_count_mismatch_leaves_records() {
        let mut recs = vec![record(1, &[]), record(2, &[])];
        let err = add_tokens(&mut recs, vec![TokenizedPrompt::default()]).unwrap_err();
        assert_eq!(err.code(), "mismatch");
        assert!(recs.iter().all(|r| r.prompt_tokens.is_empty()));
    }

    #[test]
    fn image_refs_flatten_in_order() {
        let refs = image_refs(&[record(1, &["a.png", "b.png"]), record(2, &[]), record(3, &["c.v2.webp"])]);
        let ids: Vec<(usize, usize, &str)> = refs.iter().map(|r| (r.index, r.prompt_index, r.id.as_str())).collect();
        assert_eq!(ids, vec![(0, 0, "a"), (1, 0, "b"), (2, 2, "c.v2")]);
    }

    #[test]
    fn edges_resolve_ids_and_indices() {
        let images = image_refs(&[record(1, &["a.png", "b.png"])]);
        let raw: Vec<RawWordEdge> = serde_json::from_value(json!([
            { "word": "cat", "action": "add", "src": "a", "tgt": "b", "src_clu": 0, "tgt_clu": 1, "weight": 0.5 },
            { "word": "cat", "action": "add", "src": 1, "tgt": 0, "src_clu": 1, "tgt_clu": 0, "weight": 0.25 }
        ]))
        .unwrap();
        let edges = resolve_edges(raw, &images).unwrap();
        assert_eq!((edges[0].src, edges[0].tgt), (0, 1));
        assert_eq!((edges[1].src, edges[1].tgt), (1, 0));
    }

    #[test]
    fn unknown_endpoint_is_an_error() {
        let images = image_refs(&[record(1, &["a.png"])]);
        let raw: Vec<RawWordEdge> = serde_json::from_value(json!([
            { "word": "cat", "action": "add", "src": "a", "tgt": "zz", "src_clu": 0, "tgt_clu": 1, "weight": 0.5 }
        ]))
        .unwrap();
        assert_eq!(resolve_edges(raw, &images).unwrap_err().code(), "unknown_image");
    }

    #[test]
    fn derive_request_uses_backend_keys() {
        let mut r = record(1, &["a.png"]);
        r.prompt_tokens = vec!["a".into(), "cat".into()];
        let req = EdgeDeriveRequest::new(&[r], vec![(0, 1)], [("a".to_string(), 3)].into());
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["prompts"][0]["words"][1], json!({ "text": "cat", "weight": 1.0 }));
        assert_eq!(v["promptPairs"], json!([[0, 1]]));
        assert_eq!(v["imageClusters"]["a"], json!(3));
        assert_eq!(v["imageIndices"], json!([["a"]]));
    }
}
