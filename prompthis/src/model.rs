use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Backend projections arrive as `[x, y]` pairs.
impl From<[f32; 2]> for Vec2 {
    fn from(p: [f32; 2]) -> Self {
        Vec2 { x: p[0], y: p[1] }
    }
}

/// Axis-aligned rectangle of a rendered image or prompt glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RectNode {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectNode {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2 { x: self.x + 0.5 * self.width, y: self.y + 0.5 * self.height }
    }

    /// Grow the rectangle by `pad` on every side.
    pub fn padded(&self, pad: f32) -> RectNode {
        RectNode {
            x: self.x - pad,
            y: self.y - pad,
            width: self.width + 2.0 * pad,
            height: self.height + 2.0 * pad,
        }
    }

    pub fn max_x(&self) -> f32 { self.x + self.width }
    pub fn max_y(&self) -> f32 { self.y + self.height }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.max_x() && p.y >= self.y && p.y <= self.max_y()
    }
}

/// A single word-level change carried by edges and groups.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WordChange {
    pub action: String,
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
}

/// Directed word-level edit between two images. `src`/`tgt` index the
/// session's flattened image list, `src_pmt`/`tgt_pmt` its records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordEdge {
    pub word: String,
    pub action: String,
    #[serde(default)]
    pub changes: Vec<WordChange>,
    pub src: usize,
    pub tgt: usize,
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

impl WordEdge {
    pub fn key(&self) -> GroupKey<'_> {
        GroupKey { word: &self.word, action: &self.action, src_clu: self.src_clu, tgt_clu: self.tgt_clu }
    }
}

/// Grouping key shared by edges and edge groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey<'a> {
    pub word: &'a str,
    pub action: &'a str,
    pub src_clu: i64,
    pub tgt_clu: i64,
}

/// Group descriptor as returned by the edge-derivation service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEdgeGroup {
    pub word: String,
    pub action: String,
    #[serde(default)]
    pub changes: Vec<WordChange>,
    pub src_clu: i64,
    pub tgt_clu: i64,
    pub weight: f64,
}

impl RawEdgeGroup {
    pub fn key(&self) -> GroupKey<'_> {
        GroupKey { word: &self.word, action: &self.action, src_clu: self.src_clu, tgt_clu: self.tgt_clu }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeGroup {
    pub idx: usize,
    pub word: String,
    pub action: String,
    pub changes: Vec<WordChange>,
    pub src_clu: i64,
    pub tgt_clu: i64,
    pub weight: f64,
    /// Member indices into the flat edge array, ascending.
    pub edges: Vec<usize>,
    /// Label anchor; `None` when no member edge has known endpoints.
    pub bary_center: Option<Vec2>,
}

/// Word-level comparison result produced by the tokenizer service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffWord {
    #[serde(default)]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub pre_weight: f64,
    #[serde(default)]
    pub cur_weight: f64,
    #[serde(default)]
    pub weight: f64,
}

/// One text-to-image generation of a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub prompt_id: i64,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub create_time: String,
    #[serde(default)]
    pub create_timezone: String,
    #[serde(default)]
    pub finish_time: String,
    #[serde(default)]
    pub finish_timezone: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub steps: u32,
    #[serde(default)]
    pub batch_size: u32,
    #[serde(default)]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(default)]
    pub setting_filename: String,
    #[serde(default)]
    pub output_filenames: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings: Option<Vec<f64>>,
    #[serde(default)]
    pub prompt_tokens: Vec<String>,
    #[serde(default)]
    pub prompt_token_diff: Vec<DiffWord>,
}

/// Entry of the flattened image list: every output image of every record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub index: usize,
    pub prompt_index: usize,
    /// Output filename without its extension.
    pub id: String,
}

/// Strip the extension the way the backend keys images.
pub fn image_id(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(dot) => &filename[..dot],
        None => filename,
    }
}
