pub mod model;
pub mod error;
pub mod config;
pub mod session;
pub mod svg;
pub mod geometry {
    pub mod bspline;
    pub mod catmull_rom;
    pub mod marching;
    pub mod math;
    pub mod path;
    pub mod rect;
    pub mod scale;
    pub mod simplify;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod annotate;
    pub mod bubble;
    pub mod edge_groups;
    pub mod similarity;
    pub mod stages;
    pub mod tapered;
    pub mod weights;
    pub mod winding;
}

use std::cell::RefCell;

use algorithms::annotate::Annotator;
use algorithms::edge_groups::EdgeGroups;
use algorithms::similarity::{prompt_pairs, SimilarityMatrix};
use algorithms::stages::{StageSegmenter, StageUpdate};
use geometry::path::Path;
use geometry::scale::{GraphicNode, LinearScale};
use model::{EdgeGroup, ImageRef, PromptRecord, RectNode, Vec2};
use serde::{Deserialize, Serialize};
use session::{
    add_tokens, image_refs, resolve_edges, ClusterMap, ClusterRequest, ClusterResponse, EdgeDeriveRequest,
    EdgeDeriveResponse, RawSessionData, SessionData, TokenizeRequest, TokenizedPrompt,
};

pub use config::Controls;
pub use error::{Error, Result};

/// Which projection a cluster request embeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    Image,
    Text,
}

fn matrix_for(records: &[PromptRecord]) -> SimilarityMatrix {
    let docs: Vec<&[String]> = records.iter().map(|r| r.prompt_tokens.as_slice()).collect();
    tracing::debug!(prompts = docs.len(), "similarity matrix recomputed");
    SimilarityMatrix::from_tokens(&docs)
}

/// Transient analysis state of the open session. Everything here is derived
/// from backend data and is dropped on `clear`.
pub struct SessionView {
    pub(crate) data: SessionData,
    pub(crate) images: Vec<ImageRef>,
    pub(crate) clusters: ClusterMap,
    pub(crate) controls: Controls,
    pub(crate) stages: StageSegmenter,
    pub(crate) prompt_pairs: Vec<(usize, usize)>,
    pub(crate) edges: EdgeGroups,
    // Similarity of the current token lists; None once tokens change.
    pub(crate) matrix: RefCell<Option<SimilarityMatrix>>,
}

impl Default for SessionView {
    fn default() -> Self {
        SessionView::new(Controls::default())
    }
}

impl SessionView {
    pub fn new(controls: Controls) -> Self {
        SessionView {
            data: SessionData::default(),
            images: Vec::new(),
            clusters: ClusterMap::new(),
            controls,
            stages: StageSegmenter::new(),
            prompt_pairs: Vec::new(),
            edges: EdgeGroups::new(),
            matrix: RefCell::new(None),
        }
    }

    pub fn controls(&self) -> &Controls { &self.controls }

    /// Replace the controls after validating them; on error nothing changes.
    pub fn set_controls(&mut self, controls: Controls) -> Result<()> {
        controls.validate()?;
        self.controls = controls;
        Ok(())
    }

    pub fn data(&self) -> &SessionData { &self.data }
    pub fn records(&self) -> &[PromptRecord] { &self.data.records }
    pub fn images(&self) -> &[ImageRef] { &self.images }
    pub fn clusters(&self) -> &ClusterMap { &self.clusters }

    /// Start over with a freshly fetched session.
    pub fn load(&mut self, raw: RawSessionData) {
        self.clear();
        self.data = SessionData::from(raw);
        self.images = image_refs(&self.data.records);
        tracing::debug!(records = self.data.records.len(), images = self.images.len(), "session loaded");
    }

    /// Fold in a poll result for a finished generation. Stages are kept so
    /// the next `update_stages` can place the new prompt incrementally.
    pub fn apply_new_data(&mut self, raw: RawSessionData) {
        self.data.merge_new(SessionData::from(raw));
        self.images = image_refs(&self.data.records);
        self.invalidate();
        tracing::debug!(records = self.data.records.len(), "new session data merged");
    }

    pub fn tokenize_request(&self) -> TokenizeRequest {
        TokenizeRequest::from_records(&self.data.records)
    }

    pub fn apply_tokens(&mut self, prompts: Vec<TokenizedPrompt>) -> Result<()> {
        add_tokens(&mut self.data.records, prompts)?;
        self.invalidate();
        Ok(())
    }

    fn invalidate(&mut self) {
        self.matrix.replace(None);
    }

    /// Run `f` on the similarity matrix, computing it if the tokens changed.
    pub fn with_matrix<R>(&self, f: impl FnOnce(&SimilarityMatrix) -> R) -> R {
        let mut cache = self.matrix.borrow_mut();
        let m: &SimilarityMatrix = cache.get_or_insert_with(|| matrix_for(&self.data.records));
        f(m)
    }

    pub fn similarity_matrix(&self) -> SimilarityMatrix {
        self.with_matrix(SimilarityMatrix::clone)
    }

    pub fn stages(&self) -> &[Vec<usize>] { self.stages.stages() }

    pub fn update_stages(&mut self) -> StageUpdate {
        let threshold = self.controls.min_similarity;
        let mut cache = self.matrix.borrow_mut();
        let m = cache.get_or_insert_with(|| matrix_for(&self.data.records));
        self.stages.update(m, threshold)
    }

    pub fn segment_stages(&mut self, at: usize) -> Result<()> {
        self.stages.segment(at)
    }

    /// Restore a saved segmentation covering every record.
    pub fn restore_stages(&mut self, stages: Vec<Vec<usize>>) -> Result<()> {
        let s = StageSegmenter::from_stages(stages)?;
        if s.covered() != self.data.records.len() {
            return Err(Error::Mismatch { what: "staged prompts", expected: self.data.records.len(), got: s.covered() });
        }
        self.stages = s;
        Ok(())
    }

    /// Recompute the prompt pairs sent for edge derivation.
    pub fn filter_prompt_pairs(&mut self) -> &[(usize, usize)] {
        let min = self.controls.min_similarity;
        self.prompt_pairs = self.with_matrix(|m| prompt_pairs(m, min));
        &self.prompt_pairs
    }

    pub fn prompt_pairs(&self) -> &[(usize, usize)] { &self.prompt_pairs }

    pub fn cluster_request(&self, kind: ProjectionKind) -> ClusterRequest {
        let embeddings = match kind {
            ProjectionKind::Image => self.data.image_projection.clone(),
            ProjectionKind::Text => self.data.text_projection.clone(),
        };
        ClusterRequest { embeddings, threshold: self.controls.cluster_thresh }
    }

    pub fn set_clusters(&mut self, resp: ClusterResponse) {
        self.clusters = resp.clusters;
    }

    pub fn edge_derive_request(&self) -> EdgeDeriveRequest {
        EdgeDeriveRequest::new(&self.data.records, self.prompt_pairs.clone(), self.clusters.clone())
    }

    /// Group the derived edges. Barycenters use the image projection; on an
    /// unknown endpoint the previous edges stay.
    pub fn apply_edges(&mut self, resp: EdgeDeriveResponse) -> Result<()> {
        let edges = resolve_edges(resp.edges, &self.images)?;
        let mut groups = EdgeGroups::derive(edges, resp.edge_groups, None);
        let images = &self.images;
        let proj = &self.data.image_projection;
        groups.update_bary_centers_with(|i| images.get(i).and_then(|r| proj.get(&r.id)).copied());
        self.edges = groups;
        Ok(())
    }

    pub fn edge_groups(&self) -> &EdgeGroups { &self.edges }

    /// Groups heavy enough to draw, heaviest first.
    pub fn visible_groups(&self) -> Vec<&EdgeGroup> {
        self.edges.strongest(self.controls.edge_weight_thresh)
    }

    pub fn image_weights(&self) -> Vec<f64> {
        algorithms::weights::image_weights(self.images.len(), self.edges.edges(), self.edges.groups())
    }

    pub fn image_ranking(&self) -> Vec<usize> {
        algorithms::weights::rank_by_weight(&self.image_weights())
    }

    /// Characteristic tokens of stage `k` against the whole session.
    pub fn annotate_stage(&self, k: usize) -> Result<Vec<String>> {
        let stage = self.stages.stages().get(k).ok_or_else(|| {
            Error::InvalidArgument(format!("stage {} of {}", k, self.stages.stages().len()))
        })?;
        let records = &self.data.records;
        let mut a = Annotator::new();
        a.documents(records.iter().map(|r| r.prompt_tokens.clone()));
        a.documents_to_annotate(stage.iter().filter_map(|&i| records.get(i)).map(|r| r.prompt_tokens.clone()));
        Ok(a.annotate())
    }

    /// Image indices assigned to `cluster`.
    pub fn cluster_members(&self, cluster: i64) -> Vec<usize> {
        self.images
            .iter()
            .filter(|r| self.clusters.get(&r.id) == Some(&cluster))
            .map(|r| r.index)
            .collect()
    }

    /// Outline around the rendered rectangles of `cluster`'s images,
    /// avoiding every other image. `rects` holds one rectangle per image.
    pub fn cluster_outline(&self, cluster: i64, rects: &[RectNode]) -> Result<Vec<Vec2>> {
        if rects.len() != self.images.len() {
            return Err(Error::Mismatch { what: "image rects", expected: self.images.len(), got: rects.len() });
        }
        let (members, others): (Vec<(usize, &RectNode)>, Vec<(usize, &RectNode)>) =
            rects.iter().enumerate().partition(|(i, _)| {
                self.images.get(*i).and_then(|r| self.clusters.get(&r.id)) == Some(&cluster)
            });
        let members: Vec<RectNode> = members.into_iter().map(|(_, r)| *r).collect();
        let others: Vec<RectNode> = others.into_iter().map(|(_, r)| *r).collect();
        let p = &self.controls.outline;
        Ok(algorithms::bubble::bubble_outline(&members, &others, p.padding, p))
    }

    /// Tapered edge path using the session's taper controls.
    pub fn tapered_edge(&self, src: Vec2, tgt: Vec2, mid: Vec2) -> Path {
        algorithms::tapered::tapered_edge(src, tgt, mid, &self.controls.taper)
    }

    /// Label anchor for `cluster`: the area centroid of its outline.
    pub fn cluster_label_anchor(&self, cluster: i64, rects: &[RectNode]) -> Result<Option<Vec2>> {
        let outline = self.cluster_outline(cluster, rects)?;
        Ok(algorithms::winding::polygon_centroid(&outline))
    }

    /// Image positions fitted into `[margin, size - margin]` per axis. Images
    /// without a projection get `None`.
    pub fn image_layout(&self, width: f32, height: f32, margin: f32) -> Vec<Option<Vec2>> {
        let proj = &self.data.image_projection;
        let known: Vec<Vec2> = self.images.iter().filter_map(|r| proj.get(&r.id).copied()).collect();
        let scale = GraphicNode::linear(
            LinearScale::fit(known.iter().map(|p| p.x), (margin, width - margin)),
            LinearScale::fit(known.iter().map(|p| p.y), (margin, height - margin)),
        );
        self.images.iter().map(|r| proj.get(&r.id).map(|p| scale.node(p))).collect()
    }

    /// Session change: drop everything except the controls.
    pub fn clear(&mut self) {
        self.data.clear();
        self.images.clear();
        self.clusters.clear();
        self.stages.clear();
        self.prompt_pairs.clear();
        self.edges.clear();
        self.invalidate();
    }
}
