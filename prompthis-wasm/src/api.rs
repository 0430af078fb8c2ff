use crate::{Annotator, Session};
use js_sys::{Float32Array, Float64Array, Uint32Array};
use prompthis::algorithms::stages::StageUpdate;
use prompthis::config::{OutlineParams, TaperParams};
use prompthis::model::{RectNode, Vec2};
use prompthis::session::{ClusterResponse, EdgeDeriveResponse, RawSessionData, TokenizeResponse};
use prompthis::{Controls, ProjectionKind};
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;
use crate::error;
use crate::interop;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn stage_update_name(u: StageUpdate) -> &'static str {
    match u {
        StageUpdate::Extended => "extended",
        StageUpdate::Appended => "appended",
        StageUpdate::Rebuilt => "rebuilt",
    }
}

fn projection_kind(kind: &str) -> Option<ProjectionKind> {
    match kind {
        "image" => Some(ProjectionKind::Image),
        "text" => Some(ProjectionKind::Text),
        _ => None,
    }
}

#[wasm_bindgen]
impl Session {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Session {
        crate::Session::rs_new()
    }
    pub fn record_count(&self) -> u32 {
        self.rs_record_count() as u32
    }
    pub fn image_count(&self) -> u32 {
        self.inner.images().len() as u32
    }

    // Controls
    pub fn controls(&self) -> JsValue {
        interop::to_js_or_null(self.inner.controls())
    }
    pub fn set_controls(&mut self, v: JsValue) -> bool {
        match interop::from_js::<Controls>(v) {
            Ok(c) => self.inner.set_controls(c).is_ok(),
            Err(_) => false,
        }
    }
    pub fn set_controls_res(&mut self, v: JsValue) -> JsValue {
        let c = match interop::from_js::<Controls>(v) {
            Ok(c) => c,
            Err(e) => return error::json_parse(e),
        };
        match self.inner.set_controls(c) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::from_core(&e),
        }
    }

    // Session data
    pub fn load(&mut self, raw: JsValue) -> bool {
        match interop::from_js::<RawSessionData>(raw) {
            Ok(r) => {
                self.inner.load(r);
                true
            }
            Err(e) => {
                interop::warn(&format!("prompthis: session data rejected: {}", e));
                false
            }
        }
    }
    pub fn load_res(&mut self, raw: JsValue) -> JsValue {
        match interop::from_js::<RawSessionData>(raw) {
            Ok(r) => {
                self.inner.load(r);
                error::ok(JsValue::from_f64(self.inner.records().len() as f64))
            }
            Err(e) => error::json_parse(e),
        }
    }
    pub fn apply_new_data(&mut self, raw: JsValue) -> bool {
        match interop::from_js::<RawSessionData>(raw) {
            Ok(r) => {
                self.inner.apply_new_data(r);
                true
            }
            Err(e) => {
                interop::warn(&format!("prompthis: new data rejected: {}", e));
                false
            }
        }
    }
    pub fn apply_new_data_res(&mut self, raw: JsValue) -> JsValue {
        match interop::from_js::<RawSessionData>(raw) {
            Ok(r) => {
                self.inner.apply_new_data(r);
                error::ok(JsValue::from_f64(self.inner.records().len() as f64))
            }
            Err(e) => error::json_parse(e),
        }
    }
    pub fn records(&self) -> JsValue {
        interop::to_js_or_null(self.inner.records())
    }
    pub fn images(&self) -> JsValue {
        interop::to_js_or_null(self.inner.images())
    }
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    // Tokens
    pub fn tokenize_request(&self) -> JsValue {
        interop::to_js_or_null(&self.inner.tokenize_request())
    }
    pub fn apply_tokens(&mut self, v: JsValue) -> bool {
        match interop::from_js::<TokenizeResponse>(v) {
            Ok(t) => self.inner.apply_tokens(t.prompts).is_ok(),
            Err(_) => false,
        }
    }
    pub fn apply_tokens_res(&mut self, v: JsValue) -> JsValue {
        let t = match interop::from_js::<TokenizeResponse>(v) {
            Ok(t) => t,
            Err(e) => return error::json_parse(e),
        };
        match self.inner.apply_tokens(t.prompts) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::from_core(&e),
        }
    }

    // Similarity + stages
    pub fn similarity_data(&self) -> Float64Array {
        self.inner.with_matrix(|m| interop::arr_f64(m.as_slice()))
    }
    pub fn similarity_rows(&self) -> JsValue {
        self.inner.with_matrix(|m| interop::to_js_or_null(&m.rows()))
    }
    pub fn update_stages(&mut self) -> String {
        stage_update_name(self.inner.update_stages()).to_string()
    }
    pub fn stages(&self) -> JsValue {
        interop::to_js_or_null(self.inner.stages())
    }
    pub fn segment_stages(&mut self, at: u32) -> bool {
        self.inner.segment_stages(at as usize).is_ok()
    }
    pub fn segment_stages_res(&mut self, at: u32) -> JsValue {
        let covered: usize = self.inner.stages().iter().map(Vec::len).sum();
        if at as usize >= covered {
            return error::invalid_index("prompt", at, covered);
        }
        match self.inner.segment_stages(at as usize) {
            Ok(()) => error::ok(interop::to_js_or_null(self.inner.stages())),
            Err(e) => error::from_core(&e),
        }
    }
    pub fn restore_stages_res(&mut self, v: JsValue) -> JsValue {
        let stages = match interop::from_js::<Vec<Vec<usize>>>(v) {
            Ok(s) => s,
            Err(e) => return error::json_parse(e),
        };
        match self.inner.restore_stages(stages) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::from_core(&e),
        }
    }
    pub fn filter_prompt_pairs(&mut self) -> JsValue {
        interop::to_js_or_null(self.inner.filter_prompt_pairs())
    }
    pub fn prompt_pairs(&self) -> JsValue {
        interop::to_js_or_null(self.inner.prompt_pairs())
    }

    // Clusters
    pub fn cluster_request(&self, kind: &str) -> JsValue {
        match projection_kind(kind) {
            Some(k) => interop::to_js_or_null(&self.inner.cluster_request(k)),
            None => JsValue::NULL,
        }
    }
    pub fn cluster_request_res(&self, kind: &str) -> JsValue {
        match projection_kind(kind) {
            Some(k) => match interop::to_js(&self.inner.cluster_request(k)) {
                Ok(v) => error::ok(v),
                Err(e) => error::err("serialize", e.to_string(), None),
            },
            None => error::err("invalid_argument", format!("unknown projection '{}'", kind), None),
        }
    }
    pub fn set_clusters(&mut self, v: JsValue) -> bool {
        match interop::from_js::<ClusterResponse>(v) {
            Ok(c) => {
                self.inner.set_clusters(c);
                true
            }
            Err(_) => false,
        }
    }
    pub fn cluster_members(&self, cluster: i32) -> Uint32Array {
        interop::arr_index(&self.inner.cluster_members(cluster as i64))
    }
    /// `rects` is `[x, y, w, h]` per image; returns `{ points, d, anchor }`.
    pub fn cluster_outline_res(&self, cluster: i32, rects: &Float32Array) -> JsValue {
        let Some(rects) = interop::rects_from(rects) else {
            return error::invalid_rects("rects");
        };
        match self.inner.cluster_outline(cluster as i64, &rects) {
            Ok(points) => error::ok(outline_obj(&points)),
            Err(e) => error::from_core(&e),
        }
    }

    // Edges
    pub fn edge_derive_request(&self) -> JsValue {
        interop::to_js_or_null(&self.inner.edge_derive_request())
    }
    pub fn apply_edges(&mut self, v: JsValue) -> bool {
        match interop::from_js::<EdgeDeriveResponse>(v) {
            Ok(r) => self.inner.apply_edges(r).is_ok(),
            Err(_) => false,
        }
    }
    pub fn apply_edges_res(&mut self, v: JsValue) -> JsValue {
        let r = match interop::from_js::<EdgeDeriveResponse>(v) {
            Ok(r) => r,
            Err(e) => return error::json_parse(e),
        };
        match self.inner.apply_edges(r) {
            Ok(()) => error::ok(JsValue::from_f64(self.inner.edge_groups().groups().len() as f64)),
            Err(e) => error::from_core(&e),
        }
    }
    pub fn edges(&self) -> JsValue {
        interop::to_js_or_null(self.inner.edge_groups().edges())
    }
    pub fn edge_groups(&self) -> JsValue {
        interop::to_js_or_null(self.inner.edge_groups().groups())
    }
    pub fn visible_group_ids(&self) -> Uint32Array {
        let ids: Vec<u32> = self.inner.visible_groups().iter().map(|g| g.idx as u32).collect();
        interop::arr_u32(&ids)
    }
    pub fn image_weights(&self) -> Float64Array {
        interop::arr_f64(&self.inner.image_weights())
    }
    pub fn image_ranking(&self) -> Uint32Array {
        interop::arr_index(&self.inner.image_ranking())
    }

    // Edge drawing
    /// Tapered edge using the session's `taper` controls.
    pub fn tapered_edge(&self, sx: f32, sy: f32, tx: f32, ty: f32, mx: f32, my: f32) -> String {
        let p = self.inner.tapered_edge(Vec2::new(sx, sy), Vec2::new(tx, ty), Vec2::new(mx, my));
        prompthis::svg::path_to_svg(&p)
    }
    pub fn tapered_edge_res(&self, sx: f32, sy: f32, tx: f32, ty: f32, mx: f32, my: f32) -> JsValue {
        for (name, v) in [("sx", sx), ("sy", sy), ("tx", tx), ("ty", ty), ("mx", mx), ("my", my)] {
            if !v.is_finite() {
                return error::non_finite(name);
            }
        }
        error::ok(JsValue::from_str(&self.tapered_edge(sx, sy, tx, ty, mx, my)))
    }

    // Labels + layout
    pub fn annotate_stage(&self, k: u32) -> JsValue {
        match self.inner.annotate_stage(k as usize) {
            Ok(words) => interop::to_js_or_null(&words),
            Err(_) => JsValue::NULL,
        }
    }
    pub fn annotate_stage_res(&self, k: u32) -> JsValue {
        let n = self.inner.stages().len();
        if k as usize >= n {
            return error::invalid_index("stage", k, n);
        }
        match self.inner.annotate_stage(k as usize) {
            Ok(words) => error::ok(interop::to_js_or_null(&words)),
            Err(e) => error::from_core(&e),
        }
    }
    /// Flat `[x, y, ...]` per image; NaN where an image has no projection.
    pub fn image_layout(&self, width: f32, height: f32, margin: f32) -> Float32Array {
        let flat: Vec<f32> = self
            .inner
            .image_layout(width, height, margin)
            .into_iter()
            .flat_map(|p| p.map_or([f32::NAN, f32::NAN], |p| [p.x, p.y]))
            .collect();
        interop::arr_f32(&flat)
    }
    pub fn image_layout_res(&self, width: f32, height: f32, margin: f32) -> JsValue {
        for (name, v) in [("width", width), ("height", height), ("margin", margin)] {
            if !v.is_finite() {
                return error::non_finite(name);
            }
        }
        if width <= 0.0 || height <= 0.0 {
            return error::out_of_range("width/height", f64::MIN_POSITIVE, f64::MAX, width.min(height) as f64);
        }
        if margin < 0.0 || 2.0 * margin > width.min(height) {
            return error::out_of_range("margin", 0.0, 0.5 * width.min(height) as f64, margin as f64);
        }
        error::ok(self.image_layout(width, height, margin).into())
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

fn outline_obj(points: &[Vec2]) -> JsValue {
    let obj = interop::new_obj();
    interop::set_kv(&obj, "points", &interop::flat_points(points).into());
    interop::set_kv(&obj, "d", &JsValue::from_str(&prompthis::svg::polygon_to_svg(points)));
    let anchor = match prompthis::algorithms::winding::polygon_centroid(points) {
        Some(c) => interop::arr_f32(&[c.x, c.y]).into(),
        None => JsValue::NULL,
    };
    interop::set_kv(&obj, "anchor", &anchor);
    obj.into()
}

#[wasm_bindgen]
impl Annotator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Annotator {
        Annotator { inner: prompthis::algorithms::annotate::Annotator::new() }
    }
    /// Append token lists to the corpus.
    pub fn documents(&mut self, docs: JsValue) -> bool {
        match interop::from_js::<Vec<Vec<String>>>(docs) {
            Ok(d) => {
                self.inner.documents(d);
                true
            }
            Err(_) => false,
        }
    }
    pub fn documents_to_annotate(&mut self, docs: JsValue) -> bool {
        match interop::from_js::<Vec<Vec<String>>>(docs) {
            Ok(d) => {
                self.inner.documents_to_annotate(d);
                true
            }
            Err(_) => false,
        }
    }
    pub fn annotate(&self) -> JsValue {
        interop::to_js_or_null(&self.inner.annotate())
    }
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Annotator::new()
    }
}

// Stateless geometry

#[wasm_bindgen]
pub fn prompt_similarity(a: JsValue, b: JsValue) -> f64 {
    match (interop::from_js::<Vec<String>>(a), interop::from_js::<Vec<String>>(b)) {
        (Ok(a), Ok(b)) => prompthis::algorithms::similarity::jaccard(&a, &b),
        _ => 0.0,
    }
}

#[wasm_bindgen]
pub fn rect_intersect(a: &Float32Array, b: &Float32Array) -> bool {
    match (interop::rects_from(a).as_deref(), interop::rects_from(b).as_deref()) {
        (Some([a]), Some([b])) => prompthis::geometry::rect::rect_intersect(a, b),
        _ => false,
    }
}

fn taper(sx: f32, sy: f32, tx: f32, ty: f32, mx: f32, my: f32) -> String {
    prompthis::algorithms::tapered::tapered_edge_svg(
        Vec2::new(sx, sy),
        Vec2::new(tx, ty),
        Vec2::new(mx, my),
        &TaperParams::default(),
    )
}

#[wasm_bindgen]
pub fn tapered_edge(sx: f32, sy: f32, tx: f32, ty: f32, mx: f32, my: f32) -> String {
    taper(sx, sy, tx, ty, mx, my)
}

#[wasm_bindgen]
pub fn tapered_edge_res(sx: f32, sy: f32, tx: f32, ty: f32, mx: f32, my: f32) -> JsValue {
    for (name, v) in [("sx", sx), ("sy", sy), ("tx", tx), ("ty", ty), ("mx", mx), ("my", my)] {
        if !v.is_finite() {
            return error::non_finite(name);
        }
    }
    error::ok(JsValue::from_str(&taper(sx, sy, tx, ty, mx, my)))
}

fn outline(members: &[RectNode], others: &[RectNode], padding: f32) -> Vec<Vec2> {
    prompthis::algorithms::bubble::bubble_outline(members, others, padding, &OutlineParams::default())
}

/// SVG path of the outline around `members`; rects are `[x, y, w, h]` runs.
#[wasm_bindgen]
pub fn bubble_outline(members: &Float32Array, others: &Float32Array, padding: f32) -> String {
    match (interop::rects_from(members), interop::rects_from(others)) {
        (Some(m), Some(o)) if padding.is_finite() => prompthis::svg::polygon_to_svg(&outline(&m, &o, padding)),
        _ => String::new(),
    }
}

#[wasm_bindgen]
pub fn bubble_outline_res(members: &Float32Array, others: &Float32Array, padding: f32) -> JsValue {
    if !padding.is_finite() {
        return error::non_finite("padding");
    }
    if padding < 0.0 {
        return error::out_of_range("padding", 0.0, f64::MAX, padding as f64);
    }
    let Some(m) = interop::rects_from(members) else {
        return error::invalid_rects("members");
    };
    let Some(o) = interop::rects_from(others) else {
        return error::invalid_rects("others");
    };
    error::ok(outline_obj(&outline(&m, &o, padding)))
}
