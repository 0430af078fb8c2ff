use js_sys::{Float32Array, Reflect};
use prompthis_wasm::{bubble_outline_res, tapered_edge_res, Session};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_ok(v: &JsValue) -> bool {
    Reflect::get(v, &JsValue::from_str("ok")).ok().and_then(|x| x.as_bool()).unwrap_or(false)
}

fn is_err(v: &JsValue, code: &str) -> bool {
    if is_ok(v) {
        return false;
    }
    if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
        if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
            return c.as_string().map_or(false, |s| s == code);
        }
    }
    false
}

fn js(v: serde_json::Value) -> JsValue {
    use serde::Serialize;
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).unwrap()
}

fn loaded() -> Session {
    let mut s = Session::new();
    let r = s.load_res(js(serde_json::json!({
        "records": [
            { "prompt_id": 1, "prompt": "a cat", "output_filenames": ["a.png"] },
            { "prompt_id": 2, "prompt": "a cat on sofa", "output_filenames": ["b.png"] }
        ],
        "images": {},
        "image_projection": { "a": [0.0, 0.0], "b": [1.0, 1.0] },
        "text_projection": {}
    })));
    assert!(is_ok(&r));
    s
}

#[wasm_bindgen_test]
fn malformed_payloads_are_json_errors() {
    let mut s = Session::new();
    assert!(is_err(&s.load_res(JsValue::from_str("nope")), "json_parse"));
    assert!(is_err(&s.apply_tokens_res(JsValue::from_f64(1.0)), "json_parse"));
    assert!(is_err(&s.set_controls_res(JsValue::from_str("x")), "json_parse"));
    assert_eq!(s.record_count(), 0);
}

#[wasm_bindgen_test]
fn controls_are_range_checked() {
    let mut s = Session::new();
    let r = s.set_controls_res(js(serde_json::json!({ "min_similarity": 2.0 })));
    assert!(is_err(&r, "out_of_range"));
    let r = s.set_controls_res(js(serde_json::json!({ "min_similarity": 0.3 })));
    assert!(is_ok(&r));
}

#[wasm_bindgen_test]
fn token_count_mismatch_keeps_records() {
    let mut s = loaded();
    let r = s.apply_tokens_res(js(serde_json::json!({ "prompts": [{ "words": [] }] })));
    assert!(is_err(&r, "mismatch"));
    assert_eq!(s.record_count(), 2);
}

#[wasm_bindgen_test]
fn stage_indices_are_checked() {
    let mut s = loaded();
    s.update_stages();
    assert!(is_err(&s.segment_stages_res(5), "invalid_index"));
    assert!(is_err(&s.annotate_stage_res(9), "invalid_index"));
    assert!(is_ok(&s.segment_stages_res(1)));
}

#[wasm_bindgen_test]
fn unknown_image_in_edges() {
    let mut s = loaded();
    let r = s.apply_edges_res(js(serde_json::json!({
        "edges": [{ "word": "x", "action": "add", "src": "a", "tgt": "zzz", "src_clu": 0, "tgt_clu": 0, "weight": 1.0 }],
        "edgeGroups": []
    })));
    assert!(is_err(&r, "unknown_image"));
}

#[wasm_bindgen_test]
fn geometry_inputs_are_validated() {
    assert!(is_err(&tapered_edge_res(f32::NAN, 0.0, 1.0, 1.0, 0.5, 0.5), "non_finite"));
    assert!(is_ok(&tapered_edge_res(0.0, 0.0, 10.0, 0.0, 5.0, 2.0)));
    let ragged = Float32Array::from(&[0.0f32, 0.0, 10.0][..]);
    let none = Float32Array::new_with_length(0);
    assert!(is_err(&bubble_outline_res(&ragged, &none, 4.0), "invalid_rects"));
    assert!(is_err(&bubble_outline_res(&none, &none, -1.0), "out_of_range"));
    let s = loaded();
    assert!(is_err(&s.image_layout_res(100.0, 100.0, 80.0), "out_of_range"));
    assert!(is_err(&s.cluster_outline_res(0, &ragged), "invalid_rects"));
}
