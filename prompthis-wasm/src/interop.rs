use js_sys::{Float32Array, Float64Array, Object, Reflect, Uint32Array};
use prompthis::model::{RectNode, Vec2};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_u32(slice: &[u32]) -> Uint32Array {
    let arr = Uint32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_f32(slice: &[f32]) -> Float32Array {
    let arr = Float32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_f64(slice: &[f64]) -> Float64Array {
    let arr = Float64Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_index(slice: &[usize]) -> Uint32Array {
    let v: Vec<u32> = slice.iter().map(|&i| i as u32).collect();
    arr_u32(&v)
}

/// Plain JS objects and arrays, never `Map`.
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

/// `to_js`, logging and yielding `null` if serialization fails.
pub fn to_js_or_null<T: Serialize + ?Sized>(v: &T) -> JsValue {
    to_js(v).unwrap_or_else(|e| {
        warn(&format!("prompthis: failed to serialize result: {}", e));
        JsValue::NULL
    })
}

pub fn from_js<T: DeserializeOwned>(v: JsValue) -> Result<T, serde_wasm_bindgen::Error> {
    serde_wasm_bindgen::from_value(v)
}

pub fn warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

/// `[x, y, w, h, ...]` into rects; `None` on a ragged or non-finite array.
pub fn rects_from(arr: &Float32Array) -> Option<Vec<RectNode>> {
    let v = arr.to_vec();
    if v.len() % 4 != 0 || v.iter().any(|x| !x.is_finite()) {
        return None;
    }
    Some(v.chunks_exact(4).map(|c| RectNode::new(c[0], c[1], c[2], c[3])).collect())
}

pub fn flat_points(points: &[Vec2]) -> Float32Array {
    let v: Vec<f32> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    arr_f32(&v)
}
