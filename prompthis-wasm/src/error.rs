use crate::interop::{new_obj, set_kv};
use prompthis::Error;
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f64, max: f64, got: f64) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min));
    set_kv(&d, "max", &JsValue::from_f64(max));
    set_kv(&d, "got", &JsValue::from_f64(got));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn invalid_index(kind: &str, index: u32, len: usize) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "index", &JsValue::from_f64(index as f64));
    set_kv(&d, "len", &JsValue::from_f64(len as f64));
    err("invalid_index", format!("{} index {} outside 0..{}", kind, index, len), Some(d.into()))
}

#[inline]
pub fn json_parse(e: impl std::fmt::Display) -> JsValue {
    err("json_parse", format!("{}", e), None)
}

#[inline]
pub fn invalid_rects(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("invalid_rects", format!("'{}' must hold finite [x, y, w, h] quadruples", param), Some(d.into()))
}

/// Envelope for a core error, carrying its structured fields as `data`.
pub fn from_core(e: &Error) -> JsValue {
    match e {
        Error::OutOfRange { param, min, max, got } => out_of_range(param, *min, *max, *got),
        Error::NonFinite(param) => non_finite(param),
        Error::Mismatch { what, expected, got } => {
            let d = new_obj();
            set_kv(&d, "what", &JsValue::from_str(what));
            set_kv(&d, "expected", &JsValue::from_f64(*expected as f64));
            set_kv(&d, "got", &JsValue::from_f64(*got as f64));
            err(e.code(), e.to_string(), Some(d.into()))
        }
        Error::UnknownImage(id) => {
            let d = new_obj(); set_kv(&d, "id", &JsValue::from_str(id));
            err(e.code(), e.to_string(), Some(d.into()))
        }
        _ => err(e.code(), e.to_string(), None),
    }
}
