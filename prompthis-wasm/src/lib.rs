use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

pub use api::*;

#[wasm_bindgen]
pub struct Session { pub(crate) inner: prompthis::SessionView }

impl Session {
    pub fn rs_new() -> Session { Session { inner: prompthis::SessionView::default() } }
    pub fn rs_record_count(&self) -> usize { self.inner.records().len() }
}

#[wasm_bindgen]
pub struct Annotator { pub(crate) inner: prompthis::algorithms::annotate::Annotator }
