//! WASM bindings for fields-filter.
//!
//! Exposes `apply`, `isIncluded`, and `validate` as `#[wasm_bindgen]`
//! functions so browser and Node front ends can trim API responses with
//! the same `fields` specs the server accepts.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p fields-filter-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/fields-filter-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/fields_filter_wasm.wasm
//! ```

use fields_filter::parser::DEFAULT_MAX_DEPTH;
use fields_filter::{parse_fields_filter_with, FieldsFilter, ParseOptions};
use wasm_bindgen::prelude::*;

/// Apply a spec to a JSON string and return compact JSON.
///
/// Throws a JS error if the spec does not parse or the input is not valid JSON.
#[wasm_bindgen]
pub fn apply(spec: &str, json: &str) -> std::result::Result<String, JsValue> {
    let filter = parse(spec)?;
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&filter.apply_owned(value)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whether anything at the dotted `path` survives `spec`.
///
/// Throws a JS error if the spec does not parse.
#[wasm_bindgen(js_name = isIncluded)]
pub fn is_included(spec: &str, path: &str) -> std::result::Result<bool, JsValue> {
    let filter = parse(spec)?;
    Ok(filter.is_included(Some(path)))
}

/// Validate a spec and return its canonical form (`""` keeps everything).
///
/// Throws a JS error with the client-facing message if the spec does not parse.
#[wasm_bindgen]
pub fn validate(spec: &str) -> std::result::Result<String, JsValue> {
    let filter = parse(spec)?;
    Ok(filter.to_spec().unwrap_or_default())
}

/// Specs come from the page, so nesting is bounded.
fn parse(spec: &str) -> std::result::Result<FieldsFilter, JsValue> {
    let options = ParseOptions::default().with_max_depth(DEFAULT_MAX_DEPTH);
    parse_fields_filter_with(spec, &options).map_err(|e| JsValue::from_str(&e.public_message()))
}
