//! Browser tests, run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn transform_value_round_trips_options() {
    let options = serde_wasm_bindgen::to_value(&safescript_compiler::TransformOptions {
        source_map: false,
        ..Default::default()
    })
    .unwrap();
    let result = safescript_wasm::transform_value("let s = a + b;", "app.js", options).unwrap();
    let result: safescript_compiler::TransformResult =
        serde_wasm_bindgen::from_value(result).unwrap();
    assert!(result.success);
    assert!(result.source_map.is_none());
}

#[wasm_bindgen_test]
fn transform_value_accepts_undefined_options() {
    let result = safescript_wasm::transform_value("let n = 1 + 2;", "app.js", JsValue::UNDEFINED);
    assert!(result.is_ok());
}
