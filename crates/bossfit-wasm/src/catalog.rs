use wasm_bindgen::prelude::*;

use bossfit_algo::{builtin_bosses, builtin_exercises};

/// Built-in exercise profiles as a JS array
#[wasm_bindgen]
pub fn exercises() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&builtin_exercises()).map_err(JsValue::from)
}

/// Built-in bosses as a JS array
#[wasm_bindgen]
pub fn bosses() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&builtin_bosses()).map_err(JsValue::from)
}
