mod battle;
mod catalog;
mod store;
mod tracker;

pub use battle::*;
pub use catalog::*;
pub use store::*;
pub use tracker::*;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
