//! CompCleared Signup Frontend
//!
//! Leptos-based WASM frontend for plan selection, checkout hand-off and
//! account setup.

mod app;
mod browser;
mod components;
mod config;
mod pages;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    leptos::mount::mount_to_body(App);
}
