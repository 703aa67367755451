//! Health Clarity WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles the browser adapters, hands them to the chat controller and
//! exposes the result to the page through `boot()` and `ClarityApp`.

mod app;
pub mod state;

pub use app::{boot, load_config, ClarityApp};

use wasm_bindgen::prelude::*;

/// WASM start hook, runs once when the module is instantiated
#[wasm_bindgen(start)]
pub fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Health Clarity WASM starting...");
}
