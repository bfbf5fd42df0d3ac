//! Host implementations.
//!
//! `browser` talks to the page through `js-sys` and only exists on wasm32.
//! `memory` is an in-process graph available everywhere.

#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod memory;
