//! Helpers for Rust programs embedded in a web page.
//!
//! - Dotted paths into the page's global scope:
//!   `helper.get("document.someparent.somechild.value")`, `set`, `call`.
//!   Missing or null links are logged and handed back, never panicked on.
//! - Named callbacks installed on the global scope for page scripts.
//! - `wait` / `stop`, which keep the program's main task alive until a
//!   callback says it is done.
//!
//! # Usage
//! ```ignore
//! use wasm_helper::{BrowserHelper, Value};
//!
//! #[wasm_bindgen(start)]
//! pub fn start() {
//!     wasm_helper::logging::init(log::LevelFilter::Info);
//!     let helper = BrowserHelper::browser();
//!     helper.set("counter", 0);
//!
//!     let page = helper.clone();
//!     helper.register_callback("inc", move |_| {
//!         let next = page.get("counter").as_int().unwrap_or_default() + 1;
//!         page.set("counter", next as f64);
//!         Value::Undefined
//!     });
//!
//!     let main = helper.clone();
//!     wasm_helper::spawn_local(async move {
//!         main.wait().await;
//!     });
//! }
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod helper;
pub mod host;
pub mod logging;
pub mod path;
pub mod platform;
pub mod prettify;
pub mod value;

pub use config::HelperConfig;
pub use error::PathError;
pub use helper::WasmHelper;
pub use host::{Callback, Host, HostError, HostValue};
pub use path::Path;
pub use platform::memory::{MemoryFunction, MemoryHost, MemoryObject, MemoryValue};
pub use prettify::prettify;
pub use value::{Value, ValueKind};

#[cfg(target_arch = "wasm32")]
pub use platform::browser::{BrowserHelper, BrowserHost, BrowserValue};
/// Runs the future awaiting [`WasmHelper::wait`] on the page's event loop.
#[cfg(target_arch = "wasm32")]
pub use wasm_bindgen_futures::spawn_local;
