//! Diagnostics go through the `log` facade.
//!
//! In the browser, [`init`] routes records to the devtools console. Native
//! embedders install whatever `log` backend they already use.

/// Prefix of every line this crate writes.
pub(crate) const TARGET: &str = "wasm-helper";

macro_rules! trace {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            log::debug!(target: $crate::logging::TARGET, $($arg)+);
        }
    };
}

macro_rules! error {
    ($($arg:tt)+) => {
        log::error!(target: $crate::logging::TARGET, "Error: {}", format_args!($($arg)+));
    };
}

macro_rules! warning {
    ($($arg:tt)+) => {
        log::warn!(target: $crate::logging::TARGET, $($arg)+);
    };
}

pub(crate) use {error, trace, warning};

#[cfg(target_arch = "wasm32")]
pub use console::init;

#[cfg(target_arch = "wasm32")]
mod console {
    use std::sync::Once;

    use log::{Level, LevelFilter, Log, Metadata, Record};
    use wasm_bindgen::JsValue;
    use web_sys::console;

    struct ConsoleLogger;

    static LOGGER: ConsoleLogger = ConsoleLogger;
    static INIT: Once = Once::new();

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
            match record.level() {
                Level::Error => console::error_1(&line),
                Level::Warn => console::warn_1(&line),
                Level::Info => console::info_1(&line),
                Level::Debug | Level::Trace => console::debug_1(&line),
            }
        }

        fn flush(&self) {}
    }

    /// Sends `log` records at `level` and above to the browser console and
    /// makes panics print there too. Later calls only change the level.
    pub fn init(level: LevelFilter) {
        INIT.call_once(|| {
            console_error_panic_hook::set_once();
            if log::set_logger(&LOGGER).is_err() {
                console::warn_1(&JsValue::from_str(
                    "[wasm-helper] another logger is installed, console logging skipped",
                ));
            }
        });
        log::set_max_level(level);
    }
}
