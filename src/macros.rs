//! Small crate-wide convenience macros.
//!
//! The logging macros route to the browser console on `wasm32` and to stderr
//! everywhere else, so the layout/state code can log freely and still run
//! under a plain `cargo test`.

/// Severity used by the console macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

#[doc(hidden)]
pub fn write_line(level: Level, line: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        let value = wasm_bindgen::JsValue::from_str(line);
        match level {
            Level::Info => web_sys::console::log_1(&value),
            Level::Warn => web_sys::console::warn_1(&value),
            Level::Error => web_sys::console::error_1(&value),
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let tag = match level {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        };
        eprintln!("[{}] {}", tag, line);
    }
}

/// Log an arbitrary JSON payload next to a label.  In the browser the payload
/// is converted to a real JS object so it can be expanded in devtools.
#[doc(hidden)]
pub fn write_payload(label: &str, payload: &serde_json::Value) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_wasm_bindgen::to_value(payload) {
            Ok(js) => web_sys::console::log_2(&wasm_bindgen::JsValue::from_str(label), &js),
            Err(e) => write_line(Level::Warn, &format!("{} <unserializable: {}>", label, e)),
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        write_line(Level::Info, &format!("{} {}", label, payload));
    }
}

/// `console.log` with `format!` syntax.
#[macro_export]
macro_rules! console_log {
    ($($arg:tt)*) => {
        $crate::macros::write_line($crate::macros::Level::Info, &format!($($arg)*))
    };
}

/// `console.warn` with `format!` syntax.
#[macro_export]
macro_rules! console_warn {
    ($($arg:tt)*) => {
        $crate::macros::write_line($crate::macros::Level::Warn, &format!($($arg)*))
    };
}

/// `console.error` with `format!` syntax.
#[macro_export]
macro_rules! console_error {
    ($($arg:tt)*) => {
        $crate::macros::write_line($crate::macros::Level::Error, &format!($($arg)*))
    };
}
