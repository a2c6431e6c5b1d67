/// Conditional logging module for development builds
///
/// The `log!` macro provides informational logging that is compiled out in
/// production (release) builds by default. `log_warn!` and `log_error!` are
/// always compiled in; they report data that could not be loaded or written.
///
/// Output goes to the browser console on wasm32 and to stderr elsewhere, so
/// the engine can be exercised by native unit tests.
///
/// Logging is enabled when either:
/// - Building in debug mode (`cfg(debug_assertions)`)
/// - The `console_logging` feature is explicitly enabled
///
/// # Examples
///
/// ```rust
/// use mrt_timetable::log;
///
/// log!("Loaded {} stations", 16);
/// ```
/// Conditionally log in development builds
#[macro_export]
macro_rules! log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            $crate::logging::emit_log(&format!($($arg),+));
        }
    };
}

/// Log a recoverable problem
#[macro_export]
macro_rules! log_warn {
    ($($arg:expr),+ $(,)?) => {
        $crate::logging::emit_warn(&format!($($arg),+))
    };
}

/// Log a failure that the caller degraded from
#[macro_export]
macro_rules! log_error {
    ($($arg:expr),+ $(,)?) => {
        $crate::logging::emit_error(&format!($($arg),+))
    };
}

#[cfg(target_arch = "wasm32")]
pub fn emit_log(message: &str) {
    web_sys::console::log_1(&message.into());
}

#[cfg(target_arch = "wasm32")]
pub fn emit_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

#[cfg(target_arch = "wasm32")]
pub fn emit_error(message: &str) {
    web_sys::console::error_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn emit_log(message: &str) {
    eprintln!("{message}");
}

#[cfg(not(target_arch = "wasm32"))]
pub fn emit_warn(message: &str) {
    eprintln!("warning: {message}");
}

#[cfg(not(target_arch = "wasm32"))]
pub fn emit_error(message: &str) {
    eprintln!("error: {message}");
}
