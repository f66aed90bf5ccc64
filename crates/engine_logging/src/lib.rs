#![deny(missing_docs)]
//! Shared logging utilities for the harvester workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! a per-thread cycle tag that the macros prefix onto every message, and a
//! minimal test initializer for the global logger.

use std::cell::Cell;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Harvest cycle currently being executed on this thread (0 = outside a run).
    static CYCLE: Cell<u32> = const { Cell::new(0) };
}

/// Sets the harvest cycle number for the current thread.
/// The harvest loop calls this at the start of every cycle and resets it to 0
/// when the run ends.
pub fn set_cycle(cycle: u32) {
    CYCLE.with(|v| v.set(cycle));
}

/// Retrieves the harvest cycle number for the current thread.
/// Returns 0 outside a run.
pub fn current_cycle() -> u32 {
    CYCLE.with(|v| v.get())
}

#[doc(hidden)]
#[macro_export]
macro_rules! __engine_log {
    ($level:ident, $($arg:tt)*) => {{
        match $crate::current_cycle() {
            0 => $crate::log::$level!($($arg)*),
            cycle => $crate::log::$level!("[cycle {}] {}", cycle, format_args!($($arg)*)),
        }
    }};
}

/// Logs a trace-level message tagged with the current cycle.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => { $crate::__engine_log!(trace, $($arg)*) };
}

/// Logs a debug-level message tagged with the current cycle.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => { $crate::__engine_log!(debug, $($arg)*) };
}

/// Logs an info-level message tagged with the current cycle.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => { $crate::__engine_log!(info, $($arg)*) };
}

/// Logs a warn-level message tagged with the current cycle.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => { $crate::__engine_log!(warn, $($arg)*) };
}

/// Logs an error-level message tagged with the current cycle.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => { $crate::__engine_log!(error, $($arg)*) };
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
