#![deny(missing_docs)]
//! Shared logging utilities for the cook-mode workspace.
//!
//! This crate provides the `chef_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every line is
//! prefixed with the most recent timer tick so log output can be lined up
//! against timer state.

use std::sync::atomic::{AtomicU64, Ordering};

/// Tick count published by the timer driver. Shared across threads because
/// the driver runs on the engine runtime while most logging happens on the
/// UI loop.
static TIMER_TICK: AtomicU64 = AtomicU64::new(0);

/// Publishes the current timer tick count.
/// The tick driver calls this once per tick.
pub fn set_tick(tick: u64) {
    TIMER_TICK.store(tick, Ordering::Relaxed);
}

/// Retrieves the last published tick count.
/// Returns 0 if no tick has been published yet.
pub fn get_tick() -> u64 {
    TIMER_TICK.load(Ordering::Relaxed)
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! chef_trace {
    ($($arg:tt)*) => {{
        log::trace!("[tick {}] {}", $crate::get_tick(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! chef_info {
    ($($arg:tt)*) => {{
        log::info!("[tick {}] {}", $crate::get_tick(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! chef_debug {
    ($($arg:tt)*) => {{
        log::debug!("[tick {}] {}", $crate::get_tick(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! chef_warn {
    ($($arg:tt)*) => {{
        log::warn!("[tick {}] {}", $crate::get_tick(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! chef_error {
    ($($arg:tt)*) => {{
        log::error!("[tick {}] {}", $crate::get_tick(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
