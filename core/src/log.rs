//! Logging helpers
//!
//! Thin wrappers over the `log` facade so call sites stay short. Nothing is
//! printed unless the host installs a logger (the browser client does so with
//! `console_log` behind its `browser_log` feature).

const TARGET: &str = "promraw";

/// Log an info message
pub fn info(msg: &str) {
    ::log::info!(target: TARGET, "{msg}");
}

/// Log a warning message
pub fn warn(msg: &str) {
    ::log::warn!(target: TARGET, "{msg}");
}

/// Log an error message
pub fn error(msg: &str) {
    ::log::error!(target: TARGET, "{msg}");
}

/// Log a debug message with a label
pub fn debug(label: &str, msg: &str) {
    ::log::debug!(target: TARGET, "[{label}] {msg}");
}

/// Log an action being performed
pub fn action(name: &str, details: &str) {
    ::log::info!(target: TARGET, ">> {name}: {details}");
}

/// Log a mint workflow state change
pub fn transition(from: &str, to: &str) {
    ::log::debug!(target: TARGET, "mint state {from} -> {to}");
}

/// Log action result
pub fn result(success: bool, msg: &str) {
    if success {
        ::log::info!(target: TARGET, "ok: {msg}");
    } else {
        ::log::warn!(target: TARGET, "failed: {msg}");
    }
}
