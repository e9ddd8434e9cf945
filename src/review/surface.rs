//! The editor-facing surface interface.
//!
//! The crate does not create buffers or bind keys; whatever hosts a
//! review implements [`ReviewSurface`] and the session drives it. The
//! shipped [`crate::commands::console::ConsoleSurface`] is the terminal
//! rendition; editors plug in their own.

use super::context::ReviewContext;

/// How prominently a status message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Routine confirmation.
    Info,
    /// Something the user should act on (e.g. regenerate a stale patch).
    Warn,
    /// The action failed.
    Error,
}

impl Severity {
    /// Label used by log-style presenters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One open presentation of a pending edit.
///
/// The session calls `preview` exactly once when the review opens,
/// `notify` once per action outcome, and `close` exactly once over the
/// surface's lifetime (the session guards re-entry).
pub trait ReviewSurface {
    /// Display the proposed diff with its context attached.
    fn preview(&mut self, diff: &str, context: &ReviewContext);

    /// Surface a status message to the user.
    fn notify(&mut self, message: &str, severity: Severity);

    /// Tear down the presentation.
    fn close(&mut self);
}
