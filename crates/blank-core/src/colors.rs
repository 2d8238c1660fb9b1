//! Terminal styling for listings and traces.
//!
//! Styles are named by role, not by hue, so dump and trace agree on what
//! each part of a line means.

use std::fmt::Display;

/// ANSI escape sequences keyed by role. Every field is empty when styling
/// is off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    /// `[labels]` / `[code]` section headers.
    pub heading: &'static str,
    /// Label names, declared or referenced.
    pub label: &'static str,
    /// Immediate arguments: push values, copy/slide counts.
    pub literal: &'static str,
    /// Normal termination.
    pub ok: &'static str,
    /// Faults and dangling references.
    pub error: &'static str,
    /// Indices, resolved targets, stack and memory notes.
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        heading: "\x1b[1;34m",
        label: "\x1b[34m",
        literal: "\x1b[32m",
        ok: "\x1b[1;32m",
        error: "\x1b[31m",
        muted: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        heading: "",
        label: "",
        literal: "",
        ok: "",
        error: "",
        muted: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }

    /// `text` wrapped in `style` and a trailing reset.
    pub fn paint(&self, style: &str, text: impl Display) -> String {
        format!("{style}{text}{}", self.reset)
    }
}
