//! Structured diagnostic messages returned by the external compiler.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The severity of a diagnostic.
///
/// Severity selects the log level during reporting. It does not soften the
/// build driver's all-or-nothing failure policy: a pass that produced any
/// diagnostics fails as one aggregate error after everything is reported.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// A problem worth surfacing that the compiler chose to report.
    Warning,
    /// A definite error.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One diagnostic produced by the external compiler during an emit pass.
///
/// The source location is optional: some diagnostics (configuration-level
/// complaints, internal notices) have no position, and reporting degrades
/// to the bare message for them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level.
    pub severity: Severity,
    /// The diagnostic message text.
    pub message: String,
    /// The source file the diagnostic points into, if any.
    pub file: Option<PathBuf>,
    /// Byte offset of the location within `file`, if any.
    pub offset: Option<u32>,
}

impl Diagnostic {
    /// Creates an error diagnostic with no source location.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            file: None,
            offset: None,
        }
    }

    /// Creates a warning diagnostic with no source location.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            file: None,
            offset: None,
        }
    }

    /// Attaches a source location to this diagnostic.
    pub fn at(mut self, file: impl Into<PathBuf>, offset: u32) -> Self {
        self.file = Some(file.into());
        self.offset = Some(offset);
        self
    }
}
