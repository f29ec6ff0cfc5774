//! Formatting and emission of compiler diagnostics.

use crate::diagnostic::{Diagnostic, Severity};
use std::path::PathBuf;
use tracing::{error, warn};

/// Converts a byte offset into 1-indexed (line, column) coordinates.
///
/// Offsets past the end of the content clamp to the final position.
pub fn line_col(content: &str, byte_offset: u32) -> (u32, u32) {
    let offset = (byte_offset as usize).min(content.len());
    let mut line = 1u32;
    let mut line_start = 0usize;
    for (i, byte) in content.bytes().enumerate().take(offset) {
        if byte == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    (line, (offset - line_start) as u32 + 1)
}

/// Formats and logs compiler diagnostics.
///
/// Reporting is exhaustive: every diagnostic in a batch is rendered and
/// logged before the caller decides to fail, so one run surfaces every
/// error it produced.
pub struct DiagnosticReporter {
    project_root: PathBuf,
}

impl DiagnosticReporter {
    /// Creates a reporter that renders file paths relative to `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Logs every diagnostic and returns the number reported.
    ///
    /// Errors log at error level, warnings at warn level. Never fails fast:
    /// the full batch is emitted regardless of severity.
    pub fn report_all(&self, diagnostics: &[Diagnostic]) -> usize {
        for diag in diagnostics {
            let rendered = self.render(diag);
            match diag.severity {
                Severity::Error => error!("{rendered}"),
                Severity::Warning => warn!("{rendered}"),
            }
        }
        diagnostics.len()
    }

    /// Renders one diagnostic as `relative/path:line:col: message`.
    ///
    /// The line/column is resolved by reading the source file; if the file
    /// cannot be read or the diagnostic carries no location, rendering
    /// degrades to the path-less or bare message form.
    pub fn render(&self, diag: &Diagnostic) -> String {
        let Some(file) = &diag.file else {
            return diag.message.clone();
        };
        let rel = file.strip_prefix(&self.project_root).unwrap_or(file);

        if let Some(offset) = diag.offset {
            if let Ok(content) = std::fs::read_to_string(file) {
                let (line, col) = line_col(&content, offset);
                return format!("{}:{line}:{col}: {}", rel.display(), diag.message);
            }
        }
        format!("{}: {}", rel.display(), diag.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_start_of_content() {
        assert_eq!(line_col("abc\ndef", 0), (1, 1));
    }

    #[test]
    fn line_col_middle_of_line() {
        assert_eq!(line_col("abc\ndef", 2), (1, 3));
    }

    #[test]
    fn line_col_after_newline() {
        assert_eq!(line_col("abc\ndef", 4), (2, 1));
        assert_eq!(line_col("abc\ndef", 6), (2, 3));
    }

    #[test]
    fn line_col_clamps_past_end() {
        assert_eq!(line_col("abc", 100), (1, 4));
    }

    #[test]
    fn render_with_location() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("widget.qm");
        std::fs::write(&file, "export struct Widget\n  size: int\n").unwrap();

        let reporter = DiagnosticReporter::new(dir.path());
        let diag = Diagnostic::error("unknown type 'int'").at(&file, 29);
        assert_eq!(reporter.render(&diag), "widget.qm:2:9: unknown type 'int'");
    }

    #[test]
    fn render_unreadable_file_degrades_to_path() {
        let reporter = DiagnosticReporter::new("/proj");
        let diag = Diagnostic::error("boom").at("/proj/missing.qm", 3);
        assert_eq!(reporter.render(&diag), "missing.qm: boom");
    }

    #[test]
    fn render_without_location_is_bare_message() {
        let reporter = DiagnosticReporter::new("/proj");
        let diag = Diagnostic::error("configuration problem");
        assert_eq!(reporter.render(&diag), "configuration problem");
    }

    #[test]
    fn render_path_outside_root_stays_absolute() {
        let reporter = DiagnosticReporter::new("/proj");
        let diag = Diagnostic::error("boom").at("/other/file.qm", 0);
        assert_eq!(reporter.render(&diag), "/other/file.qm: boom");
    }

    #[test]
    fn report_all_counts_every_diagnostic() {
        let reporter = DiagnosticReporter::new("/proj");
        let batch = vec![
            Diagnostic::error("first"),
            Diagnostic::warning("second"),
            Diagnostic::error("third"),
        ];
        assert_eq!(reporter.report_all(&batch), 3);
    }
}
