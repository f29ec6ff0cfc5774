//! Errors surfaced by the build driver.

use quill_cache::CacheError;
use quill_config::ConfigError;

/// Errors a declaration-emit run can surface to the caller.
///
/// These are the only failure modes exposed: configuration problems,
/// unreadable requested inputs, and compiler diagnostics. Cache-store
/// failures are the store's own business and degrade to misses or logged
/// no-ops without reaching here.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// The project configuration is malformed. Fatal before compilation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A requested input file could not be read for fingerprinting.
    #[error("cannot fingerprint requested input: {0}")]
    Input(#[from] CacheError),

    /// The compile pass produced diagnostics. Every one was reported
    /// before this aggregate failure was raised; the pass's partial output
    /// was discarded.
    #[error("declaration emit failed with {count} compiler diagnostic(s)")]
    Compile {
        /// Number of diagnostics reported.
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_display() {
        let err = EmitError::Compile { count: 3 };
        assert_eq!(
            format!("{err}"),
            "declaration emit failed with 3 compiler diagnostic(s)"
        );
    }

    #[test]
    fn config_error_passes_through() {
        let err: EmitError = ConfigError::Parse("bad toml".to_string()).into();
        assert_eq!(format!("{err}"), "failed to parse configuration: bad toml");
    }

    #[test]
    fn input_error_wraps_cache_error() {
        let err: EmitError = CacheError::Serialization {
            reason: "boom".to_string(),
        }
        .into();
        assert!(format!("{err}").starts_with("cannot fingerprint requested input:"));
    }
}
