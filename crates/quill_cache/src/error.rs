//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur inside the cache subsystem.
///
/// Store reads never surface these: a failed read is a cache miss. The enum
/// exists for fingerprinting (where an unreadable requested input is a real
/// error the caller must see) and for internal propagation inside the
/// on-disk store.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading a source file or writing an entry.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An entry could not be encoded or decoded.
    #[error("cache serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },
}
