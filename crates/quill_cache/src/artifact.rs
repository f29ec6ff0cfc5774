//! The unit of compiler output this subsystem caches and returns.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One compiler-produced output unit: a declaration file or its source map.
///
/// Several artifacts may share an originating source file (a declaration
/// plus its map). The `(file_name, source)` pair identifies an artifact for
/// deduplication purposes; `text` is the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedArtifact {
    /// The output file name the compiler chose for this artifact.
    pub file_name: String,
    /// The textual content of the artifact.
    pub text: String,
    /// The source file this artifact was generated from.
    pub source: PathBuf,
}

impl EmittedArtifact {
    /// Creates an artifact.
    pub fn new(
        file_name: impl Into<String>,
        text: impl Into<String>,
        source: impl AsRef<Path>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            text: text.into(),
            source: source.as_ref().to_path_buf(),
        }
    }
}
