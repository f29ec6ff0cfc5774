//! Interception of the compiler's file writes during one emit pass.

use crate::collection::OutputCollection;
use crate::compiler::{ArtifactWrite, WriteSink};
use quill_cache::{CacheKey, EmittedArtifact, Fingerprinter};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The sole write path for one compile pass.
///
/// An incremental compiler compiles its whole dependency graph even when
/// only a subset of files was requested, so one pass can emit declarations
/// for files far beyond the requested set. The interceptor does the dual
/// bookkeeping that keeps that correct: requested-input artifacts go into
/// the caller's [`OutputCollection`], and every attributable artifact is
/// appended to the cache entry under its source's key so a future
/// invocation that requests it can reuse the result.
///
/// Writes targeting the incremental-state file bypass both: the state blob
/// is compiler-owned and goes verbatim to its configured location. Writes
/// with no attributable source are dropped; attribution is required for
/// correct scoping.
pub struct OutputInterceptor<'a> {
    state_file: Option<&'a Path>,
    requested: HashSet<PathBuf>,
    fingerprinter: &'a mut Fingerprinter,
    collection: &'a mut OutputCollection,
    entries: HashMap<CacheKey, Vec<EmittedArtifact>>,
    artifact_writes: usize,
    dropped_writes: usize,
    state_writes: usize,
}

impl<'a> OutputInterceptor<'a> {
    /// Creates an interceptor for one pass over `inputs`.
    pub fn new(
        state_file: Option<&'a Path>,
        inputs: &[PathBuf],
        fingerprinter: &'a mut Fingerprinter,
        collection: &'a mut OutputCollection,
    ) -> Self {
        Self {
            state_file,
            requested: inputs.iter().cloned().collect(),
            fingerprinter,
            collection,
            entries: HashMap::new(),
            artifact_writes: 0,
            dropped_writes: 0,
            state_writes: 0,
        }
    }

    /// Consumes the interceptor, returning the cache entries constructed
    /// during the pass.
    pub fn into_entries(self) -> HashMap<CacheKey, Vec<EmittedArtifact>> {
        self.entries
    }

    /// Number of attributable artifact writes accepted during the pass.
    pub fn artifact_writes(&self) -> usize {
        self.artifact_writes
    }

    /// Number of writes dropped for lack of an attributable source.
    pub fn dropped_writes(&self) -> usize {
        self.dropped_writes
    }

    /// Number of writes routed to the incremental-state file.
    pub fn state_writes(&self) -> usize {
        self.state_writes
    }

    fn write_state(&self, path: &Path, text: &str) {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("failed to create incremental-state directory: {e}");
                return;
            }
        }
        if let Err(e) = std::fs::write(path, text) {
            // Losing the state degrades the next run to a colder compile;
            // it never fails this one.
            warn!("failed to write incremental state to {}: {e}", path.display());
        }
    }
}

impl WriteSink for OutputInterceptor<'_> {
    fn write(&mut self, write: ArtifactWrite<'_>) {
        if let Some(state_file) = self.state_file {
            if Path::new(write.file_name) == state_file {
                self.state_writes += 1;
                self.write_state(state_file, write.text);
                return;
            }
        }

        let Some(source) = write.source else {
            self.dropped_writes += 1;
            return;
        };
        self.artifact_writes += 1;

        let artifact = EmittedArtifact::new(write.file_name, write.text, source);
        if self.requested.contains(source) {
            self.collection.upsert(artifact.clone());
        }
        match self.fingerprinter.key_for(source) {
            Ok(key) => self.entries.entry(key).or_default().push(artifact),
            Err(e) => {
                debug!(
                    "not caching artifact for unhashable source {}: {e}",
                    source.display()
                );
            }
        }
    }
}
