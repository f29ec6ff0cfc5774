//! The ordered, deduplicated result set returned to the caller.

use quill_cache::EmittedArtifact;
use std::collections::HashMap;
use std::path::PathBuf;

/// An ordered collection of emitted artifacts, deduplicated by
/// `(file_name, source)`.
///
/// Upserting an artifact whose identity pair is already present replaces
/// the earlier artifact in place — position preserved, never duplicated.
/// This is what makes cache seeding before a fresh compile pass safe: a
/// file recompiled in the same run overwrites its seeded entry instead of
/// accumulating next to it. Iteration order is insertion order.
#[derive(Debug, Default)]
pub struct OutputCollection {
    artifacts: Vec<EmittedArtifact>,
    index: HashMap<(String, PathBuf), usize>,
}

impl OutputCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an artifact, replacing in place any earlier artifact with
    /// the same `(file_name, source)` identity.
    pub fn upsert(&mut self, artifact: EmittedArtifact) {
        let slot = (artifact.file_name.clone(), artifact.source.clone());
        match self.index.get(&slot) {
            Some(&position) => self.artifacts[position] = artifact,
            None => {
                self.index.insert(slot, self.artifacts.len());
                self.artifacts.push(artifact);
            }
        }
    }

    /// Returns the artifacts in insertion order.
    pub fn artifacts(&self) -> &[EmittedArtifact] {
        &self.artifacts
    }

    /// Returns the number of artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Returns `true` if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Consumes the collection, returning the artifacts in insertion order.
    pub fn into_vec(self) -> Vec<EmittedArtifact> {
        self.artifacts
    }
}

impl<'a> IntoIterator for &'a OutputCollection {
    type Item = &'a EmittedArtifact;
    type IntoIter = std::slice::Iter<'a, EmittedArtifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.iter()
    }
}
