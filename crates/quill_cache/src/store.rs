//! Cache store adapters: the keyed get/set interface and two backends.

use crate::artifact::EmittedArtifact;
use crate::error::CacheError;
use crate::hash::ContentHash;
use crate::key::CacheKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Keyed access to persisted cache entries.
///
/// The surface is deliberately infallible: `get` answers with the artifact
/// list or a miss, `set` answers with nothing. Backend failures are the
/// backend's own business — a failed read is a miss, a failed write is a
/// logged no-op — so the build driver's control flow never branches on
/// storage health.
pub trait CacheStore {
    /// Returns the artifact list stored under `key`, or `None` on a miss.
    fn get(&self, key: &CacheKey) -> Option<Vec<EmittedArtifact>>;

    /// Stores (or overwrites) the artifact list under `key`.
    fn set(&mut self, key: &CacheKey, artifacts: &[EmittedArtifact]);
}

impl<S: CacheStore + ?Sized> CacheStore for &mut S {
    fn get(&self, key: &CacheKey) -> Option<Vec<EmittedArtifact>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &CacheKey, artifacts: &[EmittedArtifact]) {
        (**self).set(key, artifacts)
    }
}

/// A process-local store backed by a map. Used in tests and by embedders
/// that manage persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<EmittedArtifact>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all stored entries, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[EmittedArtifact])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &CacheKey) -> Option<Vec<EmittedArtifact>> {
        self.entries.get(key.as_str()).cloned()
    }

    fn set(&mut self, key: &CacheKey, artifacts: &[EmittedArtifact]) {
        self.entries.insert(key.as_str().to_string(), artifacts.to_vec());
    }
}

/// Magic bytes identifying a quill cache entry file.
const ENTRY_MAGIC: [u8; 4] = *b"QLCE";

/// Entry format version. Increment on breaking changes to the header or
/// payload encoding.
const ENTRY_FORMAT_VERSION: u32 = 1;

/// Subdirectory of the cache directory holding entry files.
const ENTRY_SUBDIR: &str = "entries";

/// File extension for entry files.
const ENTRY_EXT: &str = "entry";

/// Header prepended to every on-disk entry for validation.
#[derive(Debug, Serialize, Deserialize)]
struct EntryHeader {
    magic: [u8; 4],
    format_version: u32,
    checksum: ContentHash,
}

/// The default persistent backend: one file per cache entry.
///
/// Entries live at `<cache_dir>/entries/<hash-of-key>.entry` as a
/// length-prefixed bincode header followed by the bincode-encoded artifact
/// list. Reads validate magic, version, and checksum and fail safe to a
/// miss. Eviction is not implemented here; it belongs to whoever owns the
/// cache directory.
#[derive(Debug)]
pub struct DiskStore {
    cache_dir: PathBuf,
}

impl DiskStore {
    /// Creates a store rooted at the given cache directory.
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the entry file path for a key.
    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        let name = ContentHash::from_bytes(key.as_str().as_bytes());
        self.cache_dir
            .join(ENTRY_SUBDIR)
            .join(format!("{name}.{ENTRY_EXT}"))
    }

    fn write_entry(&self, key: &CacheKey, artifacts: &[EmittedArtifact]) -> Result<(), CacheError> {
        let dir = self.cache_dir.join(ENTRY_SUBDIR);
        std::fs::create_dir_all(&dir).map_err(|e| CacheError::Io {
            path: dir,
            source: e,
        })?;

        let payload = bincode::serde::encode_to_vec(artifacts, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;
        let header = EntryHeader {
            magic: ENTRY_MAGIC,
            format_version: ENTRY_FORMAT_VERSION,
            checksum: ContentHash::from_bytes(&payload),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        // Layout: 4-byte header length (little-endian) + header + payload.
        let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
        output.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(&payload);

        let path = self.entry_path(key);
        std::fs::write(&path, &output).map_err(|e| CacheError::Io { path, source: e })
    }

    fn read_entry(&self, key: &CacheKey) -> Option<Vec<EmittedArtifact>> {
        let raw = std::fs::read(self.entry_path(key)).ok()?;
        if raw.len() < 4 {
            return None;
        }
        let header_len = u32::from_le_bytes(raw[..4].try_into().ok()?) as usize;
        if raw.len() < 4 + header_len {
            return None;
        }
        let header: EntryHeader =
            bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
                .ok()?
                .0;
        if header.magic != ENTRY_MAGIC || header.format_version != ENTRY_FORMAT_VERSION {
            return None;
        }
        let payload = &raw[4 + header_len..];
        if ContentHash::from_bytes(payload) != header.checksum {
            return None;
        }
        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .ok()
            .map(|(artifacts, _)| artifacts)
    }
}

impl CacheStore for DiskStore {
    fn get(&self, key: &CacheKey) -> Option<Vec<EmittedArtifact>> {
        self.read_entry(key)
    }

    fn set(&mut self, key: &CacheKey, artifacts: &[EmittedArtifact]) {
        if let Err(e) = self.write_entry(key, artifacts) {
            warn!("failed to persist cache entry: {e}");
        }
    }
}
