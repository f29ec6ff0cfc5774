//! Cache key derivation from source content and resolved configuration.

use crate::error::CacheError;
use crate::hash::ContentHash;
use quill_config::ResolvedConfig;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// An opaque cache key for one source file under one resolved configuration.
///
/// The key is the ordered concatenation `sourcePath:contentHash:serializedConfig`.
/// Two invocations produce the same key for a file iff neither the file's
/// content nor any resolved option changed. Keys are never persisted
/// directly; the key string *is* the persistence key in the store.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds a key from its three components.
    pub fn new(source: &Path, content_hash: ContentHash, config_fingerprint: &str) -> Self {
        Self(format!(
            "{}:{content_hash}:{config_fingerprint}",
            source.display()
        ))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The config tail is long and identical across keys; show the head.
        let head: String = self.0.chars().take(48).collect();
        write!(f, "CacheKey({head}..)")
    }
}

/// Derives cache keys lazily, one per source file, under a fixed
/// configuration.
///
/// The configuration fingerprint is captured once at construction. Keys are
/// memoized per path, and the same content-hash-plus-config formula serves
/// both originally requested inputs and dependencies the compiler discovers
/// mid-pass, so either kind of file resolves to the identical key.
pub struct Fingerprinter {
    config_fingerprint: String,
    keys: HashMap<PathBuf, CacheKey>,
}

impl Fingerprinter {
    /// Creates a fingerprinter for one resolved configuration.
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            config_fingerprint: config.fingerprint(),
            keys: HashMap::new(),
        }
    }

    /// Returns the cache key for a source file, computing it on first use.
    ///
    /// Reads and hashes the file content. The result is memoized: within
    /// one invocation a file is read at most once, and the key observed by
    /// the cache-seed phase is identical to the one the interceptor uses
    /// for writes emitted later in the same pass.
    pub fn key_for(&mut self, source: &Path) -> Result<CacheKey, CacheError> {
        if let Some(key) = self.keys.get(source) {
            return Ok(key.clone());
        }
        let content = std::fs::read(source).map_err(|e| CacheError::Io {
            path: source.to_path_buf(),
            source: e,
        })?;
        let key = CacheKey::new(
            source,
            ContentHash::from_bytes(&content),
            &self.config_fingerprint,
        );
        self.keys.insert(source.to_path_buf(), key.clone());
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_config::{load_config_from_str, resolve_config, ResolveContext};

    fn resolved(toml: &str, root: &Path) -> ResolvedConfig {
        let raw = load_config_from_str(toml).unwrap();
        resolve_config(raw, root, &ResolveContext::default())
    }

    #[test]
    fn key_format_has_three_components() {
        let key = CacheKey::new(
            Path::new("/proj/src/app.qm"),
            ContentHash::from_bytes(b"content"),
            "{\"declaration\":true}",
        );
        let s = key.as_str();
        assert!(s.starts_with("/proj/src/app.qm:"));
        assert!(s.ends_with(":{\"declaration\":true}"));
    }

    #[test]
    fn same_content_same_config_same_key() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.qm");
        std::fs::write(&file, "module a").unwrap();
        let config = resolved("", dir.path());

        let mut fp1 = Fingerprinter::new(&config);
        let mut fp2 = Fingerprinter::new(&config);
        assert_eq!(fp1.key_for(&file).unwrap(), fp2.key_for(&file).unwrap());
    }

    #[test]
    fn content_change_changes_key() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.qm");
        let config = resolved("", dir.path());

        std::fs::write(&file, "module a").unwrap();
        let before = Fingerprinter::new(&config).key_for(&file).unwrap();

        std::fs::write(&file, "module a ").unwrap();
        let after = Fingerprinter::new(&config).key_for(&file).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn config_change_changes_key() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.qm");
        std::fs::write(&file, "module a").unwrap();

        let strict = resolved("[options]\nstrict = true\n", dir.path());
        let lax = resolved("[options]\nstrict = false\n", dir.path());
        let key_strict = Fingerprinter::new(&strict).key_for(&file).unwrap();
        let key_lax = Fingerprinter::new(&lax).key_for(&file).unwrap();
        assert_ne!(key_strict, key_lax);
    }

    #[test]
    fn key_is_memoized_across_content_change() {
        // Within one invocation the first read wins; the key must stay
        // stable between the seed phase and interceptor writes.
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.qm");
        std::fs::write(&file, "module a").unwrap();
        let config = resolved("", dir.path());

        let mut fp = Fingerprinter::new(&config);
        let first = fp.key_for(&file).unwrap();
        std::fs::write(&file, "changed behind our back").unwrap();
        let second = fp.key_for(&file).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unreadable_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolved("", dir.path());
        let mut fp = Fingerprinter::new(&config);
        let err = fp.key_for(&dir.path().join("missing.qm")).unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }
}
