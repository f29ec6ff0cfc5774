//! Declaration-artifact cache keyed by content and configuration.
//!
//! This crate provides the fingerprinting scheme that decides when a cached
//! declaration artifact is safe to reuse, the artifact/entry data model, and
//! the store adapter interface with in-memory and on-disk backends. Reads
//! are fail-safe: corruption or version mismatches degrade to cache misses,
//! never errors.

#![warn(missing_docs)]

pub mod artifact;
pub mod error;
pub mod hash;
pub mod key;
pub mod store;

pub use artifact::EmittedArtifact;
pub use error::CacheError;
pub use hash::ContentHash;
pub use key::{CacheKey, Fingerprinter};
pub use store::{CacheStore, DiskStore, MemoryStore};
