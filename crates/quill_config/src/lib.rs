//! Parsing, validation, and resolution of `quill.toml` configuration files.
//!
//! This crate reads the project configuration file and produces an immutable
//! [`ResolvedConfig`] with path-alias sanitization, emission-conflict
//! detection, and incremental-mode defaulting applied.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_config, ExecutionMode, ResolveContext, ResolvedConfig};
pub use types::{EmitConfig, IncrementalConfig, ProjectConfig};
