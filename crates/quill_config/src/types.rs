//! Configuration types deserialized from `quill.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// The top-level project configuration parsed from `quill.toml`.
///
/// All tables are optional; an empty file is a valid configuration that
/// emits declarations with no aliases and no incremental state.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectConfig {
    /// Declaration-emission settings.
    #[serde(default)]
    pub emit: EmitConfig,
    /// Incremental compilation settings.
    #[serde(default)]
    pub incremental: IncrementalConfig,
    /// Symbolic path aliases mapping an import-time name to a
    /// project-root-relative filesystem target.
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
    /// Arbitrary compiler options passed through to the external compiler
    /// verbatim. They participate in cache-key fingerprinting.
    #[serde(default)]
    pub options: BTreeMap<String, toml::Value>,
}

/// Settings controlling what the compiler emits.
#[derive(Debug, Deserialize)]
pub struct EmitConfig {
    /// Whether declaration artifacts are emitted. On by default; this
    /// subsystem exists to produce them.
    #[serde(default = "default_true")]
    pub declaration: bool,
    /// Whether declaration source maps are emitted. `None` means "not
    /// explicitly configured" and is subject to execution-mode defaulting
    /// during resolution.
    #[serde(default)]
    pub declaration_map: Option<bool>,
    /// Suppresses all compiler output. Conflicts with declaration emission;
    /// the conflict is non-fatal but short-circuits the build to an empty
    /// result.
    #[serde(default)]
    pub no_emit: bool,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            declaration: true,
            declaration_map: None,
            no_emit: false,
        }
    }
}

/// Settings for the external compiler's incremental build state.
#[derive(Debug, Default, Deserialize)]
pub struct IncrementalConfig {
    /// Whether incremental compilation is enabled. `None` means "not
    /// explicitly configured"; resolution turns it on when caching is
    /// enabled process-wide.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Project-root-relative path for the compiler's incremental-state
    /// file. Defaulted during resolution when incremental mode is forced on.
    #[serde(default)]
    pub state_file: Option<String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn empty_config_defaults() {
        let config = load_config_from_str("").unwrap();
        assert!(config.emit.declaration);
        assert_eq!(config.emit.declaration_map, None);
        assert!(!config.emit.no_emit);
        assert_eq!(config.incremental.enabled, None);
        assert!(config.paths.is_empty());
        assert!(config.options.is_empty());
    }

    #[test]
    fn emit_table() {
        let toml = r#"
[emit]
declaration = true
declaration_map = false
no_emit = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(config.emit.declaration);
        assert_eq!(config.emit.declaration_map, Some(false));
        assert!(config.emit.no_emit);
    }

    #[test]
    fn incremental_table() {
        let toml = r#"
[incremental]
enabled = true
state_file = ".quill/state.bin"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.incremental.enabled, Some(true));
        assert_eq!(config.incremental.state_file.as_deref(), Some(".quill/state.bin"));
    }

    #[test]
    fn paths_table() {
        let toml = r#"
[paths]
"@app" = "src/app"
"@lib" = "src/lib"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.paths.len(), 2);
        assert_eq!(config.paths["@app"], "src/app");
    }

    #[test]
    fn options_passthrough_preserves_values() {
        let toml = r#"
[options]
strict = true
target = "es2020"
max_depth = 4
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.options["strict"], toml::Value::Boolean(true));
        assert_eq!(
            config.options["target"],
            toml::Value::String("es2020".to_string())
        );
        assert_eq!(config.options["max_depth"], toml::Value::Integer(4));
    }
}
