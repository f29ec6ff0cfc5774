//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::io::ErrorKind;
use std::path::Path;

/// File name of the project configuration, relative to the project root.
pub const CONFIG_FILE: &str = "quill.toml";

/// Loads and validates a `quill.toml` configuration from a project root.
///
/// Returns `Ok(None)` when no configuration file exists — callers treat
/// that as "nothing to emit". Any other read failure, parse failure, or
/// validation failure is fatal.
pub fn load_config(project_root: &Path) -> Result<Option<ProjectConfig>, ConfigError> {
    let config_path = project_root.join(CONFIG_FILE);
    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::Io(e)),
    };
    load_config_from_str(&content).map(Some)
}

/// Parses and validates a `quill.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are internally consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    for (alias, target) in &config.paths {
        if alias.is_empty() {
            return Err(ConfigError::Invalid(
                "path alias with an empty name".to_string(),
            ));
        }
        if target.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "path alias '{alias}' has an empty target"
            )));
        }
    }
    if let Some(state_file) = &config.incremental.state_file {
        if state_file.is_empty() {
            return Err(ConfigError::Invalid(
                "incremental.state_file must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}
