//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `quill.toml`
/// configuration. All of these are fatal and abort before any compilation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// The configuration parsed but a value failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse() {
        let err = ConfigError::Parse("expected '=' at line 3".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse configuration: expected '=' at line 3"
        );
    }

    #[test]
    fn display_invalid() {
        let err = ConfigError::Invalid("path alias '@x' has an empty target".to_string());
        assert_eq!(
            format!("{err}"),
            "invalid configuration: path alias '@x' has an empty target"
        );
    }

    #[test]
    fn display_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::Io(io);
        assert!(format!("{err}").starts_with("failed to read configuration:"));
    }
}
