//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Required settings are absent from every layer.
    #[error("missing required settings: {}", .0.join(", "))]
    MissingSettings(Vec<String>),

    /// A setting is present but unusable.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}
