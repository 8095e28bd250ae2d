//! Error types for the filterset crate.

use thiserror::Error;

/// A configuration failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The default operator is missing or empty.
    #[error("default operator not found")]
    MissingDefaultOperator,

    /// The operator list is missing or empty.
    #[error("no operators found")]
    NoOperators,

    /// The default operator is not one of the configured operators.
    #[error("default operator '{operator}' must be included in operators list")]
    DefaultOperatorNotListed { operator: String },
}

/// Errors that can occur when configuring filter sets.
///
/// Data operations (add, remove, exists, includes, concat, clear) never fail;
/// only configuration can.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Configuration or payload text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration text is not valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for filterset operations.
pub type Result<T> = std::result::Result<T, FilterError>;
