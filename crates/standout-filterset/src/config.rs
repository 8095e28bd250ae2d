//! Filter set configuration and the process-wide default.
//!
//! A [`Config`] names the operators a filter set accepts and which of them is
//! used when a call does not pass one explicitly. Every filter set carries the
//! configuration it was created with, and every set derived from it shares
//! that same configuration.
//!
//! # Global Configuration
//!
//! Sets created without an explicit override read the process-wide
//! configuration. It starts out as [`Config::default`] and is replaced by
//! [`FilterSet::configure`](crate::FilterSet::configure). Only sets created
//! afterwards see the new value.
//!
//! Reconfiguration is serialized by a mutex, so concurrent `configure` calls
//! never interleave. A set constructed while another thread reconfigures sees
//! either the old or the new configuration. Configure once at startup when
//! the distinction matters.
//!
//! # Overrides
//!
//! A [`ConfigOverride`] is a partial configuration. Applying it replaces only
//! the keys it sets, and the merged result is validated before use:
//!
//! ```rust
//! use standout_filterset::{Config, ConfigOverride};
//!
//! let base = Config::default();
//! let merged = base
//!     .merged(&ConfigOverride::new().operators(["=", "^"]))
//!     .unwrap();
//! assert_eq!(merged.default_operator(), "=");
//! assert_eq!(merged.operators().len(), 2);
//!
//! // the default "=" would no longer be a listed operator
//! let rejected = base.merged(&ConfigOverride::new().operators(["~"]));
//! assert!(rejected.is_err());
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::operator::Operator;

/// Operator used when none is given, in the built-in configuration.
pub const DEFAULT_OPERATOR: &str = "=";

/// Operators offered by the built-in configuration.
pub const DEFAULT_OPERATORS: &[&str] = &["=", "!=", ">", ">=", "<", "<=", "^", "~"];

/// Validated filter set configuration.
///
/// The default operator is always non-empty and a member of a non-empty
/// operator list. The only way to obtain a `Config` is through a validating
/// path ([`Config::new`], [`Config::merged`], deserialization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ConfigOverride")]
pub struct Config {
    default_operator: Operator,
    operators: Vec<Operator>,
}

impl Config {
    /// Creates a validated configuration.
    pub fn new<I, O>(
        default_operator: impl Into<Operator>,
        operators: I,
    ) -> std::result::Result<Self, ConfigError>
    where
        I: IntoIterator<Item = O>,
        O: Into<Operator>,
    {
        let config = Config {
            default_operator: default_operator.into(),
            operators: operators.into_iter().map(Into::into).collect(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns the operator used when a call does not pass one.
    pub fn default_operator(&self) -> &Operator {
        &self.default_operator
    }

    /// Returns the configured operators, in declaration order.
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Returns `true` if `op` is one of the configured operators.
    pub fn supports(&self, op: &str) -> bool {
        self.operators.iter().any(|o| o == op)
    }

    /// Checks the configuration invariants.
    ///
    /// Checks run in order: the default operator must be non-empty, the
    /// operator list must be non-empty, and the default must be listed.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.default_operator.is_empty() {
            return Err(ConfigError::MissingDefaultOperator);
        }
        if self.operators.is_empty() {
            return Err(ConfigError::NoOperators);
        }
        if !self.supports(&self.default_operator) {
            return Err(ConfigError::DefaultOperatorNotListed {
                operator: self.default_operator.to_string(),
            });
        }
        Ok(())
    }

    /// Shallow-merges `overrides` onto this configuration and validates the
    /// result. Keys set in the override win; the rest come from `self`.
    pub fn merged(&self, overrides: &ConfigOverride) -> std::result::Result<Config, ConfigError> {
        let config = Config {
            default_operator: overrides
                .default_operator
                .clone()
                .unwrap_or_else(|| self.default_operator.clone()),
            operators: overrides
                .operators
                .clone()
                .unwrap_or_else(|| self.operators.clone()),
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_operator: Operator::from(DEFAULT_OPERATOR),
            operators: DEFAULT_OPERATORS.iter().copied().map(Operator::from).collect(),
        }
    }
}

impl TryFrom<ConfigOverride> for Config {
    type Error = ConfigError;

    fn try_from(raw: ConfigOverride) -> std::result::Result<Self, Self::Error> {
        let default_operator = raw
            .default_operator
            .ok_or(ConfigError::MissingDefaultOperator)?;
        let operators = raw.operators.ok_or(ConfigError::NoOperators)?;
        Config::new(default_operator, operators)
    }
}

/// Partial configuration applied on top of an existing one.
///
/// Unset keys keep the value of the configuration being overridden.
/// Field names follow the settings object shape (`defaultOperator`,
/// `operators`) so overrides can be loaded from JSON or YAML files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_operator: Option<Operator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operators: Option<Vec<Operator>>,
}

impl ConfigOverride {
    /// Creates an override that changes nothing.
    pub fn new() -> Self {
        ConfigOverride::default()
    }

    /// Sets the default operator.
    pub fn default_operator(mut self, op: impl Into<Operator>) -> Self {
        self.default_operator = Some(op.into());
        self
    }

    /// Sets the operator list.
    pub fn operators<I, O>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Operator>,
    {
        self.operators = Some(operators.into_iter().map(Into::into).collect());
        self
    }

    /// Returns `true` if the override sets no key.
    pub fn is_empty(&self) -> bool {
        self.default_operator.is_none() && self.operators.is_none()
    }

    /// Parses an override from JSON text.
    ///
    /// ```rust
    /// use standout_filterset::ConfigOverride;
    ///
    /// let o = ConfigOverride::from_json(r#"{ "defaultOperator": "^" }"#).unwrap();
    /// assert_eq!(o.default_operator.as_deref(), Some("^"));
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses an override from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

static GLOBAL_CONFIG: Lazy<Mutex<Arc<Config>>> =
    Lazy::new(|| Mutex::new(Arc::new(Config::default())));

// The guarded value is replaced in a single assignment, so a poisoned lock
// still holds a complete configuration.
fn lock_global() -> MutexGuard<'static, Arc<Config>> {
    GLOBAL_CONFIG.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns a snapshot of the process-wide configuration.
pub(crate) fn global() -> Arc<Config> {
    Arc::clone(&lock_global())
}

/// Merges `overrides` into the process-wide configuration.
///
/// The lock is held across merge and store. On failure the previous value
/// stays in place.
pub(crate) fn configure(overrides: &ConfigOverride) -> std::result::Result<(), ConfigError> {
    let mut current = lock_global();
    match current.merged(overrides) {
        Ok(config) => {
            tracing::debug!(
                default_operator = %config.default_operator(),
                operators = config.operators().len(),
                "filterset global configuration updated"
            );
            *current = Arc::new(config);
            Ok(())
        }
        Err(err) => {
            tracing::warn!(error = %err, "filterset configuration rejected");
            Err(err)
        }
    }
}

/// Restores the built-in configuration.
pub(crate) fn reset() {
    *lock_global() = Arc::new(Config::default());
    tracing::debug!("filterset global configuration reset to defaults");
}
