//! Filterset - Immutable filter criteria for building structured queries.
//!
//! A [`FilterSet`] accumulates criteria of the form *field → operator →
//! accepted values* and exposes set-like operations over them:
//!
//! - Insertion and removal that never mutate: every call returns a set
//! - Membership tests for one or many values
//! - Subset tests between sets ([`FilterSet::includes`])
//! - Union of sets ([`FilterSet::concat`])
//! - A serializable payload for downstream query builders
//!
//! The filter set does not interpret operators or values. Turning criteria
//! into SQL, an HTTP query string or an in-memory predicate is the job of
//! whoever consumes the payload.
//!
//! # Quick Start
//!
//! ```rust
//! use standout_filterset::FilterSet;
//!
//! let empty: FilterSet = FilterSet::new();
//! let filters = empty
//!     .add("name", "Max")
//!     .add_all("name", ["John", "Max"])
//!     .add_with("age", ">=", [18]);
//!
//! assert!(filters.exists_all("name", ["Max", "John"]));
//! assert_eq!(
//!     serde_json::to_value(&filters).unwrap(),
//!     serde_json::json!({
//!         "name": { "=": ["Max", "John"] },
//!         "age": { ">=": [18] }
//!     })
//! );
//!
//! // The original set is untouched
//! assert!(empty.is_empty());
//! ```
//!
//! # Copy-on-Write Semantics
//!
//! ```text
//! change already holds  → the same set is returned (FilterSet::ptr_eq)
//! change needed         → payload deep-copied, changed, pruned, rewrapped
//! ```
//!
//! Pruning keeps the payload minimal: an operator whose last value is removed
//! disappears, and so does a field whose last operator is removed.
//!
//! # Typed Fields
//!
//! The field type is a parameter. `String` accepts any name; a closed enum
//! lets the compiler reject unknown fields:
//!
//! ```rust
//! use serde::Serialize;
//! use standout_filterset::FilterSet;
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
//! #[serde(rename_all = "snake_case")]
//! enum TaskField {
//!     Title,
//!     Priority,
//! }
//!
//! let filters: FilterSet<TaskField> = FilterSet::new()
//!     .add(TaskField::Title, "Write docs")
//!     .add_with(TaskField::Priority, ">", [3]);
//!
//! assert!(filters.exists(&TaskField::Title, "Write docs"));
//! ```
//!
//! # Configuration
//!
//! The set of operators and the default one come from a [`Config`]. Sets use
//! the process-wide configuration unless given their own:
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`FilterSet::configure`] | Merge an override into the global config |
//! | [`FilterSet::with_config`] | New set with global config + override |
//! | [`FilterSet::from_config`] | New set with a complete config |
//!
//! Invalid configurations are rejected with [`ConfigError`].

mod config;
mod error;
mod filter_set;
mod operator;
mod payload;
mod value;

// Re-export public API
pub use config::{Config, ConfigOverride, DEFAULT_OPERATOR, DEFAULT_OPERATORS};
pub use error::{ConfigError, FilterError, Result};
pub use filter_set::FilterSet;
pub use operator::Operator;
pub use payload::{FieldFilters, Payload};
pub use value::{FilterValue, Number};
