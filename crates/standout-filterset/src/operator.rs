//! Operator tags for filter criteria.
//!
//! An [`Operator`] is an opaque string naming a comparison kind (`"="`,
//! `"^"`, `"contains"`, ...). The filter set never interprets it: the
//! operator only selects which bucket of values a criterion lives in. What
//! the operators mean is decided by whoever consumes the payload.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Operator tag selecting a bucket of values under a field.
///
/// # Example
///
/// ```
/// use standout_filterset::Operator;
///
/// let op = Operator::from("=");
/// assert_eq!(op.as_str(), "=");
/// assert_eq!(op, "=");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Operator(String);

impl Operator {
    /// Creates an operator from any string-like value.
    pub fn new(tag: impl Into<String>) -> Self {
        Operator(tag.into())
    }

    /// Returns the operator tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the tag is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for Operator {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

// Lets operator-keyed maps be queried with a plain `&str`.
impl Borrow<str> for Operator {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Operator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Operator {
    fn from(tag: &str) -> Self {
        Operator(tag.to_string())
    }
}

impl From<String> for Operator {
    fn from(tag: String) -> Self {
        Operator(tag)
    }
}

impl From<&Operator> for Operator {
    fn from(op: &Operator) -> Self {
        op.clone()
    }
}

impl PartialEq<str> for Operator {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Operator {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
