//! The immutable filter set.
//!
//! A [`FilterSet`] wraps a [`Payload`] and a [`Config`]. Every method that
//! looks like a mutation returns a set instead of changing `self`:
//!
//! - when the change already holds, the returned set *is* `self` (a clone of
//!   the handle, sharing the same payload allocation);
//! - otherwise the payload is deep-copied, the copy is changed and pruned,
//!   and a new set wraps it with the same configuration.
//!
//! [`FilterSet::ptr_eq`] tells the two cases apart.
//!
//! # Method Families
//!
//! Add, remove and exists come in three forms:
//!
//! | Form | Values | Operator |
//! |------|--------|----------|
//! | `add(field, value)` | one | default |
//! | `add_all(field, values)` | many | default |
//! | `add_with(field, op, values)` | many | explicit |
//!
//! Mutators take the field by value (it may be stored); lookups take it by
//! reference, so `FilterSet<String>` can be queried with `&str`.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use indexmap::Equivalent;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::{self, Config, ConfigOverride};
use crate::error::Result;
use crate::operator::Operator;
use crate::payload::{FieldFilters, Payload};
use crate::value::FilterValue;

/// Immutable set of filter criteria: field → operator → values.
///
/// `F` is the field key type. Use a closed enum to have field names checked
/// by the compiler, or `String` (the default) to accept any name. `V` is the
/// value type, [`FilterValue`] by default.
///
/// # Example
///
/// ```
/// use standout_filterset::FilterSet;
///
/// let filters: FilterSet = FilterSet::new()
///     .add("name", "Max")
///     .add_with("age", ">", [18]);
///
/// assert!(filters.exists("name", "Max"));
/// assert_eq!(
///     serde_json::to_string(&filters).unwrap(),
///     r#"{"name":{"=":["Max"]},"age":{">":[18]}}"#
/// );
///
/// // Adding an existing value hands back the very same set
/// let again = filters.add("name", "Max");
/// assert!(FilterSet::ptr_eq(&filters, &again));
/// ```
pub struct FilterSet<F = String, V = FilterValue> {
    config: Arc<Config>,
    payload: Arc<Payload<F, V>>,
}

impl<F, V> FilterSet<F, V> {
    /// Creates an empty set using the global configuration.
    pub fn new() -> Self {
        FilterSet::from_parts(config::global(), Payload::new())
    }

    /// Creates an empty set whose configuration is the global one with
    /// `overrides` applied.
    ///
    /// Fails with [`FilterError::Config`](crate::FilterError::Config) when the
    /// merged configuration is invalid. The global configuration is not
    /// touched.
    pub fn with_config(overrides: ConfigOverride) -> Result<Self> {
        let config = config::global().merged(&overrides)?;
        Ok(FilterSet::from_parts(Arc::new(config), Payload::new()))
    }

    /// Creates an empty set with a complete, already validated configuration.
    pub fn from_config(config: Config) -> Self {
        FilterSet::from_parts(Arc::new(config), Payload::new())
    }

    /// Creates a set holding `payload`, using the global configuration.
    pub fn from_payload(payload: Payload<F, V>) -> Self {
        FilterSet::from_parts(config::global(), payload)
    }

    fn from_parts(config: Arc<Config>, payload: Payload<F, V>) -> Self {
        FilterSet {
            config,
            payload: Arc::new(payload),
        }
    }

    /// Returns this set's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the operator used when a call does not name one.
    pub fn default_operator(&self) -> &Operator {
        self.config.default_operator()
    }

    /// Returns the accumulated criteria.
    pub fn payload(&self) -> &Payload<F, V> {
        &self.payload
    }

    /// Returns `true` if the set holds no criteria.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Returns `true` if `a` and `b` are the same set, not merely equal ones.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.payload, &b.payload) && Arc::ptr_eq(&a.config, &b.config)
    }

    /// Wraps `payload` in a new set sharing this set's configuration.
    ///
    /// The payload is taken by value, so no other set can observe it.
    pub fn attach(&self, payload: Payload<F, V>) -> Self {
        tracing::trace!(fields = payload.len(), "filterset derived");
        FilterSet::from_parts(Arc::clone(&self.config), payload)
    }

    /// Returns a set with no criteria and the same configuration.
    ///
    /// An already empty set is returned as is.
    pub fn clear(&self) -> Self {
        if self.is_empty() {
            return self.clone();
        }
        self.attach(Payload::new())
    }
}

// Global configuration lives on the default instantiation so calls like
// `FilterSet::configure(..)` need no type annotations.
impl FilterSet {
    /// Applies `overrides` to the global configuration.
    ///
    /// Sets created afterwards without their own configuration use the
    /// result. On failure the previous global configuration stays in place.
    ///
    /// ```
    /// use standout_filterset::{ConfigOverride, FilterSet};
    ///
    /// let invalid = ConfigOverride::new().operators(["^"]);
    /// assert!(FilterSet::configure(invalid).is_err());
    /// assert_eq!(FilterSet::global_config().default_operator(), "=");
    /// ```
    pub fn configure(overrides: ConfigOverride) -> Result<()> {
        config::configure(&overrides)?;
        Ok(())
    }

    /// Returns a snapshot of the global configuration.
    pub fn global_config() -> Arc<Config> {
        config::global()
    }

    /// Restores the built-in global configuration.
    pub fn reset_config() {
        config::reset();
    }
}

impl<F, V> FilterSet<F, V>
where
    F: Hash + Eq + Clone,
    V: PartialEq + Clone,
{
    /// Returns the operators recorded for `field`; empty if it has none.
    pub fn field<Q>(&self, field: &Q) -> FieldFilters<'_, V>
    where
        Q: ?Sized + Hash + Equivalent<F>,
    {
        self.payload.field(field)
    }

    /// Returns the values recorded for `field` under the default operator.
    pub fn values<Q>(&self, field: &Q) -> &[V]
    where
        Q: ?Sized + Hash + Equivalent<F>,
    {
        self.values_with(field, self.default_operator())
    }

    /// Returns the values recorded for `field` under `op`.
    pub fn values_with<Q>(&self, field: &Q, op: &str) -> &[V]
    where
        Q: ?Sized + Hash + Equivalent<F>,
    {
        self.payload.values(field, op)
    }

    /// Returns `true` if `value` is recorded for `field` under the default
    /// operator.
    pub fn exists<Q>(&self, field: &Q, value: impl Into<V>) -> bool
    where
        Q: ?Sized + Hash + Equivalent<F>,
    {
        self.exists_with(field, self.default_operator(), [value])
    }

    /// Returns `true` if every one of `values` is recorded for `field` under
    /// the default operator.
    pub fn exists_all<Q, I>(&self, field: &Q, values: I) -> bool
    where
        Q: ?Sized + Hash + Equivalent<F>,
        I: IntoIterator,
        I::Item: Into<V>,
    {
        self.exists_with(field, self.default_operator(), values)
    }

    /// Returns `true` if every one of `values` is recorded for `field` under
    /// `op`.
    ///
    /// The operator only picks the bucket that is searched. A field or
    /// operator without criteria behaves as an empty bucket, and an empty
    /// `values` is trivially present.
    pub fn exists_with<Q, I>(&self, field: &Q, op: &str, values: I) -> bool
    where
        Q: ?Sized + Hash + Equivalent<F>,
        I: IntoIterator,
        I::Item: Into<V>,
    {
        let bucket = self.payload.values(field, op);
        values.into_iter().all(|v| bucket.contains(&v.into()))
    }

    /// Adds `value` for `field` under the default operator.
    pub fn add(&self, field: impl Into<F>, value: impl Into<V>) -> Self {
        self.add_with(field, self.default_operator(), [value])
    }

    /// Adds every one of `values` for `field` under the default operator.
    pub fn add_all<I>(&self, field: impl Into<F>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<V>,
    {
        self.add_with(field, self.default_operator(), values)
    }

    /// Adds every one of `values` for `field` under `op`.
    ///
    /// Values already present, or repeated within `values`, are skipped;
    /// new ones are appended in the order given. When nothing is new the
    /// set itself is returned.
    pub fn add_with<I>(&self, field: impl Into<F>, op: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<V>,
    {
        let field = field.into();
        let values: Vec<V> = values.into_iter().map(Into::into).collect();

        let bucket = self.payload.values(&field, op);
        if values.iter().all(|v| bucket.contains(v)) {
            return self.clone();
        }

        let mut payload = Payload::clone(&self.payload);
        for value in values {
            payload.push_unique(&field, op, value);
        }
        self.attach(payload)
    }

    /// Removes `value` from `field` under the default operator.
    pub fn remove<Q>(&self, field: &Q, value: impl Into<V>) -> Self
    where
        Q: ?Sized + Hash + Equivalent<F>,
    {
        self.remove_with(field, self.default_operator(), [value])
    }

    /// Removes every one of `values` from `field` under the default operator.
    pub fn remove_all<Q, I>(&self, field: &Q, values: I) -> Self
    where
        Q: ?Sized + Hash + Equivalent<F>,
        I: IntoIterator,
        I::Item: Into<V>,
    {
        self.remove_with(field, self.default_operator(), values)
    }

    /// Removes every one of `values` from `field` under `op`.
    ///
    /// Values that are not present are ignored. An operator left without
    /// values is dropped, and so is a field left without operators. When
    /// none of `values` is present the set itself is returned.
    pub fn remove_with<Q, I>(&self, field: &Q, op: &str, values: I) -> Self
    where
        Q: ?Sized + Hash + Equivalent<F>,
        I: IntoIterator,
        I::Item: Into<V>,
    {
        let bucket = self.payload.values(field, op);
        let present: Vec<V> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| bucket.contains(v))
            .collect();
        if present.is_empty() {
            return self.clone();
        }

        let mut payload = Payload::clone(&self.payload);
        for value in &present {
            payload.remove_value(field, op, value);
        }
        self.attach(payload)
    }

    /// Removes every criterion recorded for `field`, under any operator.
    ///
    /// A field without criteria leaves the set itself.
    pub fn remove_field<Q>(&self, field: &Q) -> Self
    where
        Q: ?Sized + Hash + Equivalent<F>,
    {
        if self.payload.field(field).is_empty() {
            return self.clone();
        }
        let mut payload = Payload::clone(&self.payload);
        payload.remove_field(field);
        self.attach(payload)
    }

    /// Returns `true` if every criterion of `other` is also in `self`.
    ///
    /// Each field of `other` must exist here, each of its operators must
    /// exist under that field, and each of its values must be in the
    /// matching bucket. Criteria only `self` has do not matter. Two empty
    /// sets include each other.
    pub fn includes(&self, other: &FilterSet<F, V>) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload) || self.payload.includes(&other.payload)
    }

    /// Returns the union of `self` and `other`.
    ///
    /// - `other` empty: returns `self`
    /// - `self` empty: returns `other`
    /// - `self` already includes `other`: returns `self`
    ///
    /// Otherwise the criteria of `other` missing from `self` are appended to
    /// a copy of `self`, which keeps `self`'s configuration.
    pub fn concat(&self, other: &FilterSet<F, V>) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        if self.includes(other) {
            return self.clone();
        }

        let mut payload = Payload::clone(&self.payload);
        for (field, op, value) in other.payload.entries() {
            payload.push_unique(field, op, value.clone());
        }
        self.attach(payload)
    }
}

impl<F, V> Clone for FilterSet<F, V> {
    fn clone(&self) -> Self {
        FilterSet {
            config: Arc::clone(&self.config),
            payload: Arc::clone(&self.payload),
        }
    }
}

impl<F, V> Default for FilterSet<F, V> {
    fn default() -> Self {
        FilterSet::new()
    }
}

impl<F: fmt::Debug, V: fmt::Debug> fmt::Debug for FilterSet<F, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSet")
            .field("default_operator", &self.config.default_operator().as_str())
            .field("payload", &self.payload)
            .finish()
    }
}

// Equality looks at criteria only; configurations may differ.
impl<F, V> PartialEq for FilterSet<F, V>
where
    F: Hash + Eq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl<F: Serialize, V: Serialize> Serialize for FilterSet<F, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.payload.serialize(serializer)
    }
}

impl<'de, F, V> Deserialize<'de> for FilterSet<F, V>
where
    F: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de> + PartialEq,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Payload::deserialize(deserializer).map(FilterSet::from_payload)
    }
}
