//! The field → operator → values structure behind a filter set.
//!
//! A [`Payload`] is an insertion-ordered map from field to an
//! insertion-ordered map from [`Operator`] to a list of values. It keeps
//! three invariants at all times:
//!
//! - a field is present only if it has at least one operator;
//! - an operator is present only if its value list is non-empty;
//! - a value list never holds the same value twice.
//!
//! The interior is private. Payloads are built by the
//! [`FilterSet`](crate::FilterSet) mutators, collected from
//! `(field, operator, value)` triples, or deserialized; all three paths
//! normalize, so any `Payload` can be wrapped without re-checking.
//!
//! # Serialized Shape
//!
//! ```text
//! { "name": { "=": ["Max", "John"] }, "age": { ">": [18] } }
//! ```
//!
//! Deserializing drops empty operators and fields and removes repeated
//! values, keeping the first occurrence.

use std::fmt;
use std::hash::Hash;

use indexmap::{Equivalent, IndexMap};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::operator::Operator;

type OperatorMap<V> = IndexMap<Operator, Vec<V>>;

/// Accumulated filter criteria.
#[derive(Clone, Serialize)]
#[serde(transparent)]
pub struct Payload<F, V> {
    fields: IndexMap<F, OperatorMap<V>>,
}

impl<F, V> Payload<F, V> {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Payload {
            fields: IndexMap::new(),
        }
    }

    /// Returns `true` if no field holds any criteria.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of fields with criteria.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&F, FieldFilters<'_, V>)> {
        self.fields
            .iter()
            .map(|(field, operators)| (field, FieldFilters::new(Some(operators))))
    }

    /// Iterates over every `(field, operator, value)` triple.
    pub fn entries(&self) -> impl Iterator<Item = (&F, &Operator, &V)> {
        self.fields.iter().flat_map(|(field, operators)| {
            operators
                .iter()
                .flat_map(move |(op, values)| values.iter().map(move |v| (field, op, v)))
        })
    }
}

impl<F, V> Payload<F, V>
where
    F: Hash + Eq,
    V: PartialEq,
{
    /// Returns the operators recorded for `field`.
    ///
    /// An absent field yields an empty view.
    pub fn field<Q>(&self, field: &Q) -> FieldFilters<'_, V>
    where
        Q: ?Sized + Hash + Equivalent<F>,
    {
        FieldFilters::new(self.fields.get(field))
    }

    /// Returns the values recorded for `(field, op)`, or an empty slice.
    pub fn values<Q>(&self, field: &Q, op: &str) -> &[V]
    where
        Q: ?Sized + Hash + Equivalent<F>,
    {
        self.field(field).get(op)
    }

    /// Returns `true` if `value` is recorded under `(field, op)`.
    pub fn contains<Q>(&self, field: &Q, op: &str, value: &V) -> bool
    where
        Q: ?Sized + Hash + Equivalent<F>,
    {
        self.values(field, op).contains(value)
    }

    /// Returns `true` if every criterion in `other` is also in `self`.
    ///
    /// Fields and operators that only `self` has are ignored. Two empty
    /// payloads include each other.
    pub fn includes(&self, other: &Payload<F, V>) -> bool {
        other.fields.iter().all(|(field, their_ops)| {
            let Some(our_ops) = self.fields.get(field) else {
                return false;
            };
            their_ops.iter().all(|(op, their_values)| {
                our_ops
                    .get(op)
                    .is_some_and(|ours| their_values.iter().all(|v| ours.contains(v)))
            })
        })
    }

    /// Appends `value` under `(field, op)` unless already present, creating
    /// the bucket as needed. Returns `true` if the value was added.
    pub(crate) fn push_unique(&mut self, field: &F, op: &str, value: V) -> bool
    where
        F: Clone,
    {
        if self.contains(field, op, &value) {
            return false;
        }
        self.fields
            .entry(field.clone())
            .or_default()
            .entry(Operator::from(op))
            .or_default()
            .push(value);
        true
    }

    /// Removes `value` from `(field, op)`, pruning the operator and the field
    /// when they become empty. Returns `true` if the value was present.
    pub(crate) fn remove_value<Q>(&mut self, field: &Q, op: &str, value: &V) -> bool
    where
        Q: ?Sized + Hash + Equivalent<F>,
    {
        let Some(operators) = self.fields.get_mut(field) else {
            return false;
        };
        let Some(values) = operators.get_mut(op) else {
            return false;
        };
        let Some(index) = values.iter().position(|v| v == value) else {
            return false;
        };

        values.remove(index);
        if values.is_empty() {
            operators.shift_remove(op);
        }
        if operators.is_empty() {
            self.fields.shift_remove(field);
        }
        true
    }

    /// Removes every criterion of `field`. Returns `true` if it had any.
    pub(crate) fn remove_field<Q>(&mut self, field: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<F>,
    {
        self.fields.shift_remove(field).is_some()
    }

    fn normalize(raw: IndexMap<F, OperatorMap<V>>) -> Self {
        let mut fields = IndexMap::with_capacity(raw.len());
        for (field, operators) in raw {
            let mut kept = IndexMap::with_capacity(operators.len());
            for (op, values) in operators {
                let mut unique: Vec<V> = Vec::with_capacity(values.len());
                for value in values {
                    if !unique.contains(&value) {
                        unique.push(value);
                    }
                }
                if !unique.is_empty() {
                    kept.insert(op, unique);
                }
            }
            if !kept.is_empty() {
                fields.insert(field, kept);
            }
        }
        Payload { fields }
    }
}

impl<F, V> Default for Payload<F, V> {
    fn default() -> Self {
        Payload::new()
    }
}

impl<F: fmt::Debug, V: fmt::Debug> fmt::Debug for Payload<F, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.fields.iter()).finish()
    }
}

// Maps compare regardless of key order; value lists compare in order.
impl<F, V> PartialEq for Payload<F, V>
where
    F: Hash + Eq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl<F, V> FromIterator<(F, Operator, V)> for Payload<F, V>
where
    F: Hash + Eq + Clone,
    V: PartialEq,
{
    fn from_iter<I: IntoIterator<Item = (F, Operator, V)>>(iter: I) -> Self {
        let mut payload = Payload::new();
        for (field, op, value) in iter {
            payload.push_unique(&field, &op, value);
        }
        payload
    }
}

impl<'de, F, V> Deserialize<'de> for Payload<F, V>
where
    F: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de> + PartialEq,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: IndexMap<F, OperatorMap<V>> = IndexMap::deserialize(deserializer)?;
        Ok(Payload::normalize(raw))
    }
}

/// Read-only view of the operators recorded for one field.
///
/// Behaves as an empty mapping when the field has no criteria, so lookups
/// never need to special-case absence.
pub struct FieldFilters<'a, V> {
    operators: Option<&'a OperatorMap<V>>,
}

impl<'a, V> FieldFilters<'a, V> {
    fn new(operators: Option<&'a OperatorMap<V>>) -> Self {
        FieldFilters { operators }
    }

    /// Returns the values recorded under `op`, or an empty slice.
    pub fn get(&self, op: &str) -> &'a [V] {
        self.operators
            .and_then(|operators| operators.get(op))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Returns `true` if `op` has values for this field.
    pub fn contains_operator(&self, op: &str) -> bool {
        self.operators
            .is_some_and(|operators| operators.contains_key(op))
    }

    /// Returns `true` if the field has no criteria.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of operators with values.
    pub fn len(&self) -> usize {
        self.operators.map_or(0, IndexMap::len)
    }

    /// Iterates over `(operator, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a Operator, &'a [V])> {
        self.operators
            .into_iter()
            .flat_map(|operators| operators.iter().map(|(op, v)| (op, v.as_slice())))
    }
}

impl<V> Clone for FieldFilters<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for FieldFilters<'_, V> {}

impl<V: fmt::Debug> fmt::Debug for FieldFilters<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: Serialize> Serialize for FieldFilters<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (op, values) in self.iter() {
            map.serialize_entry(op, values)?;
        }
        map.end()
    }
}
