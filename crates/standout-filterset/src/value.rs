//! Owned values stored in filter criteria.
//!
//! [`FilterValue`] is the default value type of a
//! [`FilterSet`](crate::FilterSet). It covers the plain JSON scalars a
//! downstream query builder typically needs: strings, numbers, booleans and
//! null. Schemas with richer value types can use their own type instead, as
//! long as it is `Clone + PartialEq`.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single accepted value for a field.
///
/// Equality is what the filter set uses for duplicate suppression and
/// membership: numbers compare by numeric value across kinds (`1u8` equals
/// `1i64`), and `NaN` equals `NaN` so a `NaN` criterion can be found and
/// removed again.
///
/// # Example
///
/// ```
/// use standout_filterset::{FilterValue, Number};
///
/// assert_eq!(FilterValue::from("Max"), FilterValue::String("Max".into()));
/// assert_eq!(FilterValue::from(3u8), FilterValue::from(3i64));
/// assert_eq!(FilterValue::from(true).as_bool(), Some(true));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Explicit null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
}

impl FilterValue {
    /// Returns `true` if this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            FilterValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FilterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl PartialEq for FilterValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FilterValue::Null, FilterValue::Null) => true,
            (FilterValue::Bool(a), FilterValue::Bool(b)) => a == b,
            (FilterValue::Number(a), FilterValue::Number(b)) => a == b,
            (FilterValue::String(a), FilterValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Null => f.write_str("null"),
            FilterValue::Bool(b) => write!(f, "{b}"),
            FilterValue::Number(n) => write!(f, "{n}"),
            FilterValue::String(s) => f.write_str(s),
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
///
/// Comparisons between different numeric types are exact: an integer equals
/// a float only when the float is integral and holds that same integer, so
/// equality stays transitive past 2^53.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64. Large integers may lose precision.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Returns `true` if this is a floating point `NaN`.
    pub fn is_nan(self) -> bool {
        matches!(self, Number::F64(n) if n.is_nan())
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),

            // Integers of different signedness compare exactly
            (Number::I64(a), Number::U64(b)) => Some(compare_signed_unsigned(a, b)),
            (Number::U64(a), Number::I64(b)) => Some(compare_signed_unsigned(b, a).reverse()),

            // Integer against float compares exactly, never through f64
            (Number::I64(a), Number::F64(b)) => compare_signed_float(a, b),
            (Number::F64(a), Number::I64(b)) => compare_signed_float(b, a).map(Ordering::reverse),
            (Number::U64(a), Number::F64(b)) => compare_unsigned_float(a, b),
            (Number::F64(a), Number::U64(b)) => compare_unsigned_float(b, a).map(Ordering::reverse),
        }
    }
}

// 2^63 and 2^64, both exactly representable as f64
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

fn compare_signed_unsigned(a: i64, b: u64) -> Ordering {
    match u64::try_from(a) {
        Ok(a) => a.cmp(&b),
        Err(_) => Ordering::Less,
    }
}

fn compare_signed_float(a: i64, b: f64) -> Option<Ordering> {
    if b.is_nan() {
        return None;
    }
    if b >= I64_BOUND {
        return Some(Ordering::Less);
    }
    if b < -I64_BOUND {
        return Some(Ordering::Greater);
    }
    let whole = b.trunc();
    Some(a.cmp(&(whole as i64)).then(fraction_order(b - whole)))
}

fn compare_unsigned_float(a: u64, b: f64) -> Option<Ordering> {
    if b.is_nan() {
        return None;
    }
    if b < 0.0 {
        return Some(Ordering::Greater);
    }
    if b >= U64_BOUND {
        return Some(Ordering::Less);
    }
    let whole = b.trunc();
    Some(a.cmp(&(whole as u64)).then(fraction_order(b - whole)))
}

// Order of an integer against `whole + fraction` once the whole parts tie.
fn fraction_order(fraction: f64) -> Ordering {
    if fraction > 0.0 {
        Ordering::Less
    } else if fraction < 0.0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        if self.is_nan() && other.is_nan() {
            return true;
        }
        self.compare(*other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! impl_number_from {
    ($variant:ident, $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }

            impl From<$source> for FilterValue {
                fn from(n: $source) -> Self {
                    FilterValue::Number(Number::from(n))
                }
            }
        )+
    };
}

impl_number_from!(I64, i64: i8, i16, i32, i64, isize);
impl_number_from!(U64, u64: u8, u16, u32, u64, usize);
impl_number_from!(F64, f64: f32, f64);

impl From<Number> for FilterValue {
    fn from(n: Number) -> Self {
        FilterValue::Number(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::String(s)
    }
}

impl From<&String> for FilterValue {
    fn from(s: &String) -> Self {
        FilterValue::String(s.clone())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_extractors() {
        assert_eq!(FilterValue::from("hello").as_str(), Some("hello"));
        assert_eq!(FilterValue::from(42i32).as_number(), Some(Number::I64(42)));
        assert_eq!(FilterValue::from(true).as_bool(), Some(true));
        assert!(FilterValue::Null.is_null());

        // Wrong type returns None
        assert_eq!(FilterValue::from("test").as_number(), None);
        assert_eq!(FilterValue::from(1u8).as_str(), None);
        assert_eq!(FilterValue::Null.as_bool(), None);
    }

    #[test]
    fn value_equality_is_kind_strict() {
        assert_ne!(FilterValue::from("1"), FilterValue::from(1));
        assert_ne!(FilterValue::from(false), FilterValue::Null);
        assert_ne!(FilterValue::from(0), FilterValue::from(false));
    }

    #[test]
    fn number_equality_crosses_kinds() {
        assert_eq!(Number::I64(5), Number::U64(5));
        assert_eq!(Number::I64(5), Number::F64(5.0));
        assert_ne!(Number::I64(-1), Number::U64(u64::MAX));
        assert_eq!(FilterValue::from(7u16), FilterValue::from(7.0f64));
    }

    #[test]
    fn number_nan_equals_itself() {
        assert_eq!(Number::F64(f64::NAN), Number::F64(f64::NAN));
        assert_ne!(Number::F64(f64::NAN), Number::F64(1.0));
        assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
    }

    #[test]
    fn number_comparisons_mixed_types() {
        assert_eq!(
            Number::I64(5).compare(Number::U64(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::I64(-5).compare(Number::U64(0)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::U64(10).compare(Number::I64(-3)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Number::U64(10).compare(Number::F64(5.5)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn number_equality_is_exact_past_f64_precision() {
        let exact = Number::I64(1 << 53);
        let next = Number::I64((1 << 53) + 1);
        let float = Number::F64(9_007_199_254_740_992.0);

        assert_eq!(exact, float);
        assert_ne!(next, float);
        assert_ne!(Number::U64((1 << 53) + 1), float);
        assert_eq!(next.compare(float), Some(Ordering::Greater));
        assert_eq!(float.compare(next), Some(Ordering::Less));
    }

    #[test]
    fn number_float_bounds_against_integers() {
        // u64::MAX as f64 rounds up to 2^64
        assert_ne!(Number::U64(u64::MAX), Number::F64(u64::MAX as f64));
        assert_eq!(
            Number::U64(u64::MAX).compare(Number::F64(u64::MAX as f64)),
            Some(Ordering::Less)
        );
        assert_ne!(Number::I64(i64::MAX), Number::F64(i64::MAX as f64));
        assert_eq!(Number::I64(i64::MIN), Number::F64(i64::MIN as f64));
        assert_eq!(
            Number::I64(0).compare(Number::F64(f64::INFINITY)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::U64(0).compare(Number::F64(-0.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(Number::U64(0), Number::F64(-0.0));
        assert_eq!(Number::I64(3).compare(Number::F64(f64::NAN)), None);
    }

    #[test]
    fn number_fractions_order_against_integers() {
        assert_eq!(Number::I64(2).compare(Number::F64(2.5)), Some(Ordering::Less));
        assert_eq!(Number::I64(-2).compare(Number::F64(-2.5)), Some(Ordering::Greater));
        assert_eq!(Number::F64(2.5).compare(Number::U64(3)), Some(Ordering::Less));
        assert_ne!(Number::I64(2), Number::F64(2.5));
    }

    #[test]
    fn option_converts_to_null() {
        assert_eq!(FilterValue::from(None::<&str>), FilterValue::Null);
        assert_eq!(FilterValue::from(Some("x")), FilterValue::from("x"));
    }

    #[test]
    fn value_json_shape() {
        let values = vec![
            FilterValue::from("Max"),
            FilterValue::from(3),
            FilterValue::from(2.5),
            FilterValue::from(true),
            FilterValue::Null,
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"["Max",3,2.5,true,null]"#);

        let back: Vec<FilterValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn value_display() {
        assert_eq!(FilterValue::from("Max").to_string(), "Max");
        assert_eq!(FilterValue::from(-4).to_string(), "-4");
        assert_eq!(FilterValue::Null.to_string(), "null");
    }
}
