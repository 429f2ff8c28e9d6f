//! Attribute values and assignment payloads

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A single attribute value.
///
/// Integers and floats compare numerically with each other, so `Int(2)`
/// and `Float(2.0)` are equal and hash identically.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as integer (floats only when integral)
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => integral(*f),
            _ => None,
        }
    }

    /// Get as index into an entity set
    pub fn as_index(&self) -> Option<usize> {
        self.as_int().and_then(|i| usize::try_from(i).ok())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Float -> i64 when the float holds an exact integer in range
fn integral(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                integral(*b) == Some(*a)
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::Int(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            Value::Float(f) => match integral(*f) {
                Some(i) => {
                    2u8.hash(state);
                    i.hash(state);
                }
                None if f.is_nan() => 3u8.hash(state),
                None => {
                    4u8.hash(state);
                    f.to_bits().hash(state);
                }
            },
            Value::Str(s) => {
                5u8.hash(state);
                s.hash(state);
            }
            Value::List(items) => {
                6u8.hash(state);
                items.hash(state);
            }
        }
    }
}

impl PartialOrd for Value {
    /// Only like-typed (or numeric) values are ordered; everything else is
    /// incomparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
            (Value::List(a), Value::List(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => cmp_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
            _ => None,
        }
    }
}

/// Exact ordering of an integer against a float, without rounding the
/// integer through `f64`
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    // 2^63, the first float above every i64
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return None;
    }
    if f >= LIMIT {
        return Some(Ordering::Less);
    }
    if f < -LIMIT {
        return Some(Ordering::Greater);
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(f - whole)),
        unequal => Some(unequal),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => Value::List(items.iter().map(Value::from).collect()),
            // Nested objects are not attribute values; keep their JSON text
            serde_json::Value::Object(_) => Value::Str(json.to_string()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}

/// Right-hand side of an attribute assignment.
///
/// A scalar is broadcast to every target entity; a sequence is cycled when
/// shorter than the target. Strings are always scalars.
#[derive(Clone, Debug, PartialEq)]
pub enum Values {
    Scalar(Value),
    Seq(Vec<Value>),
}

impl Values {
    /// Expand to exactly `len` values
    pub fn expand(self, len: usize) -> crate::Result<Vec<Value>> {
        match self {
            Values::Scalar(v) => Ok(vec![v; len]),
            Values::Seq(items) => {
                if items.len() > len || (items.is_empty() && len > 0) {
                    return Err(crate::GraphError::LengthMismatch {
                        expected: len,
                        actual: items.len(),
                    });
                }
                if items.len() == len {
                    return Ok(items);
                }
                Ok(items.iter().cycle().take(len).cloned().collect())
            }
        }
    }
}

impl From<Value> for Values {
    fn from(v: Value) -> Self {
        Values::Scalar(v)
    }
}

impl From<Vec<Value>> for Values {
    fn from(items: Vec<Value>) -> Self {
        Values::Seq(items)
    }
}

macro_rules! scalar_values {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Values {
                fn from(v: $t) -> Self {
                    Values::Scalar(Value::from(v))
                }
            }

            impl From<Vec<$t>> for Values {
                fn from(items: Vec<$t>) -> Self {
                    Values::Seq(items.into_iter().map(Value::from).collect())
                }
            }

            impl<const N: usize> From<[$t; N]> for Values {
                fn from(items: [$t; N]) -> Self {
                    Values::Seq(items.into_iter().map(Value::from).collect())
                }
            }
        )*
    };
}

scalar_values!(bool, i64, i32, u32, usize, f64, &str, String);

impl std::fmt::Display for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Values::Scalar(v) => write!(f, "{}", v),
            Values::Seq(items) => write!(f, "{}", Value::List(items.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_numeric_equality_across_types() {
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_ne!(Value::Int(2), Value::Float(2.5));
        assert_ne!(Value::Int(1), Value::Bool(true));

        let set: HashSet<Value> = [Value::Int(2)].into_iter().collect();
        assert!(set.contains(&Value::Float(2.0)));
    }

    #[test]
    fn test_ordering() {
        assert!(Value::Int(1) < Value::Float(1.5));
        assert!(Value::from("abc") < Value::from("abd"));
        assert_eq!(Value::from("1").partial_cmp(&Value::Int(1)), None);
        assert_eq!(Value::Null.partial_cmp(&Value::Null), Some(Ordering::Equal));
    }

    #[test]
    fn test_ordering_int_float_extremes() {
        let max = Value::Int(i64::MAX);
        let two_63 = Value::Float(9_223_372_036_854_775_808.0);
        assert_ne!(max, two_63);
        assert!(max < two_63);
        assert!(!(max >= two_63));
        assert!(two_63 > max);

        let min = Value::Int(i64::MIN);
        assert_eq!(min, Value::Float(-9_223_372_036_854_775_808.0));
        assert!(Value::Int(-2) > Value::Float(-2.5));
        assert!(Value::Int(2) < Value::Float(2.5));
        assert_eq!(Value::Int(1).partial_cmp(&Value::Float(f64::NAN)), None);
    }

    #[test]
    fn test_from_json() {
        let json: serde_json::Value = serde_json::json!({"a": [1, 2.5, "x", null, true]});
        let v = Value::from(&json["a"]);
        assert_eq!(
            v,
            Value::List(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::from("x"),
                Value::Null,
                Value::Bool(true),
            ])
        );
    }

    #[test]
    fn test_expand_cycles_shorter_sequence() {
        let values = Values::from(vec!["a", "b"]).expand(7).unwrap();
        let strs: Vec<&str> = values.iter().filter_map(Value::as_str).collect();
        assert_eq!(strs, vec!["a", "b", "a", "b", "a", "b", "a"]);
    }

    #[test]
    fn test_expand_broadcasts_string_scalar() {
        let values = Values::from("red").expand(3).unwrap();
        assert_eq!(values, vec![Value::from("red"); 3]);
    }

    #[test]
    fn test_expand_rejects_longer_sequence() {
        let err = Values::from(vec![1, 2, 3]).expand(2).unwrap_err();
        assert!(matches!(
            err,
            crate::GraphError::LengthMismatch { expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn test_expand_empty() {
        assert!(Values::Seq(vec![]).expand(0).unwrap().is_empty());
        assert!(Values::Seq(vec![]).expand(1).is_err());
    }

    #[test]
    fn test_expand_non_empty_onto_zero_length() {
        assert!(Values::from("x").expand(0).unwrap().is_empty());
        assert!(matches!(
            Values::from(vec![1, 2, 3]).expand(0),
            Err(crate::GraphError::LengthMismatch { expected: 0, actual: 3 })
        ));
    }
}
