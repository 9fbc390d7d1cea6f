//! Dynamic field value.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A dynamic value held by one field of a record.
///
/// Mirrors the shapes a JSON document can carry. Dates travel as strings.
///
/// # Example
///
/// ```
/// use docketview::model::Value;
///
/// let client = Value::from("Al-Rashid Trading");
/// let fee = Value::from(12_500i64);
/// let closed = Value::from(false);
/// assert_eq!(fee.as_f64(), Some(12_500.0));
/// assert_eq!(client.to_string(), "Al-Rashid Trading");
/// assert!(!closed.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    /// Nested object, e.g. an `assigned_to` sub-record.
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric reading of the value.
    ///
    /// Strings holding a number (`"1500"`, `" 2.5 "`) count as numeric.
    /// Non-finite numbers (`NaN`, `"inf"`), booleans and containers do not.
    /// Integers stay integers so 64-bit ids compare exactly.
    pub fn as_number(&self) -> Option<Number> {
        let n = match self {
            Value::Int(i) => return Some(Number::Int(*i)),
            Value::Float(f) => *f,
            Value::String(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    return Some(Number::Int(i));
                }
                s.parse::<f64>().ok()?
            }
            _ => return None,
        };
        n.is_finite().then_some(Number::Float(n))
    }

    /// [`as_number`](Self::as_number) widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::to_f64)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Follows a dotted path (`assigned_to.name`) through nested objects.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(self, |value, segment| match value {
            Value::Object(map) => map.get(segment),
            _ => None,
        })
    }

    /// Appends the display form of every leaf value to `out`, separated by
    /// newlines so a search term never matches across two fields.
    pub(crate) fn push_search_text(&self, out: &mut String) {
        match self {
            Value::Null => {}
            Value::Array(items) => items.iter().for_each(|v| v.push_search_text(out)),
            Value::Object(map) => map.values().for_each(|v| v.push_search_text(out)),
            leaf => {
                out.push_str(&leaf.to_string());
                out.push('\n');
            }
        }
    }
}

/// A finite number read from a [`Value`].
///
/// Ordering is exact across both variants: `Int(2^53 + 1)` is greater than
/// `Int(2^53)` and than `Float(2^53)`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(&b),
            (Number::Float(a), Number::Float(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Number::Int(a), Number::Float(b)) => cmp_int_float(a, b),
            (Number::Float(a), Number::Int(b)) => cmp_int_float(b, a).reverse(),
        }
    }
}

/// Exact comparison of an integer with a finite float.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    // 2^63, the first float above i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal if f > whole => Ordering::Less,
        Ordering::Equal if f < whole => Ordering::Greater,
        other => other,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Object(map) => {
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                Ok(())
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strings_are_numeric() {
        assert_eq!(Value::from("1500").as_f64(), Some(1500.0));
        assert_eq!(Value::from(" 2.5 ").as_f64(), Some(2.5));
        assert_eq!(Value::from("SAR 10").as_f64(), None);
        assert_eq!(Value::from("NaN").as_f64(), None);
        assert_eq!(Value::from("INF").as_number(), None);
        assert_eq!(Value::from("-infinity").as_number(), None);
        assert_eq!(Value::Float(f64::INFINITY).as_number(), None);
        assert_eq!(Value::from("1500").as_number(), Some(Number::Int(1500)));
        assert_eq!(Value::Bool(true).as_f64(), None);
        assert_eq!(Value::Null.as_f64(), None);
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let above = Number::Int(9_007_199_254_740_993);
        let at = Number::Int(9_007_199_254_740_992);
        assert!(above > at);
        assert_ne!(above, at);
        assert!(above > Number::Float(9_007_199_254_740_992.0));
        assert_eq!(at, Number::Float(9_007_199_254_740_992.0));
        assert_eq!(
            Value::from("9007199254740993").as_number(),
            Some(Number::Int(9_007_199_254_740_993))
        );
    }

    #[test]
    fn test_mixed_numbers_order_by_value() {
        assert!(Number::Int(2) > Number::Float(1.5));
        assert!(Number::Int(-2) < Number::Float(-1.5));
        assert!(Number::Int(1) < Number::Float(1.25));
        assert_eq!(Number::Int(0), Number::Float(-0.0));
        assert!(Number::Int(i64::MAX) < Number::Float(1e19));
        assert!(Number::Int(i64::MIN) > Number::Float(-1e19));
    }

    #[test]
    fn test_get_path_walks_nested_objects() {
        let lawyer: Value = [("name", "Noura"), ("role", "partner")].into_iter().collect();
        let case: Value = [("assigned_to", lawyer)].into_iter().collect();

        assert_eq!(case.get_path("assigned_to.name"), Some(&Value::from("Noura")));
        assert_eq!(case.get_path("assigned_to.email"), None);
        assert_eq!(case.get_path("assigned_to.name.first"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Float(2.0).to_string(), "2");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        let tags = Value::Array(vec![Value::from("civil"), Value::from("appeal")]);
        assert_eq!(tags.to_string(), "civil, appeal");
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({"fee": 10, "rate": 1.5, "tags": ["a"], "note": null});
        let value = Value::from(json);
        assert_eq!(value.get_path("fee"), Some(&Value::Int(10)));
        assert_eq!(value.get_path("rate"), Some(&Value::Float(1.5)));
        assert_eq!(value.get_path("note"), Some(&Value::Null));
    }

    #[test]
    fn test_search_text_skips_nulls_and_separates_fields() {
        let value: Value = [("a", Value::from("ab")), ("b", Value::Null), ("c", Value::from("cd"))]
            .into_iter()
            .collect();
        let mut out = String::new();
        value.push_search_text(&mut out);
        assert_eq!(out, "ab\ncd\n");
    }
}
