//! Structured row filters, applied in addition to free-text search.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::TableRow;
use crate::model::Value;

/// Caller-supplied row predicate.
pub type Predicate = Arc<dyn Fn(&dyn TableRow) -> bool + Send + Sync>;

/// A filter condition evaluated against a row's fields.
///
/// Missing fields behave as `Null`. Ordering comparisons are numeric when both
/// sides read as numbers and textual otherwise; text matching is
/// case-insensitive.
///
/// # Example
///
/// ```
/// use docketview::table::Filter;
///
/// let open_high_value = Filter::eq("status", "open")
///     .and_also(Filter::ge("fee", 10_000i64));
///
/// let unassigned = Filter::is_null("assigned_to.name");
/// let either = Filter::or([open_high_value, unassigned]);
/// let _ = either.negate();
/// ```
#[derive(Clone)]
pub enum Filter {
    Eq(String, Value),
    Ne(String, Value),
    Gt(String, Value),
    Ge(String, Value),
    Lt(String, Value),
    Le(String, Value),
    /// Case-insensitive substring of the field's display text.
    Contains(String, String),
    /// Case-insensitive prefix of the field's display text.
    StartsWith(String, String),
    IsNull(String),
    IsNotNull(String),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    /// Arbitrary predicate (escape hatch).
    Custom(Predicate),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne(field.into(), value.into())
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Gt(field.into(), value.into())
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ge(field.into(), value.into())
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Lt(field.into(), value.into())
    }

    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Le(field.into(), value.into())
    }

    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Filter::Contains(field.into(), needle.into())
    }

    pub fn starts_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Filter::StartsWith(field.into(), prefix.into())
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Filter::IsNull(field.into())
    }

    pub fn is_not_null(field: impl Into<String>) -> Self {
        Filter::IsNotNull(field.into())
    }

    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&dyn TableRow) -> bool + Send + Sync + 'static,
    {
        Filter::Custom(Arc::new(predicate))
    }

    /// Combines with another filter using AND, flattening nested ANDs.
    pub fn and_also(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            first => Filter::And(vec![first, other]),
        }
    }

    /// Combines with another filter using OR, flattening nested ORs.
    pub fn or_else(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            first => Filter::Or(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Filter::Not(inner) => *inner,
            other => Filter::Not(Box::new(other)),
        }
    }

    /// Parses a `field=value` command-line condition into an equality filter.
    pub fn parse_condition(s: &str) -> Option<Self> {
        let (field, value) = s.split_once('=')?;
        let field = field.trim();
        if field.is_empty() {
            return None;
        }
        let value = value.trim();
        let value = match value.parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(_) => Value::from(value),
        };
        Some(Filter::Eq(field.to_string(), value))
    }

    /// Evaluates the filter against one row. An empty `And` matches every
    /// row; an empty `Or` matches none.
    pub fn matches(&self, row: &dyn TableRow) -> bool {
        match self {
            Filter::Eq(field, expected) => values_equal(&field_or_null(row, field), expected),
            Filter::Ne(field, expected) => !values_equal(&field_or_null(row, field), expected),
            Filter::Gt(field, bound) => compare(row, field, bound) == Some(Ordering::Greater),
            Filter::Ge(field, bound) => matches!(
                compare(row, field, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Filter::Lt(field, bound) => compare(row, field, bound) == Some(Ordering::Less),
            Filter::Le(field, bound) => matches!(
                compare(row, field, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Filter::Contains(field, needle) => display_lower(row, field)
                .is_some_and(|text| text.contains(&needle.to_lowercase())),
            Filter::StartsWith(field, prefix) => display_lower(row, field)
                .is_some_and(|text| text.starts_with(&prefix.to_lowercase())),
            Filter::IsNull(field) => field_or_null(row, field).is_null(),
            Filter::IsNotNull(field) => !field_or_null(row, field).is_null(),
            Filter::And(filters) => filters.iter().all(|f| f.matches(row)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(row)),
            Filter::Not(inner) => !inner.matches(row),
            Filter::Custom(predicate) => predicate(row),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Eq(field, v) => write!(f, "{} == {:?}", field, v),
            Filter::Ne(field, v) => write!(f, "{} != {:?}", field, v),
            Filter::Gt(field, v) => write!(f, "{} > {:?}", field, v),
            Filter::Ge(field, v) => write!(f, "{} >= {:?}", field, v),
            Filter::Lt(field, v) => write!(f, "{} < {:?}", field, v),
            Filter::Le(field, v) => write!(f, "{} <= {:?}", field, v),
            Filter::Contains(field, s) => write!(f, "{} contains {:?}", field, s),
            Filter::StartsWith(field, s) => write!(f, "{} starts with {:?}", field, s),
            Filter::IsNull(field) => write!(f, "{} is null", field),
            Filter::IsNotNull(field) => write!(f, "{} is not null", field),
            Filter::And(filters) => f.debug_tuple("And").field(filters).finish(),
            Filter::Or(filters) => f.debug_tuple("Or").field(filters).finish(),
            Filter::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Filter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn field_or_null(row: &dyn TableRow, field: &str) -> Value {
    row.field(field).unwrap_or(Value::Null)
}

fn display_lower(row: &dyn TableRow, field: &str) -> Option<String> {
    row.field(field)
        .filter(|v| !v.is_null())
        .map(|v| v.to_string().to_lowercase())
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual.as_number(), expected.as_number()) {
        (Some(a), Some(b)) => a == b,
        _ => actual == expected || (!actual.is_null() && actual.to_string() == expected.to_string()),
    }
}

/// Orders a field against a bound. Null fields never satisfy an ordering.
fn compare(row: &dyn TableRow, field: &str, bound: &Value) -> Option<Ordering> {
    let actual = row.field(field).filter(|v| !v.is_null())?;
    match (actual.as_number(), bound.as_number()) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => Some(actual.to_string().cmp(&bound.to_string())),
    }
}
