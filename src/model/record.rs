//! Record type: one row of domain data with a stable identifier.

use std::fmt;
use std::fs;
use std::path::Path;

use super::Value;
use crate::error::{Result, ViewError};

/// Field tried when the configured id field is absent.
pub const FALLBACK_ID_FIELD: &str = "_id";

/// Stable row identifier.
///
/// Integer ids and string ids (UUIDs, Mongo-style object ids) never compare
/// equal to each other, so `1` and `"1"` are distinct rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl RowId {
    /// Parses a command-line style id: integers become `Int`, anything else `Text`.
    pub fn parse(s: &str) -> Self {
        match s.trim().parse::<i64>() {
            Ok(i) => RowId::Int(i),
            Err(_) => RowId::Text(s.to_string()),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(RowId::Int(*i)),
            Value::String(s) if !s.is_empty() => Some(RowId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(i) => write!(f, "{}", i),
            RowId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowId {
    fn from(i: i64) -> Self {
        RowId::Int(i)
    }
}

impl From<i32> for RowId {
    fn from(i: i32) -> Self {
        RowId::Int(i64::from(i))
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        RowId::Text(s.to_string())
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        RowId::Text(s)
    }
}

/// A loosely-shaped row: ordered top-level fields plus the id extracted from one of them.
///
/// The id field stays among the fields so it can be displayed and searched
/// like any other column.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RowId,
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Builds a record from ordered fields, taking the id from `id_field`
    /// (or from `_id` when `id_field` is absent).
    ///
    /// A later duplicate key replaces the earlier value in place.
    pub fn from_fields<K, V, I>(fields: I, id_field: &str) -> Result<Self>
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut ordered: Vec<(String, Value)> = Vec::new();
        for (key, value) in fields {
            let key = key.into();
            let value = value.into();
            match ordered.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => ordered.push((key, value)),
            }
        }

        let lookup = |name: &str| ordered.iter().find(|(k, _)| k == name).map(|(_, v)| v);
        let id = lookup(id_field)
            .or_else(|| lookup(FALLBACK_ID_FIELD))
            .and_then(RowId::from_value)
            .ok_or_else(|| ViewError::MissingId {
                field: id_field.to_string(),
            })?;

        Ok(Self { id, fields: ordered })
    }

    /// Converts one JSON object. Field order follows the document.
    pub fn from_json(json: serde_json::Value, id_field: &str) -> Result<Self> {
        match json {
            serde_json::Value::Object(map) => {
                Self::from_fields(map.into_iter().map(|(k, v)| (k, Value::from(v))), id_field)
            }
            _ => Err(ViewError::MissingId {
                field: id_field.to_string(),
            }),
        }
    }

    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// Top-level field by exact name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Field by dotted path: the first segment names a top-level field, the
    /// rest walk nested objects.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        match path.split_once('.') {
            None => self.get(path),
            Some((head, rest)) => self.get(head)?.get_path(rest),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}

/// Parses a JSON array of objects into records.
pub fn parse_records(json: &str, id_field: &str) -> Result<Vec<Record>> {
    let items: Vec<serde_json::Value> = serde_json::from_str(json)?;
    items
        .into_iter()
        .map(|item| Record::from_json(item, id_field))
        .collect()
}

/// Reads a JSON array of objects from disk.
pub fn read_records(path: &Path, id_field: &str) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)?;
    parse_records(&text, id_field)
}
