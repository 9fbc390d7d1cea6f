//! Column descriptors: field path, label, sort and display behavior.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use super::SortKey;
use crate::error::Result;
use crate::model::Value;

/// Pure display function from a raw cell value to its text.
pub type Formatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Built-in display formats selectable from column files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellFormat {
    /// ISO date or RFC 3339 timestamp shown as `YYYY-MM-DD`.
    Date,
    /// Integer part grouped by thousands: `1250000.5` -> `"1,250,000.50"`.
    Thousands,
}

impl CellFormat {
    pub fn apply(self, value: &Value) -> String {
        match self {
            CellFormat::Date => format_date(value),
            CellFormat::Thousands => format_thousands(value),
        }
    }
}

/// Describes one displayable/sortable field.
///
/// # Example
///
/// ```
/// use docketview::table::ColumnDescriptor;
///
/// let columns = vec![
///     ColumnDescriptor::new("case_no", "Case #"),
///     ColumnDescriptor::new("client.name", "Client"),
///     ColumnDescriptor::new("fee", "Fee").numeric(),
///     ColumnDescriptor::new("notes", "Notes").unsortable(),
/// ];
/// assert!(columns[2].is_numeric());
/// assert!(!columns[3].is_sortable());
/// ```
#[derive(Clone, Deserialize)]
pub struct ColumnDescriptor {
    key: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    numeric: bool,
    #[serde(default = "default_sortable")]
    sortable: bool,
    #[serde(default)]
    format: Option<CellFormat>,
    #[serde(skip)]
    formatter: Option<Formatter>,
}

fn default_sortable() -> bool {
    true
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("numeric", &self.numeric)
            .field("sortable", &self.sortable)
            .field("format", &self.format)
            .field("formatter", &self.formatter.as_ref().map(|_| ".."))
            .finish()
    }
}

impl ColumnDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            numeric: false,
            sortable: true,
            format: None,
            formatter: None,
        }
    }

    /// Marks the column numeric: right-aligned, compared numerically.
    pub fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn with_format(mut self, format: CellFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets a custom display function. Takes precedence over [`CellFormat`].
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Header text; falls back to the field key when no label was given.
    pub fn label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn alignment(&self) -> Alignment {
        if self.numeric {
            Alignment::Right
        } else {
            Alignment::Left
        }
    }

    /// Display text for a cell. Missing and null cells render empty.
    pub fn format_cell(&self, value: Option<&Value>) -> String {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return String::new();
        };
        if let Some(formatter) = &self.formatter {
            formatter(value)
        } else if let Some(format) = self.format {
            format.apply(value)
        } else {
            value.to_string()
        }
    }

    /// Sort key for a cell under this column's comparator.
    pub fn sort_key(&self, value: Option<&Value>) -> SortKey {
        if self.numeric {
            value
                .and_then(Value::as_number)
                .map_or(SortKey::Missing, SortKey::Number)
        } else {
            SortKey::Text(self.format_cell(value))
        }
    }
}

/// Reads a JSON array of column descriptors (`key`, `label`, `numeric`,
/// `sortable`, `format`).
pub fn read_columns(path: &Path) -> Result<Vec<ColumnDescriptor>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn format_date(value: &Value) -> String {
    let Some(s) = value.as_str() else {
        return value.to_string();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    match NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => s.to_string(),
    }
}

fn format_thousands(value: &Value) -> String {
    let (negative, int_part, frac) = match value {
        Value::Int(i) => (*i < 0, i.unsigned_abs().to_string(), None),
        other => match other.as_f64() {
            Some(f) => {
                let fixed = format!("{:.2}", f.abs());
                let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
                (f < 0.0, int_part.to_string(), Some(frac.to_string()))
            }
            None => return other.to_string(),
        },
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    if negative {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac {
        grouped.push('.');
        grouped.push_str(&frac);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Number;

    #[test]
    fn test_format_cell_prefers_custom_formatter() {
        let column = ColumnDescriptor::new("fee", "Fee")
            .with_format(CellFormat::Thousands)
            .with_formatter(|v| format!("SAR {}", v));
        assert_eq!(column.format_cell(Some(&Value::Int(1500))), "SAR 1500");
        assert_eq!(column.format_cell(None), "");
        assert_eq!(column.format_cell(Some(&Value::Null)), "");
    }

    #[test]
    fn test_numeric_sort_key_treats_non_numeric_as_missing() {
        let column = ColumnDescriptor::new("fee", "Fee").numeric();
        assert_eq!(
            column.sort_key(Some(&Value::from("1200"))),
            SortKey::Number(Number::Int(1200))
        );
        assert_eq!(column.sort_key(Some(&Value::from("INF"))), SortKey::Missing);
        assert_eq!(column.sort_key(Some(&Value::from("n/a"))), SortKey::Missing);
        assert_eq!(column.sort_key(None), SortKey::Missing);
    }

    #[test]
    fn test_text_sort_key_uses_formatted_value() {
        let column = ColumnDescriptor::new("status", "Status").with_formatter(|v| {
            v.as_str().map(str::to_uppercase).unwrap_or_default()
        });
        assert_eq!(
            column.sort_key(Some(&Value::from("open"))),
            SortKey::Text("OPEN".to_string())
        );
    }

    #[test]
    fn test_alignment_and_label_fallback() {
        let column: ColumnDescriptor =
            serde_json::from_str(r#"{"key": "amount", "numeric": true}"#).unwrap();
        assert_eq!(column.label(), "amount");
        assert_eq!(column.alignment(), Alignment::Right);
        assert!(column.is_sortable());
        assert_eq!(ColumnDescriptor::new("a", "A").alignment(), Alignment::Left);
    }

    #[test]
    fn test_column_file_with_formats() {
        let columns: Vec<ColumnDescriptor> = serde_json::from_str(
            r#"[
                {"key": "opened", "label": "Opened", "format": "date"},
                {"key": "notes", "sortable": false}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            columns[0].format_cell(Some(&Value::from("2024-03-05T10:00:00+03:00"))),
            "2024-03-05"
        );
        assert!(!columns[1].is_sortable());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&Value::from("2024-11-02")), "2024-11-02");
        assert_eq!(format_date(&Value::from("2024-11-02 08:15")), "2024-11-02");
        assert_eq!(format_date(&Value::from("pending")), "pending");
        assert_eq!(format_date(&Value::Int(5)), "5");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(&Value::Int(1_250_000)), "1,250,000");
        assert_eq!(format_thousands(&Value::Int(-999)), "-999");
        assert_eq!(format_thousands(&Value::Int(0)), "0");
        assert_eq!(format_thousands(&Value::Float(1234.5)), "1,234.50");
        assert_eq!(format_thousands(&Value::from("100000")), "100,000.00");
        assert_eq!(format_thousands(&Value::from("abc")), "abc");
    }
}
