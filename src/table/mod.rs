//! Generic table view: filtering, sorting, pagination, selection, diff tracking.

mod column;
mod engine;
mod filter;
mod state;
mod view;

pub use column::{Alignment, CellFormat, ColumnDescriptor, Formatter, read_columns};
pub use engine::TableView;
pub use filter::{Filter, Predicate};
pub use state::{SortDirection, SortSpec, ViewState};
pub use view::{SelectAllState, VisiblePage, derive_view, filter_rows};

use std::cmp::Ordering;

use crate::model::{Number, Record, RowId, Value};

/// Sort key extracted from one cell.
///
/// Numeric columns produce `Number` or `Missing`; every other column produces
/// `Text`. `Missing` orders below everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Missing,
    Number(Number),
    Text(String),
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
            (SortKey::Missing, _) => Ordering::Less,
            (_, SortKey::Missing) => Ordering::Greater,
            (SortKey::Number(a), SortKey::Number(b)) => a.cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
        }
    }
}

/// Diff status for highlighting changes between collection replacements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DiffStatus {
    /// Row id absent from the previous collection.
    New,
    /// Row present before with the listed column indices changed.
    Modified(Vec<usize>),
    #[default]
    Unchanged,
}

/// Trait for table row items.
///
/// Object safe, so structured filters can evaluate any row through
/// `&dyn TableRow`.
pub trait TableRow {
    /// Unique identifier for selection and diff tracking.
    fn id(&self) -> RowId;

    /// Value at a dotted field path, if present.
    fn field(&self, path: &str) -> Option<Value>;

    /// Case-insensitive free-text match. `needle` is already lowercased and non-empty.
    fn matches_search(&self, needle: &str) -> bool;
}

impl TableRow for Record {
    fn id(&self) -> RowId {
        Record::id(self).clone()
    }

    fn field(&self, path: &str) -> Option<Value> {
        self.get_path(path).cloned()
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.fields().any(|(_, value)| {
            let mut text = String::new();
            value.push_search_text(&mut text);
            text.to_lowercase().contains(needle)
        })
    }
}
