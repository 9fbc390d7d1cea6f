//! Pure derivation of the visible page: filter, then sort, then paginate.

use std::ops::RangeInclusive;

use super::{ColumnDescriptor, SortDirection, TableRow, ViewState};
use crate::model::RowId;

/// Header checkbox state over the filtered rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    /// No filtered row is selected (or there are no filtered rows).
    None,
    /// Some but not all filtered rows are selected.
    Partial,
    All,
}

/// The materialized slice of rows for the current page.
#[derive(Debug, Clone, PartialEq)]
pub struct VisiblePage<'a, R> {
    rows: Vec<&'a R>,
    total_filtered: usize,
    page: usize,
    page_count: usize,
    page_size: usize,
}

impl<'a, R: TableRow> VisiblePage<'a, R> {
    pub fn rows(&self) -> &[&'a R] {
        &self.rows
    }

    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|row| row.id()).collect()
    }

    /// Rows matching search and filter, across all pages.
    pub fn total_filtered(&self) -> usize {
        self.total_filtered
    }

    /// Effective 0-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 1-based positions of the first and last visible rows within the
    /// filtered set, for "11-20 of 25" labels. `None` when the page is empty.
    pub fn range(&self) -> Option<RangeInclusive<usize>> {
        if self.rows.is_empty() {
            return None;
        }
        let start = self.page * self.page_size + 1;
        Some(start..=start + self.rows.len() - 1)
    }
}

/// Rows passing the search text and structured filter, in collection order.
pub fn filter_rows<'a, R: TableRow>(rows: &'a [R], state: &ViewState) -> Vec<&'a R> {
    let needle = state.search_needle();
    rows.iter()
        .filter(|row| needle.as_deref().is_none_or(|n| row.matches_search(n)))
        .filter(|row| state.filter.as_ref().is_none_or(|f| f.matches(*row)))
        .collect()
}

/// Derives the visible page from the full collection.
///
/// Always recomputed from `rows`, so two calls with the same inputs return
/// equal pages. A sort key that names no column is ignored, and a page index
/// past the end is clamped to the last page.
pub fn derive_view<'a, R: TableRow>(
    rows: &'a [R],
    state: &ViewState,
    columns: &[ColumnDescriptor],
) -> VisiblePage<'a, R> {
    let mut filtered = filter_rows(rows, state);

    let sort = state
        .sort
        .as_ref()
        .and_then(|spec| Some((columns.iter().find(|c| c.key() == spec.key)?, spec.direction)));
    if let Some((column, direction)) = sort {
        // Keys computed once per row; sort_by is stable and reversing the
        // comparator keeps equal keys in collection order.
        let mut keyed: Vec<_> = filtered
            .into_iter()
            .map(|row| (column.sort_key(row.field(column.key()).as_ref()), row))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| match direction {
            SortDirection::Ascending => a.cmp(b),
            SortDirection::Descending => b.cmp(a),
        });
        filtered = keyed.into_iter().map(|(_, row)| row).collect();
    }

    let total_filtered = filtered.len();
    let page_size = state.rows_per_page();
    let page_count = state.page_count(total_filtered);
    let page = state.clamped_page(total_filtered);
    let start = (page * page_size).min(total_filtered);
    let end = (start + page_size).min(total_filtered);

    VisiblePage {
        rows: filtered[start..end].to_vec(),
        total_filtered,
        page,
        page_count,
        page_size,
    }
}

/// Header checkbox state for `state.selected` over the filtered rows.
pub(crate) fn select_all_state<R: TableRow>(rows: &[R], state: &ViewState) -> SelectAllState {
    let filtered = filter_rows(rows, state);
    let selected = filtered
        .iter()
        .filter(|row| state.selected.contains(&row.id()))
        .count();
    match selected {
        0 => SelectAllState::None,
        n if n == filtered.len() => SelectAllState::All,
        _ => SelectAllState::Partial,
    }
}
