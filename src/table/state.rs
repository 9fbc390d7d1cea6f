//! View state: sort, search, filter, page and selection parameters.

use std::collections::HashSet;

use super::Filter;
use crate::model::RowId;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Parses `asc`/`desc` (any case, long forms accepted).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// Active sort: column key plus direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

/// Parameters of one table session.
///
/// Owned by a single [`TableView`](super::TableView); plain data so
/// [`derive_view`](super::derive_view) can be called on it directly.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub sort: Option<SortSpec>,
    /// Free-text search; empty disables it.
    pub search: String,
    pub filter: Option<Filter>,
    /// 0-based page index.
    pub page: usize,
    /// Rows per page. `0` is read as 1.
    pub page_size: usize,
    pub selected: HashSet<RowId>,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: None,
            search: String::new(),
            filter: None,
            page: 0,
            page_size: page_size.max(1),
            selected: HashSet::new(),
        }
    }

    /// Lowercased search needle, or `None` when search is disabled.
    pub(crate) fn search_needle(&self) -> Option<String> {
        let trimmed = self.search.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// Effective rows per page, never zero.
    pub fn rows_per_page(&self) -> usize {
        self.page_size.max(1)
    }

    /// Number of pages for `len` filtered rows; zero rows means zero pages.
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.rows_per_page())
    }

    /// Page index clamped into `[0, page_count - 1]` (0 when there are no rows).
    pub fn clamped_page(&self, len: usize) -> usize {
        self.page.min(self.page_count(len).saturating_sub(1))
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}
