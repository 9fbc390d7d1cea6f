//! Stateful table view over an in-memory collection.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace, warn};

use super::view::select_all_state;
use super::{
    ColumnDescriptor, DiffStatus, Filter, SelectAllState, SortDirection, SortSpec, TableRow,
    ViewState, VisiblePage, derive_view, filter_rows,
};
use crate::config::ViewConfig;
use crate::error::{Result, ViewError};
use crate::model::RowId;

/// Table view state machine: owns the collection, the columns and the
/// [`ViewState`], and derives the visible page on demand.
///
/// Every mutating call validates its arguments before touching state, so a
/// rejected call leaves the view exactly as it was.
///
/// # Example
///
/// ```
/// use docketview::model::{Record, Value};
/// use docketview::table::{ColumnDescriptor, TableView};
///
/// let rows = vec![
///     Record::from_fields([("id", Value::Int(1)), ("name", Value::from("B"))], "id").unwrap(),
///     Record::from_fields([("id", Value::Int(2)), ("name", Value::from("A"))], "id").unwrap(),
/// ];
/// let mut view = TableView::new(vec![ColumnDescriptor::new("name", "Name")]);
/// view.replace_collection(rows);
/// view.set_sort("name", None).unwrap();
///
/// let page = view.visible_page();
/// assert_eq!(page.rows()[0].get("name"), Some(&Value::from("A")));
/// ```
#[derive(Debug)]
pub struct TableView<R: TableRow> {
    rows: Vec<R>,
    columns: Vec<ColumnDescriptor>,
    state: ViewState,
    /// Ids of the full collection, for selection membership checks.
    ids: HashSet<RowId>,
    /// Formatted cells of the previous collection, for diff tracking.
    previous: HashMap<RowId, Vec<String>>,
    diff_status: HashMap<RowId, DiffStatus>,
    page_size_options: Vec<usize>,
}

impl<R: TableRow> TableView<R> {
    /// Creates an empty view with default configuration.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        let config = ViewConfig::default();
        Self {
            rows: Vec::new(),
            columns,
            state: ViewState::new(config.page_size),
            ids: HashSet::new(),
            previous: HashMap::new(),
            diff_status: HashMap::new(),
            page_size_options: config.page_size_options,
        }
    }

    /// Creates an empty view from configuration, validating page size and
    /// initial sort column.
    pub fn with_config(columns: Vec<ColumnDescriptor>, config: &ViewConfig) -> Result<Self> {
        let mut view = Self::new(columns);
        view.set_page_size(i64::try_from(config.page_size).unwrap_or(i64::MAX))?;
        view.page_size_options = config.page_size_options.clone();
        if let Some(key) = &config.sort {
            let direction = if config.descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            view.set_sort(key, Some(direction))?;
        }
        Ok(view)
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Full, unfiltered collection in insertion order.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Sets the free-text search. Empty (or whitespace-only) text disables it.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.state.search = text.into();
        self.clamp_page();
    }

    /// Sets the structured filter, combined with the search text by AND.
    pub fn apply_filter(&mut self, filter: Filter) {
        debug!(filter = ?filter, "filter applied");
        self.state.filter = Some(filter);
        self.clamp_page();
    }

    pub fn clear_filter(&mut self) {
        self.state.filter = None;
        self.clamp_page();
    }

    /// Sorts by `key`.
    ///
    /// Re-selecting the current column without a direction toggles the
    /// direction; a new column defaults to ascending. Unknown or
    /// non-sortable columns are rejected with [`ViewError::InvalidColumn`].
    pub fn set_sort(&mut self, key: &str, direction: Option<SortDirection>) -> Result<()> {
        let sortable = self
            .columns
            .iter()
            .any(|c| c.key() == key && c.is_sortable());
        if !sortable {
            warn!(column = key, "rejected sort on unknown or unsortable column");
            return Err(ViewError::InvalidColumn {
                key: key.to_string(),
            });
        }

        let direction = match (&self.state.sort, direction) {
            (_, Some(direction)) => direction,
            (Some(current), None) if current.key == key => current.direction.toggled(),
            _ => SortDirection::Ascending,
        };
        debug!(column = key, ?direction, "sort changed");
        self.state.sort = Some(SortSpec {
            key: key.to_string(),
            direction,
        });
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        self.state.sort = None;
    }

    /// Moves to page `index`, clamped to the last page. Negative indexes are
    /// rejected with [`ViewError::OutOfRange`].
    pub fn set_page(&mut self, index: i64) -> Result<()> {
        let Ok(index) = usize::try_from(index) else {
            return Err(ViewError::OutOfRange { index });
        };
        self.state.page = index;
        self.clamp_page();
        Ok(())
    }

    /// Sets rows per page. Non-positive sizes are rejected with
    /// [`ViewError::InvalidArgument`].
    pub fn set_page_size(&mut self, size: i64) -> Result<()> {
        let size = match usize::try_from(size) {
            Ok(size) if size > 0 => size,
            _ => {
                return Err(ViewError::InvalidArgument {
                    name: "page_size",
                    value: size,
                });
            }
        };
        self.state.page_size = size;
        self.clamp_page();
        Ok(())
    }

    /// Flips selection of `id`. Ids outside the collection are ignored.
    pub fn toggle_row_selection(&mut self, id: &RowId) {
        if !self.ids.contains(id) {
            trace!(%id, "toggle ignored for id outside collection");
            return;
        }
        if !self.state.selected.remove(id) {
            self.state.selected.insert(id.clone());
        }
    }

    /// Selects every row matching the current search and filter, or, when
    /// all of them are already selected, deselects exactly those rows.
    /// Selection of filtered-out rows is never touched.
    pub fn toggle_select_all(&mut self) {
        let matching: Vec<RowId> = filter_rows(&self.rows, &self.state)
            .iter()
            .map(|row| row.id())
            .collect();
        let all_selected = matching.iter().all(|id| self.state.selected.contains(id));

        if all_selected {
            for id in &matching {
                self.state.selected.remove(id);
            }
        } else {
            self.state.selected.extend(matching.iter().cloned());
        }
        debug!(
            rows = matching.len(),
            selected = self.state.selected.len(),
            cleared = all_selected,
            "select all toggled"
        );
    }

    pub fn clear_selection(&mut self) {
        self.state.selected.clear();
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.state.selected.contains(id)
    }

    /// Selected ids in collection order.
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.rows
            .iter()
            .map(TableRow::id)
            .filter(|id| self.state.selected.contains(id))
            .collect()
    }

    pub fn selection_count(&self) -> usize {
        self.state.selected.len()
    }

    /// Header checkbox state over the rows matching search and filter.
    pub fn select_all_state(&self) -> SelectAllState {
        select_all_state(&self.rows, &self.state)
    }

    /// Current page after filter, sort and pagination.
    pub fn visible_page(&self) -> VisiblePage<'_, R> {
        let page = derive_view(&self.rows, &self.state, &self.columns);
        trace!(
            page = page.page(),
            rows = page.rows().len(),
            total = page.total_filtered(),
            "derived visible page"
        );
        page
    }

    /// Formatted cells of the visible page, one `Vec` per row in column order.
    pub fn visible_cells(&self) -> Vec<Vec<String>> {
        self.visible_page()
            .rows()
            .iter()
            .map(|row| self.format_row(*row))
            .collect()
    }

    /// Change marker of a row from the last [`replace_collection`](Self::replace_collection).
    pub fn diff_status(&self, id: &RowId) -> DiffStatus {
        self.diff_status.get(id).cloned().unwrap_or_default()
    }

    /// Swaps the collection: resets to page 0, drops selected ids that no
    /// longer exist and recomputes per-row diff status.
    pub fn replace_collection(&mut self, rows: Vec<R>) {
        let mut diff_status = HashMap::with_capacity(rows.len());
        let mut current = HashMap::with_capacity(rows.len());
        for row in &rows {
            let id = row.id();
            let cells = self.format_row(row);
            let status = match self.previous.get(&id) {
                None => DiffStatus::New,
                Some(prev) => {
                    let changed: Vec<usize> = prev
                        .iter()
                        .zip(cells.iter())
                        .enumerate()
                        .filter(|(_, (p, n))| p != n)
                        .map(|(i, _)| i)
                        .collect();
                    if changed.is_empty() {
                        DiffStatus::Unchanged
                    } else {
                        DiffStatus::Modified(changed)
                    }
                }
            };
            diff_status.insert(id.clone(), status);
            current.insert(id, cells);
        }

        let ids: HashSet<RowId> = rows.iter().map(TableRow::id).collect();
        let before = self.state.selected.len();
        self.state.selected.retain(|id| ids.contains(id));

        debug!(
            rows = rows.len(),
            dropped_selection = before - self.state.selected.len(),
            "collection replaced"
        );

        self.rows = rows;
        self.ids = ids;
        self.previous = current;
        self.diff_status = diff_status;
        self.state.page = 0;
    }

    fn format_row(&self, row: &R) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.format_cell(row.field(c.key()).as_ref()))
            .collect()
    }

    fn clamp_page(&mut self) {
        let len = filter_rows(&self.rows, &self.state).len();
        let clamped = self.state.clamped_page(len);
        if clamped != self.state.page {
            debug!(from = self.state.page, to = clamped, filtered = len, "page clamped");
            self.state.page = clamped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Record, Value};

    fn record(id: i64, name: &str) -> Record {
        Record::from_fields([("id", Value::Int(id)), ("name", Value::from(name))], "id").unwrap()
    }

    fn numbered(n: i64) -> Vec<Record> {
        (0..n).map(|i| record(i, &format!("row {}", i))).collect()
    }

    fn view_with(rows: Vec<Record>) -> TableView<Record> {
        let mut view = TableView::new(vec![
            ColumnDescriptor::new("id", "ID").numeric(),
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("notes", "Notes").unsortable(),
        ]);
        view.replace_collection(rows);
        view
    }

    fn ids(view: &TableView<Record>) -> Vec<i64> {
        view.visible_page()
            .ids()
            .into_iter()
            .map(|id| match id {
                RowId::Int(i) => i,
                RowId::Text(_) => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn test_pages_of_twenty_five() {
        let mut view = view_with(numbered(25));
        assert_eq!(ids(&view), (0..10).collect::<Vec<_>>());

        view.set_page(2).unwrap();
        assert_eq!(ids(&view), (20..25).collect::<Vec<_>>());

        view.set_page(3).unwrap();
        assert_eq!(view.state().page, 2);
        assert_eq!(view.visible_page().page_count(), 3);
    }

    #[test]
    fn test_stable_sort_keeps_ties_in_order() {
        let mut view = view_with(vec![record(1, "B"), record(2, "A"), record(3, "A")]);
        view.set_sort("name", Some(SortDirection::Ascending)).unwrap();
        assert_eq!(ids(&view), vec![2, 3, 1]);

        view.set_sort("name", Some(SortDirection::Descending)).unwrap();
        assert_eq!(ids(&view), vec![1, 2, 3]);
    }

    #[test]
    fn test_numeric_sort_keeps_large_integers_apart() {
        let fee = |id: i64, fee: i64| {
            Record::from_fields([("id", Value::Int(id)), ("fee", Value::Int(fee))], "id").unwrap()
        };
        let mut view = TableView::new(vec![ColumnDescriptor::new("fee", "Fee").numeric()]);
        view.replace_collection(vec![
            fee(1, 9_007_199_254_740_993),
            fee(2, 9_007_199_254_740_992),
        ]);

        view.set_sort("fee", Some(SortDirection::Ascending)).unwrap();
        assert_eq!(ids(&view), vec![2, 1]);

        view.apply_filter(Filter::eq("fee", 9_007_199_254_740_992i64));
        assert_eq!(ids(&view), vec![2]);
    }

    #[test]
    fn test_sort_toggles_on_same_column() {
        let mut view = view_with(numbered(3));
        view.set_sort("id", None).unwrap();
        assert_eq!(view.state().sort.as_ref().unwrap().direction, SortDirection::Ascending);
        view.set_sort("id", None).unwrap();
        assert_eq!(view.state().sort.as_ref().unwrap().direction, SortDirection::Descending);
        assert_eq!(ids(&view), vec![2, 1, 0]);

        view.set_sort("name", None).unwrap();
        assert_eq!(view.state().sort.as_ref().unwrap().direction, SortDirection::Ascending);
    }

    #[test]
    fn test_search_without_matches_clamps_to_first_page() {
        let mut view = view_with(numbered(25));
        view.set_page(2).unwrap();
        view.set_search_text("xyz");

        let page = view.visible_page();
        assert!(page.is_empty());
        assert_eq!(page.page(), 0);
        assert_eq!(view.state().page, 0);
    }

    #[test]
    fn test_unsortable_column_is_rejected() {
        let mut view = view_with(numbered(3));
        view.set_sort("name", None).unwrap();

        let err = view.set_sort("notes", None).unwrap_err();
        assert!(matches!(err, ViewError::InvalidColumn { ref key } if key == "notes"));
        assert_eq!(view.state().sort.as_ref().unwrap().key, "name");

        assert!(matches!(
            view.set_sort("unknown", None),
            Err(ViewError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn test_select_all_only_touches_filtered_rows() {
        let mut view = view_with(vec![
            record(1, "alpha"),
            record(2, "alpine"),
            record(3, "alps"),
            record(4, "beta"),
        ]);
        view.set_search_text("al");
        view.toggle_select_all();
        assert_eq!(view.selected_ids(), vec![RowId::Int(1), RowId::Int(2), RowId::Int(3)]);
        assert_eq!(view.select_all_state(), SelectAllState::All);

        view.set_search_text("alps");
        view.toggle_select_all();
        assert_eq!(view.selected_ids(), vec![RowId::Int(1), RowId::Int(2)]);

        view.set_search_text("");
        assert_eq!(view.select_all_state(), SelectAllState::Partial);
    }

    #[test]
    fn test_invalid_page_size_keeps_previous() {
        let mut view = view_with(numbered(25));
        view.set_page_size(5).unwrap();

        let err = view.set_page_size(0).unwrap_err();
        assert!(matches!(err, ViewError::InvalidArgument { name: "page_size", value: 0 }));
        assert!(view.set_page_size(-3).is_err());
        assert_eq!(view.state().page_size, 5);
    }

    #[test]
    fn test_page_size_change_clamps_page() {
        let mut view = view_with(numbered(25));
        view.set_page(2).unwrap();
        view.set_page_size(25).unwrap();
        assert_eq!(view.state().page, 0);
        assert_eq!(view.visible_page().rows().len(), 25);
    }

    #[test]
    fn test_negative_page_is_out_of_range() {
        let mut view = view_with(numbered(25));
        view.set_page(1).unwrap();
        assert!(matches!(
            view.set_page(-1),
            Err(ViewError::OutOfRange { index: -1 })
        ));
        assert_eq!(view.state().page, 1);
    }

    #[test]
    fn test_toggle_row_selection() {
        let mut view = view_with(numbered(3));
        view.toggle_row_selection(&RowId::Int(1));
        assert!(view.is_selected(&RowId::Int(1)));
        view.toggle_row_selection(&RowId::Int(1));
        assert!(!view.is_selected(&RowId::Int(1)));

        view.toggle_row_selection(&RowId::Int(99));
        assert_eq!(view.selection_count(), 0);
    }

    #[test]
    fn test_replace_collection_resets_page_and_prunes_selection() {
        let mut view = view_with(numbered(25));
        view.toggle_row_selection(&RowId::Int(3));
        view.toggle_row_selection(&RowId::Int(20));
        view.set_page(2).unwrap();

        view.replace_collection(numbered(10));
        assert_eq!(view.state().page, 0);
        assert_eq!(view.selected_ids(), vec![RowId::Int(3)]);

        view.clear_selection();
        assert_eq!(view.selection_count(), 0);
    }

    #[test]
    fn test_diff_status_across_replacements() {
        let mut view = view_with(vec![record(1, "a"), record(2, "b")]);
        assert_eq!(view.diff_status(&RowId::Int(1)), DiffStatus::New);

        view.replace_collection(vec![record(1, "a"), record(2, "B"), record(3, "c")]);
        assert_eq!(view.diff_status(&RowId::Int(1)), DiffStatus::Unchanged);
        assert_eq!(view.diff_status(&RowId::Int(2)), DiffStatus::Modified(vec![1]));
        assert_eq!(view.diff_status(&RowId::Int(3)), DiffStatus::New);
        assert_eq!(view.diff_status(&RowId::Int(42)), DiffStatus::Unchanged);
    }

    #[test]
    fn test_filter_combines_with_search() {
        let mut view = view_with(numbered(25));
        view.apply_filter(Filter::ge("id", 10i64));
        view.set_search_text("row 1");
        assert_eq!(ids(&view), (10..20).collect::<Vec<_>>());

        view.clear_filter();
        assert_eq!(view.visible_page().total_filtered(), 11);
    }

    #[test]
    fn test_visible_cells_use_column_formatting() {
        let mut view = TableView::new(vec![
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("id", "ID").with_formatter(|v| format!("#{}", v)),
            ColumnDescriptor::new("notes", "Notes"),
        ]);
        view.replace_collection(vec![record(7, "Lease")]);
        assert_eq!(
            view.visible_cells(),
            vec![vec!["Lease".to_string(), "#7".to_string(), String::new()]]
        );
    }

    #[test]
    fn test_with_config() {
        let config = ViewConfig::default()
            .with_page_size(25)
            .with_sort("name", true);
        let view: TableView<Record> =
            TableView::with_config(vec![ColumnDescriptor::new("name", "Name")], &config).unwrap();
        assert_eq!(view.state().page_size, 25);
        assert_eq!(
            view.state().sort,
            Some(SortSpec {
                key: "name".to_string(),
                direction: SortDirection::Descending,
            })
        );

        let bad = ViewConfig::default().with_page_size(0);
        assert!(TableView::<Record>::with_config(Vec::new(), &bad).is_err());

        let bad = ViewConfig::default().with_sort("missing", false);
        assert!(matches!(
            TableView::<Record>::with_config(Vec::new(), &bad),
            Err(ViewError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn test_visible_page_is_idempotent() {
        let mut view = view_with(numbered(25));
        view.set_sort("name", Some(SortDirection::Descending)).unwrap();
        view.set_search_text("1");
        assert_eq!(view.visible_page(), view.visible_page());
    }
}
