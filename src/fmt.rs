//! Plain-text rendering of a visible page.
//!
//! Pure formatting only: widths, alignment, footer label. Callers decide
//! where the text goes.

use crate::table::{Alignment, ColumnDescriptor, TableRow, VisiblePage};

/// Column separator between cells.
const GAP: &str = "  ";

/// Renders header, rows and footer.
///
/// ```text
///   ID  TITLE            FEE
///    1  Lease review   4,500
/// rows 1-1 of 1, page 1/1, 0 selected
/// ```
///
/// `selected` marks rows with `*` in a leading gutter when any row is selected.
pub fn render_page<R: TableRow>(
    page: &VisiblePage<'_, R>,
    columns: &[ColumnDescriptor],
    selected: &dyn Fn(&R) -> bool,
    selection_count: usize,
) -> String {
    let cells: Vec<Vec<String>> = page
        .rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| c.format_cell(row.field(c.key()).as_ref()))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| display_width(&row[i]))
                .chain(std::iter::once(display_width(c.label())))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let gutter = selection_count > 0;
    let mut out = String::new();

    let header: Vec<String> = columns.iter().map(|c| c.label().to_uppercase()).collect();
    push_line(&mut out, gutter.then_some(" "), &header, columns, &widths);

    for (row, line) in page.rows().iter().zip(&cells) {
        let mark = gutter.then(|| if selected(*row) { "*" } else { " " });
        push_line(&mut out, mark, line, columns, &widths);
    }

    out.push_str(&footer(page, selection_count));
    out.push('\n');
    out
}

/// Footer label: `rows 11-20 of 25, page 2/3, 4 selected`.
pub fn footer<R: TableRow>(page: &VisiblePage<'_, R>, selection_count: usize) -> String {
    let rows = match page.range() {
        Some(range) => format!("rows {}-{} of {}", range.start(), range.end(), page.total_filtered()),
        None => "no matching rows".to_string(),
    };
    let page_label = if page.page_count() == 0 {
        "page 0/0".to_string()
    } else {
        format!("page {}/{}", page.page() + 1, page.page_count())
    };
    format!("{}, {}, {} selected", rows, page_label, selection_count)
}

fn push_line(
    out: &mut String,
    mark: Option<&str>,
    cells: &[String],
    columns: &[ColumnDescriptor],
    widths: &[usize],
) {
    let mut line = String::new();
    if let Some(mark) = mark {
        line.push_str(mark);
        line.push(' ');
    }
    for (i, ((cell, column), width)) in cells.iter().zip(columns).zip(widths).enumerate() {
        if i > 0 {
            line.push_str(GAP);
        }
        let pad = width.saturating_sub(display_width(cell));
        match column.alignment() {
            Alignment::Left => {
                line.push_str(cell);
                line.extend(std::iter::repeat_n(' ', pad));
            }
            Alignment::Right => {
                line.extend(std::iter::repeat_n(' ', pad));
                line.push_str(cell);
            }
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}
