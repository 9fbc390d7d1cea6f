//! docketview - print one page of a JSON record collection as a table.
//!
//! Usage:
//!   docketview -r cases.json                          # first page, inferred columns
//!   docketview -r cases.json -c columns.json -s fee --desc
//!   docketview -r cases.json --search riyadh -p 2 -n 25
//!   docketview -r cases.json -w status=open --select 7 --select 9

use std::path::PathBuf;

use clap::Parser;
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

use docketview::config::ViewConfig;
use docketview::fmt::render_page;
use docketview::model::{Record, RowId, Value, read_records};
use docketview::table::{ColumnDescriptor, Filter, SortDirection, TableView, read_columns};

/// Print one page of a JSON record collection.
#[derive(Parser)]
#[command(name = "docketview", about = "Tabular view over JSON records", version)]
struct Args {
    /// JSON array of record objects.
    #[arg(short, long, value_name = "FILE")]
    records: PathBuf,

    /// JSON array of column descriptors. Default: top-level keys of the first record.
    #[arg(short, long, value_name = "FILE")]
    columns: Option<PathBuf>,

    /// JSON view configuration (page size, id field, initial sort).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Case-insensitive free-text search over all fields.
    #[arg(long)]
    search: Option<String>,

    /// Equality condition `field=value`; repeat to combine with AND.
    #[arg(short = 'w', long = "where", value_name = "FIELD=VALUE", value_parser = parse_condition)]
    conditions: Vec<Filter>,

    /// Column to sort by.
    #[arg(short, long, value_name = "FIELD")]
    sort: Option<String>,

    /// Sort descending.
    #[arg(long, requires = "sort")]
    desc: bool,

    /// 1-based page number.
    #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
    page: i64,

    /// Rows per page. Default: from config (10).
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    page_size: Option<i64>,

    /// Mark a row id as selected; repeatable.
    #[arg(long = "select", value_name = "ID")]
    select: Vec<String>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is warn level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn parse_condition(s: &str) -> Result<Filter, String> {
    Filter::parse_condition(s).ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", s))
}

/// 0-based page index for a 1-based `--page` argument.
fn page_index(page: i64) -> i64 {
    page.saturating_sub(1)
}

/// Initializes the tracing subscriber on stderr so the table stays on stdout.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("docketview={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Columns from the first record's top-level keys. Fields whose first value
/// is numeric become numeric columns.
fn infer_columns(records: &[Record]) -> Vec<ColumnDescriptor> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    first
        .fields()
        .map(|(key, value)| {
            let column = ColumnDescriptor::new(key, key);
            if matches!(value, Value::Int(_) | Value::Float(_)) {
                column.numeric()
            } else {
                column
            }
        })
        .collect()
}

fn run(args: Args) -> docketview::Result<String> {
    let config = match &args.config {
        Some(path) => ViewConfig::from_file(path)?,
        None => ViewConfig::default(),
    };

    let records = read_records(&args.records, &config.id_field)?;
    info!(path = %args.records.display(), rows = records.len(), "records loaded");

    let columns = match &args.columns {
        Some(path) => read_columns(path)?,
        None => infer_columns(&records),
    };
    debug!(columns = columns.len(), "columns ready");

    let mut view = TableView::with_config(columns, &config)?;
    view.replace_collection(records);

    if let Some(text) = &args.search {
        view.set_search_text(text.as_str());
    }
    if !args.conditions.is_empty() {
        view.apply_filter(Filter::and(args.conditions));
    }
    if let Some(key) = &args.sort {
        let direction = if args.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        view.set_sort(key, Some(direction))?;
    }
    if let Some(size) = args.page_size {
        view.set_page_size(size)?;
    }
    view.set_page(page_index(args.page))?;

    for id in &args.select {
        view.toggle_row_selection(&RowId::parse(id));
    }

    let page = view.visible_page();
    Ok(render_page(
        &page,
        view.columns(),
        &|row: &Record| view.is_selected(row.id()),
        view.selection_count(),
    ))
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match run(args) {
        Ok(text) => print!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
