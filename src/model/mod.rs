//! Dynamic record model: values, identifiers and rows.

mod record;
mod value;

pub use record::{FALLBACK_ID_FIELD, Record, RowId, parse_records, read_records};
pub use value::{Number, Value};
