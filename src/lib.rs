//! docketview - in-memory table views for practice-management data.
//!
//! Takes a flat collection of records (cases, clients, invoices, ...) and a
//! list of column descriptors, and derives the visible page after search,
//! filter, sort and pagination, together with row-selection bookkeeping.
//!
//! - [`table::TableView`] - stateful view owning records and [`table::ViewState`]
//! - [`table::derive_view`] - the pure derivation behind it
//! - [`model`] - dynamic [`model::Record`] rows loaded from JSON

pub mod config;
pub mod error;
pub mod fmt;
pub mod model;
pub mod table;

pub use error::{Result, ViewError};
