//! View configuration

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Defaults for a table view.
///
/// # Example
///
/// ```
/// use docketview::config::ViewConfig;
///
/// let config = ViewConfig::default()
///     .with_page_size(25)
///     .with_id_field("case_no")
///     .with_sort("opened", true);
/// assert_eq!(config.page_size, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Rows per page.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Page sizes offered to the user.
    ///
    /// Default: `[5, 10, 25]`
    pub page_size_options: Vec<usize>,

    /// Record field holding the row id. `_id` is tried when it is absent.
    ///
    /// Default: `"id"`
    pub id_field: String,

    /// Initial sort column.
    pub sort: Option<String>,

    /// Initial sort direction is descending.
    pub descending: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![5, 10, 25],
            id_field: "id".to_string(),
            sort: None,
            descending: false,
        }
    }
}

impl ViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    pub fn with_sort(mut self, key: impl Into<String>, descending: bool) -> Self {
        self.sort = Some(key.into());
        self.descending = descending;
        self
    }
}
