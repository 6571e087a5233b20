//! Column descriptors.

use std::fmt;
use std::sync::Arc;

use crate::model::Record;

/// Custom cell renderer: turns a whole record into the cell's display text.
pub type CellRenderer = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// Column configuration.
///
/// A column addresses a record field by `key`. A column whose key is not a
/// real field (an "Actions" or computed column) should carry a renderer,
/// otherwise its cells are empty.
///
/// # Examples
///
/// ```
/// use toto_lib::table::Column;
///
/// let columns = vec![
///     Column::new("id", "ID"),
///     Column::new("name", "Name").sortable(),
///     Column::new("verified", "Verified")
///         .render(|r| if r.text("verified") == "true" { "Yes".into() } else { "No".into() }),
/// ];
/// ```
#[derive(Clone)]
pub struct Column {
    /// Field name or synthetic key
    pub key: String,
    /// Header label
    pub header: String,
    /// Whether header activation sorts by this column
    pub sortable: bool,
    render: Option<CellRenderer>,
}

impl Column {
    /// Create a new column for a field.
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sortable: false,
            render: None,
        }
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Set a custom cell renderer.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&Record) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Display text of this column's cell for a record.
    ///
    /// Custom renderer first, then the raw field, then `""`.
    pub fn cell(&self, record: &Record) -> String {
        match &self.render {
            Some(render) => render(record),
            None => record.text(&self.key),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("render", &self.render.is_some())
            .finish()
    }
}
