//! DataTable: the stateful table instance and its rendered view.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

use super::column::Column;
use super::events::ActionsRenderer;
use super::events::RowAction;
use super::events::RowClickHandler;
use super::state::SortDirection;
use super::state::ViewAction;
use super::state::ViewState;
use super::state::total_pages;
use crate::model::Record;

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A table over caller-owned records.
///
/// The table owns its columns, its configuration and its [`ViewState`]; the
/// records are passed in on every render and are never mutated.
pub struct DataTable {
    pub(super) columns: Vec<Column>,
    search_keys: Option<Vec<String>>,
    page_size: usize,
    state: ViewState,
    pub(super) on_row_click: Option<RowClickHandler>,
    pub(super) actions: Option<ActionsRenderer>,
}

impl DataTable {
    /// Create a table with the given columns and default page size.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            search_keys: None,
            page_size: DEFAULT_PAGE_SIZE,
            state: ViewState::default(),
            on_row_click: None,
            actions: None,
        }
    }

    /// Set the number of rows per page. Zero counts as one.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Restrict search to these fields. Defaults to every column key.
    pub fn search_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the columns.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the current view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Returns the configured page size.
    pub fn rows_per_page(&self) -> usize {
        self.page_size
    }

    // =========================================================================
    // State transitions
    // =========================================================================

    /// Apply a view action.
    pub fn dispatch(&mut self, action: ViewAction) {
        self.state = self.state.apply(action);
    }

    /// Change the search query. Always returns to page 1.
    pub fn search(&mut self, query: impl Into<String>) {
        self.dispatch(ViewAction::Search(query.into()));
    }

    /// Activate a column header.
    ///
    /// Unknown and non-sortable columns leave the state untouched.
    pub fn activate_header(&mut self, key: &str) {
        let Some(column) = self.columns.iter().find(|c| c.key == key) else {
            return;
        };
        let action = ViewAction::ActivateHeader {
            key: column.key.clone(),
            sortable: column.sortable,
        };
        self.dispatch(action);
    }

    /// Request a page. Out-of-range pages are clamped on the next render.
    pub fn go_to_page(&mut self, page: usize) {
        self.dispatch(ViewAction::GoToPage(page));
    }

    /// Signal that the caller replaced the records.
    pub fn replace_data(&mut self) {
        self.dispatch(ViewAction::ReplaceData);
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Records matching the current query, in input order.
    pub fn filter<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        let Some(query) = self.state.active_query() else {
            return records.iter().collect();
        };
        let needle = query.to_lowercase();
        records
            .iter()
            .filter(|record| self.matches(record, &needle))
            .collect()
    }

    fn matches(&self, record: &Record, needle: &str) -> bool {
        match &self.search_keys {
            Some(keys) => keys
                .iter()
                .any(|key| record.text(key).to_lowercase().contains(needle)),
            None => self
                .columns
                .iter()
                .any(|column| record.text(&column.key).to_lowercase().contains(needle)),
        }
    }

    /// Stable sort by the active sort key; a no-op without one.
    pub fn sort(&self, rows: &mut Vec<&Record>) {
        let Some(sort) = &self.state.sort else {
            return;
        };
        let mut keyed: Vec<(String, &Record)> = rows
            .iter()
            .map(|record| (record.text(&sort.key).to_lowercase(), *record))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| compare(a, b, sort.direction));
        *rows = keyed.into_iter().map(|(_, record)| record).collect();
    }

    /// Filter, sort and paginate `records` into a renderable page.
    ///
    /// Clamps the stored current page to the filtered result first, so a
    /// shrinking data set or filter never leaves the table on a dead page.
    pub fn render<'a>(&mut self, records: &'a [Record]) -> TableView<'a> {
        let mut rows = self.filter(records);
        self.sort(&mut rows);

        let total_rows = rows.len();
        let total_pages = total_pages(total_rows, self.page_size);
        self.state.clamp_page(total_pages);

        let page = Page {
            current: self.state.current_page,
            total_pages,
            total_rows,
            page_size: self.page_size,
        };

        let rows = rows[page.window()]
            .iter()
            .map(|&record| TableRow {
                record,
                cells: self.columns.iter().map(|c| c.cell(record)).collect(),
                actions: self.row_actions(record),
            })
            .collect();

        TableView {
            headers: self.headers(),
            rows,
            page,
        }
    }

    fn headers(&self) -> Vec<Header> {
        self.columns
            .iter()
            .map(|column| Header {
                key: column.key.clone(),
                label: column.header.clone(),
                sortable: column.sortable,
                sort: self
                    .state
                    .sort
                    .as_ref()
                    .filter(|s| s.key == column.key)
                    .map(|s| s.direction),
            })
            .collect()
    }

    pub(super) fn row_actions(&self, record: &Record) -> Vec<RowAction> {
        self.actions
            .as_ref()
            .map(|render| render(record))
            .unwrap_or_default()
    }
}

fn compare(a: &str, b: &str, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => a.cmp(b),
        SortDirection::Descending => b.cmp(a),
    }
}

impl fmt::Debug for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("columns", &self.columns)
            .field("search_keys", &self.search_keys)
            .field("page_size", &self.page_size)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Rendered view
// =============================================================================

/// A rendered column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    /// Direction if this column is the active sort.
    pub sort: Option<SortDirection>,
}

/// Pagination metadata for a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based current page, always within `[1, total_pages]`
    pub current: usize,
    pub total_pages: usize,
    /// Rows after filtering
    pub total_rows: usize,
    pub page_size: usize,
}

impl Page {
    /// Index range of this page within the filtered rows.
    pub fn window(&self) -> Range<usize> {
        let start = ((self.current - 1) * self.page_size).min(self.total_rows);
        let end = (start + self.page_size).min(self.total_rows);
        start..end
    }

    /// 1-based inclusive range of displayed rows, or `None` for an empty page.
    pub fn displayed(&self) -> Option<(usize, usize)> {
        let window = self.window();
        (!window.is_empty()).then(|| (window.start + 1, window.end))
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }
}

/// One rendered row.
#[derive(Debug)]
pub struct TableRow<'a> {
    /// The source record
    pub record: &'a Record,
    /// One display string per column
    pub cells: Vec<String>,
    /// Auxiliary per-row controls
    pub actions: Vec<RowAction>,
}

/// The result of [`DataTable::render`].
#[derive(Debug)]
pub struct TableView<'a> {
    pub headers: Vec<Header>,
    pub rows: Vec<TableRow<'a>>,
    pub page: Page,
}

impl TableView<'_> {
    /// Returns `true` if no row survived filtering.
    pub fn is_empty(&self) -> bool {
        self.page.total_rows == 0
    }
}
