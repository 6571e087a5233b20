//! Table engine - client-side search, sort and pagination over row records.
//!
//! The engine provides:
//! - Column descriptors with optional custom cell renderers
//! - Case-insensitive substring search over chosen fields
//! - Stable, app-controlled sorting toggled by header activation
//! - Pagination with the current page clamped to the filtered result
//! - Row click and per-row action events with explicit propagation control
//!
//! # Example
//!
//! ```
//! use toto_lib::model::Record;
//! use toto_lib::table::{Column, DataTable};
//!
//! let records = vec![
//!     Record::new().set("id", 1i64).set("fare", 30i64),
//!     Record::new().set("id", 2i64).set("fare", 10i64),
//! ];
//!
//! let mut table = DataTable::new(vec![
//!     Column::new("id", "ID"),
//!     Column::new("fare", "Fare").sortable().render(|r| format!("₹{}", r.text("fare"))),
//! ]);
//!
//! table.activate_header("fare");
//! let view = table.render(&records);
//! assert_eq!(view.rows[0].cells, vec!["2", "₹10"]);
//! ```

mod column;
mod events;
mod state;
mod view;

pub use column::CellRenderer;
pub use column::Column;
pub use events::ActionHandler;
pub use events::ActionsRenderer;
pub use events::ClickOutcome;
pub use events::ClickTarget;
pub use events::EventControl;
pub use events::RowAction;
pub use events::RowClickHandler;
pub use state::SortDirection;
pub use state::SortKey;
pub use state::ViewAction;
pub use state::ViewState;
pub use state::total_pages;
pub use view::DEFAULT_PAGE_SIZE;
pub use view::DataTable;
pub use view::Header;
pub use view::Page;
pub use view::TableRow;
pub use view::TableView;
