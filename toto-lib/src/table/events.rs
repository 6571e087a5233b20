//! Event handling for the table: row clicks and per-row actions.

use std::fmt;
use std::sync::Arc;

use super::view::DataTable;
use crate::model::Record;

/// Called when a row is activated.
pub type RowClickHandler = Arc<dyn Fn(&Record) + Send + Sync>;

/// Called when a row action is activated.
pub type ActionHandler = Arc<dyn Fn(&Record, &mut EventControl) + Send + Sync>;

/// Produces the auxiliary controls shown for a row.
pub type ActionsRenderer = Arc<dyn Fn(&Record) -> Vec<RowAction> + Send + Sync>;

/// Propagation control handed to action handlers.
///
/// An action sits inside its row; unless the handler stops propagation the
/// activation also counts as a row click.
#[derive(Debug, Default)]
pub struct EventControl {
    propagation_stopped: bool,
}

impl EventControl {
    /// Keep this activation from reaching the row.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// A per-row control such as "Edit" or "Remove".
#[derive(Clone)]
pub struct RowAction {
    pub id: String,
    pub label: String,
    handler: ActionHandler,
}

impl RowAction {
    /// Create an action with full control over propagation.
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Record, &mut EventControl) + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            handler: Arc::new(handler),
        }
    }

    /// Create a button that stops propagation before running `on_press`.
    pub fn button<F>(id: impl Into<String>, label: impl Into<String>, on_press: F) -> Self
    where
        F: Fn(&Record) + Send + Sync + 'static,
    {
        Self::new(id, label, move |record, cx| {
            cx.stop_propagation();
            on_press(record);
        })
    }

    fn trigger(&self, record: &Record) -> EventControl {
        let mut cx = EventControl::default();
        (self.handler)(record, &mut cx);
        cx
    }
}

impl fmt::Debug for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Where inside a row an activation landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// Anywhere on the row outside the actions cell
    Row,
    /// The action with this id
    Action(String),
}

/// What an activation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The row click handler ran.
    RowActivated,
    /// An action ran; `propagated` tells whether the row click also ran.
    ActionTriggered { propagated: bool },
    /// Nothing handled the activation.
    Ignored,
}

impl DataTable {
    /// Set the row click handler.
    pub fn on_row_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Record) + Send + Sync + 'static,
    {
        self.on_row_click = Some(Arc::new(handler));
        self
    }

    /// Set the per-row actions renderer.
    pub fn actions<F>(mut self, render: F) -> Self
    where
        F: Fn(&Record) -> Vec<RowAction> + Send + Sync + 'static,
    {
        self.actions = Some(Arc::new(render));
        self
    }

    /// Dispatch an activation on a row.
    pub fn click(&self, record: &Record, target: ClickTarget) -> ClickOutcome {
        match target {
            ClickTarget::Row => {
                if self.fire_row_click(record) {
                    ClickOutcome::RowActivated
                } else {
                    ClickOutcome::Ignored
                }
            }
            ClickTarget::Action(id) => {
                let Some(action) = self.row_actions(record).into_iter().find(|a| a.id == id)
                else {
                    return ClickOutcome::Ignored;
                };
                let cx = action.trigger(record);
                let propagated = !cx.is_propagation_stopped() && self.fire_row_click(record);
                ClickOutcome::ActionTriggered { propagated }
            }
        }
    }

    fn fire_row_click(&self, record: &Record) -> bool {
        match &self.on_row_click {
            Some(handler) => {
                handler(record);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::table::Column;

    type Log = Arc<Mutex<Vec<String>>>;

    fn table_with_log(log: &Log) -> DataTable {
        let rows = log.clone();
        let actions = log.clone();
        DataTable::new(vec![Column::new("id", "ID")])
            .on_row_click(move |r| rows.lock().unwrap().push(format!("row:{}", r.text("id"))))
            .actions(move |_| {
                let removed = actions.clone();
                let inspected = actions.clone();
                vec![
                    RowAction::button("remove", "Remove", move |r| {
                        removed.lock().unwrap().push(format!("remove:{}", r.text("id")))
                    }),
                    RowAction::new("inspect", "Inspect", move |r, _cx| {
                        inspected.lock().unwrap().push(format!("inspect:{}", r.text("id")))
                    }),
                ]
            })
    }

    #[test]
    fn test_row_click_fires_handler() {
        let log = Log::default();
        let table = table_with_log(&log);
        let record = Record::new().set("id", 5i64);

        assert_eq!(table.click(&record, ClickTarget::Row), ClickOutcome::RowActivated);
        assert_eq!(*log.lock().unwrap(), vec!["row:5"]);
    }

    #[test]
    fn test_button_action_does_not_reach_row() {
        let log = Log::default();
        let table = table_with_log(&log);
        let record = Record::new().set("id", 5i64);

        let outcome = table.click(&record, ClickTarget::Action("remove".into()));
        assert_eq!(outcome, ClickOutcome::ActionTriggered { propagated: false });
        assert_eq!(*log.lock().unwrap(), vec!["remove:5"]);
    }

    #[test]
    fn test_action_without_stop_propagates() {
        let log = Log::default();
        let table = table_with_log(&log);
        let record = Record::new().set("id", 5i64);

        let outcome = table.click(&record, ClickTarget::Action("inspect".into()));
        assert_eq!(outcome, ClickOutcome::ActionTriggered { propagated: true });
        assert_eq!(*log.lock().unwrap(), vec!["inspect:5", "row:5"]);
    }

    #[test]
    fn test_unknown_action_is_ignored() {
        let log = Log::default();
        let table = table_with_log(&log);
        let record = Record::new().set("id", 5i64);

        let outcome = table.click(&record, ClickTarget::Action("edit".into()));
        assert_eq!(outcome, ClickOutcome::Ignored);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rendered_rows_carry_actions() {
        let log = Log::default();
        let mut table = table_with_log(&log);
        let records = vec![Record::new().set("id", 1i64)];
        let view = table.render(&records);
        let labels: Vec<&str> = view.rows[0].actions.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Remove", "Inspect"]);
    }

    #[test]
    fn test_click_without_handler_is_ignored() {
        let table = DataTable::new(vec![Column::new("id", "ID")]);
        let record = Record::new();
        assert_eq!(table.click(&record, ClickTarget::Row), ClickOutcome::Ignored);
    }
}
