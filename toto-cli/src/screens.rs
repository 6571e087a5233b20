//! Admin screens rendered to the terminal.
//!
//! List screens fetch through the client, map entities into records and
//! hand them to a [`DataTable`]. Sorting goes through header activation so
//! the terminal behaves the same as clicking a column header.

use std::sync::Arc;
use std::sync::Mutex;

use clap::Args;
use toto_lib::ApiClient;
use toto_lib::api::Ack;
use toto_lib::model::ApplicationStatus;
use toto_lib::model::Id;
use toto_lib::model::PricingConfig;
use toto_lib::model::Record;
use toto_lib::model::to_records;
use toto_lib::table::ClickOutcome;
use toto_lib::table::ClickTarget;
use toto_lib::table::Column;
use toto_lib::table::DEFAULT_PAGE_SIZE;
use toto_lib::table::DataTable;
use toto_lib::table::Page;
use toto_lib::table::RowAction;
use toto_lib::table::TableView;

use crate::error::CliError;

/// Search, sort and paging flags shared by every list screen.
#[derive(Debug, Clone, Args)]
pub struct ViewArgs {
    /// Case-insensitive search text
    #[arg(long, short)]
    pub query: Option<String>,

    /// Column key to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Open the row with this id
    #[arg(long)]
    pub select: Option<String>,

    /// Trigger this action on the selected row
    #[arg(long, requires = "select")]
    pub action: Option<String>,
}

/// A server-side change requested from a row action or a subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCommand {
    RemoveRide,
    VerifyRider,
    Approve,
    Reject,
}

impl RowCommand {
    /// Sends the change for the row with `id`.
    pub async fn run(self, client: &ApiClient, id: &Id) -> Result<Ack, CliError> {
        let ack = match self {
            Self::RemoveRide => client.remove_ride(id).await?,
            Self::VerifyRider => client.verify_rider(id).await?,
            Self::Approve => client.approve_application(id).await?,
            Self::Reject => client.reject_application(id).await?,
        };
        Ok(ack)
    }

    /// Printed when the backend acknowledges without a message.
    pub fn done_message(self) -> &'static str {
        match self {
            Self::RemoveRide => "Ride removed.",
            Self::VerifyRider => "Rider verified.",
            Self::Approve => "Application approved.",
            Self::Reject => "Application rejected.",
        }
    }
}

/// Command picked by the last triggered row action.
type Chosen = Arc<Mutex<Option<(RowCommand, Id)>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Rides,
    Riders,
    Users,
    Messages,
    Applications,
}

impl Screen {
    fn title(self) -> &'static str {
        match self {
            Self::Rides => "Rides",
            Self::Riders => "Riders",
            Self::Users => "Users",
            Self::Messages => "Contact messages",
            Self::Applications => "Driver applications",
        }
    }

    async fn load(self, client: &ApiClient) -> Result<Vec<Record>, CliError> {
        Ok(match self {
            Self::Rides => to_records(&client.rides().await?),
            Self::Riders => to_records(&client.riders().await?),
            Self::Users => to_records(&client.users().await?),
            Self::Messages => to_records(&client.messages().await?),
            Self::Applications => to_records(&client.applications().await?),
        })
    }

    fn columns(self) -> Vec<Column> {
        match self {
            Self::Rides => vec![
                Column::new("id", "ID").sortable(),
                Column::new("userName", "Passenger").sortable(),
                Column::new("riderName", "Rider").sortable(),
                Column::new("pickup", "Pickup"),
                Column::new("dropoff", "Drop-off"),
                Column::new("fare", "Fare").sortable().render(|r| money(r, "fare")),
                Column::new("status", "Status").sortable(),
                Column::new("createdAt", "Booked")
                    .sortable()
                    .render(|r| timestamp(r, "createdAt")),
            ],
            Self::Riders => vec![
                Column::new("id", "ID").sortable(),
                Column::new("name", "Name").sortable(),
                Column::new("phone", "Phone"),
                Column::new("vehicleNumber", "Vehicle No.").sortable(),
                Column::new("vehicleType", "Type").sortable(),
                Column::new("verified", "Verified")
                    .sortable()
                    .render(|r| yes_no(r, "verified")),
                Column::new("rating", "Rating").sortable(),
            ],
            Self::Users => vec![
                Column::new("id", "ID").sortable(),
                Column::new("name", "Name").sortable(),
                Column::new("email", "Email").sortable(),
                Column::new("phone", "Phone"),
                Column::new("createdAt", "Joined")
                    .sortable()
                    .render(|r| timestamp(r, "createdAt")),
            ],
            Self::Messages => vec![
                Column::new("name", "From").sortable(),
                Column::new("email", "Email"),
                Column::new("subject", "Subject").sortable(),
                Column::new("message", "Message").render(|r| truncate(&r.text("message"), 40)),
                Column::new("createdAt", "Received")
                    .sortable()
                    .render(|r| timestamp(r, "createdAt")),
            ],
            Self::Applications => vec![
                Column::new("id", "ID").sortable(),
                Column::new("name", "Name").sortable(),
                Column::new("phone", "Phone"),
                Column::new("vehicleType", "Vehicle").sortable(),
                Column::new("licenseNumber", "License"),
                Column::new("status", "Status").sortable(),
                Column::new("submittedAt", "Submitted")
                    .sortable()
                    .render(|r| timestamp(r, "submittedAt")),
            ],
        }
    }

    /// Builds the table for this screen, wiring row clicks and actions.
    ///
    /// Row actions record their command in `chosen`; the caller sends it.
    fn table(self, page_size: usize, chosen: &Chosen) -> DataTable {
        let table = DataTable::new(self.columns())
            .page_size(page_size)
            .on_row_click(print_details);

        let table = match self {
            // Message bodies are searchable even though the column truncates them.
            Self::Messages => table.search_keys(["name", "email", "subject", "message"]),
            _ => table,
        };

        let chosen = chosen.clone();
        table.actions(move |record| self.row_actions(record, &chosen))
    }

    fn row_actions(self, record: &Record, chosen: &Chosen) -> Vec<RowAction> {
        match self {
            Self::Rides => vec![command_button("remove", "Remove", RowCommand::RemoveRide, chosen)],
            Self::Riders if record.get("verified").and_then(|v| v.as_bool()) != Some(true) => {
                vec![command_button("verify", "Verify", RowCommand::VerifyRider, chosen)]
            }
            Self::Applications
                if record.text("status") == ApplicationStatus::Pending.as_str() =>
            {
                vec![
                    command_button("approve", "Approve", RowCommand::Approve, chosen),
                    command_button("reject", "Reject", RowCommand::Reject, chosen),
                ]
            }
            _ => Vec::new(),
        }
    }
}

fn command_button(id: &str, label: &str, command: RowCommand, chosen: &Chosen) -> RowAction {
    let chosen = chosen.clone();
    RowAction::button(id, label, move |record| {
        if let Ok(mut slot) = chosen.lock() {
            *slot = Some((command, Id::new(record.text("id"))));
        }
    })
}

/// Sorts through header activation, twice for descending.
///
/// Returns `false` without touching the table when `key` is not a sortable
/// column.
fn sort_by_header(table: &mut DataTable, key: &str, descending: bool) -> bool {
    if !table.columns().iter().any(|c| c.sortable && c.key == key) {
        return false;
    }
    table.activate_header(key);
    if descending {
        table.activate_header(key);
    }
    true
}

fn sortable_keys(table: &DataTable) -> Vec<&str> {
    table
        .columns()
        .iter()
        .filter(|c| c.sortable)
        .map(|c| c.key.as_str())
        .collect()
}

fn print_details(record: &Record) {
    let mut fields: Vec<_> = record.fields().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    let width = fields.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    for (key, value) in fields {
        println!("{:width$}  {}", key, value.to_text(), width = width);
    }
}

pub async fn show_list(client: &ApiClient, screen: Screen, args: ViewArgs) -> Result<(), CliError> {
    let records = screen.load(client).await?;
    let chosen = Chosen::default();
    let mut table = screen.table(args.page_size, &chosen);

    if let Some(query) = &args.query {
        table.search(query.as_str());
    }
    if let Some(key) = &args.sort {
        if !sort_by_header(&mut table, key, args.desc) {
            println!(
                "Cannot sort by {}. Sortable columns: {}",
                key,
                sortable_keys(&table).join(", ")
            );
        }
    }
    table.go_to_page(args.page);

    let view = table.render(&records);

    let Some(id) = &args.select else {
        println!("{}", screen.title());
        print!("{}", format_table(&view));
        println!("{}", footer(&view.page));
        return Ok(());
    };

    let row = view
        .rows
        .iter()
        .find(|row| row.record.text("id") == *id)
        .ok_or_else(|| CliError::RowNotFound(id.clone()))?;

    let target = match &args.action {
        Some(action) => ClickTarget::Action(action.clone()),
        None => ClickTarget::Row,
    };
    if table.click(row.record, target) == ClickOutcome::Ignored {
        let available: Vec<_> = row.actions.iter().map(|a| a.id.as_str()).collect();
        println!("No such action. Available: {}", available.join(", "));
    }

    let pending = chosen.lock().ok().and_then(|mut slot| slot.take());
    if let Some((command, id)) = pending {
        let ack = command.run(client, &id).await?;
        print_ack(&ack, command.done_message());
    }
    Ok(())
}

pub async fn show_stats(client: &ApiClient) -> Result<(), CliError> {
    let stats = client.stats().await?;
    let lines = [
        ("Total rides", stats.total_rides.to_string()),
        ("Active rides", stats.active_rides.to_string()),
        ("Completed rides", stats.completed_rides.to_string()),
        ("Riders", stats.total_riders.to_string()),
        ("Verified riders", stats.verified_riders.to_string()),
        ("Users", stats.total_users.to_string()),
        ("Pending applications", stats.pending_applications.to_string()),
        ("Revenue", format!("₹{:.2}", stats.total_revenue)),
    ];
    for (label, value) in lines {
        println!("{:<22}{}", label, value);
    }
    Ok(())
}

pub async fn show_pricing(client: &ApiClient) -> Result<(), CliError> {
    let response = client.pricing_or_cached().await?;
    if let Some(synced_at) = response.synced_at() {
        println!(
            "Backend unreachable; showing settings last synced {}.",
            synced_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
        );
    }
    print_pricing(response.data());
    Ok(())
}

pub fn print_pricing(config: &PricingConfig) {
    println!("{:<14}₹{:.2}", "Base fare", config.base_fare);
    println!("{:<14}₹{:.2}", "Per km", config.per_km);
    println!("{:<14}₹{:.2}", "Per minute", config.per_minute);
    println!("{:<14}₹{:.2}", "Minimum fare", config.minimum_fare);
}

pub fn print_ack(ack: &Ack, default: &str) {
    println!("{}", ack.message.as_deref().unwrap_or(default));
}

// =============================================================================
// Formatting
// =============================================================================

fn money(record: &Record, field: &str) -> String {
    record
        .get(field)
        .and_then(|v| v.as_f64())
        .map(|n| format!("₹{:.2}", n))
        .unwrap_or_default()
}

fn yes_no(record: &Record, field: &str) -> String {
    match record.get(field).and_then(|v| v.as_bool()) {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => String::new(),
    }
}

/// Formats an RFC 3339 field in local time, passing other text through.
fn timestamp(record: &Record, field: &str) -> String {
    let raw = record.text(field);
    chrono::DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or(raw)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn format_table(view: &TableView<'_>) -> String {
    if view.is_empty() {
        return "No records found.\n".to_string();
    }

    let labels: Vec<String> = view
        .headers
        .iter()
        .map(|h| match h.sort {
            Some(direction) => format!("{} {}", h.label, direction.indicator()),
            None => h.label.clone(),
        })
        .collect();

    let mut widths: Vec<usize> = labels.iter().map(|l| l.chars().count()).collect();
    for row in &view.rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &labels, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);

    for row in &view.rows {
        let mut cells = row.cells.clone();
        if !row.actions.is_empty() {
            let actions: Vec<_> = row.actions.iter().map(|a| format!("[{}]", a.label)).collect();
            cells.push(actions.join(" "));
        }
        push_line(&mut out, &cells, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        match widths.get(i) {
            Some(width) => {
                line.push_str(cell);
                let pad = width.saturating_sub(cell.chars().count());
                line.extend(std::iter::repeat_n(' ', pad));
            }
            None => line.push_str(cell),
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn footer(page: &Page) -> String {
    let mut text = match page.displayed() {
        Some((first, last)) => format!(
            "Showing {}-{} of {} | page {}/{}",
            first, last, page.total_rows, page.current, page.total_pages
        ),
        None => format!("Showing 0 of 0 | page {}/{}", page.current, page.total_pages),
    };
    if page.has_previous() {
        text.push_str(&format!(" | prev: --page {}", page.current - 1));
    }
    if page.has_next() {
        text.push_str(&format!(" | next: --page {}", page.current + 1));
    }
    text
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use http_body_util::Full;
    use hyper::body::Bytes;
    use hyper::body::Incoming;
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper_util::rt::TokioIo;
    use tokio::net::TcpListener;
    use toto_lib::config::BaseUrl;
    use toto_lib::config::BaseUrlSource;
    use toto_lib::storage::Storage;

    use super::*;

    fn ride(id: i64, fare: f64, status: &str) -> Record {
        Record::new()
            .set("id", id)
            .set("userName", format!("user{}", id))
            .set("fare", fare)
            .set("status", status)
    }

    #[test]
    fn test_money_and_yes_no() {
        let record = Record::new().set("fare", 120).set("verified", false);
        assert_eq!(money(&record, "fare"), "₹120.00");
        assert_eq!(money(&record, "missing"), "");
        assert_eq!(yes_no(&record, "verified"), "no");
        assert_eq!(yes_no(&record, "missing"), "");
    }

    #[test]
    fn test_timestamp_passes_through_unparseable() {
        let record = Record::new().set("createdAt", "yesterday");
        assert_eq!(timestamp(&record, "createdAt"), "yesterday");
        assert_eq!(timestamp(&record, "missing"), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_footer_links() {
        let page = Page {
            current: 2,
            total_pages: 3,
            total_rows: 23,
            page_size: 10,
        };
        assert_eq!(
            footer(&page),
            "Showing 11-20 of 23 | page 2/3 | prev: --page 1 | next: --page 3"
        );
    }

    #[test]
    fn test_rides_table_sorted_descending() {
        let records = vec![ride(1, 30.0, "done"), ride(2, 10.0, "done"), ride(3, 20.0, "active")];
        let mut table = Screen::Rides.table(10, &Chosen::default());
        assert!(sort_by_header(&mut table, "status", true));

        let view = table.render(&records);
        let ids: Vec<_> = view.rows.iter().map(|r| r.record.text("id")).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        let text = format_table(&view);
        assert!(text.lines().next().unwrap().contains("Status ▼"));
        assert!(text.contains("[Remove]"));
        assert!(text.contains("₹30.00"));
    }

    #[test]
    fn test_sort_on_unsortable_column_is_refused() {
        let mut table = Screen::Rides.table(10, &Chosen::default());

        assert!(!sort_by_header(&mut table, "pickup", false));
        assert!(!sort_by_header(&mut table, "nope", true));
        assert!(table.state().sort.is_none());
        assert_eq!(
            sortable_keys(&table),
            vec!["id", "userName", "riderName", "fare", "status", "createdAt"]
        );
    }

    #[test]
    fn test_rider_actions_depend_on_verification() {
        let chosen = Chosen::default();
        let verified = Record::new().set("id", "a").set("verified", true);
        let pending = Record::new().set("id", "b").set("verified", false);
        assert!(Screen::Riders.row_actions(&verified, &chosen).is_empty());
        assert_eq!(Screen::Riders.row_actions(&pending, &chosen)[0].id, "verify");
    }

    #[test]
    fn test_action_click_picks_command_without_opening_row() {
        let chosen = Chosen::default();
        let table = Screen::Rides.table(10, &chosen);
        let record = ride(7, 10.0, "active");

        let outcome = table.click(&record, ClickTarget::Action("remove".into()));

        assert_eq!(outcome, ClickOutcome::ActionTriggered { propagated: false });
        assert_eq!(
            chosen.lock().unwrap().take(),
            Some((RowCommand::RemoveRide, Id::new("7")))
        );
    }

    #[test]
    fn test_empty_table() {
        let mut table = Screen::Users.table(10, &Chosen::default());
        let view = table.render(&[]);
        assert_eq!(format_table(&view), "No records found.\n");
        assert_eq!(footer(&view.page), "Showing 0 of 0 | page 1/1");
    }

    // =========================================================================
    // Against a local backend
    // =========================================================================

    /// Serves one ride (id 7) and counts `POST /admin/rides/7/remove`.
    async fn rides_backend(removals: Arc<AtomicUsize>) -> ApiClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let removals = removals.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: hyper::Request<Incoming>| {
                        let removals = removals.clone();
                        async move {
                            let (status, body) = match (req.method().as_str(), req.uri().path()) {
                                ("GET", "/api/admin/rides") => {
                                    (hyper::StatusCode::OK, r#"{"rides": [{"id": 7, "pickup": "Market"}]}"#)
                                }
                                ("POST", "/api/admin/rides/7/remove") => {
                                    removals.fetch_add(1, Ordering::SeqCst);
                                    (hyper::StatusCode::OK, r#"{"message": "Ride 7 removed", "success": true}"#)
                                }
                                _ => (hyper::StatusCode::NOT_FOUND, r#"{"error": "Not found"}"#),
                            };
                            Ok::<_, Infallible>(
                                hyper::Response::builder()
                                    .status(status)
                                    .body(Full::new(Bytes::from(body)))
                                    .unwrap(),
                            )
                        }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        let base_url =
            BaseUrl::parse(&format!("http://{}/api", addr), BaseUrlSource::Configured).unwrap();
        ApiClient::builder()
            .base_url(base_url)
            .storage(Storage::memory())
            .build()
            .unwrap()
    }

    fn select(id: &str, action: Option<&str>) -> ViewArgs {
        ViewArgs {
            query: None,
            sort: None,
            desc: false,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            select: Some(id.to_string()),
            action: action.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_remove_action_calls_backend() {
        let removals = Arc::new(AtomicUsize::new(0));
        let client = rides_backend(removals.clone()).await;

        show_list(&client, Screen::Rides, select("7", Some("remove")))
            .await
            .unwrap();

        assert_eq!(removals.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_row_click_sends_nothing() {
        let removals = Arc::new(AtomicUsize::new(0));
        let client = rides_backend(removals.clone()).await;

        show_list(&client, Screen::Rides, select("7", None)).await.unwrap();
        show_list(&client, Screen::Rides, select("7", Some("archive")))
            .await
            .unwrap();

        assert_eq!(removals.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_row_is_reported() {
        let client = rides_backend(Arc::new(AtomicUsize::new(0))).await;

        let err = show_list(&client, Screen::Rides, select("8", Some("remove")))
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::RowNotFound(ref id) if id == "8"));
    }
}
