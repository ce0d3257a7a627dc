use std::cell::Cell;

use desk_app::query::{ListState, TicketListView};
use desk_app::refresh::RefreshCoordinator;
use desk_app::service::{SqliteTicketService, TicketService};
use desk_app::session::DeskSession;
use desk_app::stats_view::StatsView;
use desk_core::domain::{Category, NewTicket, Priority, Status, Ticket, TicketFilter};
use desk_core::error::AppError;
use desk_core::stats::StatsSnapshot;
use pretty_assertions::assert_eq;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sqlite_service() -> SqliteTicketService {
    SqliteTicketService::open_in_memory().expect("open")
}

fn new_ticket(title: &str) -> NewTicket {
    NewTicket {
        title: title.to_string(),
        description: format!("{title} - details"),
        category: Category::Technical,
        priority: Priority::Medium,
    }
}

/// Wraps the SQLite service with failure injection and list-call counting.
struct FlakyService {
    inner: SqliteTicketService,
    list_calls: Cell<usize>,
    fail_list: Cell<bool>,
    fail_stats: Cell<bool>,
    fail_updates: Cell<bool>,
}

impl FlakyService {
    fn new(inner: SqliteTicketService) -> Self {
        Self {
            inner,
            list_calls: Cell::new(0),
            fail_list: Cell::new(false),
            fail_stats: Cell::new(false),
            fail_updates: Cell::new(false),
        }
    }
}

impl TicketService for FlakyService {
    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, AppError> {
        self.list_calls.set(self.list_calls.get() + 1);
        if self.fail_list.get() {
            return Err(AppError::new("DB_QUERY_FAILED", "injected list failure"));
        }
        self.inner.list(filter)
    }

    fn create(&self, draft: &NewTicket) -> Result<Ticket, AppError> {
        self.inner.create(draft)
    }

    fn update_status(&self, id: i64, status: Status) -> Result<Ticket, AppError> {
        if self.fail_updates.get() {
            return Err(AppError::new("DB_UPDATE_FAILED", "injected update failure"));
        }
        self.inner.update_status(id, status)
    }

    fn stats(&self) -> Result<StatsSnapshot, AppError> {
        if self.fail_stats.get() {
            return Err(AppError::new("DB_QUERY_FAILED", "injected stats failure"));
        }
        self.inner.stats()
    }
}

#[test]
fn the_three_list_states_are_distinguishable() {
    init_logs();
    let service = sqlite_service();
    let refresh = RefreshCoordinator::new();
    let mut view = TicketListView::new();

    // Never fetched.
    assert_eq!(view.state(), &ListState::NotLoaded);
    assert_eq!(view.tickets(), None);

    // Fetched, empty result set: a valid state distinct from NotLoaded.
    view.observe(&refresh, &service);
    assert_eq!(view.tickets(), Some(&[][..]));
    assert!(!view.last_fetch_failed());
}

#[test]
fn observe_fetches_once_per_version() {
    init_logs();
    let service = FlakyService::new(sqlite_service());
    let refresh = RefreshCoordinator::new();
    let mut view = TicketListView::new();

    view.observe(&refresh, &service);
    view.observe(&refresh, &service);
    assert_eq!(service.list_calls.get(), 1);

    refresh.bump();
    view.observe(&refresh, &service);
    view.observe(&refresh, &service);
    assert_eq!(service.list_calls.get(), 2);
}

#[test]
fn submission_invalidates_both_views() {
    init_logs();
    let mut session = DeskSession::new(sqlite_service());
    session.sync_views();
    assert_eq!(session.list.tickets(), Some(&[][..]));
    assert_eq!(
        session.stats.snapshot().map(|s| s.total_tickets),
        Some(0)
    );

    session.draft.set_title("Cannot log in");
    session.draft.set_description("Password reset link expired");
    session.submit_draft().expect("submit");

    let tickets = session.list.tickets().expect("loaded");
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].title, "Cannot log in");
    assert_eq!(tickets[0].status, Status::Open);

    let snap = session.stats.snapshot().expect("snapshot");
    assert_eq!(snap.total_tickets, 1);
    assert_eq!(snap.open_tickets, 1);
}

#[test]
fn successful_status_change_refetches_the_authoritative_list() {
    init_logs();
    let service = FlakyService::new(sqlite_service());
    let id = service.create(&new_ticket("Flaky printer")).expect("create").id;

    let mut view = TicketListView::new();
    view.search(&service);
    assert_eq!(view.tickets().expect("loaded")[0].status, Status::Open);
    let calls_before = service.list_calls.get();

    view.change_status(&service, id, Status::Resolved)
        .expect("update");
    assert_eq!(service.list_calls.get(), calls_before + 1);
    assert_eq!(view.tickets().expect("loaded")[0].status, Status::Resolved);
}

#[test]
fn failed_status_change_leaves_the_list_untouched_and_does_not_refetch() {
    init_logs();
    let service = FlakyService::new(sqlite_service());
    let id = service.create(&new_ticket("Stubborn ticket")).expect("create").id;

    let mut view = TicketListView::new();
    view.search(&service);
    let calls_before = service.list_calls.get();

    service.fail_updates.set(true);
    let err = view
        .change_status(&service, id, Status::Closed)
        .expect_err("injected failure");
    assert_eq!(err.code, "DB_UPDATE_FAILED");

    // No re-fetch, displayed status unchanged.
    assert_eq!(service.list_calls.get(), calls_before);
    assert_eq!(view.tickets().expect("loaded")[0].status, Status::Open);
}

#[test]
fn fetch_failure_keeps_previously_displayed_tickets() {
    init_logs();
    let service = FlakyService::new(sqlite_service());
    service.create(&new_ticket("Survivor")).expect("create");

    let mut view = TicketListView::new();
    view.search(&service);
    assert_eq!(view.tickets().expect("loaded").len(), 1);

    service.fail_list.set(true);
    view.search(&service);
    assert!(view.last_fetch_failed());
    // Stale data beats no data.
    assert_eq!(view.tickets().expect("still loaded").len(), 1);

    service.fail_list.set(false);
    view.search(&service);
    assert!(!view.last_fetch_failed());
}

#[test]
fn first_fetch_failure_is_distinct_from_an_empty_result() {
    init_logs();
    let service = FlakyService::new(sqlite_service());
    service.fail_list.set(true);

    let mut view = TicketListView::new();
    view.search(&service);

    // Never-loaded plus a failure flag, not an empty list.
    assert_eq!(view.state(), &ListState::NotLoaded);
    assert!(view.last_fetch_failed());
}

#[test]
fn stats_failure_retains_the_previous_snapshot() {
    init_logs();
    let service = FlakyService::new(sqlite_service());
    service.create(&new_ticket("Counted once")).expect("create");

    let mut view = StatsView::new();
    view.refresh(&service);
    assert_eq!(view.snapshot().expect("snapshot").total_tickets, 1);

    service.create(&new_ticket("Counted later")).expect("create");
    service.fail_stats.set(true);
    view.refresh(&service);

    // The stale snapshot stays displayed, flagged as failed-to-refresh.
    assert!(view.last_refresh_failed());
    assert_eq!(view.snapshot().expect("stale snapshot").total_tickets, 1);

    service.fail_stats.set(false);
    view.refresh(&service);
    assert!(!view.last_refresh_failed());
    assert_eq!(view.snapshot().expect("fresh snapshot").total_tickets, 2);
}

#[test]
fn stats_missing_on_first_load_is_distinct_from_failed_refresh() {
    init_logs();
    let service = FlakyService::new(sqlite_service());
    service.fail_stats.set(true);

    let mut view = StatsView::new();
    let refresh = RefreshCoordinator::new();
    view.observe(&refresh, &service);

    assert!(view.snapshot().is_none());
    assert!(view.last_refresh_failed());
}

#[test]
fn views_observe_the_same_signal_independently() {
    init_logs();
    let service = FlakyService::new(sqlite_service());
    let refresh = RefreshCoordinator::new();
    let mut list = TicketListView::new();
    let mut stats = StatsView::new();

    list.observe(&refresh, &service);
    stats.observe(&refresh, &service);

    service.create(&new_ticket("After the signal")).expect("create");
    refresh.bump();

    // Only the list has looked so far; the stats view lags until it observes.
    list.observe(&refresh, &service);
    assert_eq!(list.tickets().expect("loaded").len(), 1);
    assert_eq!(stats.snapshot().expect("snapshot").total_tickets, 0);

    stats.observe(&refresh, &service);
    assert_eq!(stats.snapshot().expect("snapshot").total_tickets, 1);
}

#[test]
fn demo_seed_round_trips_through_the_service() {
    init_logs();
    let service = sqlite_service();
    let created = service.seed_demo_tickets().expect("seed");
    assert_eq!(created, 24);

    let open = service
        .list(&TicketFilter {
            status: Some(Status::Open),
            ..TicketFilter::default()
        })
        .expect("list");
    assert_eq!(open.len(), 6);

    let snap = service.stats().expect("stats");
    assert_eq!(snap.total_tickets, 24);
    let sum: i64 = snap.category_breakdown.values().sum();
    assert_eq!(sum, snap.total_tickets);
}
