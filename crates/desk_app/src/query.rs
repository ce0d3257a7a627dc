use desk_core::domain::{Status, Ticket, TicketFilter};
use desk_core::error::AppError;

use crate::refresh::RefreshCoordinator;
use crate::service::TicketService;

/// The three list states the presentation layer must tell apart: never
/// fetched, fetch in progress, and a (possibly empty) result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    NotLoaded,
    Loading,
    Loaded(Vec<Ticket>),
}

/// Owns the filter criteria, the fetched result set, and the per-ticket
/// status-transition action.
#[derive(Debug, Default)]
pub struct TicketListView {
    pub filter: TicketFilter,
    state: ListState,
    last_seen_version: Option<u64>,
    last_fetch_failed: bool,
}

impl Default for ListState {
    fn default() -> Self {
        ListState::NotLoaded
    }
}

impl TicketListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// The currently displayed tickets, if a fetch has ever succeeded.
    pub fn tickets(&self) -> Option<&[Ticket]> {
        match &self.state {
            ListState::Loaded(tickets) => Some(tickets),
            _ => None,
        }
    }

    /// Distinguishes "failed to refresh" (prior data still displayed) from
    /// "no data yet".
    pub fn last_fetch_failed(&self) -> bool {
        self.last_fetch_failed
    }

    /// Explicit user-initiated search. Editing filter criteria alone never
    /// triggers a fetch.
    pub fn search(&mut self, service: &dyn TicketService) {
        self.fetch(service);
    }

    /// Change a ticket's status, then re-fetch so the list shows the store's
    /// authoritative state rather than an optimistic local mutation. Failure
    /// is best-effort: logged, displayed list untouched, no re-fetch.
    pub fn change_status(
        &mut self,
        service: &dyn TicketService,
        id: i64,
        status: Status,
    ) -> Result<(), AppError> {
        match service.update_status(id, status) {
            Ok(_) => {
                self.fetch(service);
                Ok(())
            }
            Err(e) => {
                log::warn!("status update for ticket {id} failed: {e}");
                Err(e)
            }
        }
    }

    /// Re-fetch when the coordinator has signalled since this view last
    /// acted. The first call always fetches.
    pub fn observe(&mut self, refresh: &RefreshCoordinator, service: &dyn TicketService) {
        let current = refresh.current();
        if self.last_seen_version == Some(current) {
            return;
        }
        self.last_seen_version = Some(current);
        self.fetch(service);
    }

    fn fetch(&mut self, service: &dyn TicketService) {
        let previous = std::mem::replace(&mut self.state, ListState::Loading);
        match service.list(&self.filter) {
            Ok(tickets) => {
                self.state = ListState::Loaded(tickets);
                self.last_fetch_failed = false;
            }
            Err(e) => {
                log::warn!("ticket list fetch failed: {e}");
                // Keep whatever was displayed before the attempt.
                self.state = previous;
                self.last_fetch_failed = true;
            }
        }
    }
}
