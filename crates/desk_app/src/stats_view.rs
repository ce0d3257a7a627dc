use desk_core::stats::StatsSnapshot;

use crate::refresh::RefreshCoordinator;
use crate::service::TicketService;

/// Consumer side of the stats contract: holds only the most recently fetched
/// snapshot. Aggregation itself happens in the store.
#[derive(Debug, Default)]
pub struct StatsView {
    snapshot: Option<StatsSnapshot>,
    last_seen_version: Option<u64>,
    last_refresh_failed: bool,
}

impl StatsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first successful refresh; afterwards always the last
    /// good snapshot, even across failed refreshes.
    pub fn snapshot(&self) -> Option<&StatsSnapshot> {
        self.snapshot.as_ref()
    }

    /// Distinguishes failed-refresh-of-existing-data from missing-on-first-load
    /// (combine with `snapshot().is_none()`).
    pub fn last_refresh_failed(&self) -> bool {
        self.last_refresh_failed
    }

    pub fn refresh(&mut self, service: &dyn TicketService) {
        match service.stats() {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.last_refresh_failed = false;
            }
            Err(e) => {
                log::warn!("stats refresh failed: {e}");
                self.last_refresh_failed = true;
            }
        }
    }

    /// Refresh when the coordinator has signalled since this view last
    /// acted. The first call always refreshes.
    pub fn observe(&mut self, refresh: &RefreshCoordinator, service: &dyn TicketService) {
        let current = refresh.current();
        if self.last_seen_version == Some(current) {
            return;
        }
        self.last_seen_version = Some(current);
        self.refresh(service);
    }
}
