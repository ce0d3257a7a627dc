use desk_ai::classify::Classifier;
use desk_core::domain::{Status, Ticket};
use desk_core::error::AppError;

use crate::draft::TicketDraft;
use crate::query::TicketListView;
use crate::refresh::RefreshCoordinator;
use crate::service::TicketService;
use crate::stats_view::StatsView;

/// One user session: the draft form, the ticket list, the stats view, and
/// the refresh signal that ties them together.
pub struct DeskSession<S: TicketService> {
    service: S,
    pub refresh: RefreshCoordinator,
    pub draft: TicketDraft,
    pub list: TicketListView,
    pub stats: StatsView,
}

impl<S: TicketService> DeskSession<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            refresh: RefreshCoordinator::new(),
            draft: TicketDraft::new(),
            list: TicketListView::new(),
            stats: StatsView::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Bring both views up to date with the refresh signal. The two fetches
    /// are independent; neither outcome affects the other.
    pub fn sync_views(&mut self) {
        self.list.observe(&self.refresh, &self.service);
        self.stats.observe(&self.refresh, &self.service);
    }

    /// One blur-triggered classification round trip against the advisor.
    pub fn classify_draft(&mut self, classifier: &dyn Classifier) {
        let Some(request) = self.draft.begin_classification() else {
            return;
        };
        let outcome = classifier.classify(&request.description);
        self.draft.apply_classification(&request, outcome);
    }

    /// Submit the draft, then let both views react to the refresh signal.
    pub fn submit_draft(&mut self) -> Result<Ticket, AppError> {
        let result = self.draft.submit(&self.service, &self.refresh);
        self.sync_views();
        result
    }

    pub fn search(&mut self) {
        self.list.search(&self.service);
    }

    pub fn change_status(&mut self, id: i64, status: Status) -> Result<(), AppError> {
        self.list.change_status(&self.service, id, status)
    }
}
