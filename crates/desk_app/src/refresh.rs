use std::sync::atomic::{AtomicU64, Ordering};

/// Session-scoped refresh signal shared by the ticket list and the stats
/// view.
///
/// A successful submission bumps the version; each view remembers the last
/// version it acted on and re-fetches when it observes a newer one. The
/// counter carries no payload and is never reset for the lifetime of the
/// session.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    version: AtomicU64,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal that the ticket corpus changed. Returns the new version.
    pub fn bump(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}
