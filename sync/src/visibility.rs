use dashmap::DashSet;

use crate::events::ClientId;

/// Concurrent, duplicate-free set of currently-hidden client ids.
/// Never persisted; rebuilt empty at process start.
#[derive(Default)]
pub struct VisibilitySet {
    hidden: DashSet<ClientId>,
}

impl VisibilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag a client as hidden. Idempotent.
    pub fn mark_hidden(&self, id: ClientId) {
        self.hidden.insert(id);
    }

    /// Clear a client's hidden flag. Idempotent.
    pub fn mark_visible(&self, id: ClientId) {
        self.hidden.remove(&id);
    }

    /// O(1) membership test, safe to call from any concurrent caller.
    pub fn is_hidden(&self, id: ClientId) -> bool {
        self.hidden.contains(&id)
    }
}
