use std::sync::Arc;

use dashmap::DashMap;

use crate::events::ClientId;
use crate::presence::PresenceList;

/// One entry per connected, non-hidden client expected to appear in
/// others' presence lists. Created on connect (or on unhide), removed
/// on disconnect (or on hide).
#[derive(Clone)]
pub struct TrackedClient {
    pub id: ClientId,
    /// Stable username; key for the role map pushed to the role cache.
    pub name: String,
    /// Backend server the client was on when the entry was built.
    pub server_name: String,
    /// Cached team/role label; doubles as the roster sort key.
    pub team: String,
    /// Handle to the client's own presence-list connection.
    pub list: Arc<dyn PresenceList>,
}

/// Rendered entry pushed to a presence list. Not retained by the core
/// beyond the push call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub id: ClientId,
    pub display_name: String,
    pub sort_key: String,
}

/// Authoritative, mutable collection of all currently-tracked clients,
/// keyed by client id. At most one entry per id.
#[derive(Default)]
pub struct RosterStore {
    clients: DashMap<ClientId, TrackedClient>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the tracked entry for a client.
    pub fn upsert(&self, client: TrackedClient) {
        self.clients.insert(client.id, client);
    }

    /// Remove all entries matching the predicate. Returns whether any
    /// entry was removed so the caller can log a diagnostic on a miss.
    pub fn remove_if(&self, pred: impl Fn(&TrackedClient) -> bool) -> bool {
        let matches: Vec<ClientId> = self
            .clients
            .iter()
            .filter(|entry| pred(entry.value()))
            .map(|entry| *entry.key())
            .collect();

        let mut removed = false;
        for id in matches {
            removed |= self.clients.remove(&id).is_some();
        }
        removed
    }

    /// Point-in-time copy of the store. Iterating the result never
    /// observes structural changes made after the snapshot was taken.
    pub fn snapshot_all(&self) -> Vec<TrackedClient> {
        self.clients.iter().map(|e| e.value().clone()).collect()
    }

    pub fn get(&self, id: ClientId) -> Option<TrackedClient> {
        self.clients.get(&id).map(|e| e.value().clone())
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.clients.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
