use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::attributes::{AttributeResolver, apply_if_live};
use crate::collaborators::{Capability, ClientDirectory, RoleCache};
use crate::config::SyncConfig;
use crate::events::ClientId;
use crate::groups::{GroupResolver, GroupScope};
use crate::presence::{EntryLookup, PresenceList};
use crate::roster::{RosterEntry, RosterStore, TrackedClient};
use crate::scheduler::UpdateScheduler;
use crate::visibility::VisibilitySet;

/// Sentinel server name used when the directory cannot tell where a
/// client currently is.
const UNKNOWN_SERVER: &str = "?";

/// Connection-scoped facts that outlive roster membership (a hidden
/// client keeps its connection but loses its tracked entry).
#[derive(Clone)]
struct Connection {
    name: String,
    list: Arc<dyn PresenceList>,
}

/// Orchestrates visibility transitions into the shared roster view.
///
/// A cheap cloneable handle over shared state; deferred passes hold
/// their own clone, so a pass scheduled before a disconnect can still
/// run its liveness checks after it.
///
/// Per-client state machine, driven only by inbound notifications:
/// `UNTRACKED -> VISIBLE_TRACKED -> HIDDEN -> VISIBLE_TRACKED -> ...
/// -> UNTRACKED` (on disconnect).
#[derive(Clone)]
pub struct VisibilitySyncEngine {
    inner: Arc<Inner>,
}

struct Inner {
    hidden: VisibilitySet,
    roster: RosterStore,
    groups: GroupResolver,
    /// Live connection handles for every connected client, hidden or not.
    connections: DashMap<ClientId, Connection>,
    resolver: Arc<dyn AttributeResolver>,
    scheduler: Arc<dyn UpdateScheduler>,
    directory: Arc<dyn ClientDirectory>,
    roles: Arc<dyn RoleCache>,
    only_list_same_group: bool,
    update_delay: Duration,
}

impl VisibilitySyncEngine {
    pub fn new(
        config: &SyncConfig,
        resolver: Arc<dyn AttributeResolver>,
        scheduler: Arc<dyn UpdateScheduler>,
        directory: Arc<dyn ClientDirectory>,
        roles: Arc<dyn RoleCache>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                hidden: VisibilitySet::new(),
                roster: RosterStore::new(),
                groups: GroupResolver::new(&config.groups),
                connections: DashMap::new(),
                resolver,
                scheduler,
                directory,
                roles,
                only_list_same_group: config.list.only_list_same_group,
                update_delay: config.update_delay(),
            }),
        }
    }

    // ── Connection lifecycle ────────────────────────────────────────

    /// Register a new connection. The client enters the roster
    /// immediately unless it connected already hidden.
    pub fn on_connect(&self, id: ClientId, name: &str, list: Arc<dyn PresenceList>) {
        self.inner.connections.insert(
            id,
            Connection {
                name: name.to_string(),
                list: list.clone(),
            },
        );

        if self.inner.hidden.is_hidden(id) {
            debug!(client_id = %id, "client connected hidden, not tracking");
            return;
        }
        self.inner.roster.upsert(self.inner.build_tracked(id, name, list));
    }

    /// Tear down a connection: the client leaves the roster and any
    /// hidden flag is cleared. All state is rebuilt from connection
    /// state, so nothing survives the disconnect.
    pub fn on_disconnect(&self, id: ClientId) {
        self.inner.connections.remove(&id);
        self.inner.roster.remove_if(|c| c.id == id);
        self.inner.hidden.mark_visible(id);
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Read-only query for subsystems deciding whether to render a
    /// client.
    pub fn is_hidden(&self, id: ClientId) -> bool {
        self.inner.hidden.is_hidden(id)
    }

    pub fn is_tracked(&self, id: ClientId) -> bool {
        self.inner.roster.contains(id)
    }

    /// Snapshot of every currently-tracked client.
    pub fn tracked_clients(&self) -> Vec<TrackedClient> {
        self.inner.roster.snapshot_all()
    }

    // ── Notifications ───────────────────────────────────────────────

    /// A client toggled into the hidden state.
    pub fn on_hide(&self, id: ClientId) {
        let inner = &self.inner;
        inner.hidden.mark_hidden(id);

        if !inner.roster.remove_if(|c| c.id == id) {
            warn!(client_id = %id, "hide for a client that was not tracked");
        }

        // Close the visibility gap immediately, for every other
        // connected client — hidden viewers keep their own lists and
        // must lose the entry too. Viewers holding the see-hidden
        // capability keep it.
        for viewer in inner.connections.iter() {
            let viewer_id = *viewer.key();
            if viewer_id == id
                || inner
                    .directory
                    .has_capability(viewer_id, Capability::SeeHidden)
            {
                continue;
            }
            viewer.value().list.remove_entry(id);
        }

        // The immediate removal can race with a viewer's own teardown or
        // entry-creation sequence still in flight; a deferred pass
        // re-confirms once that settles.
        let pass = Arc::clone(inner);
        inner.scheduler.schedule_once(
            inner.update_delay,
            Box::pin(async move { pass.confirm_hidden_removal(id) }),
        );
    }

    /// A client toggled back to visible.
    pub fn on_unhide(&self, id: ClientId) {
        let inner = &self.inner;
        inner.hidden.mark_visible(id);
        inner.roles.reset_cache(id);

        let Some(conn) = inner.connections.get(&id).map(|c| c.value().clone()) else {
            warn!(client_id = %id, "unhide for a client with no live connection");
            return;
        };

        // Scope is bound at unhide time, from the server the client is
        // on right now.
        let server_name = inner.directory.current_server_name(id);
        let scope = inner.groups.scope_of(server_name.as_deref());

        inner
            .roster
            .upsert(inner.build_tracked(id, &conn.name, conn.list.clone()));

        let pass = Arc::clone(inner);
        inner.scheduler.schedule_once(
            inner.update_delay,
            Box::pin(async move { pass.redistribute_to(id, conn.list, scope) }),
        );
    }
}

impl Inner {
    /// Deferred confirmatory pass after a hide: re-remove the hidden
    /// client's entry from every non-capability viewer and push that
    /// viewer's corrected decoration. Idempotent; dead viewers are
    /// skipped.
    fn confirm_hidden_removal(&self, id: ClientId) {
        // A hide superseded by an unhide inside the delay window must
        // not clobber the re-admitted client.
        if !self.hidden.is_hidden(id) {
            debug!(client_id = %id, "hide superseded before the confirmatory pass ran");
            return;
        }

        for viewer in self.connections.iter() {
            let viewer_id = *viewer.key();
            let list = &viewer.value().list;
            if viewer_id == id || !list.is_connected() {
                continue;
            }
            // Capability is re-verified here in case it was revoked
            // between the immediate removal and this pass.
            if self.directory.has_capability(viewer_id, Capability::SeeHidden) {
                continue;
            }
            list.remove_entry(id);
            list.refresh_decoration();
        }
    }

    /// Deferred redistribution after an unhide: rebuild the unhidden
    /// client's own view from the current roster snapshot, refresh each
    /// tracked client's decoration, and push the accumulated role map.
    fn redistribute_to(&self, id: ClientId, list: Arc<dyn PresenceList>, scope: GroupScope) {
        if !list.is_connected() {
            debug!(client_id = %id, "redistribution target disconnected before the pass ran");
            return;
        }

        let mut roles: HashMap<String, String> = HashMap::new();

        for tracked in self.roster.snapshot_all() {
            // Asymmetric filter: the view pushed to the unhidden client
            // is scoped to its own server group.
            if self.only_list_same_group && !scope.admits(&tracked.server_name) {
                continue;
            }

            let team = self.resolver.resolve_team(&tracked);
            roles.insert(tracked.name.clone(), team.clone());

            let name = self.resolver.resolve_display_name(&tracked);
            let target = Arc::clone(&list);
            let probe = Arc::clone(&list);
            let tracked_id = tracked.id;
            match list.lookup_entry(tracked.id) {
                EntryLookup::Found => {
                    let _ = apply_if_live(
                        name,
                        move || probe.is_connected(),
                        move |display_name| target.set_display_name(tracked_id, display_name),
                    );
                }
                EntryLookup::NotFound => {
                    let _ = apply_if_live(
                        name,
                        move || probe.is_connected(),
                        move |display_name| {
                            target.add_entry(RosterEntry {
                                id: tracked_id,
                                display_name,
                                sort_key: team,
                            });
                        },
                    );
                }
            }

            if tracked.list.is_connected() {
                tracked.list.refresh_decoration();
            }
        }

        self.roles.set_roles(id, roles);
    }

    fn build_tracked(&self, id: ClientId, name: &str, list: Arc<dyn PresenceList>) -> TrackedClient {
        let server_name = self
            .directory
            .current_server_name(id)
            .unwrap_or_else(|| UNKNOWN_SERVER.to_string());

        let mut client = TrackedClient {
            id,
            name: name.to_string(),
            server_name,
            team: String::new(),
            list,
        };
        client.team = self.resolver.resolve_team(&client);
        client
    }
}
