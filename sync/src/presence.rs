use crate::events::ClientId;
use crate::roster::RosterEntry;

/// Outcome of looking up a client's entry in a presence list. Every
/// call site handles both branches explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryLookup {
    Found,
    NotFound,
}

/// Per-connection roster rendering primitive, implemented by the
/// connection layer. The engine only pushes through this surface and
/// never stores rendered entries itself.
pub trait PresenceList: Send + Sync {
    /// Whether the underlying connection is still alive. Delayed pushes
    /// re-check this; a dead connection makes the push a no-op.
    fn is_connected(&self) -> bool;

    fn lookup_entry(&self, id: ClientId) -> EntryLookup;

    fn remove_entry(&self, id: ClientId);

    fn set_display_name(&self, id: ClientId, display_name: String);

    fn add_entry(&self, entry: RosterEntry);

    /// Redraw this connection's header/footer decoration.
    fn refresh_decoration(&self);
}
