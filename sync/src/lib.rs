//! Roster synchronization for clustered backend servers.
//!
//! Maintains a network-wide, per-client presence list that stays correct
//! as clients connect, disconnect, or toggle a hidden ("vanished")
//! visibility state. The engine tracks hidden clients, reacts to
//! hide/unhide transitions by recomputing and redistributing the roster,
//! resolves display attributes asynchronously, and defers the
//! redistribution pass to avoid races with in-flight connection teardown.
//!
//! The surrounding proxy plugs in at the trait seams: [`PresenceList`]
//! for the per-connection roster primitive, [`ClientDirectory`] for
//! capability and server lookups, [`RoleCache`] for the scoreboard
//! subsystem, and [`UpdateScheduler`] for deferred execution.

pub mod attributes;
pub mod collaborators;
pub mod config;
pub mod engine;
pub mod events;
pub mod groups;
pub mod presence;
pub mod roster;
pub mod scheduler;
pub mod visibility;


pub use attributes::{AttributeResolver, DeferredName, apply_if_live};
pub use collaborators::{Capability, ClientDirectory, RoleCache};
pub use config::SyncConfig;
pub use engine::VisibilitySyncEngine;
pub use events::{ClientId, VisibilityEvent, run_event_bridge};
pub use groups::{GroupResolver, GroupScope};
pub use presence::{EntryLookup, PresenceList};
pub use roster::{RosterEntry, RosterStore, TrackedClient};
pub use scheduler::{TokioScheduler, UpdateScheduler};
pub use visibility::VisibilitySet;
