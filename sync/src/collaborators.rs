use std::collections::HashMap;

use crate::events::ClientId;

/// Elevated capabilities a client may hold. Evaluated by the proxy's
/// permission layer, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Keep hidden clients visible in this client's presence list.
    SeeHidden,
}

/// Read-only view of the connected-client population.
pub trait ClientDirectory: Send + Sync {
    fn has_capability(&self, id: ClientId, capability: Capability) -> bool;

    /// Name of the backend server the client is currently on, if it can
    /// be determined.
    fn current_server_name(&self, id: ClientId) -> Option<String>;
}

/// Scoreboard/role-cache subsystem fed by redistribution passes.
pub trait RoleCache: Send + Sync {
    /// Drop any cached role/score state for a client.
    fn reset_cache(&self, id: ClientId);

    /// Replace the username -> team-role mapping cached for a client.
    fn set_roles(&self, id: ClientId, roles: HashMap<String, String>);
}
