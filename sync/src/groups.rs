use std::collections::{BTreeSet, HashMap};

/// Result of resolving a backend server to its roster-scoping group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupScope {
    /// The sibling servers sharing the client's logical group.
    Resolved(BTreeSet<String>),
    /// The server could not be determined; scope filtering is disabled.
    Unresolved,
}

impl GroupScope {
    /// Whether a server falls inside this scope. An unresolved scope
    /// admits every server.
    pub fn admits(&self, server_name: &str) -> bool {
        match self {
            GroupScope::Resolved(servers) => servers.contains(server_name),
            GroupScope::Unresolved => true,
        }
    }
}

/// Pure lookup from backend-server name to its configured group.
/// Sourced from configuration; never mutated by the engine.
pub struct GroupResolver {
    groups: Vec<BTreeSet<String>>,
}

impl GroupResolver {
    pub fn new(groups: &HashMap<String, Vec<String>>) -> Self {
        Self {
            groups: groups
                .values()
                .map(|servers| servers.iter().cloned().collect())
                .collect(),
        }
    }

    /// Sibling servers of `server_name`. A named server missing from
    /// every configured group is its own singleton group; a server name
    /// that could not be determined resolves to no scope at all.
    pub fn scope_of(&self, server_name: Option<&str>) -> GroupScope {
        let Some(name) = server_name else {
            return GroupScope::Unresolved;
        };

        for group in &self.groups {
            if group.contains(name) {
                return GroupScope::Resolved(group.clone());
            }
        }
        GroupScope::Resolved(BTreeSet::from([name.to_string()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> GroupResolver {
        let mut groups = HashMap::new();
        groups.insert(
            "lobby".to_string(),
            vec!["lobby-1".to_string(), "lobby-2".to_string()],
        );
        groups.insert("survival".to_string(), vec!["survival-1".to_string()]);
        GroupResolver::new(&groups)
    }

    #[test]
    fn test_configured_group_members() {
        let scope = resolver().scope_of(Some("lobby-1"));
        let GroupScope::Resolved(servers) = scope else {
            panic!("expected a resolved scope");
        };
        assert!(servers.contains("lobby-1"));
        assert!(servers.contains("lobby-2"));
        assert!(!servers.contains("survival-1"));
    }

    #[test]
    fn test_unconfigured_server_falls_back_to_singleton() {
        let scope = resolver().scope_of(Some("creative-9"));
        assert_eq!(
            scope,
            GroupScope::Resolved(BTreeSet::from(["creative-9".to_string()]))
        );
        assert!(scope.admits("creative-9"));
        assert!(!scope.admits("lobby-1"));
    }

    #[test]
    fn test_undetermined_server_is_unresolved() {
        let scope = resolver().scope_of(None);
        assert_eq!(scope, GroupScope::Unresolved);
        // Unresolved scope admits everything
        assert!(scope.admits("lobby-1"));
        assert!(scope.admits("anything"));
    }

    #[test]
    fn test_admits_within_group() {
        let scope = resolver().scope_of(Some("lobby-2"));
        assert!(scope.admits("lobby-1"));
        assert!(scope.admits("lobby-2"));
        assert!(!scope.admits("survival-1"));
    }

    #[test]
    fn test_empty_configuration() {
        let resolver = GroupResolver::new(&HashMap::new());
        assert_eq!(
            resolver.scope_of(Some("lobby-1")),
            GroupScope::Resolved(BTreeSet::from(["lobby-1".to_string()]))
        );
    }
}
