use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

/// Top-level sync configuration, loaded from roster.toml.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SyncConfig {
    pub list: ListSection,
    /// Named server groups: group name -> member backend servers.
    pub groups: HashMap<String, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct ListSection {
    /// Scope a newly-unhidden client's roster to its own server group.
    pub only_list_same_group: bool,
    /// Delay before a redistribution pass runs, in milliseconds.
    pub update_delay_ms: u64,
}

impl Default for ListSection {
    fn default() -> Self {
        Self {
            only_list_same_group: false,
            update_delay_ms: 500,
        }
    }
}

impl SyncConfig {
    /// Load config from a TOML file. Falls back to defaults if the file
    /// doesn't exist. Environment variables override TOML values.
    pub fn load(path: &str) -> Self {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("failed to read config file {}: {}", path, e));
            toml::from_str(&contents)
                .unwrap_or_else(|e| panic!("failed to parse config file {}: {}", path, e))
        } else {
            info!("No config file found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ONLY_LIST_SAME_GROUP")
            && let Ok(flag) = v.parse()
        {
            self.list.only_list_same_group = flag;
        }
        if let Ok(v) = std::env::var("UPDATE_DELAY_MS")
            && let Ok(ms) = v.parse()
        {
            self.list.update_delay_ms = ms;
        }
    }

    pub fn update_delay(&self) -> Duration {
        Duration::from_millis(self.list.update_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert!(!config.list.only_list_same_group);
        assert_eq!(config.update_delay(), Duration::from_millis(500));
        assert!(config.groups.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config: SyncConfig = toml::from_str(
            r#"
            [list]
            only_list_same_group = true
            update_delay_ms = 250

            [groups]
            lobby = ["lobby-1", "lobby-2"]
            survival = ["survival-1"]
            "#,
        )
        .unwrap();

        assert!(config.list.only_list_same_group);
        assert_eq!(config.update_delay(), Duration::from_millis(250));
        assert_eq!(config.groups["lobby"], vec!["lobby-1", "lobby-2"]);
        assert_eq!(config.groups["survival"], vec!["survival-1"]);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: SyncConfig = toml::from_str(
            r#"
            [groups]
            lobby = ["lobby-1"]
            "#,
        )
        .unwrap();

        assert!(!config.list.only_list_same_group);
        assert_eq!(config.list.update_delay_ms, 500);
        assert_eq!(config.groups.len(), 1);
    }
}
