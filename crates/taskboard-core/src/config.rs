//! Board configuration.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. A JSON file (`~/.taskboard/config.json` unless `TASKBOARD_CONFIG` is set)
//! 3. `TASKBOARD_*` environment variables
//!
//! Every field is optional in the file; missing fields keep their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use taskboard_models::TierThresholds;

/// Environment variable for a custom config file path.
pub const CONFIG_PATH_ENV: &str = "TASKBOARD_CONFIG";

/// Environment variable overriding the streamer list heading.
pub const SESSION_SUMMARY_ENV: &str = "TASKBOARD_SESSION_SUMMARY";

/// Environment variable overriding the default viewer list.
pub const DEFAULT_LIST_ENV: &str = "TASKBOARD_DEFAULT_LIST";

/// Environment variable overriding the viewer task limit.
pub const VIEWER_TASK_LIMIT_ENV: &str = "TASKBOARD_VIEWER_TASK_LIMIT";

/// Environment variable overriding the pending queue limit.
pub const PENDING_LIMIT_ENV: &str = "TASKBOARD_PENDING_LIMIT";

/// Environment variable overriding the offline threshold, in seconds.
pub const OFFLINE_THRESHOLD_ENV: &str = "TASKBOARD_OFFLINE_THRESHOLD_SECS";

const DEFAULT_STATE_DIR: &str = ".taskboard";
const CONFIG_FILE: &str = "config.json";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for `BoardConfig`.
    #[error("Invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An environment override or setting has an unusable value.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Which earlier submissions block a new `!task`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateScope {
    /// Same user, same description, still pending in the same list.
    #[default]
    SameDescription,
    /// Any pending or approved task by the same user in the list.
    OpenTask,
    /// Every submission is accepted.
    Disabled,
}

/// Who owns a task created with `!addtask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddTaskOwner {
    /// The moderator who issued the command.
    #[default]
    Issuer,
    /// Nobody.
    Unassigned,
}

/// Settings of one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Heading of the streamer's list.
    pub session_summary: String,
    /// Progress tier thresholds.
    pub tiers: TierThresholds,
    /// Maximum approved or completed tasks in the default viewer list.
    pub viewer_task_limit: usize,
    /// Maximum pending submissions across the board.
    pub pending_limit: usize,
    /// List that receives viewer submissions.
    pub default_list_name: String,
    /// Seconds without chat activity before an owner is marked offline.
    pub offline_threshold_secs: u64,
    /// Duplicate submission policy.
    pub duplicate_scope: DuplicateScope,
    /// Owner of moderator-added tasks.
    pub addtask_owner: AddTaskOwner,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            session_summary: "Session Goals".to_string(),
            tiers: TierThresholds::default(),
            viewer_task_limit: 3,
            pending_limit: 100,
            default_list_name: "Viewers".to_string(),
            offline_threshold_secs: 5 * 60,
            duplicate_scope: DuplicateScope::default(),
            addtask_owner: AddTaskOwner::default(),
        }
    }
}

impl BoardConfig {
    /// Sets the streamer list heading.
    pub fn with_session_summary(mut self, summary: impl Into<String>) -> Self {
        self.session_summary = summary.into();
        self
    }

    /// Sets the tier thresholds.
    pub fn with_tiers(mut self, tiers: TierThresholds) -> Self {
        self.tiers = tiers;
        self
    }

    /// Sets the viewer task limit.
    pub fn with_viewer_task_limit(mut self, limit: usize) -> Self {
        self.viewer_task_limit = limit;
        self
    }

    /// Sets the pending queue limit.
    pub fn with_pending_limit(mut self, limit: usize) -> Self {
        self.pending_limit = limit;
        self
    }

    /// Sets the default viewer list.
    pub fn with_default_list(mut self, name: impl Into<String>) -> Self {
        self.default_list_name = name.into();
        self
    }

    /// Sets the offline threshold.
    pub fn with_offline_threshold(mut self, threshold: Duration) -> Self {
        self.offline_threshold_secs = threshold.as_secs();
        self
    }

    /// Sets the duplicate submission policy.
    pub fn with_duplicate_scope(mut self, scope: DuplicateScope) -> Self {
        self.duplicate_scope = scope;
        self
    }

    /// Sets the owner of moderator-added tasks.
    pub fn with_addtask_owner(mut self, owner: AddTaskOwner) -> Self {
        self.addtask_owner = owner;
        self
    }

    /// Offline threshold as a duration.
    pub fn offline_threshold(&self) -> Duration {
        Duration::from_secs(self.offline_threshold_secs)
    }

    /// Default config file location.
    ///
    /// `TASKBOARD_CONFIG` if set, otherwise `~/.taskboard/config.json`.
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|h| h.join(DEFAULT_STATE_DIR))
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                    .join(CONFIG_FILE)
            })
    }

    /// Reads a config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the full configuration: defaults, then the file if it exists,
    /// then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        let config = if path.exists() {
            debug!(path = %path.display(), "loading board config");
            Self::from_file(&path)?
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        config.apply_env()
    }

    /// Applies `TASKBOARD_*` overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(summary) = lookup(SESSION_SUMMARY_ENV) {
            self.session_summary = summary;
        }
        if let Some(list) = lookup(DEFAULT_LIST_ENV) {
            self.default_list_name = list;
        }
        if let Some(value) = lookup(VIEWER_TASK_LIMIT_ENV) {
            self.viewer_task_limit = parse_number(VIEWER_TASK_LIMIT_ENV, &value)?;
        }
        if let Some(value) = lookup(PENDING_LIMIT_ENV) {
            self.pending_limit = parse_number(PENDING_LIMIT_ENV, &value)?;
        }
        if let Some(value) = lookup(OFFLINE_THRESHOLD_ENV) {
            self.offline_threshold_secs = parse_number(OFFLINE_THRESHOLD_ENV, &value)?;
        }
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.default_list_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "default_list_name".to_string(),
                value: self.default_list_name,
            });
        }
        let tiers = self.tiers;
        if !(tiers.tier1 <= tiers.tier2 && tiers.tier2 <= tiers.tier3) {
            warn!(
                tier1 = tiers.tier1,
                tier2 = tiers.tier2,
                tier3 = tiers.tier3,
                "tier thresholds are not ascending"
            );
        }
        Ok(self)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.session_summary, "Session Goals");
        assert_eq!(config.viewer_task_limit, 3);
        assert_eq!(config.pending_limit, 100);
        assert_eq!(config.default_list_name, "Viewers");
        assert_eq!(config.offline_threshold(), Duration::from_secs(300));
        assert_eq!(config.tiers.tier3, 12);
        assert_eq!(config.duplicate_scope, DuplicateScope::SameDescription);
        assert_eq!(config.addtask_owner, AddTaskOwner::Issuer);
    }

    #[test]
    fn test_builders() {
        let config = BoardConfig::default()
            .with_viewer_task_limit(1)
            .with_pending_limit(2)
            .with_default_list("Chat")
            .with_offline_threshold(Duration::from_secs(30))
            .with_duplicate_scope(DuplicateScope::OpenTask)
            .with_addtask_owner(AddTaskOwner::Unassigned);

        assert_eq!(config.viewer_task_limit, 1);
        assert_eq!(config.pending_limit, 2);
        assert_eq!(config.default_list_name, "Chat");
        assert_eq!(config.offline_threshold_secs, 30);
        assert_eq!(config.duplicate_scope, DuplicateScope::OpenTask);
        assert_eq!(config.addtask_owner, AddTaskOwner::Unassigned);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"viewer_task_limit": 5, "duplicate_scope": "open_task"}}"#
        )
        .unwrap();

        let config = BoardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.viewer_task_limit, 5);
        assert_eq!(config.duplicate_scope, DuplicateScope::OpenTask);
        assert_eq!(config.default_list_name, "Viewers");
        assert_eq!(config.pending_limit, 100);
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            BoardConfig::from_file(file.path()),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(matches!(
            BoardConfig::from_file(&path),
            Err(ConfigError::Io { .. })
        ));

        let config = BoardConfig::load(Some(&path)).unwrap();
        assert_eq!(config.tiers, BoardConfig::default().tiers);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (DEFAULT_LIST_ENV, "Chat"),
            (VIEWER_TASK_LIMIT_ENV, " 7 "),
            (OFFLINE_THRESHOLD_ENV, "60"),
        ]
        .into_iter()
        .collect();

        let config = BoardConfig::default()
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.default_list_name, "Chat");
        assert_eq!(config.viewer_task_limit, 7);
        assert_eq!(config.offline_threshold_secs, 60);
        assert_eq!(config.session_summary, "Session Goals");
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let err = BoardConfig::default()
            .apply_overrides(|key| (key == PENDING_LIMIT_ENV).then(|| "lots".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == PENDING_LIMIT_ENV
        ));
    }

    #[test]
    fn test_blank_default_list_rejected() {
        let err = BoardConfig::default()
            .with_default_list("  ")
            .apply_overrides(|_| None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
