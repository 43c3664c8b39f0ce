//! Application-level configuration loading: edit pacing, staleness horizon and message overrides.

use std::{collections::HashMap, env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "STATUS_BEACON_CONFIG_PATH";
/// One edit per message per window keeps us clear of the platform rate limit.
const DEFAULT_EDIT_DEBOUNCE: Duration = Duration::from_secs(2);
/// The platform refuses edits on messages older than one hour.
const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    edit_debounce: Duration,
    stale_after: Duration,
    delete_summary_minutes: u32,
    messages: HashMap<String, String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        debounce_ms = app_config.edit_debounce.as_millis() as u64,
                        overrides = app_config.messages.len(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON document; absent keys keep their defaults.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Coalescing window of the edit dispatcher.
    pub fn edit_debounce(&self) -> Duration {
        self.edit_debounce
    }

    /// Age after which the status message is recreated instead of edited.
    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    /// Minutes before a game-over summary is removed; zero keeps it forever.
    pub fn delete_summary_minutes(&self) -> u32 {
        self.delete_summary_minutes
    }

    /// Localization template overrides keyed by message id.
    pub fn messages(&self) -> &HashMap<String, String> {
        &self.messages
    }

    /// Builder used by tests and embedders to shorten the coalescing window.
    pub fn with_edit_debounce(mut self, debounce: Duration) -> Self {
        self.edit_debounce = debounce;
        self
    }

    /// Builder used by tests and embedders to enable summary clean-up.
    pub fn with_delete_summary_minutes(mut self, minutes: u32) -> Self {
        self.delete_summary_minutes = minutes;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            edit_debounce: DEFAULT_EDIT_DEBOUNCE,
            stale_after: DEFAULT_STALE_AFTER,
            delete_summary_minutes: 0,
            messages: HashMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    edit_debounce_ms: Option<u64>,
    stale_after_secs: Option<u64>,
    delete_summary_minutes: u32,
    messages: HashMap<String, String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            edit_debounce: value
                .edit_debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_EDIT_DEBOUNCE),
            stale_after: value
                .stale_after_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_STALE_AFTER),
            delete_summary_minutes: value.delete_summary_minutes,
            messages: value.messages,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
