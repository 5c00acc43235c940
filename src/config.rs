//! Application-level configuration loading: game defaults and presence tuning.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "COURTSIDE_CONFIG_PATH";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Seconds on the clock at the start of each period.
    pub period_seconds: u32,
    /// Timeout budget per bench.
    pub timeouts_per_side: u32,
    /// Regulation period count, exposed to clients for display.
    pub periods: u8,
    /// Age after which a presence record without a heartbeat is evicted.
    pub presence_ttl: Duration,
    /// Interval between presence sweeps.
    pub presence_sweep_interval: Duration,
    /// Default and maximum number of events returned by the log query.
    pub event_query_limit: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in
    /// defaults when the file is absent or invalid.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(path = %path.display(), "loaded configuration");
                    config
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
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            period_seconds: 600,
            timeouts_per_side: 3,
            periods: 4,
            presence_ttl: Duration::from_secs(60),
            presence_sweep_interval: Duration::from_secs(15),
            event_query_limit: 100,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    period_seconds: Option<u32>,
    timeouts_per_side: Option<u32>,
    periods: Option<u8>,
    presence_ttl_seconds: Option<u64>,
    presence_sweep_interval_seconds: Option<u64>,
    event_query_limit: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            period_seconds: raw.period_seconds.unwrap_or(defaults.period_seconds),
            timeouts_per_side: raw.timeouts_per_side.unwrap_or(defaults.timeouts_per_side),
            periods: raw.periods.unwrap_or(defaults.periods),
            presence_ttl: raw
                .presence_ttl_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.presence_ttl),
            presence_sweep_interval: raw
                .presence_sweep_interval_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.presence_sweep_interval),
            event_query_limit: raw.event_query_limit.unwrap_or(defaults.event_query_limit),
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
