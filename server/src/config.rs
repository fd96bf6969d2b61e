use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_STATIC_DIR: &str = "client/dist";
pub const DEFAULT_ADMIN_PASSWORD: &str = "changeme";
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
pub const DEFAULT_TOKEN_EVICTION_SECS: u64 = 300; // 5 minutes

pub const DETAIL_FILE: &str = "states_detail.json";
pub const SUMMARY_FILE: &str = "states.json";
pub const CREDENTIAL_FILE: &str = "credential.json";

pub use bellwether_shared::MIN_PASSWORD_LEN;

/// Everything the server reads from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Used only when no credential has been persisted yet.
    pub initial_password: String,
    pub token_ttl: TimeDelta,
    pub token_eviction_interval: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            port: server_port(),
            data_dir: data_dir(),
            static_dir: static_dir(),
            initial_password: admin_password(),
            token_ttl: token_ttl(),
            token_eviction_interval: token_eviction_interval(),
        }
    }
}

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn data_dir() -> PathBuf {
    non_empty_var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn static_dir() -> PathBuf {
    non_empty_var("STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR))
}

pub fn admin_password() -> String {
    non_empty_var("ADMIN_PASSWORD").unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string())
}

pub fn admin_password_is_default() -> bool {
    non_empty_var("ADMIN_PASSWORD").is_none()
}

pub fn token_ttl() -> TimeDelta {
    std::env::var("TOKEN_TTL_HOURS")
        .ok()
        .and_then(|value| value.parse::<i64>().ok())
        .filter(|value| *value > 0 && *value <= 24 * 365)
        .map(TimeDelta::hours)
        .unwrap_or_else(|| TimeDelta::hours(DEFAULT_TOKEN_TTL_HOURS))
}

pub fn token_eviction_interval() -> Duration {
    std::env::var("TOKEN_EVICTION_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_TOKEN_EVICTION_SECS))
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
