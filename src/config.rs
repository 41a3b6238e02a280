use serde::Deserialize;

/// Configuration for the API server
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// PostgreSQL database URL
    pub database_url: String,
    /// Redis URL
    pub redis_url: String,
    /// Port to run the server on
    #[serde(default = "default_port")]
    pub port: u16,
    /// When disabled every request runs as the first superuser
    #[serde(default)]
    pub auth_enabled: bool,
    /// Email of the user requests are attributed to when auth is disabled
    #[serde(default = "default_first_superuser")]
    pub first_superuser: String,
    /// Mounts the /cursor-dev routes used by the sync test harness
    #[serde(default)]
    pub local_cursor_development: bool,
    /// Lifetime of cached destination/source lookups
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
    /// Directory for the rolling audit log
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_port() -> u16 {
    8001
}

fn default_first_superuser() -> String {
    "admin@example.com".to_string()
}

fn default_cache_ttl_seconds() -> u64 {
    60
}

fn default_log_dir() -> String {
    "logs".to_string()
}
