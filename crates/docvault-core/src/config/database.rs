//! PostgreSQL settings for the metadata store.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where workspace, folder and document records live, and how many
/// connections the CLI may hold open against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` URL. The only setting without a default.
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection before failing.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
    /// Seconds an idle connection is kept. Unset keeps connections forever.
    #[serde(default)]
    pub idle_timeout_seconds: Option<u64>,
    /// Reported to the server as `application_name`.
    #[serde(default = "default_application_name")]
    pub application_name: String,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_seconds.map(Duration::from_secs)
    }
}

fn default_max_connections() -> u32 {
    20
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_application_name() -> String {
    "docvault".to_string()
}
