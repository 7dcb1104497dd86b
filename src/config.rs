use serde::Deserialize;
use crate::models::{Role, Tool};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
    pub queue: QueueConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,  // in bytes
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default)]
    pub ttl_secs: Option<u64>,
    pub sweep_interval_secs: u64,
}

impl SessionConfig {
    /// Session lifetime, if tokens expire at all.
    pub fn ttl(&self) -> Result<Option<chrono::Duration>, config::ConfigError> {
        let Some(secs) = self.ttl_secs else {
            return Ok(None);
        };
        i64::try_from(secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .map(Some)
            .ok_or_else(|| config::ConfigError::Message(format!("session.ttl_secs out of range: {}", secs)))
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthBackend {
    Static,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub backend: AuthBackend,
    pub redis_url: Option<String>,
    #[serde(default)]
    pub users: Vec<UserEntry>,
}

/// A user known to the static authenticator.
#[derive(Debug, Deserialize, Clone)]
pub struct UserEntry {
    pub username: String,
    pub password_hash: String,  // bcrypt
    pub role: Role,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QueueConfig {
    pub max_jobs: usize,
    pub connect_timeout_ms: u64,
    /// Tools advertised by resources reached through the TCP connector.
    #[serde(default)]
    pub tools: Vec<Tool>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
