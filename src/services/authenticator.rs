use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use bcrypt::{hash, verify, DEFAULT_COST};
use crate::config::UserEntry;
use crate::errors::{AppError, AppResult};
use crate::models::{Role, User};

/// Verifies credentials. Every kind of bad login (unknown user, wrong
/// password, unusable stored hash) must come back as
/// `AppError::AuthenticationFailed`.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> AppResult<User>;
}

// An unknown username is verified against this instead, so that it costs
// as much as a wrong password.
fn decoy_hash(cost: u32) -> String {
    hash("decoy", cost)
        .or_else(|_| hash("decoy", DEFAULT_COST))
        .unwrap_or_default()
}

fn hash_cost(hash: &str) -> Option<u32> {
    hash.split('$').nth(2)?.parse().ok()
}

fn reject_unknown(username: &str, password: &str, decoy: &str) -> AppError {
    let _ = verify(password, decoy);
    tracing::debug!(username, "Login for unknown user");
    AppError::AuthenticationFailed
}

fn check_password(username: &str, password: &str, hash: &str) -> AppResult<()> {
    match verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::AuthenticationFailed),
        Err(e) => {
            tracing::error!(username, "Stored password hash is unusable: {}", e);
            Err(AppError::AuthenticationFailed)
        }
    }
}

/// Users fixed at start-up from configuration.
pub struct StaticAuthenticator {
    users: HashMap<String, UserEntry>,
    decoy: String,
}

impl StaticAuthenticator {
    pub fn new(entries: Vec<UserEntry>) -> Self {
        let cost = entries
            .iter()
            .find_map(|u| hash_cost(&u.password_hash))
            .unwrap_or(DEFAULT_COST);
        let users = entries.into_iter().map(|u| (u.username.clone(), u)).collect();
        Self { users, decoy: decoy_hash(cost) }
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn login(&self, username: &str, password: &str) -> AppResult<User> {
        let entry = self.users
            .get(username)
            .ok_or_else(|| reject_unknown(username, password, &self.decoy))?;
        check_password(username, password, &entry.password_hash)?;
        Ok(User::new(&entry.username, entry.role))
    }
}

/// Stored under `user:{username}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Looks users up in Redis.
pub struct RedisAuthenticator {
    client: Arc<Client>,
    decoy: String,
}

impl RedisAuthenticator {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client, decoy: decoy_hash(DEFAULT_COST) }
    }

    async fn get_user(&self, username: &str) -> AppResult<Option<StoredUser>> {
        let mut conn = self.client.get_async_connection().await?;
        let data: Option<String> = conn.get(format!("user:{}", username)).await?;
        match data {
            Some(data) => serde_json::from_str(&data)
                .map(Some)
                .map_err(|e| AppError::Internal(format!("Corrupt user record {}: {}", username, e))),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Authenticator for RedisAuthenticator {
    async fn login(&self, username: &str, password: &str) -> AppResult<User> {
        let stored = self.get_user(username)
            .await?
            .ok_or_else(|| reject_unknown(username, password, &self.decoy))?;
        check_password(username, password, &stored.password_hash)?;
        Ok(User::new(stored.username, stored.role))
    }
}
