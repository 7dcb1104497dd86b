use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use tokio::sync::RwLock;
use crate::models::User;

const TOKEN_BYTES: usize = 32;

struct Session {
    user: User,
    created_at: DateTime<Utc>,
}

/// Maps opaque session tokens to the user that logged in with them.
///
/// Cloning shares the underlying map. All access goes through one `RwLock`,
/// so a lookup observes the map either before or after a concurrent
/// add/remove, never in between.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Option<Duration>,
}

impl SessionStore {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// 256 bits from the OS RNG, hex encoded.
    pub fn generate_token() -> String {
        let mut seed = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut seed);
        hex::encode(seed)
    }

    pub async fn add_token(&self, token: String, user: User) {
        let session = Session { user, created_at: Utc::now() };
        self.sessions.write().await.insert(token, session);
    }

    pub async fn check_token(&self, token: &str) -> bool {
        self.get_user(token).await.is_some()
    }

    pub async fn get_user(&self, token: &str) -> Option<User> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token)?;
        if self.is_expired(session, Utc::now()) {
            return None;
        }
        Some(session.user.clone())
    }

    /// Removing an unknown token is a no-op.
    pub async fn remove_token(&self, token: &str) -> Option<User> {
        self.sessions.write().await.remove(token).map(|s| s.user)
    }

    /// Drops every expired session and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        if self.ttl.is_none() {
            return 0;
        }
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !self.is_expired(s, now));
        before - sessions.len()
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        match self.ttl {
            Some(ttl) => now - session.created_at >= ttl,
            None => false,
        }
    }
}

// Periodically purges expired sessions. Only spawned when a TTL is configured.
pub async fn session_sweeper(store: SessionStore, interval_secs: u64) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_secs.max(1)));
    loop {
        interval.tick().await;
        let purged = store.purge_expired().await;
        if purged > 0 {
            tracing::info!(purged, "Expired sessions removed");
        }
    }
}
