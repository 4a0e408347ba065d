//! Durable session persistence.
//!
//! The issued bearer token and the serialized user record live together in
//! `session.json` under the cache directory, so clearing one always clears
//! the other.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::User;

/// Session file name in the cache directory
const SESSION_FILE: &str = "session.json";

/// Token lifetime in hours. The service issues tokens that expire 24 hours
/// after login; a stored session older than that cannot hydrate.
const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(token: String, user: Option<User>) -> Self {
        Self {
            token,
            user,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.created_at + Duration::hours(TOKEN_TTL_HOURS)
    }
}

pub struct SessionStore {
    cache_dir: PathBuf,
}

impl SessionStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Load the persisted session. Sessions past the token TTL are treated
    /// as absent.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let stored: StoredSession =
            serde_json::from_str(&contents).context("Failed to parse session file")?;

        if stored.is_expired() {
            return Ok(None);
        }
        Ok(Some(stored))
    }

    /// Save the session to disk, creating the cache directory if needed.
    pub fn save(&self, session: &StoredSession) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(session)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Remove the persisted session. A missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}
