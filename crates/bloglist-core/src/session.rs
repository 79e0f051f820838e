//! Persisted session slot.

use anyhow::{Context, Result};
use tracing::warn;

use crate::models::Session;
use crate::storage::Storage;

/// Storage key holding the serialized session.
pub const SESSION_KEY: &str = "loggedBloglistUser";

/// Result of reading the session slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredSession {
    /// A session with a token
    Valid(Session),
    /// A value is stored but is unparsable or has no token
    Corrupt,
    /// Nothing stored
    Missing,
}

impl StoredSession {
    pub fn into_session(self) -> Option<Session> {
        match self {
            StoredSession::Valid(session) => Some(session),
            StoredSession::Corrupt | StoredSession::Missing => None,
        }
    }
}

/// Saves, loads and clears the session under [`SESSION_KEY`].
pub struct SessionStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Serializes and writes the session, replacing any prior value.
    ///
    /// # Errors
    /// Returns an error if the storage write fails.
    pub fn save(&mut self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(session).context("Failed to serialize session")?;
        self.storage.set(SESSION_KEY, &json)
    }

    /// Reads the session slot.
    ///
    /// An unreadable backing store is reported as [`StoredSession::Corrupt`]
    /// so callers fall back to an anonymous session.
    pub fn load(&self) -> StoredSession {
        let raw = match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return StoredSession::Missing,
            Err(e) => {
                warn!("Failed to read stored session: {e:#}");
                return StoredSession::Corrupt;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if session.has_token() => StoredSession::Valid(session),
            Ok(_) => StoredSession::Corrupt,
            Err(e) => {
                warn!("Stored session is not valid JSON: {e}");
                StoredSession::Corrupt
            }
        }
    }

    /// Removes the session slot.
    ///
    /// # Errors
    /// Returns an error if the storage write fails.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(SESSION_KEY)
    }
}
