//! Session persistence
//!
//! The bearer token is written under `TOKEN_KEY` on login, removed on
//! logout and restored on startup. A restored token is trusted as-is; a
//! revoked or expired token only shows up when the first authenticated
//! request fails.

use tracing::{debug, info};

use crate::models::Session;
use crate::storage::{SharedStore, StorageResult, TOKEN_KEY};

/// Owns the active session and its durable copy
pub struct SessionStore {
    store: SharedStore,
    current: Option<Session>,
}

impl SessionStore {
    /// Create a store with no active session
    ///
    /// Call `restore()` to pick up a previously persisted token.
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Load a persisted token, if any, and activate it
    pub fn restore(&mut self) -> StorageResult<Option<&Session>> {
        let token = self
            .store
            .get(TOKEN_KEY)?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        self.current = token.map(Session::new);
        if self.current.is_some() {
            debug!("Restored persisted session");
        }
        Ok(self.current.as_ref())
    }

    /// Persist and activate a session for `token`
    pub fn login(&mut self, token: impl Into<String>) -> StorageResult<&Session> {
        let session = Session::new(token);
        self.store.set(TOKEN_KEY, session.token())?;
        info!("Session started");
        Ok(self.current.insert(session))
    }

    /// Clear the persisted token and the active session
    pub fn logout(&mut self) -> StorageResult<()> {
        self.store.remove(TOKEN_KEY)?;
        if self.current.take().is_some() {
            info!("Session ended");
        }
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }
}
