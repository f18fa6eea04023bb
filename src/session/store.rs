//! Session store
//!
//! Owns the current session and mirrors it into durable storage. Every other
//! component reads [`Session`] snapshots and never mutates them.

use std::sync::Arc;

use super::error::SessionResult;
use super::storage::DurableStorage;
use crate::model::{User, UserId, GUEST_USER_ID};

/// Durable key holding the JSON-serialized user
pub const USER_KEY: &str = "user";

/// Durable key holding the `"true"` logged-in marker
pub const LOGGED_IN_KEY: &str = "isLoggedIn";

/// Snapshot of the authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn logged_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Identity sent with uploads and history requests
    pub fn user_id(&self) -> UserId {
        self.user.as_ref().map(|u| u.id).unwrap_or(GUEST_USER_ID)
    }
}

/// Holds the current session and keeps durable storage in step with it
pub struct SessionStore {
    storage: Arc<dyn DurableStorage>,
    current: Session,
}

impl SessionStore {
    /// Create a logged-out store without touching storage
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            storage,
            current: Session::logged_out(),
        }
    }

    /// Create a store and restore whatever session storage holds
    pub fn open(storage: Arc<dyn DurableStorage>) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    pub fn session(&self) -> &Session {
        &self.current
    }

    pub fn user(&self) -> Option<&User> {
        self.current.user()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_logged_in()
    }

    /// Replace the session with `user` and persist it
    pub fn save(&mut self, user: User) -> SessionResult<()> {
        let result = self.persist(&user);
        match result {
            Ok(()) => {
                tracing::debug!(user_id = user.id, "Session saved");
                self.current = Session::logged_in(user);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to persist session: {}", e);
                self.load();
                Err(e)
            }
        }
    }

    /// Restore the session from durable storage
    ///
    /// Anything short of a parseable user plus the `"true"` marker leaves the
    /// store logged out. Read errors are logged, never returned.
    pub fn load(&mut self) -> &Session {
        self.current = match self.read_durable() {
            Ok(Some(user)) => Session::logged_in(user),
            Ok(None) => Session::logged_out(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session: {}", e);
                Session::logged_out()
            }
        };
        &self.current
    }

    /// Log out and remove the durable entries
    pub fn clear(&mut self) -> SessionResult<()> {
        let result = self
            .storage
            .remove(USER_KEY)
            .and_then(|_| self.storage.remove(LOGGED_IN_KEY));

        match result {
            Ok(()) => {
                tracing::debug!("Session cleared");
                self.current = Session::logged_out();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to clear session: {}", e);
                self.load();
                Err(e)
            }
        }
    }

    fn persist(&self, user: &User) -> SessionResult<()> {
        let blob = serde_json::to_string(user)?;
        self.storage.set(USER_KEY, &blob)?;
        self.storage.set(LOGGED_IN_KEY, "true")
    }

    fn read_durable(&self) -> SessionResult<Option<User>> {
        let blob = self.storage.get(USER_KEY)?;
        let marker = self.storage.get(LOGGED_IN_KEY)?;

        match (blob, marker.as_deref()) {
            (Some(blob), Some("true")) => Ok(Some(serde_json::from_str(&blob)?)),
            _ => Ok(None),
        }
    }
}
