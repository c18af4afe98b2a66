//! # Session Store
//!
//! Persists the signed-in user as JSON under [`SESSION_STORAGE_KEY`].
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  key absent            → logged out                                     │
//! │  key holds a Session   → logged in as that user                         │
//! │  key holds garbage     → logged out; key removed on restore             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};
use warung_core::{Session, SESSION_STORAGE_KEY};

use crate::error::DbResult;
use crate::repository::device_storage::DeviceStorage;

/// Saves, restores and clears the persisted session.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn DeviceStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn DeviceStorage>) -> Self {
        SessionStore { storage }
    }

    /// Persists `session`, replacing any previous one.
    pub async fn save(&self, session: &Session) -> DbResult<()> {
        let json = serde_json::to_string(session)?;
        self.storage.set(SESSION_STORAGE_KEY, &json).await?;

        info!(user_id = %session.id, role = ?session.role, "Session persisted");
        Ok(())
    }

    /// Loads the persisted session.
    ///
    /// An unreadable value is logged, removed, and reported as `None`.
    pub async fn restore(&self) -> DbResult<Option<Session>> {
        let Some(json) = self.storage.get(SESSION_STORAGE_KEY).await? else {
            debug!("No persisted session");
            return Ok(None);
        };

        match serde_json::from_str::<Session>(&json) {
            Ok(session) => {
                info!(user_id = %session.id, "Session restored");
                Ok(Some(session))
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable persisted session");
                self.storage.remove(SESSION_STORAGE_KEY).await?;
                Ok(None)
            }
        }
    }

    /// Removes the persisted session. No-op when already logged out.
    pub async fn clear(&self) -> DbResult<()> {
        self.storage.remove(SESSION_STORAGE_KEY).await?;
        debug!("Persisted session cleared");
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
