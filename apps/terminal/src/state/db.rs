//! # Database State
//!
//! Device storage handles for commands. Only the session store reads or
//! writes it; ledgers stay in memory.

use std::sync::Arc;

use warung_db::{Database, DeviceStorage, SessionStore};

#[derive(Debug)]
pub struct DbState {
    db: Option<Database>,
    sessions: SessionStore,
}

impl DbState {
    /// Storage backed by the SQLite database.
    pub fn new(db: Database) -> Self {
        let sessions = SessionStore::new(Arc::new(db.device_storage()));
        DbState {
            db: Some(db),
            sessions,
        }
    }

    /// Storage backed by any device storage, with no database behind it.
    pub fn with_storage(storage: Arc<dyn DeviceStorage>) -> Self {
        DbState {
            db: None,
            sessions: SessionStore::new(storage),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// `true` when there is no database or it answers a query.
    pub async fn health_check(&self) -> bool {
        match &self.db {
            Some(db) => db.health_check().await,
            None => true,
        }
    }

    pub async fn close(&self) {
        if let Some(db) = &self.db {
            db.close().await;
        }
    }
}
