//! # warung-db: Device Storage for Warung POS
//!
//! SQLite-backed key-value storage local to the terminal, and the session
//! store built on it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login / logout / restore_session commands                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     warung-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ SessionStore  │───►│ DeviceStorage │    │  Migrations  │  │   │
//! │  │   │ save/restore/ │    │ get/set/remove│    │  (embedded)  │  │   │
//! │  │   │ clear         │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                   Database (pool.rs, SqlitePool)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file in the platform data directory                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ledgers are not stored here; only the signed-in user survives a restart.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warung_db::{Database, DbConfig, SessionStore};
//!
//! let db = Database::new(DbConfig::new("warung.db")).await?;
//! let sessions = SessionStore::new(Arc::new(db.device_storage()));
//! let restored = sessions.restore().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod session_store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::device_storage::{DeviceStorage, MemoryDeviceStorage, SqliteDeviceStorage};
pub use session_store::SessionStore;
