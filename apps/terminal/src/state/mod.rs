//! # State Module
//!
//! Application state, split by concern so each command takes only what it
//! needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │   DbState    │ │ SessionState │ │ CatalogState │ │ SummaryState │   │
//! │  │              │ │              │ │              │ │              │   │
//! │  │ SessionStore │ │ SessionGuard │ │ InMemory-    │ │ Mutex<Daily- │   │
//! │  │ (SQLite)     │ │ context with │ │ Catalog      │ │ Summary>     │   │
//! │  │              │ │ cart + stock │ │ (read-only)  │ │              │   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │                                                                         │
//! │  ConfigState: read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod config;
mod db;
mod session;
mod summary;

pub use catalog::CatalogState;
pub use config::ConfigState;
pub use db::DbState;
pub use session::{SessionContext, SessionState};
pub use summary::SummaryState;

/// Every piece of state the command dispatcher hands out.
#[derive(Debug)]
pub struct AppState {
    pub config: ConfigState,
    pub db: DbState,
    pub session: SessionState,
    pub catalog: CatalogState,
    pub summary: SummaryState,
}

impl AppState {
    /// Fresh terminal state: demo accounts, demo catalog, empty day.
    pub fn new(config: ConfigState, db: DbState) -> Self {
        let summary = SummaryState::new(config.daily_target());
        AppState {
            config,
            db,
            session: SessionState::default(),
            catalog: CatalogState::demo(),
            summary,
        }
    }
}
