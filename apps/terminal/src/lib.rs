//! # Warung Terminal Library
//!
//! The till process. Reads one JSON command per line on stdin and answers
//! with one JSON line on stdout. Logs go to stderr.
//!
//! ## Module Organization
//! ```text
//! warung_terminal/
//! ├── lib.rs          ◄─── You are here (startup & command loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState and exports
//! │   ├── db.rs       ◄─── Device storage / session store
//! │   ├── session.rs  ◄─── Signed-in user with their cart + stock ledgers
//! │   ├── catalog.rs  ◄─── Product catalog
//! │   ├── summary.rs  ◄─── Daily sales summary
//! │   └── config.rs   ◄─── Store name, currency, daily target
//! ├── commands/
//! │   ├── mod.rs      ◄─── Request parsing and dispatch
//! │   ├── auth.rs     ◄─── Login / logout / restore
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── sale.rs     ◄─── Checkout and summary
//! │   ├── stock.rs    ◄─── Stock list and adjustments
//! │   ├── catalog.rs  ◄─── Product search
//! │   └── config.rs   ◄─── Configuration
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use warung_db::{Database, DbConfig, DbError};

use state::{AppState, ConfigState, DbState};

/// Anything that stops the terminal from starting or keeps it from talking
/// on stdio.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Could not determine app data directory")]
    NoDataDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Runs the terminal until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize logging (stderr, RUST_LOG overrides the default)         │
/// │  2. Read configuration from the environment                             │
/// │  3. Open the device database, run pending migrations                    │
/// │  4. Build AppState (demo accounts, demo catalog, empty day)             │
/// │  5. Resume the persisted session, if any                                │
/// │  6. Command loop: stdin line ──► dispatch ──► stdout line               │
/// │  7. stdin closed: close the database                                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), StartupError> {
    init_tracing();

    info!("Starting Warung POS terminal");

    let config = ConfigState::from_env();

    let db_path = get_database_path()?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    let app = AppState::new(config, DbState::new(db));
    if !app.db.health_check().await {
        warn!("Database health check failed");
    }

    // A broken stored session only means starting logged out.
    match commands::auth::restore_session(&app.db, &app.session).await {
        Ok(Some(resumed)) => info!(user_id = %resumed.user.id, "Resumed previous session"),
        Ok(None) => info!("No previous session"),
        Err(e) => warn!(error = %e, "Could not restore previous session"),
    }

    let result = serve(&app).await;

    app.db.close().await;
    info!("Terminal stopped");
    result
}

/// Command loop over stdin / stdout.
async fn serve(app: &AppState) -> Result<(), StartupError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = commands::handle_line(app, line).await;
        let mut out = match serde_json::to_string(&response) {
            Ok(out) => out,
            Err(e) => {
                error!(error = %e, "Failed to encode response");
                continue;
            }
        };
        out.push('\n');

        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=warung=trace` - Show trace for warung crates only
/// - Default: `info,warung=debug,sqlx=warn`
///
/// Output goes to stderr; stdout carries responses only.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,warung=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/id.warung.pos/warung.db`
/// - **Windows**: `%APPDATA%\warung\pos\data\warung.db`
/// - **Linux**: `~/.local/share/pos/warung.db`
///
/// ## Development Override
/// Set `WARUNG_DB_PATH` to use a custom path.
fn get_database_path() -> Result<PathBuf, StartupError> {
    if let Ok(path) = std::env::var("WARUNG_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = ProjectDirs::from("id", "warung", "pos").ok_or(StartupError::NoDataDir)?;
    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("warung.db"))
}
