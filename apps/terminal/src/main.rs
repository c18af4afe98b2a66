//! # Warung Terminal Entry Point
//!
//! ```text
//! front-end ──stdin──►  warung-terminal  ──stdout──► front-end
//!                            │
//!                            ├── stderr: logs
//!                            └── warung.db: persisted session
//! ```
//!
//! The actual setup is in lib.rs so it can be driven from tests.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match warung_terminal::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("warung-terminal: {}", e);
            ExitCode::FAILURE
        }
    }
}
