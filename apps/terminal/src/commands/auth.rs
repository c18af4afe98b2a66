//! # Auth Commands
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  startup ──► restore_session ──┬── key "user" readable ──► logged in   │
//! │                                └── absent / garbage ─────► logged out  │
//! │                                                                         │
//! │  login(email, password)                                                 │
//! │    1. validate (both fields required)                                   │
//! │    2. SessionGuard::authenticate                                        │
//! │    3. persist under "user"                                              │
//! │    4. build SessionContext (fresh cart + stock)                         │
//! │                                                                         │
//! │  logout ──► remove "user" ──► end context   (safe to repeat)           │
//! │             fails? stays logged in, STORAGE_ERROR                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};
use warung_core::validation::validate_credentials;
use warung_core::{Dashboard, Session};

use crate::error::ApiError;
use crate::state::{DbState, SessionState};

/// The signed-in user and where the front-end should send them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: Session,
    pub dashboard: Dashboard,
}

impl From<Session> for SessionResponse {
    fn from(user: Session) -> Self {
        let dashboard = user.role.home();
        SessionResponse { user, dashboard }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    /// Id of the user that was signed in; `None` if nobody was.
    pub ended_user_id: Option<String>,
}

/// Picks up the session persisted by a previous run.
///
/// Returns `None` when logged out. An unreadable stored session counts as
/// logged out and is removed.
pub async fn restore_session(
    db: &DbState,
    session: &SessionState,
) -> Result<Option<SessionResponse>, ApiError> {
    debug!("restore_session command");

    let Some(user) = db.sessions().restore().await? else {
        return Ok(None);
    };

    session.begin(user.clone());
    info!(user_id = %user.id, "Session resumed");
    Ok(Some(SessionResponse::from(user)))
}

/// Signs in.
pub async fn login(
    db: &DbState,
    session: &SessionState,
    email: String,
    password: String,
) -> Result<SessionResponse, ApiError> {
    debug!(email = %email, "login command");

    validate_credentials(&email, &password)?;

    let user = session
        .guard()
        .authenticate(&email, &password)
        .inspect_err(|_| warn!(email = %email, "Login rejected"))?;

    db.sessions().save(&user).await?;
    session.begin(user.clone());

    info!(user_id = %user.id, role = ?user.role, "Logged in");
    Ok(SessionResponse::from(user))
}

/// Signs out. Calling it while logged out is fine.
///
/// The persisted session is removed first. If that fails the user stays
/// signed in, so memory and storage agree on the next start.
pub async fn logout(db: &DbState, session: &SessionState) -> Result<LogoutResponse, ApiError> {
    debug!("logout command");

    db.sessions()
        .clear()
        .await
        .inspect_err(|e| warn!(error = %e, "Could not remove persisted session"))?;
    let ended_user_id = session.end();

    if let Some(id) = &ended_user_id {
        info!(user_id = %id, "Logged out");
    }
    Ok(LogoutResponse { ended_user_id })
}

/// The signed-in user, if any.
pub fn get_session(session: &SessionState) -> Option<SessionResponse> {
    debug!("get_session command");
    session.current_session().map(SessionResponse::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::error::ErrorCode;
    use async_trait::async_trait;
    use warung_core::{Role, SESSION_STORAGE_KEY};
    use warung_db::{DbError, DbResult, DeviceStorage, MemoryDeviceStorage};

    /// Storage whose deletes always fail.
    struct StuckStorage(MemoryDeviceStorage);

    #[async_trait]
    impl DeviceStorage for StuckStorage {
        async fn get(&self, key: &str) -> DbResult<Option<String>> {
            self.0.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> DbResult<()> {
            self.0.set(key, value).await
        }

        async fn remove(&self, _key: &str) -> DbResult<()> {
            Err(DbError::QueryFailed("disk is read-only".to_string()))
        }
    }

    fn states() -> (Arc<MemoryDeviceStorage>, DbState, SessionState) {
        let storage = Arc::new(MemoryDeviceStorage::new());
        let db = DbState::with_storage(storage.clone());
        (storage, db, SessionState::default())
    }

    #[tokio::test]
    async fn test_login_persists_and_routes_by_role() {
        let (storage, db, session) = states();

        let owner = login(&db, &session, "owner@pos.com".into(), "owner123".into())
            .await
            .unwrap();
        assert_eq!(owner.user.role, Role::Owner);
        assert_eq!(owner.dashboard, Dashboard::Owner);

        let raw = storage.get(SESSION_STORAGE_KEY).await.unwrap().unwrap();
        assert!(raw.contains("Jane Owner"));
        assert!(session.require().is_ok());
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let (storage, db, session) = states();

        let err = login(&db, &session, "".into(), "cashier123".into())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = login(&db, &session, "cashier@pos.com".into(), "".into())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(storage.get(SESSION_STORAGE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bad_credentials_leave_nothing_behind() {
        let (storage, db, session) = states();

        let err = login(&db, &session, "cashier@pos.com".into(), "nope".into())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthFailure);
        assert_eq!(err.message, "Invalid email or password");

        assert_eq!(storage.get(SESSION_STORAGE_KEY).await.unwrap(), None);
        assert!(session.require().is_err());
    }

    #[tokio::test]
    async fn test_logout_clears_and_is_idempotent() {
        let (storage, db, session) = states();
        login(&db, &session, "cashier@pos.com".into(), "cashier123".into())
            .await
            .unwrap();

        let first = logout(&db, &session).await.unwrap();
        assert_eq!(first.ended_user_id.as_deref(), Some("1"));
        assert_eq!(storage.get(SESSION_STORAGE_KEY).await.unwrap(), None);

        let second = logout(&db, &session).await.unwrap();
        assert_eq!(second.ended_user_id, None);
    }

    #[tokio::test]
    async fn test_failed_logout_stays_signed_in() {
        let storage = Arc::new(StuckStorage(MemoryDeviceStorage::new()));
        let db = DbState::with_storage(storage.clone());
        let session = SessionState::default();
        login(&db, &session, "cashier@pos.com".into(), "cashier123".into())
            .await
            .unwrap();

        let err = logout(&db, &session).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);

        // Memory and storage still agree: signed in now and after a restart.
        assert!(session.require().is_ok());
        assert!(storage.get(SESSION_STORAGE_KEY).await.unwrap().is_some());

        let session = SessionState::default();
        let restored = restore_session(&db, &session).await.unwrap().unwrap();
        assert_eq!(restored.user.id, "1");
    }

    #[tokio::test]
    async fn test_restore_after_restart() {
        let (storage, db, session) = states();
        login(&db, &session, "cashier@pos.com".into(), "cashier123".into())
            .await
            .unwrap();

        // New process, same device storage.
        let db = DbState::with_storage(storage.clone());
        let session = SessionState::default();

        let restored = restore_session(&db, &session).await.unwrap().unwrap();
        assert_eq!(restored.user.name, "John Cashier");
        assert_eq!(restored.dashboard, Dashboard::Cashier);
        assert_eq!(get_session(&session), Some(restored));
    }

    #[tokio::test]
    async fn test_restore_with_garbage_logs_out() {
        let (storage, db, session) = states();
        storage.set(SESSION_STORAGE_KEY, "not-json").await.unwrap();

        assert_eq!(restore_session(&db, &session).await.unwrap(), None);
        assert_eq!(storage.get(SESSION_STORAGE_KEY).await.unwrap(), None);
        assert!(get_session(&session).is_none());
    }
}
