//! # Session State
//!
//! The signed-in user and the ledgers that belong to them.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login / restore_session                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SessionContext::new(session)                                           │
//! │  ├── cart:  Arc<Mutex<CartLedger>>   (empty, cash, 0)                  │
//! │  └── stock: Arc<Mutex<StockLedger>>  (demo stock)                      │
//! │       │                                                                 │
//! │       │  cart / stock commands lock one ledger per call                 │
//! │       ▼                                                                 │
//! │  logout ──► context dropped, ledgers with it                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! Each ledger has its own `Mutex`, so a stock adjustment never waits on the
//! cart. A ledger lock is only held inside `with_*` closures, which never
//! await. A poisoned lock is recovered: ledger operations leave no partial
//! state behind on failure.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::info;
use warung_core::{CartLedger, Session, SessionGuard, StockLedger};

use crate::error::ApiError;

// =============================================================================
// Session Context
// =============================================================================

/// One signed-in user with their cart and stock ledgers.
#[derive(Debug)]
pub struct SessionContext {
    session: Session,
    cart: Arc<Mutex<CartLedger>>,
    stock: Arc<Mutex<StockLedger>>,
}

impl SessionContext {
    pub fn new(session: Session) -> Self {
        SessionContext {
            session,
            cart: Arc::new(Mutex::new(CartLedger::new())),
            stock: Arc::new(Mutex::new(StockLedger::demo())),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartLedger) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartLedger) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    pub fn with_stock<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&StockLedger) -> R,
    {
        let stock = self.stock.lock().unwrap_or_else(PoisonError::into_inner);
        f(&stock)
    }

    pub fn with_stock_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut StockLedger) -> R,
    {
        let mut stock = self.stock.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut stock)
    }
}

// =============================================================================
// Session State
// =============================================================================

/// The session guard plus the current context, if anyone is signed in.
#[derive(Debug)]
pub struct SessionState {
    guard: SessionGuard,
    current: RwLock<Option<Arc<SessionContext>>>,
}

impl SessionState {
    pub fn new(guard: SessionGuard) -> Self {
        SessionState {
            guard,
            current: RwLock::new(None),
        }
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    /// The live context, or `Unauthenticated`.
    pub fn require(&self) -> Result<Arc<SessionContext>, ApiError> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(ApiError::unauthenticated)
    }

    /// The signed-in user, if any.
    pub fn current_session(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|ctx| ctx.session().clone())
    }

    /// Builds a fresh context for `session`, replacing any previous one.
    pub fn begin(&self, session: Session) -> Arc<SessionContext> {
        let context = Arc::new(SessionContext::new(session));
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Arc::clone(&context));

        if let Some(previous) = previous {
            info!(user_id = %previous.session().id, "Replacing previous session");
        }
        context
    }

    /// Tears down the current context. Returns the user id that was signed
    /// in, or `None` when nobody was.
    pub fn end(&self) -> Option<String> {
        let ended = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .map(|ctx| ctx.session().clone());

        self.guard.end_session(ended)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SessionGuard::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn cashier(state: &SessionState) -> Session {
        state
            .guard()
            .authenticate("cashier@pos.com", "cashier123")
            .unwrap()
    }

    #[test]
    fn test_require_without_session() {
        let state = SessionState::default();
        assert_eq!(state.require().unwrap_err().code, ErrorCode::Unauthenticated);
    }

    #[test]
    fn test_begin_and_end() {
        let state = SessionState::default();
        let session = cashier(&state);

        let ctx = state.begin(session.clone());
        assert_eq!(ctx.session(), &session);
        assert_eq!(state.current_session(), Some(session));

        assert_eq!(state.end(), Some("1".to_string()));
        assert_eq!(state.end(), None);
        assert!(state.require().is_err());
    }

    #[test]
    fn test_new_context_has_fresh_ledgers() {
        let state = SessionState::default();
        let ctx = state.begin(cashier(&state));

        assert!(ctx.with_cart(|c| c.is_empty()));
        assert_eq!(ctx.with_stock(|s| s.records().len()), 4);

        ctx.with_stock_mut(|s| s.open_box("1").map(|_| ())).unwrap();
        state.end();

        let ctx = state.begin(cashier(&state));
        assert_eq!(ctx.with_stock(|s| s.get("1").map(|r| r.box_stock)), Some(5));
    }

    #[test]
    fn test_concurrent_open_box_is_atomic() {
        let state = SessionState::default();
        let ctx = state.begin(cashier(&state));

        // Product 1 starts with 5 boxes; 8 threads race for them.
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ctx = Arc::clone(&ctx);
                std::thread::spawn(move || ctx.with_stock_mut(|s| s.open_box("1").is_ok()))
            })
            .collect();

        let opened = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(opened, 5);
        let record = ctx.with_stock(|s| s.get("1").cloned()).unwrap();
        assert_eq!(record.box_stock, 0);
        assert_eq!(record.piece_stock, 20 + 5 * 40);
    }
}
