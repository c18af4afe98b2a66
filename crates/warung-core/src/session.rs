//! # Session Guard
//!
//! Checks credentials against a fixed account registry and hands out a
//! role-tagged [`Session`].
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  identifier, secret                                                     │
//! │        │                                                                │
//! │        ▼  lowercase identifier                                          │
//! │  ┌─────────────────┐   miss    ┌──────────────┐                        │
//! │  │ AccountRegistry │──────────►│ AuthFailure  │                        │
//! │  └────────┬────────┘           └──────────────┘                        │
//! │           │ hit                        ▲                                │
//! │           ▼                            │ mismatch                       │
//! │     compare secret ────────────────────┘                                │
//! │           │ match                                                       │
//! │           ▼                                                             │
//! │       Session (no secret) ──► caller persists under "user"             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Secrets are compared as plain strings. The registry is a demo fixture,
//! not a credential store.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Role, Session};
use crate::validation::{validate_credentials, ValidationResult};

// =============================================================================
// Account Registry
// =============================================================================

/// A registered user: the session it yields plus the secret that unlocks it.
#[derive(Debug, Clone)]
pub struct Account {
    session: Session,
    secret: String,
}

impl Account {
    pub fn new(session: Session, secret: impl Into<String>) -> Self {
        Self {
            session,
            secret: secret.into(),
        }
    }

    /// The session this account signs in as.
    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// Accounts keyed by lowercased identifier.
#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    accounts: HashMap<String, Account>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account under `identifier`.
    ///
    /// ## Errors
    /// - `Required` / `TooLong` for a bad identifier or empty secret
    /// - `Duplicate` when the identifier (ignoring case) is already taken
    pub fn register(&mut self, identifier: &str, account: Account) -> ValidationResult<()> {
        validate_credentials(identifier, &account.secret)?;

        let key = normalize(identifier);
        if self.accounts.contains_key(&key) {
            return Err(ValidationError::Duplicate {
                field: "email".to_string(),
                value: key,
            });
        }

        self.accounts.insert(key, account);
        Ok(())
    }

    /// The two demo accounts, one per role.
    pub fn demo() -> Self {
        let account = |id: &str, name: &str, role: Role, email: &str, secret: &str| {
            let session = Session {
                id: id.to_string(),
                name: name.to_string(),
                role,
                email: Some(email.to_string()),
                phone: None,
            };
            (email.to_string(), Account::new(session, secret))
        };

        Self {
            accounts: HashMap::from([
                account("1", "John Cashier", Role::Cashier, "cashier@pos.com", "cashier123"),
                account("2", "Jane Owner", Role::Owner, "owner@pos.com", "owner123"),
            ]),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn lookup(&self, identifier: &str) -> Option<&Account> {
        self.accounts.get(&normalize(identifier))
    }
}

/// Case folding only; surrounding whitespace is part of the identifier.
fn normalize(identifier: &str) -> String {
    identifier.to_lowercase()
}

// =============================================================================
// Session Guard
// =============================================================================

/// Issues and ends sessions.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    registry: AccountRegistry,
}

impl SessionGuard {
    pub fn new(registry: AccountRegistry) -> Self {
        Self { registry }
    }

    /// Resolves credentials to a session.
    ///
    /// The identifier matches case-insensitively; the secret must match
    /// exactly. Unknown identifiers and wrong secrets are indistinguishable.
    pub fn authenticate(&self, identifier: &str, secret: &str) -> CoreResult<Session> {
        match self.registry.lookup(identifier) {
            Some(account) if account.secret == secret => Ok(account.session.clone()),
            _ => Err(CoreError::AuthFailure),
        }
    }

    /// Ends a session, returning the id of the user that was signed in.
    ///
    /// Ending an already-ended session (`None`) is a no-op. The caller clears
    /// any persisted copy in the same step.
    pub fn end_session(&self, session: Option<Session>) -> Option<String> {
        session.map(|s| s.id)
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new(AccountRegistry::demo())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
