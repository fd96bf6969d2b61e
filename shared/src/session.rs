use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

use crate::error::SessionError;

pub const TOKEN_KEY: &str = "authToken";
pub const EXPIRY_KEY: &str = "tokenExpiry";

/// How often mounted guards re-validate the stored session.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(1);
/// Lifetime of a freshly issued session, in hours.
pub const TOKEN_VALIDITY_HOURS: i64 = 24;

pub fn token_validity() -> TimeDelta {
    TimeDelta::hours(TOKEN_VALIDITY_HOURS)
}

/// Raw key-value persistence for the credential (browser local storage in
/// the client, a map in tests).
pub trait CredentialStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str);
}

impl<S: CredentialStore + ?Sized> CredentialStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub token: String,
    pub expiry: DateTime<Utc>,
}

impl SessionToken {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && self.expiry > now
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(SessionToken),
    Expired,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

/// Sole reader and writer of the stored credential.
#[derive(Debug, Clone, Default)]
pub struct SessionGuard<S> {
    store: S,
}

impl<S: CredentialStore> SessionGuard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Classify the stored session without touching it.
    pub fn inspect(&self, now: DateTime<Utc>) -> SessionState {
        let token = self.store.get(TOKEN_KEY).filter(|t| !t.is_empty());
        let expiry = self.store.get(EXPIRY_KEY).filter(|e| !e.is_empty());
        let (Some(token), Some(expiry)) = (token, expiry) else {
            return SessionState::Unauthenticated;
        };
        let Ok(expiry) = DateTime::parse_from_rfc3339(&expiry) else {
            return SessionState::Expired;
        };
        let session = SessionToken {
            token,
            expiry: expiry.with_timezone(&Utc),
        };
        if session.is_valid_at(now) {
            SessionState::Authenticated(session)
        } else {
            SessionState::Expired
        }
    }

    /// Periodic and on-mount validation. Any state other than
    /// `Authenticated` purges both stored fields.
    pub fn check(&self, now: DateTime<Utc>) -> SessionState {
        let state = self.inspect(now);
        if !state.is_authenticated() {
            self.purge();
        }
        state
    }

    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.inspect(now).is_authenticated()
    }

    /// Store a freshly issued token, valid for [`token_validity`] from `now`.
    pub fn login_success(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let expiry = now + token_validity();
        self.store.set(TOKEN_KEY, token)?;
        if let Err(e) = self
            .store
            .set(EXPIRY_KEY, &expiry.to_rfc3339_opts(SecondsFormat::Millis, true))
        {
            self.purge();
            return Err(e);
        }
        Ok(SessionToken {
            token: token.to_string(),
            expiry,
        })
    }

    /// Bearer credential to attach to outgoing requests, if one is stored.
    /// Expiry is not checked here; the backend rejects stale tokens with 401.
    pub fn bearer(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn logout(&self) {
        self.purge();
    }

    fn purge(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(EXPIRY_KEY);
    }
}
