use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{DataStore, StoreError, StoredCredential};

pub fn new_salt() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn credential_for(password: &str, now: DateTime<Utc>) -> StoredCredential {
    let salt = new_salt();
    StoredCredential {
        password_hash: hash_password(&salt, password),
        salt,
        updated_at: now,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Extract the token from an `Authorization: Bearer <token>` value.
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// The single shared credential plus every session token issued against it.
#[derive(Debug)]
pub struct AuthState {
    credential: RwLock<StoredCredential>,
    tokens: DashMap<String, DateTime<Utc>>,
    ttl: TimeDelta,
}

impl AuthState {
    pub fn new(credential: StoredCredential, ttl: TimeDelta) -> Self {
        Self {
            credential: RwLock::new(credential),
            tokens: DashMap::new(),
            ttl,
        }
    }

    pub async fn verify_password(&self, password: &str) -> bool {
        let credential = self.credential.read().await;
        let candidate = hash_password(&credential.salt, password);
        constant_time_eq(candidate.as_bytes(), credential.password_hash.as_bytes())
    }

    /// Persist a new credential and swap it in. The write lock is held across
    /// the save, so the stored and in-memory credentials name the same
    /// password. Tokens already issued stay valid until they expire.
    pub async fn rotate_credential(
        &self,
        credential: StoredCredential,
        store: &DataStore,
    ) -> Result<(), StoreError> {
        let mut current = self.credential.write().await;
        store.save_credential(&credential).await?;
        *current = credential;
        Ok(())
    }

    pub fn issue_token(&self, now: DateTime<Utc>) -> (String, DateTime<Utc>) {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let expires_at = now + self.ttl;
        self.tokens.insert(token.clone(), expires_at);
        (token, expires_at)
    }

    /// Expiry of a live token. Expired tokens are dropped on sight.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let expires_at = *self.tokens.get(token)?;
        if expires_at > now {
            Some(expires_at)
        } else {
            self.tokens.remove(token);
            None
        }
    }

    pub fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.tokens.len();
        self.tokens.retain(|_, expires_at| *expires_at > now);
        before - self.tokens.len()
    }

    pub fn active_tokens(&self) -> usize {
        self.tokens.len()
    }
}

/// Extractor for routes that need a valid session. Rejects with 401.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated {
    pub expires_at: DateTime<Utc>,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized("Missing bearer token"))?;
        let token =
            bearer_token(value).ok_or(ApiError::Unauthorized("Malformed authorization header"))?;
        state
            .auth
            .validate(token, Utc::now())
            .map(|expires_at| Authenticated { expires_at })
            .ok_or(ApiError::Unauthorized("Session expired or invalid"))
    }
}
