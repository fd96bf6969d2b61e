use bellwether_shared::SessionError;
use bellwether_shared::session::{CredentialStore, SessionGuard};
use gloo_storage::{LocalStorage, Storage};

/// The session credential, kept as two raw strings in `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCredentialStore;

impl CredentialStore for LocalCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| SessionError::Storage(format!("{e:?}")))
    }

    fn remove(&self, key: &str) {
        let _ = LocalStorage::raw().remove_item(key);
    }
}

pub fn session_guard() -> SessionGuard<LocalCredentialStore> {
    SessionGuard::new(LocalCredentialStore)
}

/// Whether the stored session is valid right now. Read-only.
pub fn is_logged_in() -> bool {
    session_guard().is_authenticated(chrono::Utc::now())
}
