use std::path::PathBuf;
use std::sync::Arc;

use bellwether_shared::{StatesDetailDocument, StatesSummary};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::auth::{AuthState, credential_for};
use crate::config::{Settings, admin_password_is_default};
use crate::store::{DataStore, StoreError};

#[derive(Clone)]
pub struct AppState {
    /// Editable sections of every state, replaced wholesale on update.
    pub details: Arc<RwLock<StatesDetailDocument>>,
    /// `/data/states.json` payload.
    pub summary: Arc<StatesSummary>,
    pub auth: Arc<AuthState>,
    pub store: Arc<DataStore>,
    pub static_dir: PathBuf,
}

impl AppState {
    /// Open the data directory and load everything the routes serve. A
    /// missing credential file is seeded from the configured password.
    pub async fn load(settings: &Settings) -> Result<Self, StoreError> {
        let store = DataStore::open(&settings.data_dir).await?;
        let details = store.load_details().await?;
        let summary = store.load_summary().await?;

        let credential = match store.load_credential().await? {
            Some(credential) => credential,
            None => {
                if admin_password_is_default() {
                    warn!("ADMIN_PASSWORD not set, seeding the default admin password");
                }
                let credential = credential_for(&settings.initial_password, Utc::now());
                store.save_credential(&credential).await?;
                credential
            }
        };

        info!(
            states_with_sections = details.states.len(),
            summary_states = summary.states.len(),
            data_dir = %store.dir().display(),
            "data store loaded"
        );

        Ok(Self {
            details: Arc::new(RwLock::new(details)),
            summary: Arc::new(summary),
            auth: Arc::new(AuthState::new(credential, settings.token_ttl)),
            store: Arc::new(store),
            static_dir: settings.static_dir.clone(),
        })
    }
}
