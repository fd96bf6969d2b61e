//! JSON-file persistence under the data directory. Each write goes to its own
//! temporary sibling first and is renamed into place.

use std::path::{Path, PathBuf};

use bellwether_shared::{ClassificationTable, StateRecordPatch, StatesDetailDocument, StatesSummary};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::{CREDENTIAL_FILE, DETAIL_FILE, SUMMARY_FILE};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: invalid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Salted SHA-256 of the shared admin password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct StoredCredential {
    pub salt: String,
    pub password_hash: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn load_details(&self) -> Result<StatesDetailDocument, StoreError> {
        Ok(self.read_json(DETAIL_FILE).await?.unwrap_or_default())
    }

    pub async fn save_details(&self, document: &StatesDetailDocument) -> Result<(), StoreError> {
        self.write_json(DETAIL_FILE, document).await
    }

    /// The summary asset, generated from the builtin classification table
    /// when no `states.json` has been provisioned.
    pub async fn load_summary(&self) -> Result<StatesSummary, StoreError> {
        match self.read_json(SUMMARY_FILE).await? {
            Some(summary) => Ok(summary),
            None => Ok(builtin_summary(Utc::now())),
        }
    }

    pub async fn load_credential(&self) -> Result<Option<StoredCredential>, StoreError> {
        self.read_json(CREDENTIAL_FILE).await
    }

    pub async fn save_credential(&self, credential: &StoredCredential) -> Result<(), StoreError> {
        self.write_json(CREDENTIAL_FILE, credential).await
    }

    async fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let path = self.dir.join(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Json { path, source })
    }

    async fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let path = self.dir.join(name);
        let tmp = self
            .dir
            .join(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()));
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| StoreError::Io { path, source })
    }
}

pub fn builtin_summary(now: DateTime<Utc>) -> StatesSummary {
    StatesSummary {
        last_updated: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        states: ClassificationTable::builtin()
            .records()
            .map(StateRecordPatch::from)
            .collect(),
    }
}
