use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local persistent store holding the user's exchange credentials and
/// the identifiers of contracts being tracked. Read-only from the
/// reconciliation core's perspective; the wallet writes it elsewhere.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn tracked_contract_ids(&self) -> AppResult<Vec<String>>;
    async fn api_key(&self) -> AppResult<String>;
    async fn signature_key(&self) -> AppResult<Option<String>>;
}

#[derive(Deserialize)]
struct StoreFile {
    #[serde(default)]
    contracts: Vec<String>,
    api_key: String,
    #[serde(default)]
    signature_key: Option<String>,
}

/// JSON-file backed store.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn load(&self) -> AppResult<StoreFile> {
        let raw = fs::read(&self.path).await.map_err(|e| {
            AppError::Store(format!("read {}: {}", self.path.display(), e))
        })?;
        serde_json::from_slice(&raw)
            .map_err(|e| AppError::Store(format!("parse {}: {}", self.path.display(), e)))
    }
}

#[async_trait]
impl CredentialStore for FileStore {
    async fn tracked_contract_ids(&self) -> AppResult<Vec<String>> {
        Ok(self.load().await?.contracts)
    }

    async fn api_key(&self) -> AppResult<String> {
        Ok(self.load().await?.api_key)
    }

    async fn signature_key(&self) -> AppResult<Option<String>> {
        Ok(self.load().await?.signature_key)
    }
}
