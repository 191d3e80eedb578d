//! JSON document store on the local file system

use super::{StateStore, StoredState};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Stores the state document as pretty-printed JSON
///
/// Writes go to a sibling temporary file which is then renamed over the
/// document, so readers see either the old or the new version.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes writers
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<Option<StoredState>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No state document at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(GatewayError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let state: StoredState = serde_json::from_str(&content).map_err(|e| {
            GatewayError::Storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        info!(
            "Loaded {} providers and {} health samples from {}",
            state.providers.len(),
            state.health_checks.len(),
            self.path.display()
        );
        Ok(Some(state))
    }

    async fn save(&self, state: &StoredState) -> Result<()> {
        let body = serde_json::to_vec_pretty(state)?;

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                GatewayError::Storage(format!("Failed to create directory: {}", e))
            })?;
        }

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| GatewayError::Storage(format!("Failed to create file: {}", e)))?;
        file.write_all(&body)
            .await
            .map_err(|e| GatewayError::Storage(format!("Failed to write file: {}", e)))?;
        file.sync_all()
            .await
            .map_err(|e| GatewayError::Storage(format!("Failed to sync file: {}", e)))?;
        drop(file);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| GatewayError::Storage(format!("Failed to replace document: {}", e)))?;

        debug!(
            "Saved {} providers to {}",
            state.providers.len(),
            self.path.display()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
