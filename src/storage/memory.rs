//! In-memory state store, used when no store path is configured

use super::{StateStore, StoredState};
use crate::utils::error::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

/// Keeps the last saved document in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<Option<StoredState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a document
    pub fn with_state(state: StoredState) -> Self {
        Self {
            state: RwLock::new(Some(state)),
        }
    }

    /// Last saved document
    pub fn current(&self) -> Option<StoredState> {
        self.state.read().clone()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self) -> Result<Option<StoredState>> {
        Ok(self.current())
    }

    async fn save(&self, state: &StoredState) -> Result<()> {
        *self.state.write() = Some(state.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
