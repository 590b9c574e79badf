//! Client-side key/value storage
//!
//! The player's name and the per-player reward ledger live in a small
//! string store, the way a browser keeps them in local storage. Values are
//! JSON text.

use crate::types::progress::RewardLedger;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key of the registered player's name
pub const USER_NAME_KEY: &str = "userName";

/// Key of a player's reward ledger
pub fn rewards_key(player: &str) -> String {
    format!("rewardedStages:{player}")
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt storage file")]
    Corrupt(#[from] serde_json::Error),
}

/// String key/value store kept on the player's machine
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Registered player name, if any
pub async fn load_player_name(store: &dyn ClientStore) -> Result<Option<String>, StorageError> {
    Ok(store
        .get(USER_NAME_KEY)
        .await?
        .filter(|name| !name.trim().is_empty()))
}

pub async fn save_player_name(store: &dyn ClientStore, name: &str) -> Result<(), StorageError> {
    store.set(USER_NAME_KEY, name).await
}

/// A player's reward ledger; a missing or unreadable entry is an empty ledger
pub async fn load_rewards(
    store: &dyn ClientStore,
    player: &str,
) -> Result<RewardLedger, StorageError> {
    let key = rewards_key(player);
    let Some(json) = store.get(&key).await? else {
        return Ok(RewardLedger::new());
    };
    match RewardLedger::from_json(&json) {
        Ok(ledger) => Ok(ledger),
        Err(e) => {
            log::warn!("Ignoring unreadable reward ledger {key}: {e}");
            Ok(RewardLedger::new())
        }
    }
}

pub async fn save_rewards(
    store: &dyn ClientStore,
    player: &str,
    rewards: &RewardLedger,
) -> Result<(), StorageError> {
    store.set(&rewards_key(player), &rewards.to_json()).await
}

/// Volatile store, used by tests and one-off sessions
#[derive(Debug, Default)]
pub struct MemoryClientStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ClientStore for MemoryClientStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store persisted as one pretty-printed JSON object on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[async_trait]
impl ClientStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&entries)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| StorageError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_load_restores_rewards() {
        let store = MemoryClientStore::new();
        let rewards: RewardLedger = [1, 3].into_iter().collect();

        save_rewards(&store, "Ann", &rewards).await.unwrap();

        assert_eq!(load_rewards(&store, "Ann").await.unwrap(), rewards);
        assert_eq!(
            store.get("rewardedStages:Ann").await.unwrap().as_deref(),
            Some("[1,3]")
        );
        // Ledgers are per player
        assert!(load_rewards(&store, "Bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_invalid_rewards_returns_empty_ledger() {
        let store = MemoryClientStore::new();
        store.set(&rewards_key("Ann"), "invalid json data").await.unwrap();
        assert!(load_rewards(&store, "Ann").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_player_name_counts_as_unregistered() {
        let store = MemoryClientStore::new();
        assert_eq!(load_player_name(&store).await.unwrap(), None);

        save_player_name(&store, "  ").await.unwrap();
        assert_eq!(load_player_name(&store).await.unwrap(), None);

        save_player_name(&store, "Ann").await.unwrap();
        assert_eq!(load_player_name(&store).await.unwrap().as_deref(), Some("Ann"));
    }

    #[tokio::test]
    async fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.json");

        let store = JsonFileStore::new(&path);
        assert_eq!(store.get(USER_NAME_KEY).await.unwrap(), None);
        save_player_name(&store, "Ann").await.unwrap();
        save_rewards(&store, "Ann", &[2].into_iter().collect())
            .await
            .unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(load_player_name(&reopened).await.unwrap().as_deref(), Some("Ann"));
        assert!(load_rewards(&reopened, "Ann").await.unwrap().is_taken(2));
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get(USER_NAME_KEY).await,
            Err(StorageError::Corrupt(_))
        ));
    }
}
