//! Infrastructure implementations of repository traits

use crate::domain::repositories::{
    MediaLibrary, ProgressStore, RepositoryError, StageContentProvider, UserAdmin,
};
use crate::types::progress::{ProgressRecord, ScoreSubmission};
use crate::types::records::{LeaderEntry, MediaItem, StageEnvelope};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// File system implementation of StageContentProvider
///
/// Each stage is a `stage_<n>.json` file holding the dialogue JSON directly.
pub struct FileSystemStageProvider {
    base_path: PathBuf,
}

impl FileSystemStageProvider {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn get_stage_path(&self, stage_num: u32) -> PathBuf {
        self.base_path.join(format!("stage_{stage_num}.json"))
    }
}

#[async_trait]
impl StageContentProvider for FileSystemStageProvider {
    async fn fetch_stage(&self, stage_num: u32) -> Result<StageEnvelope, RepositoryError> {
        let path = self.get_stage_path(stage_num);

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(StageEnvelope::new(stage_num, content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RepositoryError::not_found(format!("stage {stage_num}")))
            }
            Err(e) => Err(RepositoryError::Unavailable {
                reason: format!("Failed to read stage file {}: {}", path.display(), e),
            }),
        }
    }

    async fn save_stage(&self, envelope: &StageEnvelope) -> Result<(), RepositoryError> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| RepositoryError::Unavailable {
                reason: format!("Failed to create stage directory: {e}"),
            })?;

        let path = self.get_stage_path(envelope.stage_num);
        tokio::fs::write(&path, &envelope.dialogue_json)
            .await
            .map_err(|e| RepositoryError::Unavailable {
                reason: format!("Failed to write stage file {}: {}", path.display(), e),
            })
    }
}

#[derive(Debug, Default)]
struct BackendData {
    stages: BTreeMap<u32, String>,
    users: BTreeMap<u64, LeaderEntry>,
    media: Vec<MediaItem>,
    next_user_id: u64,
}

impl BackendData {
    fn user_by_name(&mut self, username: &str) -> Option<&mut LeaderEntry> {
        self.users.values_mut().find(|u| u.username == username)
    }
}

/// In-memory backend implementing every collaborator, for testing and demos
///
/// Follows the game server's rules: a submission only replaces a player's
/// record when its score is higher, and stage JSON that does not parse is
/// refused.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: Mutex<BackendData>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stage's dialogue JSON without validation
    pub fn with_stage(self, stage_num: u32, dialogue_json: impl Into<String>) -> Self {
        self.data().stages.insert(stage_num, dialogue_json.into());
        self
    }

    fn data(&self) -> MutexGuard<'_, BackendData> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl StageContentProvider for InMemoryBackend {
    async fn fetch_stage(&self, stage_num: u32) -> Result<StageEnvelope, RepositoryError> {
        self.data()
            .stages
            .get(&stage_num)
            .map(|json| StageEnvelope::new(stage_num, json.clone()))
            .ok_or_else(|| RepositoryError::not_found(format!("stage {stage_num}")))
    }

    async fn save_stage(&self, envelope: &StageEnvelope) -> Result<(), RepositoryError> {
        if let Err(e) = serde_json::from_str::<serde_json::Value>(&envelope.dialogue_json) {
            return Err(RepositoryError::Rejected {
                status: 400,
                message: format!("invalid JSON: {e}"),
            });
        }
        self.data()
            .stages
            .insert(envelope.stage_num, envelope.dialogue_json.clone());
        log::debug!("Saved stage {}", envelope.stage_num);
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for InMemoryBackend {
    async fn get_progress(&self, username: &str) -> Result<ProgressRecord, RepositoryError> {
        self.data()
            .user_by_name(username)
            .map(|u| ProgressRecord::new(u.score, u.stage))
            .ok_or_else(|| RepositoryError::not_found(format!("user {username}")))
    }

    async fn submit_score(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<ProgressRecord, RepositoryError> {
        let mut data = self.data();
        if let Some(user) = data.user_by_name(&submission.username) {
            if submission.score > user.score {
                user.score = submission.score;
                user.stage = submission.stage;
                user.last_update = Utc::now();
            }
            return Ok(ProgressRecord::new(user.score, user.stage));
        }

        data.next_user_id += 1;
        let id = data.next_user_id;
        data.users.insert(
            id,
            LeaderEntry {
                id,
                username: submission.username.clone(),
                score: submission.score,
                stage: submission.stage,
                last_update: Utc::now(),
            },
        );
        log::debug!("Created user {} with id {id}", submission.username);
        Ok(submission.record())
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderEntry>, RepositoryError> {
        let mut entries: Vec<LeaderEntry> = self.data().users.values().cloned().collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        Ok(entries)
    }
}

#[async_trait]
impl UserAdmin for InMemoryBackend {
    async fn get_user(&self, id: u64) -> Result<LeaderEntry, RepositoryError> {
        self.data()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("user {id}")))
    }

    async fn delete_user(&self, id: u64) -> Result<(), RepositoryError> {
        self.data()
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(format!("user {id}")))
    }
}

#[async_trait]
impl MediaLibrary for InMemoryBackend {
    async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<MediaItem, RepositoryError> {
        let item = MediaItem {
            name: name.to_string(),
            url: format!("/media/{name}"),
        };
        log::debug!("Uploaded {name} ({} bytes)", bytes.len());
        let mut data = self.data();
        data.media.retain(|m| m.name != item.name);
        data.media.push(item.clone());
        Ok(item)
    }

    async fn list(&self) -> Result<Vec<MediaItem>, RepositoryError> {
        Ok(self.data().media.clone())
    }
}
