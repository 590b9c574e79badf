//! Admin console - stage editing, users and media

use crate::config::GameConfig;
use crate::domain::errors::AdminError;
use crate::domain::repositories::{
    MediaLibrary, ProgressStore, RepositoryError, StageContentProvider, UserAdmin,
};
use crate::loader::{self, EditorDocument, LoadError};
use crate::types::records::{LeaderEntry, MediaItem, StageEnvelope};
use std::sync::Arc;

/// One entry of the stage picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageEntry {
    pub stage_num: u32,
    pub name: String,
}

pub struct AdminConsole {
    stages: Arc<dyn StageContentProvider>,
    progress: Arc<dyn ProgressStore>,
    users: Arc<dyn UserAdmin>,
    media: Arc<dyn MediaLibrary>,
    config: GameConfig,
}

impl AdminConsole {
    pub fn new(
        stages: Arc<dyn StageContentProvider>,
        progress: Arc<dyn ProgressStore>,
        users: Arc<dyn UserAdmin>,
        media: Arc<dyn MediaLibrary>,
        config: GameConfig,
    ) -> Self {
        Self {
            stages,
            progress,
            users,
            media,
            config,
        }
    }

    /// Every stage number with its display name
    pub fn stage_catalog(&self) -> Vec<StageEntry> {
        (1..=self.config.last_stage())
            .filter_map(|stage_num| {
                self.config
                    .stage_name(stage_num)
                    .map(|name| StageEntry { stage_num, name })
            })
            .collect()
    }

    /// Open a stage in the editor; unknown stages start from a skeleton
    pub async fn open_stage(&self, stage_num: u32) -> Result<EditorDocument, AdminError> {
        match loader::open_for_edit(self.stages.as_ref(), stage_num).await {
            Ok(document) => Ok(document),
            Err(LoadError::Provider { source, .. }) => Err(source.into()),
            Err(LoadError::Schema(e) | LoadError::Envelope(e)) => Err(e.into()),
            Err(LoadError::StageMissing { stage }) => {
                Err(RepositoryError::not_found(format!("stage {stage}")).into())
            }
        }
    }

    /// Save editor text as the stage's dialogue JSON
    ///
    /// Text that is not valid JSON is refused before anything is sent.
    pub async fn save_stage(&self, stage_num: u32, text: &str) -> Result<(), AdminError> {
        serde_json::from_str::<serde_json::Value>(text)?;
        if let Ok(graph) = loader::parse_stage(text) {
            for warning in loader::check::check(&graph).warnings {
                log::warn!("Saving stage {stage_num} with warning: {warning}");
            }
        }
        self.stages
            .save_stage(&StageEnvelope::new(stage_num, text))
            .await?;
        log::info!("Stage {stage_num} saved");
        Ok(())
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderEntry>, AdminError> {
        Ok(self.progress.leaderboard().await?)
    }

    pub async fn user(&self, id: u64) -> Result<LeaderEntry, AdminError> {
        self.users.get_user(id).await.map_err(|e| user_error(id, e))
    }

    pub async fn delete_user(&self, id: u64) -> Result<(), AdminError> {
        self.users
            .delete_user(id)
            .await
            .map_err(|e| user_error(id, e))?;
        log::info!("Deleted user {id}");
        Ok(())
    }

    pub async fn upload_media(&self, name: &str, bytes: Vec<u8>) -> Result<MediaItem, AdminError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AdminError::EmptyMediaName);
        }
        Ok(self.media.upload(name, bytes).await?)
    }

    pub async fn media(&self) -> Result<Vec<MediaItem>, AdminError> {
        Ok(self.media.list().await?)
    }
}

fn user_error(id: u64, error: RepositoryError) -> AdminError {
    if error.is_not_found() {
        AdminError::UserNotFound { id }
    } else {
        error.into()
    }
}
