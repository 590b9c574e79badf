//! Domain repository traits - the backend services the engine talks to
//!
//! These traits define the contracts only. HTTP framing, databases and file
//! storage are left to the implementations.

use crate::types::{
    progress::{ProgressRecord, ScoreSubmission},
    records::{LeaderEntry, MediaItem, StageEnvelope},
};
use async_trait::async_trait;

/// Stage content by stage number (`GET /stage/{n}`, `POST /stage/save/`)
#[async_trait]
pub trait StageContentProvider: Send + Sync {
    /// Fetch a stage envelope; `NotFound` when the stage has no record
    async fn fetch_stage(&self, stage_num: u32) -> Result<StageEnvelope, RepositoryError>;

    /// Create or replace a stage's dialogue JSON
    async fn save_stage(&self, envelope: &StageEnvelope) -> Result<(), RepositoryError>;
}

/// Player progress (`GET /get-progress/`, `POST /submit-score/`, `GET /leaderboard/`)
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn get_progress(&self, username: &str) -> Result<ProgressRecord, RepositoryError>;

    /// Submit a score; returns the authoritative record the server kept
    async fn submit_score(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<ProgressRecord, RepositoryError>;

    /// All players, highest score first
    async fn leaderboard(&self) -> Result<Vec<LeaderEntry>, RepositoryError>;
}

/// User administration (`GET /users/{id}`, `DELETE /users/{id}`)
#[async_trait]
pub trait UserAdmin: Send + Sync {
    async fn get_user(&self, id: u64) -> Result<LeaderEntry, RepositoryError>;

    async fn delete_user(&self, id: u64) -> Result<(), RepositoryError>;
}

/// Uploaded media (`POST /uploadfile/`, `GET /media/list/`)
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<MediaItem, RepositoryError>;

    async fn list(&self) -> Result<Vec<MediaItem>, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("invalid response: {message}")]
    Decode { message: String },

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("repository unavailable: {reason}")]
    Unavailable { reason: String },
}

impl RepositoryError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Wrap a transport failure, keeping it as the error source
    pub fn network(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode {
            message: error.to_string(),
        }
    }
}
