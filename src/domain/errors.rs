//! Domain errors - what the game session and the admin console report

use crate::domain::repositories::RepositoryError;
use crate::loader::LoadError;
use crate::storage::StorageError;
use std::error::Error as StdError;
use thiserror::Error;

/// Render an error followed by its sources, `outer: inner: ...`
///
/// Messages never repeat their source, so logs use this to show the cause.
pub fn error_chain(error: &dyn StdError) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

/// Errors of the player-facing game session
#[derive(Debug, Error)]
pub enum GameError {
    #[error("please enter a name")]
    EmptyName,

    #[error("no player registered")]
    NoPlayer,

    #[error("no stage is being played")]
    NoActiveStage,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("progress store error")]
    Progress(#[source] RepositoryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors of the admin console
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("invalid dialogue JSON")]
    InvalidJson(#[from] serde_json::Error),

    #[error("user {id} not found")]
    UserNotFound { id: u64 },

    #[error("media file name must not be empty")]
    EmptyMediaName,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
