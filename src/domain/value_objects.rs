//! Domain value objects - Immutable objects that describe aspects of the domain

use crate::domain::errors::GameError;
use serde::{Deserialize, Serialize};

/// A registered player's display name; never blank
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    /// Trim and validate a name typed by the player
    pub fn parse(input: &str) -> Result<Self, GameError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(GameError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
