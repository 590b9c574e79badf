//! Records exchanged with the backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outer envelope of a stage; `dialogue_json` is itself JSON text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageEnvelope {
    pub stage_num: u32,
    pub dialogue_json: String,
}

impl StageEnvelope {
    pub fn new(stage_num: u32, dialogue_json: impl Into<String>) -> Self {
        Self {
            stage_num,
            dialogue_json: dialogue_json.into(),
        }
    }

    /// Decode an envelope as returned by `GET /stage/{n}`
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// One leaderboard row; also the user record of the admin console
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaderEntry {
    pub id: u64,
    pub username: String,
    pub score: u32,
    pub stage: u32,
    pub last_update: DateTime<Utc>,
}

/// An uploaded media file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaItem {
    pub name: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_keeps_inner_json_as_text() {
        let envelope =
            StageEnvelope::from_json(r#"{"stage_num": 2, "dialogue_json": "{\"questions\":[]}"}"#)
                .unwrap();
        assert_eq!(envelope.stage_num, 2);
        assert_eq!(envelope.dialogue_json, r#"{"questions":[]}"#);
    }

    #[test]
    fn leader_entry_reads_iso_timestamp() {
        let entry: LeaderEntry = serde_json::from_str(
            r#"{"id":1,"username":"ann","score":150,"stage":1,"last_update":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(entry.username, "ann");
        assert_eq!(entry.last_update.timestamp(), 1_714_557_600);
    }
}
