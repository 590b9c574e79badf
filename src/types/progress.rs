//! Player progress and the reward ledger

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Score and highest completed stage of one player
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProgressRecord {
    pub score: u32,
    pub stage: u32,
}

impl ProgressRecord {
    pub fn new(score: u32, stage: u32) -> Self {
        Self { score, stage }
    }
}

/// Body of a score submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreSubmission {
    pub username: String,
    pub score: u32,
    pub stage: u32,
}

impl ScoreSubmission {
    pub fn new(username: impl Into<String>, record: ProgressRecord) -> Self {
        Self {
            username: username.into(),
            score: record.score,
            stage: record.stage,
        }
    }

    pub fn record(&self) -> ProgressRecord {
        ProgressRecord::new(self.score, self.stage)
    }
}

/// Stages whose completion bonus was already granted
///
/// Entries are only ever added. Serialized as a JSON array of integers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct RewardLedger {
    stages: BTreeSet<u32>,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_taken(&self, stage: u32) -> bool {
        self.stages.contains(&stage)
    }

    /// Mark a stage as rewarded; returns false if it already was
    pub fn mark_taken(&mut self, stage: u32) -> bool {
        self.stages.insert(stage)
    }

    pub fn stages(&self) -> impl Iterator<Item = u32> + '_ {
        self.stages.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl FromIterator<u32> for RewardLedger {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            stages: iter.into_iter().collect(),
        }
    }
}
