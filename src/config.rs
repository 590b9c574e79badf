//! Game configuration
//!
//! Every field has a default, so a partial JSON file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Points credited for a correct quiz answer.
pub const ANSWER_REWARD: u32 = 50;
/// One-time bonus for finishing a stage for the first time.
pub const STAGE_REWARD: u32 = 100;
/// Typing interval used when a node does not set `speed`.
pub const DEFAULT_SPEED_MS: u64 = 30;

/// Tunables for scoring, stage layout and presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub answer_reward: u32,
    pub stage_reward: u32,
    pub default_speed_ms: u64,
    /// Number of theory stages; they come first (stage 1..=theory_stages)
    pub theory_stages: u32,
    /// Display names of the practice stages, in play order
    pub practice_stage_names: Vec<String>,
    /// Link revealed after the last stage is completed for the first time
    pub prize_link: String,
    /// Speaker of the malformed-content fallback node, when the stage defines it
    pub narrator: Option<String>,
    /// Name substituted for `{{player_name}}` before registration
    pub default_player_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            answer_reward: ANSWER_REWARD,
            stage_reward: STAGE_REWARD,
            default_speed_ms: DEFAULT_SPEED_MS,
            theory_stages: 1,
            practice_stage_names: vec![
                "Sociology of labour".to_string(),
                "Production and society".to_string(),
                "Social movements".to_string(),
                "Urbanisation".to_string(),
                "Sociology of organisations".to_string(),
            ],
            prize_link: "https://example.com/your-secret-prize-link".to_string(),
            narrator: None,
            default_player_name: "Player".to_string(),
        }
    }
}

impl GameConfig {
    pub fn practice_stages(&self) -> u32 {
        self.practice_stage_names.len() as u32
    }

    /// Highest stage number; finishing it reveals the prize
    pub fn last_stage(&self) -> u32 {
        self.theory_stages + self.practice_stages()
    }

    /// Stage number of the n-th (0-based) practice stage
    pub fn practice_stage_num(&self, index: usize) -> u32 {
        self.theory_stages + index as u32 + 1
    }

    /// Human readable name for a stage number, as shown in the admin catalog
    pub fn stage_name(&self, stage_num: u32) -> Option<String> {
        if stage_num == 0 || stage_num > self.last_stage() {
            return None;
        }
        if stage_num <= self.theory_stages {
            return Some(if self.theory_stages == 1 {
                "Theory".to_string()
            } else {
                format!("Theory {stage_num}")
            });
        }
        let practice = stage_num - self.theory_stages;
        Some(format!("Practice {practice}"))
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            anyhow::anyhow!("failed to read config file {}: {e}", path.display())
        })?;
        let config = Self::from_json(&content)?;
        log::info!(
            "Loaded config from {} ({} stages)",
            path.display(),
            config.last_stage()
        );
        Ok(config)
    }
}
