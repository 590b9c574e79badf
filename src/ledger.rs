//! Local shadow of the player's progress
//!
//! Score changes are applied here first and submitted afterwards; the server's
//! echo then overwrites the shadow. The reward ledger is purely local.

use crate::config::GameConfig;
use crate::types::progress::{ProgressRecord, RewardLedger};
use serde::{Deserialize, Serialize};

/// How a quiz answer was judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerOutcome {
    Correct,
    Wrong,
    /// The choice carries no `isCorrect` flag
    Neutral,
}

impl AnswerOutcome {
    pub fn from_flag(is_correct: Option<bool>) -> Self {
        match is_correct {
            Some(true) => Self::Correct,
            Some(false) => Self::Wrong,
            None => Self::Neutral,
        }
    }
}

/// What finishing a stage did to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageCompletion {
    /// The stage bonus was credited now
    pub credited: bool,
    /// The stage is beyond the previously highest completed stage
    pub newly_completed: bool,
    /// Record to submit to the progress store
    pub submission: ProgressRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProgressLedger {
    score: u32,
    highest_stage: u32,
    rewards: RewardLedger,
}

impl ProgressLedger {
    pub fn new(record: ProgressRecord, rewards: RewardLedger) -> Self {
        Self {
            score: record.score,
            highest_stage: record.stage,
            rewards,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn highest_stage(&self) -> u32 {
        self.highest_stage
    }

    pub fn rewards(&self) -> &RewardLedger {
        &self.rewards
    }

    /// Current record, as it would be submitted
    pub fn submission(&self) -> ProgressRecord {
        ProgressRecord::new(self.score, self.highest_stage)
    }

    /// Credit a quiz answer; returns the points added
    pub fn award_answer(&mut self, outcome: AnswerOutcome, config: &GameConfig) -> u32 {
        let points = match outcome {
            AnswerOutcome::Correct => config.answer_reward,
            AnswerOutcome::Wrong | AnswerOutcome::Neutral => 0,
        };
        self.score = self.score.saturating_add(points);
        points
    }

    /// Book the completion of `stage`
    ///
    /// The bonus is granted at most once per stage, whatever the replay count.
    pub fn complete_stage(&mut self, stage: u32, config: &GameConfig) -> StageCompletion {
        let newly_completed = stage > self.highest_stage;
        let mut credited = false;
        if newly_completed {
            if !self.rewards.is_taken(stage) {
                self.score = self.score.saturating_add(config.stage_reward);
                self.rewards.mark_taken(stage);
                credited = true;
                log::info!(
                    "Stage {stage} completed, +{} points",
                    config.stage_reward
                );
            } else {
                log::debug!("Stage {stage} completed again, reward already taken");
            }
            self.highest_stage = stage;
        }
        StageCompletion {
            credited,
            newly_completed,
            submission: self.submission(),
        }
    }

    /// Adopt the server's authoritative record
    pub fn reconcile(&mut self, server: ProgressRecord) {
        if server != self.submission() {
            log::debug!(
                "Reconciling progress: local {:?} -> server {:?}",
                self.submission(),
                server
            );
        }
        self.score = server.score;
        self.highest_stage = server.stage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_answer_adds_reward_others_add_nothing() {
        let config = GameConfig::default();
        let mut ledger = ProgressLedger::default();
        assert_eq!(ledger.award_answer(AnswerOutcome::Correct, &config), 50);
        assert_eq!(ledger.award_answer(AnswerOutcome::Wrong, &config), 0);
        assert_eq!(ledger.award_answer(AnswerOutcome::Neutral, &config), 0);
        assert_eq!(ledger.score(), 50);
    }

    #[test]
    fn stage_bonus_is_granted_once() {
        let config = GameConfig::default();
        let mut ledger = ProgressLedger::default();

        let first = ledger.complete_stage(1, &config);
        assert!(first.credited && first.newly_completed);
        assert_eq!(first.submission, ProgressRecord::new(100, 1));

        let replay = ledger.complete_stage(1, &config);
        assert!(!replay.credited && !replay.newly_completed);
        assert_eq!(replay.submission, ProgressRecord::new(100, 1));
    }

    #[test]
    fn taken_reward_advances_stage_without_credit() {
        let config = GameConfig::default();
        let rewards: RewardLedger = [2].into_iter().collect();
        let mut ledger = ProgressLedger::new(ProgressRecord::new(300, 1), rewards);

        let completion = ledger.complete_stage(2, &config);
        assert!(!completion.credited);
        assert!(completion.newly_completed);
        assert_eq!(completion.submission, ProgressRecord::new(300, 2));
    }

    #[test]
    fn earlier_stage_never_lowers_highest() {
        let config = GameConfig::default();
        let mut ledger = ProgressLedger::new(ProgressRecord::new(0, 3), RewardLedger::new());
        let completion = ledger.complete_stage(2, &config);
        assert!(!completion.credited);
        assert_eq!(ledger.highest_stage(), 3);
    }

    #[test]
    fn reconcile_adopts_server_values_and_keeps_rewards() {
        let config = GameConfig::default();
        let mut ledger = ProgressLedger::default();
        ledger.complete_stage(1, &config);
        ledger.reconcile(ProgressRecord::new(400, 2));
        assert_eq!(ledger.submission(), ProgressRecord::new(400, 2));
        assert!(ledger.rewards().is_taken(1));
    }
}
