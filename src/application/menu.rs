//! Menu model: progress summary, practice stage picker and leaderboard rows

use crate::config::GameConfig;
use crate::types::records::LeaderEntry;

/// Theory and practice progress derived from the highest completed stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSummary {
    pub theory_completed: u32,
    pub theory_total: u32,
    pub practice_completed: u32,
    pub practice_total: u32,
    pub practice_unlocked: bool,
}

impl ProgressSummary {
    pub fn from_stage(stage: u32, config: &GameConfig) -> Self {
        let theory_total = config.theory_stages;
        let practice_total = config.practice_stages();
        Self {
            theory_completed: stage.min(theory_total),
            theory_total,
            practice_completed: stage.saturating_sub(theory_total).min(practice_total),
            practice_total,
            practice_unlocked: stage >= theory_total,
        }
    }

    pub fn theory_percent(&self) -> f64 {
        percent(self.theory_completed, self.theory_total)
    }

    pub fn practice_percent(&self) -> f64 {
        percent(self.practice_completed, self.practice_total)
    }
}

fn percent(done: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(done) / f64::from(total) * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAvailability {
    /// Already finished, can be replayed
    Completed,
    Available,
    /// Theory stages must be finished first
    LockedTheory,
    /// Previous practice stage not finished
    Locked,
}

impl StageAvailability {
    pub fn is_playable(self) -> bool {
        matches!(self, Self::Completed | Self::Available)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeStage {
    pub stage_num: u32,
    pub name: String,
    pub availability: StageAvailability,
}

/// Practice stages with their availability for a player at `stage`
pub fn practice_stages(stage: u32, config: &GameConfig) -> Vec<PracticeStage> {
    let theory_done = stage >= config.theory_stages;
    config
        .practice_stage_names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let stage_num = config.practice_stage_num(index);
            let availability = if stage_num <= stage {
                StageAvailability::Completed
            } else if !theory_done {
                StageAvailability::LockedTheory
            } else if index == 0 || stage_num == stage + 1 {
                StageAvailability::Available
            } else {
                StageAvailability::Locked
            };
            PracticeStage {
                stage_num,
                name: name.clone(),
                availability,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub rank: usize,
    /// Medal for the top three, never on the viewer's own row
    pub medal: Option<&'static str>,
    pub username: String,
    pub score: u32,
    pub stage: u32,
    pub is_current_user: bool,
}

/// Rank leaderboard entries, in the order the store returned them
pub fn leaderboard_rows(entries: &[LeaderEntry], current_user: Option<&str>) -> Vec<LeaderboardRow> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let rank = index + 1;
            let is_current_user = current_user == Some(entry.username.as_str());
            let medal = match rank {
                _ if is_current_user => None,
                1 => Some("🥇"),
                2 => Some("🥈"),
                3 => Some("🥉"),
                _ => None,
            };
            LeaderboardRow {
                rank,
                medal,
                username: entry.username.clone(),
                score: entry.score,
                stage: entry.stage,
                is_current_user,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(id: u64, username: &str, score: u32) -> LeaderEntry {
        LeaderEntry {
            id,
            username: username.to_string(),
            score,
            stage: 1,
            last_update: Utc::now(),
        }
    }

    #[test]
    fn summary_splits_theory_and_practice() {
        let config = GameConfig::default();

        let fresh = ProgressSummary::from_stage(0, &config);
        assert_eq!(fresh.theory_completed, 0);
        assert!(!fresh.practice_unlocked);
        assert_eq!(fresh.theory_percent(), 0.0);

        let midway = ProgressSummary::from_stage(3, &config);
        assert_eq!(midway.theory_completed, 1);
        assert_eq!(midway.practice_completed, 2);
        assert!(midway.practice_unlocked);
        assert_eq!(midway.theory_percent(), 100.0);
        assert_eq!(midway.practice_percent(), 40.0);

        let beyond = ProgressSummary::from_stage(99, &config);
        assert_eq!(beyond.practice_completed, 5);
    }

    #[test]
    fn practice_is_locked_until_theory_is_done() {
        let stages = practice_stages(0, &GameConfig::default());
        assert_eq!(stages.len(), 5);
        assert!(stages
            .iter()
            .all(|s| s.availability == StageAvailability::LockedTheory));
    }

    #[test]
    fn practice_unlocks_one_stage_at_a_time() {
        let config = GameConfig::default();

        let after_theory = practice_stages(1, &config);
        assert_eq!(after_theory[0].stage_num, 2);
        assert_eq!(after_theory[0].availability, StageAvailability::Available);
        assert_eq!(after_theory[1].availability, StageAvailability::Locked);

        let after_two = practice_stages(3, &config);
        let availability: Vec<_> = after_two.iter().map(|s| s.availability).collect();
        assert_eq!(
            availability,
            [
                StageAvailability::Completed,
                StageAvailability::Completed,
                StageAvailability::Available,
                StageAvailability::Locked,
                StageAvailability::Locked,
            ]
        );
        assert!(after_two[0].availability.is_playable());
        assert!(!after_two[3].availability.is_playable());
    }

    #[test]
    fn leaderboard_marks_medals_and_current_user() {
        let entries = [
            entry(1, "bob", 300),
            entry(2, "ann", 200),
            entry(3, "cid", 100),
            entry(4, "dee", 50),
        ];
        let rows = leaderboard_rows(&entries, Some("ann"));

        assert_eq!(rows[0].medal, Some("🥇"));
        assert_eq!(rows[1].medal, None);
        assert!(rows[1].is_current_user);
        assert_eq!(rows[2].medal, Some("🥉"));
        assert_eq!(rows[3].medal, None);
        assert_eq!(rows[3].rank, 4);
    }
}
