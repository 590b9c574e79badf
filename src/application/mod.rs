//! Application layer - Use cases and orchestration
//!
//! This layer drives the runtime through the domain traits. It depends on
//! domain but not on infrastructure.

pub mod admin;
pub mod game;
pub mod menu;

pub use admin::{AdminConsole, StageEntry};
pub use game::GameSession;
pub use menu::{
    LeaderboardRow, PracticeStage, ProgressSummary, StageAvailability, leaderboard_rows,
    practice_stages,
};
