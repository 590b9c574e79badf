//! Core types for the vnquiz library
//!
//! - Graph: the typed stage content the loader produces
//! - State: the session context of one stage run
//! - Event: user and clock input to the runtime
//! - Output: render description and side effects of a step
//! - Progress/records: what is exchanged with the backend

pub mod event;
pub mod graph;
pub mod output;
pub mod progress;
pub mod records;
pub mod state;

pub use event::Event;
pub use graph::{CharacterDef, Choice, Node, NodeKind, StageGraph};
pub use output::{Button, ButtonStyle, Effect, OverlayState, Output, TextFrame};
pub use progress::{ProgressRecord, RewardLedger, ScoreSubmission};
pub use records::{LeaderEntry, MediaItem, StageEnvelope};
pub use state::{Action, Affordance, Phase, State};
