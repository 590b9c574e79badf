//! Runtime state representation
//!
//! `State` is the whole session context of one stage run. It is passed into
//! `runtime::step` and handed back with every transition.

use crate::config::GameConfig;
use crate::ledger::ProgressLedger;
use crate::registry::CharacterRegistry;
use crate::types::graph::StageGraph;
use crate::typewriter::Typewriter;
use serde::{Deserialize, Serialize};

/// Where the dialogue currently is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Phase {
    /// Stage loaded, not started
    #[default]
    Idle,
    /// Revealing the text of node `i`
    AtNode(usize),
    /// Revealing the response to a quiz answer given on node `node`
    Feedback { node: usize, next: i64 },
    /// Buttons for node `i` are shown
    AwaitingChoice(usize),
    /// Stage left; further events are ignored
    Ended,
}

/// What a button does when activated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
    /// Authored line choice
    Goto(i64),
    /// Synthesized continue on a node without choices
    Continue(usize),
    /// Quiz answer; index into the node's choices
    Answer(usize),
    /// "Next" after a quiz response
    AfterAnswer(i64),
    /// Finish the stage from an End node
    Finish,
}

/// A button currently offered to the player
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Affordance {
    pub label: String,
    pub action: Action,
}

/// Runtime state of one stage run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct State {
    /// Stage number being played
    pub stage: u32,
    pub phase: Phase,
    pub typewriter: Typewriter,
    pub registry: CharacterRegistry,
    pub progress: ProgressLedger,
    /// Buttons shown in `AwaitingChoice`, in display order
    pub pending: Vec<Affordance>,
    /// Substituted for `{{player_name}}`
    pub player_name: String,
    pub config: GameConfig,
}

impl State {
    /// Fresh state for a stage, with the cast seeded from the graph
    ///
    /// A blank player name falls back to `config.default_player_name`.
    pub fn new(
        stage: u32,
        graph: &StageGraph,
        progress: ProgressLedger,
        player_name: impl Into<String>,
        config: GameConfig,
    ) -> Self {
        let mut player_name = player_name.into();
        if player_name.trim().is_empty() {
            player_name = config.default_player_name.clone();
        }
        Self {
            stage,
            phase: Phase::Idle,
            typewriter: Typewriter::new(),
            registry: CharacterRegistry::initialize(&graph.characters),
            progress,
            pending: Vec::new(),
            player_name,
            config,
        }
    }

    /// Index of the current node, if any
    pub fn current_node(&self) -> Option<usize> {
        match self.phase {
            Phase::AtNode(i) | Phase::AwaitingChoice(i) => Some(i),
            Phase::Feedback { node, .. } => Some(node),
            Phase::Idle | Phase::Ended => None,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn is_awaiting_choice(&self) -> bool {
        matches!(self.phase, Phase::AwaitingChoice(_))
    }

    /// Labels of the offered buttons
    pub fn choice_labels(&self) -> Vec<&str> {
        self.pending.iter().map(|a| a.label.as_str()).collect()
    }
}
