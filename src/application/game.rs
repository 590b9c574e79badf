//! Game session - the player-facing entry point
//!
//! Wraps the pure runtime: feeds it events, then carries out the effects it
//! requests against the progress store and the client store.

use crate::config::GameConfig;
use crate::domain::errors::{GameError, error_chain};
use crate::domain::repositories::{ProgressStore, StageContentProvider};
use crate::domain::value_objects::PlayerName;
use crate::ledger::ProgressLedger;
use crate::loader::{self, LoadMode};
use crate::runtime::{self, debug::DebugConfig};
use crate::storage::{self, ClientStore};
use crate::types::{
    event::Event,
    graph::StageGraph,
    output::{Effect, Output},
    progress::{ProgressRecord, RewardLedger, ScoreSubmission},
    state::State,
};
use std::sync::Arc;

/// Status shown when a score could not be saved
pub const SUBMIT_FAILED_STATUS: &str = "Progress could not be saved, check your connection";

struct ActiveStage {
    graph: StageGraph,
    state: State,
}

/// One player's game: registration, progress and the stage being played
pub struct GameSession {
    stages: Arc<dyn StageContentProvider>,
    progress_store: Arc<dyn ProgressStore>,
    client: Arc<dyn ClientStore>,
    config: GameConfig,
    debug: DebugConfig,
    player: Option<PlayerName>,
    ledger: ProgressLedger,
    active: Option<ActiveStage>,
}

impl GameSession {
    pub fn new(
        stages: Arc<dyn StageContentProvider>,
        progress_store: Arc<dyn ProgressStore>,
        client: Arc<dyn ClientStore>,
        config: GameConfig,
    ) -> Self {
        Self {
            stages,
            progress_store,
            client,
            config,
            debug: DebugConfig::default(),
            player: None,
            ledger: ProgressLedger::default(),
            active: None,
        }
    }

    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> Option<&PlayerName> {
        self.player.as_ref()
    }

    /// Current score and highest completed stage
    pub fn progress(&self) -> ProgressRecord {
        self.ledger.submission()
    }

    pub fn ledger(&self) -> &ProgressLedger {
        &self.ledger
    }

    /// Runtime state of the stage being played
    pub fn state(&self) -> Option<&State> {
        self.active.as_ref().map(|a| &a.state)
    }

    pub fn in_stage(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_typing(&self) -> bool {
        self.state().is_some_and(|s| s.typewriter.is_typing())
    }

    /// Register a new player and create their record on the server
    ///
    /// A blank name is rejected without touching any state.
    pub async fn register(&mut self, name: &str) -> Result<(), GameError> {
        let name = PlayerName::parse(name)?;
        storage::save_player_name(self.client.as_ref(), name.as_str()).await?;
        let rewards = storage::load_rewards(self.client.as_ref(), name.as_str()).await?;

        log::info!("Registered player {name}");
        self.ledger = ProgressLedger::new(ProgressRecord::default(), rewards);
        self.player = Some(name);

        if let Err(e) = self.submit(ProgressRecord::default()).await {
            log::warn!("Initial score submission failed: {}", error_chain(&e));
        }
        Ok(())
    }

    /// Restore the registered player from the client store
    ///
    /// Returns the player, or `None` when nobody registered yet. Server
    /// failures are logged and the local values kept.
    pub async fn restore(&mut self) -> Result<Option<PlayerName>, GameError> {
        let Some(stored) = storage::load_player_name(self.client.as_ref()).await? else {
            return Ok(None);
        };
        let name = PlayerName::parse(&stored)?;
        let rewards = storage::load_rewards(self.client.as_ref(), name.as_str()).await?;

        let record = match self.progress_store.get_progress(name.as_str()).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                log::info!("No server progress for {name} yet");
                ProgressRecord::default()
            }
            Err(e) => {
                log::warn!("Could not fetch progress for {name}: {e}");
                self.ledger.submission()
            }
        };

        log::info!(
            "Restored player {name}: score {}, stage {}, {} rewards taken",
            record.score,
            record.stage,
            rewards.len()
        );
        self.ledger = ProgressLedger::new(record, rewards);
        self.player = Some(name.clone());
        Ok(Some(name))
    }

    /// Load a stage and show its first node
    ///
    /// A failed load leaves no partial stage behind.
    pub async fn start_stage(&mut self, stage_num: u32) -> Result<Output, GameError> {
        let player = self.player.clone().ok_or(GameError::NoPlayer)?;
        self.active = None;

        let graph = loader::load_stage(
            self.stages.as_ref(),
            stage_num,
            LoadMode::Player,
            &self.config,
        )
        .await?;

        let state = State::new(
            stage_num,
            &graph,
            self.ledger.clone(),
            player.as_str(),
            self.config.clone(),
        );
        self.active = Some(ActiveStage { graph, state });
        log::info!("Starting stage {stage_num} for {player}");
        self.handle(Event::Start).await
    }

    /// Feed one event to the stage and carry out the effects it requests
    pub async fn handle(&mut self, event: Event) -> Result<Output, GameError> {
        let active = self.active.as_mut().ok_or(GameError::NoActiveStage)?;
        let state = std::mem::take(&mut active.state);
        let (state, mut output) =
            runtime::step_with_debug(state, &active.graph, event, &self.debug);
        active.state = state;
        self.ledger = active.state.progress.clone();

        for effect in output.effects.clone() {
            self.run_effect(effect, &mut output).await;
        }
        Ok(output)
    }

    /// Reveal the rest of the current text at once
    pub async fn skip(&mut self) -> Result<Output, GameError> {
        self.handle(Event::Skip).await
    }

    pub async fn choose(&mut self, index: usize) -> Result<Output, GameError> {
        self.handle(Event::Choose { index }).await
    }

    async fn run_effect(&mut self, effect: Effect, output: &mut Output) {
        match effect {
            Effect::SubmitScore(record) => {
                if let Err(e) = self.submit(record).await {
                    log::warn!("Score submission failed: {}", error_chain(&e));
                    output.status = Some(SUBMIT_FAILED_STATUS.to_string());
                }
            }
            Effect::PersistRewards(stages) => {
                let Some(player) = &self.player else { return };
                log::debug!("Persisting rewards {stages:?} for {player}");
                let rewards: RewardLedger = stages.into_iter().collect();
                if let Err(e) =
                    storage::save_rewards(self.client.as_ref(), player.as_str(), &rewards).await
                {
                    let cause = error_chain(&e);
                    log::error!("Could not persist rewards: {cause}");
                    output.status = Some(format!("Could not save rewards: {cause}"));
                }
            }
            Effect::RevealPrize => {
                log::info!("Last stage completed, revealing the prize");
                output.prize = Some(self.config.prize_link.clone());
            }
            Effect::ReturnToMenu => {
                log::debug!("Returning to menu");
                self.active = None;
            }
        }
    }

    /// Submit a record and adopt the server's echo
    async fn submit(&mut self, record: ProgressRecord) -> Result<(), GameError> {
        let player = self.player.as_ref().ok_or(GameError::NoPlayer)?;
        let submission = ScoreSubmission::new(player.as_str(), record);
        let echo = self
            .progress_store
            .submit_score(&submission)
            .await
            .map_err(GameError::Progress)?;

        self.ledger.reconcile(echo);
        if let Some(active) = self.active.as_mut() {
            active.state.progress.reconcile(echo);
        }
        Ok(())
    }
}
