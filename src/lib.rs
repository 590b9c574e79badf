//! # vnquiz
//!
//! A visual-novel quiz engine: stages are dialogue graphs of lines, quizzes and
//! end nodes, revealed with a typewriter and scored against a progress store.
//!
//! The core is a pure state machine. `runtime::step` takes the session state,
//! the stage graph and one event, and returns the new state plus an `Output`
//! describing what to render and which side effects to run. The application
//! layer (`GameSession`, `AdminConsole`) carries those effects out against the
//! collaborator traits in `domain::repositories`.
//!
//! ## Quick Start
//!
//! ```rust
//! use vnquiz::{Event, GameConfig, ProgressLedger, State, loader, runtime};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = loader::parse_stage(
//!     r#"{"questions": [{"character": "Guide", "text": "Hello!", "isEnd": true}]}"#,
//! )?;
//! let state = State::new(1, &graph, ProgressLedger::default(), "Ann", GameConfig::default());
//!
//! let (state, output) = runtime::step(state, &graph, Event::Start);
//! assert_eq!(output.nameplate.as_deref(), Some("Guide"));
//!
//! // Reveal the whole line, then press "Finish stage"
//! let (state, _) = runtime::step(state, &graph, Event::Skip);
//! assert_eq!(state.choice_labels(), vec![runtime::FINISH_LABEL]);
//! let (state, output) = runtime::step(state, &graph, Event::Choose { index: 0 });
//!
//! assert!(output.returns_to_menu());
//! assert_eq!(state.progress.score(), 100);
//! # Ok(())
//! # }
//! ```
//!
//! ## Playing against a backend
//!
//! ```rust
//! use std::sync::Arc;
//! use vnquiz::{Event, GameConfig, GameSession, InMemoryBackend, MemoryClientStore};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(InMemoryBackend::new().with_stage(
//!     1,
//!     r#"{"questions": [{"text": "Welcome, {{player_name}}!", "isEnd": true}]}"#,
//! ));
//! let client = Arc::new(MemoryClientStore::new());
//! let mut game = GameSession::new(backend.clone(), backend, client, GameConfig::default());
//!
//! game.register("Ann").await?;
//! game.start_stage(1).await?;
//! let output = game.handle(Event::Skip).await?;
//! assert_eq!(output.text.map(|t| t.shown).as_deref(), Some("Welcome, Ann!"));
//!
//! game.choose(0).await?;
//! assert_eq!(game.progress().stage, 1);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ledger;
pub mod loader;
pub mod registry;
pub mod runtime;
pub mod storage;
pub mod types;
pub mod typewriter;

pub use application::{AdminConsole, GameSession};
pub use config::GameConfig;
pub use domain::{AdminError, GameError, PlayerName, RepositoryError};
pub use infrastructure::{FileSystemStageProvider, InMemoryBackend};
pub use ledger::{AnswerOutcome, ProgressLedger};
pub use loader::{LoadError, LoadMode, load_stage, parse_stage};
pub use registry::CharacterRegistry;
pub use runtime::step;
pub use storage::{ClientStore, JsonFileStore, MemoryClientStore, StorageError};
pub use types::{Event, Output, StageGraph, State};
pub use typewriter::Typewriter;
