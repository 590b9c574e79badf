//! CUI player mode for running stages
//!
//! Plays one stage from a directory of `stage_<n>.json` files in the terminal.
//! Score and stage go to an in-process store that starts empty on every run;
//! only the player name and reward ledger persist, in a JSON file next to the
//! stages. A stage already rewarded in an earlier run is not credited again.

use crate::{
    application::GameSession,
    cli::view_state::{ViewState, clear_screen, render_delta},
    config::GameConfig,
    domain::error_chain,
    infrastructure::{FileSystemStageProvider, InMemoryBackend},
    runtime::debug::DebugConfig,
    storage::JsonFileStore,
    types::output::Output,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Client store file created inside the stage directory
pub const CLIENT_STORE_FILE: &str = "client_store.json";

/// Options of the `play` command
#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub stage_dir: PathBuf,
    pub stage: u32,
    pub name: Option<String>,
    pub config: Option<PathBuf>,
    pub debug: bool,
}

/// Run the player mode
pub async fn run_play(options: PlayOptions) -> anyhow::Result<()> {
    let config = match &options.config {
        Some(path) => GameConfig::load(path).await?,
        None => GameConfig::default(),
    };
    let debug = if options.debug {
        DebugConfig::verbose()
    } else {
        DebugConfig::default()
    };

    let stages = Arc::new(FileSystemStageProvider::new(&options.stage_dir));
    let backend = Arc::new(InMemoryBackend::new());
    let client = Arc::new(JsonFileStore::new(
        options.stage_dir.join(CLIENT_STORE_FILE),
    ));
    let mut session = GameSession::new(stages, backend, client, config).with_debug(debug);

    let restored = session.restore().await?;
    match (&options.name, restored) {
        (Some(name), Some(current)) if name.trim() == current.as_str() => {}
        (Some(name), _) => session.register(name).await?,
        (None, Some(_)) => {}
        (None, None) => loop {
            let Some(name) = get_input("Your name:")? else {
                println!("Goodbye!");
                return Ok(());
            };
            match session.register(&name).await {
                Ok(()) => break,
                Err(e) => println!("{}", error_chain(&e)),
            }
        },
    }

    let progress = session.progress();
    println!("=== vnquiz ===");
    println!(
        "Player: {}  Score: {}  Stage: {}",
        session.player().map(|p| p.as_str()).unwrap_or_default(),
        progress.score,
        progress.stage
    );
    println!();
    println!("Controls:");
    println!("  1-9:   select choice");
    println!("  q:     quit");
    println!("Score and stage are kept for this run only.");
    println!();

    let mut view = ViewState::new();
    let first = session.start_stage(options.stage).await?;
    clear_screen();
    let mut output = reveal(&mut session, first).await?;

    loop {
        let delta = view.apply(&output);
        render_delta(&view, &delta);

        if let Some(status) = &output.status {
            println!("[!] {status}");
        }
        if options.debug {
            display_debug_info(&session);
        }
        if let Some(link) = &output.prize {
            println!("*** All stages complete! Your prize: {link} ***");
        }
        if output.returns_to_menu() || !session.in_stage() {
            break;
        }

        let count = view.buttons.len();
        let index = loop {
            let Some(input) = get_input(&format!("Select (1-{count}):"))? else {
                println!("Goodbye!");
                return Ok(());
            };
            if input == "q" {
                println!("Goodbye!");
                return Ok(());
            }
            match input.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => break n - 1,
                _ => println!("Invalid choice. Enter 1-{count} or 'q'."),
            }
        };

        let next = session.choose(index).await?;
        output = reveal(&mut session, next).await?;
    }

    let progress = session.progress();
    println!();
    println!("== Stage over ==");
    println!("Score: {}  Highest stage: {}", progress.score, progress.stage);
    Ok(())
}

/// Skip any running reveal so the terminal shows whole lines
async fn reveal(session: &mut GameSession, mut output: Output) -> anyhow::Result<Output> {
    while session.is_typing() {
        output.merge(session.skip().await?);
    }
    Ok(output)
}

/// Display debug information (only when --debug is set)
fn display_debug_info(session: &GameSession) {
    println!("[debug]");
    if let Some(state) = session.state() {
        println!("phase={:?}", state.phase);
        println!("pending={:?}", state.choice_labels());
    }
    let ledger = session.ledger();
    let rewards: Vec<u32> = ledger.rewards().stages().collect();
    println!(
        "score={} highest={} rewards={:?}",
        ledger.score(),
        ledger.highest_stage(),
        rewards
    );
    println!();
}

/// Get user input with an optional prompt; `None` once stdin is closed
fn get_input(prompt: &str) -> io::Result<Option<String>> {
    if !prompt.is_empty() {
        print!("{} ", prompt);
        io::stdout().flush()?;
    }
    read_trimmed_line(&mut io::stdin().lock())
}

fn read_trimmed_line(reader: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn relaunch_keeps_name_and_rewards_but_not_score() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join(CLIENT_STORE_FILE);
        let stage = r#"{"questions": [{"text": "Bye", "isEnd": true}]}"#;

        let first_backend = Arc::new(InMemoryBackend::new().with_stage(2, stage));
        let mut first = GameSession::new(
            first_backend.clone(),
            first_backend,
            Arc::new(JsonFileStore::new(store_path.clone())),
            GameConfig::default(),
        );
        first.register("Ann").await.unwrap();
        first.start_stage(2).await.unwrap();
        first.skip().await.unwrap();
        first.choose(0).await.unwrap();
        assert_eq!(first.progress().score, 100);

        // A new run starts with an empty in-process backend
        let second_backend = Arc::new(InMemoryBackend::new());
        let mut second = GameSession::new(
            second_backend.clone(),
            second_backend,
            Arc::new(JsonFileStore::new(store_path.clone())),
            GameConfig::default(),
        );
        let restored = second.restore().await.unwrap();
        assert_eq!(restored.as_ref().map(|p| p.as_str()), Some("Ann"));
        assert_eq!(second.progress().score, 0);
        assert!(second.ledger().rewards().is_taken(2));
    }

    #[test]
    fn closed_input_reads_as_none() {
        let mut empty: &[u8] = b"";
        assert_eq!(read_trimmed_line(&mut empty).unwrap(), None);
    }

    #[test]
    fn lines_are_trimmed_until_end_of_input() {
        let mut input: &[u8] = b"  2 \n\nq";
        assert_eq!(read_trimmed_line(&mut input).unwrap().as_deref(), Some("2"));
        assert_eq!(read_trimmed_line(&mut input).unwrap().as_deref(), Some(""));
        assert_eq!(read_trimmed_line(&mut input).unwrap().as_deref(), Some("q"));
        assert_eq!(read_trimmed_line(&mut input).unwrap(), None);
    }
}
