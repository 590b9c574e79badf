//! Admin console integration tests
//! Stage editing round trips and the player/admin split on missing stages.

use std::sync::Arc;
use vnquiz::application::{
    StageAvailability, leaderboard_rows, practice_stages, ProgressSummary,
};
use vnquiz::domain::repositories::{ProgressStore, StageContentProvider};
use vnquiz::loader::{EMPTY_STAGE_JSON, EditorStatus};
use vnquiz::types::{ProgressRecord, ScoreSubmission};
use vnquiz::{
    AdminConsole, AdminError, GameConfig, GameError, GameSession, InMemoryBackend, LoadError,
    LoadMode, MemoryClientStore, load_stage,
};

fn console(backend: &Arc<InMemoryBackend>) -> AdminConsole {
    AdminConsole::new(
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend.clone(),
        GameConfig::default(),
    )
}

/// Test: a saved stage reopens as the pretty-printed form of what was saved
#[tokio::test]
async fn saved_stage_reopens_pretty_printed() {
    let backend = Arc::new(InMemoryBackend::new());
    let admin = console(&backend);
    let text = r#"{"characters":{"Guide":{"width":300,"height":600,"sprites":{"default":"g.png"}}},"questions":[{"character":"Guide","text":"Hi","isEnd":true}]}"#;

    admin.save_stage(3, text).await.unwrap();
    let document = admin.open_stage(3).await.unwrap();

    let value: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(document.status, EditorStatus::Loaded);
    assert_eq!(document.text, serde_json::to_string_pretty(&value).unwrap());

    // The graph the player gets is the one that was edited
    let graph = load_stage(backend.as_ref(), 3, LoadMode::Player, &GameConfig::default())
        .await
        .unwrap();
    assert_eq!(graph.len(), 1);
    assert!(graph.characters.contains_key("Guide"));
}

/// Test: missing stages are editable for admins but fatal for players
#[tokio::test]
async fn missing_stage_is_skeleton_for_admin_and_error_for_player() {
    let backend = Arc::new(InMemoryBackend::new());
    let admin = console(&backend);

    let document = admin.open_stage(5).await.unwrap();
    assert_eq!(document.status, EditorStatus::New);
    assert_eq!(document.text, EMPTY_STAGE_JSON);

    let client = Arc::new(MemoryClientStore::new());
    let mut game = GameSession::new(
        backend.clone(),
        backend.clone(),
        client,
        GameConfig::default(),
    );
    game.register("Ann").await.unwrap();
    assert!(matches!(
        game.start_stage(5).await,
        Err(GameError::Load(LoadError::StageMissing { stage: 5 }))
    ));

    // Saving the skeleton creates the stage
    admin.save_stage(5, &document.text).await.unwrap();
    assert!(backend.fetch_stage(5).await.is_ok());
}

/// Test: invalid JSON never reaches the provider
#[tokio::test]
async fn invalid_json_is_not_saved() {
    let backend = Arc::new(InMemoryBackend::new().with_stage(2, r#"{"questions":[]}"#));
    let admin = console(&backend);

    let result = admin.save_stage(2, r#"{"questions": [}"#).await;
    assert!(matches!(result, Err(AdminError::InvalidJson(_))));
    assert_eq!(
        backend.fetch_stage(2).await.unwrap().dialogue_json,
        r#"{"questions":[]}"#
    );
}

/// Test: deleting a user twice reports the missing user
#[tokio::test]
async fn user_lookup_and_delete() {
    let backend = Arc::new(InMemoryBackend::new());
    let admin = console(&backend);
    for (name, score) in [("ann", 150), ("bob", 400)] {
        backend
            .submit_score(&ScoreSubmission::new(name, ProgressRecord::new(score, 1)))
            .await
            .unwrap();
    }

    let board = admin.leaderboard().await.unwrap();
    assert_eq!(board[0].username, "bob");
    let ann = admin.user(board[1].id).await.unwrap();
    assert_eq!(ann.score, 150);

    admin.delete_user(ann.id).await.unwrap();
    assert!(matches!(
        admin.delete_user(ann.id).await,
        Err(AdminError::UserNotFound { .. })
    ));
    assert_eq!(admin.leaderboard().await.unwrap().len(), 1);
}

/// Test: the menu follows the player's progress
#[tokio::test]
async fn menu_reflects_player_progress() {
    let config = GameConfig::default();
    let backend = Arc::new(InMemoryBackend::new());
    for (name, score, stage) in [("ann", 250, 2), ("bob", 400, 3), ("cid", 0, 0)] {
        backend
            .submit_score(&ScoreSubmission::new(name, ProgressRecord::new(score, stage)))
            .await
            .unwrap();
    }

    let ann = backend.get_progress("ann").await.unwrap();
    let summary = ProgressSummary::from_stage(ann.stage, &config);
    assert_eq!(summary.theory_completed, 1);
    assert_eq!(summary.practice_completed, 1);

    let stages = practice_stages(ann.stage, &config);
    assert_eq!(stages[0].availability, StageAvailability::Completed);
    assert_eq!(stages[1].availability, StageAvailability::Available);
    assert_eq!(stages[2].availability, StageAvailability::Locked);

    let rows = leaderboard_rows(&backend.leaderboard().await.unwrap(), Some("ann"));
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].username, "bob");
    assert!(rows[1].is_current_user);
    assert_eq!(rows[1].medal, None);
}
