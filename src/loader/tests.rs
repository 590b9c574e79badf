//! Tests for the loader module

use super::*;
use crate::types::records::StageEnvelope;
use async_trait::async_trait;

const QUIZ_STAGE: &str = r#"{
  "characters": {
    "Ann": {"width": 300, "height": 600, "sprites": {"default": "ann.png", "happy": "ann_happy.png"}}
  },
  "questions": [
    {"character": "Ann", "text": "Welcome, {playerName}!", "emotion": "happy", "speed": 20,
     "choices": [{"text": "Go", "next": 1}]},
    {"character": "Ann", "text": "2+2?", "type": "quiz",
     "correctResponse": "Right!", "wrongResponse": "No.",
     "choices": [
       {"text": "4", "next": 2, "isCorrect": true},
       {"text": "5", "next": 2, "isCorrect": false}
     ]},
    {"character": "Ann", "text": "Done", "type": "quiz", "isEnd": true}
  ]
}"#;

/// Provider serving one fixed stage, or an error for every request
enum StubProvider {
    Stage(StageEnvelope),
    Missing,
    Offline,
}

#[async_trait]
impl StageContentProvider for StubProvider {
    async fn fetch_stage(&self, stage_num: u32) -> Result<StageEnvelope, RepositoryError> {
        match self {
            Self::Stage(envelope) => Ok(envelope.clone()),
            Self::Missing => Err(RepositoryError::not_found(format!("stage {stage_num}"))),
            Self::Offline => Err(RepositoryError::Unavailable {
                reason: "offline".to_string(),
            }),
        }
    }

    async fn save_stage(&self, _envelope: &StageEnvelope) -> Result<(), RepositoryError> {
        Ok(())
    }
}

fn stub(dialogue: &str) -> StubProvider {
    StubProvider::Stage(StageEnvelope::new(1, dialogue))
}

#[test]
fn parse_quiz_stage_into_typed_graph() {
    let graph = parse_stage(QUIZ_STAGE).unwrap();
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.characters["Ann"].width, 300.0);

    let first = &graph.nodes[0];
    assert_eq!(first.kind, NodeKind::Line);
    assert_eq!(first.emotion.as_deref(), Some("happy"));
    assert_eq!(first.speed, Some(20));

    let quiz = &graph.nodes[1];
    assert_eq!(quiz.kind, NodeKind::Quiz);
    assert_eq!(quiz.correct_response.as_deref(), Some("Right!"));
    assert_eq!(quiz.choices[0].is_correct, Some(true));
    assert_eq!(quiz.choices[1].is_correct, Some(false));

    assert_eq!(graph.nodes[2].kind, NodeKind::End);
}

#[test]
fn parse_accepts_nodes_alias_and_missing_characters() {
    let graph = parse_stage(r#"{"nodes": [{"text": "Hello", "isEnd": true}]}"#).unwrap();
    assert!(graph.characters.is_empty());
    assert_eq!(graph.len(), 1);
    assert!(graph.nodes[0].is_end());
    assert!(graph.nodes[0].character.is_none());
}

#[test]
fn parse_normalizes_empty_fields() {
    let graph = parse_stage(
        r#"{"questions": [{"character": "", "emotion": "", "overlay": "", "speed": 0, "text": "x"}]}"#,
    )
    .unwrap();
    let node = &graph.nodes[0];
    assert!(node.character.is_none());
    assert!(node.emotion.is_none());
    assert!(node.overlay.is_none());
    assert!(node.speed.is_none());
}

#[test]
fn parse_rejects_choice_without_next() {
    let result = parse_stage(r#"{"questions": [{"text": "x", "choices": [{"text": "a"}]}]}"#);
    assert!(matches!(result, Err(LoadError::Schema(_))));
}

#[test]
fn lenient_parse_degrades_to_empty_graph() {
    assert!(graph_from_dialogue(1, "").is_empty());
    assert!(graph_from_dialogue(1, "   ").is_empty());
    assert!(graph_from_dialogue(1, "{not json").is_empty());
    assert!(graph_from_dialogue(1, "{}").is_empty());
}

#[test]
fn fallback_is_a_single_end_node() {
    let graph = with_fallback(StageGraph::default(), &GameConfig::default());
    assert_eq!(graph.len(), 1);

    let node = &graph.nodes[0];
    assert_eq!(node.kind, NodeKind::End);
    assert_eq!(node.character.as_deref(), Some(FALLBACK_SPEAKER));
    assert_eq!(node.display_text(), Some(FALLBACK_TEXT));
    assert_eq!(node.choices.len(), 1);
    assert_eq!(node.choices[0].text, RETURN_TO_MENU_LABEL);

    // A stage that already has nodes is left alone
    let graph = with_fallback(graph.clone(), &GameConfig::default());
    assert_eq!(graph.len(), 1);
}

#[test]
fn fallback_node_uses_narrator_when_in_cast() {
    let config = GameConfig {
        narrator: Some("Ann".to_string()),
        ..GameConfig::default()
    };
    let cast_only = parse_stage(r#"{"characters": {"Ann": {"sprites": {"default": "a.png"}}}}"#)
        .unwrap();
    let graph = with_fallback(cast_only, &config);
    assert_eq!(graph.nodes[0].character.as_deref(), Some("Ann"));

    let no_cast = with_fallback(StageGraph::default(), &config);
    assert_eq!(no_cast.nodes[0].character.as_deref(), Some(FALLBACK_SPEAKER));
}

#[test]
fn envelope_json_is_double_decoded() {
    let envelope = serde_json::json!({
        "stage_num": 4,
        "dialogue_json": QUIZ_STAGE,
    })
    .to_string();
    let graph = graph_from_envelope_json(&envelope, &GameConfig::default()).unwrap();
    assert_eq!(graph.len(), 3);

    let result = graph_from_envelope_json("[1, 2]", &GameConfig::default());
    assert!(matches!(result, Err(LoadError::Envelope(_))));
}

#[tokio::test]
async fn load_stage_for_player() {
    let provider = stub(QUIZ_STAGE);
    let graph = load_stage(&provider, 1, LoadMode::Player, &GameConfig::default())
        .await
        .unwrap();
    assert_eq!(graph.len(), 3);
}

#[tokio::test]
async fn load_invalid_dialogue_gives_player_the_fallback() {
    let provider = stub("{broken");
    let config = GameConfig::default();

    let player = load_stage(&provider, 1, LoadMode::Player, &config).await.unwrap();
    assert_eq!(player.len(), 1);
    assert_eq!(player.nodes[0].display_text(), Some(FALLBACK_TEXT));

    let admin = load_stage(&provider, 1, LoadMode::Admin, &config).await.unwrap();
    assert!(admin.is_empty());
}

#[tokio::test]
async fn load_missing_stage_depends_on_mode() {
    let config = GameConfig::default();

    let player = load_stage(&StubProvider::Missing, 9, LoadMode::Player, &config).await;
    assert!(matches!(player, Err(LoadError::StageMissing { stage: 9 })));

    let admin = load_stage(&StubProvider::Missing, 9, LoadMode::Admin, &config)
        .await
        .unwrap();
    assert!(admin.is_empty());
}

#[tokio::test]
async fn load_surfaces_provider_failures() {
    let result = load_stage(
        &StubProvider::Offline,
        2,
        LoadMode::Admin,
        &GameConfig::default(),
    )
    .await;
    assert!(matches!(result, Err(LoadError::Provider { stage: 2, .. })));
}

#[tokio::test]
async fn open_for_edit_pretty_prints_content() {
    let provider = stub(r#"{"characters":{},"questions":[{"text":"hi","isEnd":true}]}"#);
    let document = open_for_edit(&provider, 1).await.unwrap();
    assert_eq!(document.status, EditorStatus::Loaded);
    assert!(document.text.contains("\n  \"questions\": ["));
    assert!(document.text.contains("\"text\": \"hi\""));
}

#[tokio::test]
async fn open_for_edit_offers_skeleton_for_new_stage() {
    let document = open_for_edit(&StubProvider::Missing, 7).await.unwrap();
    assert_eq!(document.stage_num, 7);
    assert_eq!(document.status, EditorStatus::New);
    assert_eq!(document.text, EMPTY_STAGE_JSON);

    let skeleton = parse_stage(EMPTY_STAGE_JSON).unwrap();
    assert!(skeleton.is_empty());
}
