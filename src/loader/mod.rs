//! Stage content loader
//!
//! Stage content arrives double-encoded: an envelope whose `dialogue_json` field
//! is itself JSON text. The envelope is fetched from a [`StageContentProvider`];
//! the dialogue text is validated here in a single step and turned into a typed
//! [`StageGraph`]. Bad dialogue JSON never aborts a player session: it degrades
//! to an empty graph, and an empty graph gets a single fallback node.

use crate::config::GameConfig;
use crate::domain::errors::error_chain;
use crate::domain::repositories::{RepositoryError, StageContentProvider};
use crate::types::graph::{CharacterDef, Choice, Node, NodeKind, StageGraph};
use crate::types::records::StageEnvelope;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

pub mod check;

#[cfg(test)]
mod tests;

/// Skeleton offered to the admin editor for stages that do not exist yet
pub const EMPTY_STAGE_JSON: &str = "{\n  \"characters\": {},\n  \"questions\": []\n}";

/// Speaker of the fallback node when the configured narrator is not in the cast
pub const FALLBACK_SPEAKER: &str = "Error";

pub const FALLBACK_TEXT: &str = "The stage loaded, but its JSON has no 'questions' array or the format is wrong. Check the stage content!";

/// Authored choice of the fallback node; End nodes render it as the finish button
pub const RETURN_TO_MENU_LABEL: &str = "Return to menu";

/// Who is loading: players need playable content, admins an editable graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Player,
    Admin,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("stage {stage} does not exist")]
    StageMissing { stage: u32 },

    #[error("failed to fetch stage {stage}")]
    Provider {
        stage: u32,
        #[source]
        source: RepositoryError,
    },

    #[error("invalid stage envelope")]
    Envelope(#[source] serde_json::Error),

    #[error("invalid dialogue JSON")]
    Schema(#[source] serde_json::Error),
}

/// Fetch and parse a stage
pub async fn load_stage(
    provider: &dyn StageContentProvider,
    stage_num: u32,
    mode: LoadMode,
    config: &GameConfig,
) -> Result<StageGraph, LoadError> {
    let envelope = match provider.fetch_stage(stage_num).await {
        Ok(envelope) => envelope,
        Err(e) if e.is_not_found() => {
            return match mode {
                LoadMode::Admin => {
                    log::info!("Stage {stage_num} not found, starting from an empty skeleton");
                    Ok(StageGraph::default())
                }
                LoadMode::Player => {
                    log::error!("Stage {stage_num} not found");
                    Err(LoadError::StageMissing { stage: stage_num })
                }
            };
        }
        Err(source) => {
            log::error!("Failed to fetch stage {stage_num}: {source}");
            return Err(LoadError::Provider {
                stage: stage_num,
                source,
            });
        }
    };

    let graph = graph_from_dialogue(stage_num, &envelope.dialogue_json);
    Ok(match mode {
        LoadMode::Player => with_fallback(graph, config),
        LoadMode::Admin => graph,
    })
}

/// Parse a raw envelope (as sent by `GET /stage/{n}`) into a playable graph
///
/// The envelope must decode; the dialogue inside degrades gracefully.
pub fn graph_from_envelope_json(json: &str, config: &GameConfig) -> Result<StageGraph, LoadError> {
    let envelope = StageEnvelope::from_json(json).map_err(LoadError::Envelope)?;
    let graph = graph_from_dialogue(envelope.stage_num, &envelope.dialogue_json);
    Ok(with_fallback(graph, config))
}

/// Lenient dialogue parse: blank or invalid JSON yields an empty graph
pub fn graph_from_dialogue(stage_num: u32, dialogue_json: &str) -> StageGraph {
    if dialogue_json.trim().is_empty() {
        log::warn!("Stage {stage_num} has no dialogue data");
        return StageGraph::default();
    }
    match parse_stage(dialogue_json) {
        Ok(graph) => {
            log::info!(
                "Loaded stage {stage_num}: {} nodes, {} characters",
                graph.nodes.len(),
                graph.characters.len()
            );
            for warning in check::check(&graph).warnings {
                log::warn!("Stage {stage_num}: {warning}");
            }
            graph
        }
        Err(e) => {
            log::warn!(
                "Stage {stage_num} dialogue JSON is invalid ({}), using an empty graph",
                error_chain(&e)
            );
            StageGraph::default()
        }
    }
}

/// Strict, schema-validating parse of dialogue JSON
pub fn parse_stage(dialogue_json: &str) -> Result<StageGraph, LoadError> {
    let raw: RawStage = serde_json::from_str(dialogue_json).map_err(LoadError::Schema)?;
    Ok(raw.into_graph())
}

/// Replace an empty node list by a single End node warning about the content
pub fn with_fallback(mut graph: StageGraph, config: &GameConfig) -> StageGraph {
    if !graph.nodes.is_empty() {
        return graph;
    }
    log::warn!("Stage has no questions, using a fallback node");
    let speaker = config
        .narrator
        .as_deref()
        .filter(|name| graph.characters.contains_key(*name))
        .unwrap_or(FALLBACK_SPEAKER);
    graph.nodes.push(
        Node::end(Some(speaker), FALLBACK_TEXT)
            .with_choices(vec![Choice::new(RETURN_TO_MENU_LABEL, 0)]),
    );
    graph
}

#[derive(Debug, Deserialize)]
struct RawStage {
    #[serde(default)]
    characters: BTreeMap<String, RawCharacter>,
    #[serde(default, alias = "nodes")]
    questions: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
struct RawCharacter {
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    sprites: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    character: Option<String>,
    text: Option<String>,
    emotion: Option<String>,
    visible_characters: Option<Vec<String>>,
    speed: Option<u64>,
    overlay: Option<String>,
    #[serde(default)]
    choices: Vec<RawChoice>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    is_end: bool,
    correct_response: Option<String>,
    wrong_response: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChoice {
    #[serde(default)]
    text: String,
    next: i64,
    is_correct: Option<bool>,
}

impl RawStage {
    fn into_graph(self) -> StageGraph {
        let characters = self
            .characters
            .into_iter()
            .map(|(name, c)| {
                (
                    name,
                    CharacterDef {
                        width: c.width,
                        height: c.height,
                        sprites: c.sprites,
                    },
                )
            })
            .collect();
        let nodes = self.questions.into_iter().map(RawNode::into_node).collect();
        StageGraph::new(characters, nodes)
    }
}

impl RawNode {
    fn into_node(self) -> Node {
        // `isEnd` wins over `type`
        let kind = if self.is_end {
            NodeKind::End
        } else if self.kind.as_deref() == Some("quiz") {
            NodeKind::Quiz
        } else {
            NodeKind::Line
        };
        Node {
            kind,
            character: self.character.filter(|c| !c.is_empty()),
            text: self.text,
            emotion: self.emotion.filter(|e| !e.is_empty()),
            visible_characters: self.visible_characters,
            speed: self.speed.filter(|&s| s > 0),
            overlay: self.overlay.filter(|o| !o.is_empty()),
            choices: self
                .choices
                .into_iter()
                .map(|c| Choice {
                    text: c.text,
                    next: c.next,
                    is_correct: c.is_correct,
                })
                .collect(),
            correct_response: self.correct_response,
            wrong_response: self.wrong_response,
        }
    }
}

/// Admin editor contents for a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDocument {
    pub stage_num: u32,
    /// Pretty-printed dialogue JSON
    pub text: String,
    pub status: EditorStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorStatus {
    /// Existing stage content
    Loaded,
    /// No record yet; the skeleton is shown and saving creates the stage
    New,
}

/// Load a stage's dialogue JSON for editing, pretty-printed with 2-space indent
pub async fn open_for_edit(
    provider: &dyn StageContentProvider,
    stage_num: u32,
) -> Result<EditorDocument, LoadError> {
    match provider.fetch_stage(stage_num).await {
        Ok(envelope) => {
            let value: serde_json::Value =
                serde_json::from_str(&envelope.dialogue_json).map_err(LoadError::Schema)?;
            let text = serde_json::to_string_pretty(&value).map_err(LoadError::Schema)?;
            Ok(EditorDocument {
                stage_num,
                text,
                status: EditorStatus::Loaded,
            })
        }
        Err(e) if e.is_not_found() => Ok(EditorDocument {
            stage_num,
            text: EMPTY_STAGE_JSON.to_string(),
            status: EditorStatus::New,
        }),
        Err(source) => Err(LoadError::Provider {
            stage: stage_num,
            source,
        }),
    }
}
