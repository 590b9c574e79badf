//! Typed stage graph produced by the loader

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Emotion key every character is expected to provide
pub const DEFAULT_EMOTION: &str = "default";

/// A stage's dialogue graph: its cast and its ordered nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StageGraph {
    pub characters: BTreeMap<String, CharacterDef>,
    pub nodes: Vec<Node>,
}

impl StageGraph {
    pub fn new(characters: BTreeMap<String, CharacterDef>, nodes: Vec<Node>) -> Self {
        Self { characters, nodes }
    }

    pub fn get_node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Resolve a choice target to a node index, if it is in range
    pub fn resolve(&self, next: i64) -> Option<usize> {
        usize::try_from(next).ok().filter(|&i| i < self.nodes.len())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Sprite sheet and box size of one character
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CharacterDef {
    pub width: f64,
    pub height: f64,
    pub sprites: HashMap<String, String>,
}

impl CharacterDef {
    /// Sprite for an emotion, falling back to the default sprite
    pub fn sprite(&self, emotion: &str) -> Option<&str> {
        self.sprites
            .get(emotion)
            .or_else(|| self.sprites.get(DEFAULT_EMOTION))
            .map(String::as_str)
    }
}

/// How a node behaves once its text has been revealed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NodeKind {
    /// Plain dialogue; choices branch to other nodes
    Line,
    /// Choices are answers that get scored
    Quiz,
    /// Terminal node; only a "finish stage" button is offered
    End,
}

/// One step of the dialogue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub character: Option<String>,
    pub text: Option<String>,
    pub emotion: Option<String>,
    pub visible_characters: Option<Vec<String>>,
    pub speed: Option<u64>,
    pub overlay: Option<String>,
    pub choices: Vec<Choice>,
    pub correct_response: Option<String>,
    pub wrong_response: Option<String>,
}

impl Node {
    /// A line node with only text, handy for building graphs in code
    pub fn line(character: Option<&str>, text: &str) -> Self {
        Self {
            kind: NodeKind::Line,
            character: character.map(str::to_string),
            text: Some(text.to_string()),
            emotion: None,
            visible_characters: None,
            speed: None,
            overlay: None,
            choices: Vec::new(),
            correct_response: None,
            wrong_response: None,
        }
    }

    pub fn end(character: Option<&str>, text: &str) -> Self {
        Self {
            kind: NodeKind::End,
            ..Self::line(character, text)
        }
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn is_end(&self) -> bool {
        self.kind == NodeKind::End
    }

    /// Text to reveal, if there is any
    pub fn display_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Names shown on stage: explicit list, else the speaker, else nobody
    pub fn visible_names(&self) -> Vec<String> {
        match (&self.visible_characters, &self.character) {
            (Some(names), _) => names.clone(),
            (None, Some(speaker)) => vec![speaker.clone()],
            (None, None) => Vec::new(),
        }
    }
}

/// A button on a node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    pub text: String,
    /// Target node index; may be out of range in authored content
    pub next: i64,
    pub is_correct: Option<bool>,
}

impl Choice {
    pub fn new(text: &str, next: i64) -> Self {
        Self {
            text: text.to_string(),
            next,
            is_correct: None,
        }
    }

    pub fn answer(text: &str, next: i64, is_correct: bool) -> Self {
        Self {
            is_correct: Some(is_correct),
            ..Self::new(text, next)
        }
    }
}
