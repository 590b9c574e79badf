//! Static validation for stage graphs

use crate::types::graph::{DEFAULT_EMOTION, NodeKind, StageGraph};
use std::fmt;

/// Result of stage validation
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// Warnings detected during validation
    pub warnings: Vec<GraphWarning>,
    /// Whether the stage is playable (warnings don't make it invalid)
    pub is_valid: bool,
}

/// Authoring problem found in a stage graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphWarning {
    /// A choice points outside the node list
    NextOutOfRange { node: usize, choice: usize, next: i64 },
    /// A character has no `default` sprite
    MissingDefaultSprite { character: String },
    /// A node names a speaker or visible character that is not in the cast
    UnknownCharacter { node: usize, name: String },
    /// A quiz node where no answer is marked correct
    QuizWithoutCorrectAnswer { node: usize },
    /// Nothing in the stage ends it
    NoEndNode,
}

impl fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NextOutOfRange { node, choice, next } => write!(
                f,
                "node {node}, choice {choice}: next {next} is out of range"
            ),
            Self::MissingDefaultSprite { character } => {
                write!(f, "character '{character}' has no '{DEFAULT_EMOTION}' sprite")
            }
            Self::UnknownCharacter { node, name } => {
                write!(f, "node {node}: character '{name}' is not defined")
            }
            Self::QuizWithoutCorrectAnswer { node } => {
                write!(f, "node {node}: quiz has no correct answer")
            }
            Self::NoEndNode => write!(f, "stage has no end node"),
        }
    }
}

/// Perform static validation on a stage graph
///
/// This function checks for:
/// - choices pointing outside the node list
/// - characters without a default sprite
/// - speakers and visible characters missing from the cast
/// - quizzes without a correct answer
/// - stages that cannot be finished
pub fn check(graph: &StageGraph) -> CheckResult {
    let mut warnings = Vec::new();

    for (name, def) in &graph.characters {
        if !def.sprites.contains_key(DEFAULT_EMOTION) {
            warnings.push(GraphWarning::MissingDefaultSprite {
                character: name.clone(),
            });
        }
    }

    for (index, node) in graph.nodes.iter().enumerate() {
        let mut names = node.visible_names();
        if let Some(speaker) = &node.character {
            if !names.contains(speaker) {
                names.push(speaker.clone());
            }
        }
        for name in names {
            if !graph.characters.contains_key(&name) {
                warnings.push(GraphWarning::UnknownCharacter { node: index, name });
            }
        }

        // End nodes only ever offer "finish", their choices are never followed
        if !node.is_end() {
            for (choice_index, choice) in node.choices.iter().enumerate() {
                if graph.resolve(choice.next).is_none() {
                    warnings.push(GraphWarning::NextOutOfRange {
                        node: index,
                        choice: choice_index,
                        next: choice.next,
                    });
                }
            }
        }

        if node.kind == NodeKind::Quiz && !node.choices.iter().any(|c| c.is_correct == Some(true))
        {
            warnings.push(GraphWarning::QuizWithoutCorrectAnswer { node: index });
        }
    }

    if !graph.nodes.is_empty() && !graph.nodes.iter().any(|n| n.is_end()) {
        warnings.push(GraphWarning::NoEndNode);
    }

    CheckResult {
        is_valid: true,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_stage;

    #[test]
    fn check_clean_stage_has_no_warnings() {
        let graph = parse_stage(
            r#"{
                "characters": {"Ann": {"width": 300, "height": 600, "sprites": {"default": "ann.png"}}},
                "questions": [
                    {"character": "Ann", "text": "2+2?", "type": "quiz", "choices": [
                        {"text": "4", "next": 1, "isCorrect": true},
                        {"text": "5", "next": 1, "isCorrect": false}
                    ]},
                    {"character": "Ann", "text": "Bye", "isEnd": true}
                ]
            }"#,
        )
        .unwrap();

        let result = check(&graph);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn check_reports_authoring_problems() {
        let graph = parse_stage(
            r#"{
                "characters": {"Ann": {"sprites": {"happy": "ann_happy.png"}}},
                "questions": [
                    {"character": "Bob", "text": "?", "type": "quiz", "choices": [
                        {"text": "a", "next": 7, "isCorrect": false}
                    ]}
                ]
            }"#,
        )
        .unwrap();

        let result = check(&graph);
        assert!(result.is_valid);
        assert!(result.warnings.contains(&GraphWarning::MissingDefaultSprite {
            character: "Ann".to_string()
        }));
        assert!(result.warnings.contains(&GraphWarning::UnknownCharacter {
            node: 0,
            name: "Bob".to_string()
        }));
        assert!(result.warnings.contains(&GraphWarning::NextOutOfRange {
            node: 0,
            choice: 0,
            next: 7
        }));
        assert!(result
            .warnings
            .contains(&GraphWarning::QuizWithoutCorrectAnswer { node: 0 }));
        assert!(result.warnings.contains(&GraphWarning::NoEndNode));
    }

    #[test]
    fn warnings_render_readable_messages() {
        let warning = GraphWarning::NextOutOfRange {
            node: 2,
            choice: 1,
            next: -1,
        };
        assert_eq!(warning.to_string(), "node 2, choice 1: next -1 is out of range");
    }
}
