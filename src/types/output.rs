//! Output from runtime execution
//!
//! An `Output` describes what changed on screen and which side effects the host
//! must carry out. The runtime never touches the view or the network itself.

use crate::registry::SlotView;
use crate::types::progress::ProgressRecord;
use serde::{Deserialize, Serialize};

/// Result of a single step execution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Output {
    /// Speaker nameplate, when it changed
    pub nameplate: Option<String>,
    /// Overlay panel state, when it changed
    pub overlay: Option<OverlayState>,
    /// Full character slot layout, when it changed
    pub characters: Option<Vec<SlotView>>,
    /// Dialogue text box contents, when they changed
    pub text: Option<TextFrame>,
    /// Buttons to show; `None` leaves the current buttons, `Some(empty)` hides them
    pub choices: Option<Vec<Button>>,
    /// Side effects for the host, in order
    pub effects: Vec<Effect>,
    /// Inline status message (network problems and the like)
    pub status: Option<String>,
    /// Prize link to reveal; filled in by the session for `Effect::RevealPrize`
    pub prize: Option<String>,
}

impl Output {
    /// Create empty output
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, shown: impl Into<String>, typing: bool) {
        self.text = Some(TextFrame {
            shown: shown.into(),
            typing,
        });
    }

    pub fn set_choices(&mut self, buttons: Vec<Button>) {
        self.choices = Some(buttons);
    }

    pub fn hide_choices(&mut self) {
        self.choices = Some(Vec::new());
    }

    pub fn add_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Check if there are any buttons to show
    pub fn has_choices(&self) -> bool {
        self.choices.as_ref().is_some_and(|c| !c.is_empty())
    }

    pub fn has_effect(&self, wanted: &Effect) -> bool {
        self.effects.iter().any(|e| e == wanted)
    }

    /// True when the host should leave the stage
    pub fn returns_to_menu(&self) -> bool {
        self.has_effect(&Effect::ReturnToMenu)
    }

    /// Fold a later output into this one; later values win
    pub fn merge(&mut self, later: Output) {
        if later.nameplate.is_some() {
            self.nameplate = later.nameplate;
        }
        if later.overlay.is_some() {
            self.overlay = later.overlay;
        }
        if later.characters.is_some() {
            self.characters = later.characters;
        }
        if later.text.is_some() {
            self.text = later.text;
        }
        if later.choices.is_some() {
            self.choices = later.choices;
        }
        if later.status.is_some() {
            self.status = later.status;
        }
        if later.prize.is_some() {
            self.prize = later.prize;
        }
        self.effects.extend(later.effects);
    }
}

/// Overlay panel shown above the scene
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum OverlayState {
    Shown(String),
    Hidden,
}

/// The dialogue text box
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextFrame {
    /// Text revealed so far
    pub shown: String,
    /// Whether the typewriter is still running
    pub typing: bool,
}

/// A clickable button
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Button {
    pub label: String,
    pub style: ButtonStyle,
}

impl Button {
    pub fn choice(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style: ButtonStyle::Choice,
        }
    }

    pub fn proceed(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style: ButtonStyle::Continue,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ButtonStyle {
    /// An authored choice
    Choice,
    /// A synthesized continue/next/finish button
    Continue,
}

/// Side effects requested by the runtime
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Effect {
    /// Send the cumulative score and stage to the progress store
    SubmitScore(ProgressRecord),
    /// Persist the reward ledger locally
    PersistRewards(Vec<u32>),
    /// Show the prize reveal for finishing the last stage
    RevealPrize,
    /// Leave the stage and go back to the menu
    ReturnToMenu,
}
