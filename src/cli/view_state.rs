//! View state management for CUI player
//!
//! This module keeps what is on screen and turns each runtime `Output` into
//! a rendering delta, so only what changed is printed.

use crate::registry::SlotView;
use crate::types::output::{Button, OverlayState, Output};

/// Clear the terminal screen (cross-platform)
pub fn clear_screen() {
    // Try ANSI escape codes first (works on most terminals)
    print!("\x1b[2J\x1b[H");

    // Fallback: print newlines
    if std::io::Write::flush(&mut std::io::stdout()).is_err() {
        for _ in 0..50 {
            println!();
        }
    }
}

/// Represents the current visual state of the CUI player
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub nameplate: Option<String>,
    pub overlay: Option<String>,
    /// Visible characters as "name (sprite)"
    pub characters: Vec<String>,
    pub buttons: Vec<Button>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an output to this view state and return the rendering delta
    pub fn apply(&mut self, output: &Output) -> RenderDelta {
        let mut delta = RenderDelta::new();

        if let Some(overlay) = &output.overlay {
            let next = match overlay {
                OverlayState::Shown(text) => Some(text.clone()),
                OverlayState::Hidden => None,
            };
            if next != self.overlay {
                delta.overlay_changed = true;
                self.overlay = next;
            }
        }

        if let Some(slots) = &output.characters {
            let visible: Vec<String> = slots
                .iter()
                .filter(|s| s.is_visible())
                .map(describe_slot)
                .collect();
            if visible != self.characters {
                delta.characters_changed = true;
                self.characters = visible;
            }
        }

        if let Some(name) = &output.nameplate {
            self.nameplate = Some(name.clone()).filter(|n| !n.is_empty());
        }
        if let Some(text) = &output.text {
            delta.text = Some(text.shown.clone());
        }
        if let Some(buttons) = &output.choices {
            self.buttons = buttons.clone();
            delta.buttons_changed = true;
        }

        delta
    }
}

fn describe_slot(slot: &SlotView) -> String {
    let sprite = slot.sprite.as_deref().unwrap_or("?");
    if slot.active_speaker {
        format!("*{}* ({sprite})", slot.name)
    } else {
        format!("{} ({sprite})", slot.name)
    }
}

/// What changed since the previous output
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderDelta {
    pub overlay_changed: bool,
    pub characters_changed: bool,
    pub buttons_changed: bool,
    pub text: Option<String>,
}

impl RenderDelta {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Print a delta against the view it was computed for
pub fn render_delta(view: &ViewState, delta: &RenderDelta) {
    if delta.overlay_changed {
        match &view.overlay {
            Some(text) => println!("[Overlay] {text}"),
            None => println!("[Overlay hidden]"),
        }
    }
    if delta.characters_changed {
        if view.characters.is_empty() {
            println!("[Stage empty]");
        } else {
            println!("[On stage] {}", view.characters.join(", "));
        }
    }
    if let Some(text) = &delta.text {
        match &view.nameplate {
            Some(name) => println!("{name}:\n{text}"),
            None => println!("{text}"),
        }
        println!();
    }
    if delta.buttons_changed && !view.buttons.is_empty() {
        for (i, button) in view.buttons.iter().enumerate() {
            println!("{}. {}", i + 1, button.label);
        }
        println!();
    }
}
