//! Character slots for the current stage
//!
//! One slot per character in the stage's cast. Only two layouts exist: a single
//! speaker in the centre, or two speakers left and right. Any other number of
//! visible characters shows nobody.

use crate::types::graph::{CharacterDef, DEFAULT_EMOTION};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Layout {
    SingleCenter,
    DualLeft,
    DualRight,
}

/// Render state of one character slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotView {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub sprite: Option<String>,
    pub opacity: f32,
    pub layout: Option<Layout>,
    /// Idle breathing animation
    pub animated: bool,
    pub active_speaker: bool,
}

impl SlotView {
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    fn hide(&mut self) {
        self.opacity = 0.0;
        self.animated = false;
        self.layout = None;
        self.active_speaker = false;
    }

    fn show(&mut self, layout: Layout) {
        self.opacity = 1.0;
        self.animated = true;
        self.layout = Some(layout);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CharacterRegistry {
    defs: BTreeMap<String, CharacterDef>,
    slots: Vec<SlotView>,
    by_name: HashMap<String, usize>,
}

impl CharacterRegistry {
    /// Allocate hidden slots showing each character's default sprite
    pub fn initialize(characters: &BTreeMap<String, CharacterDef>) -> Self {
        if characters.is_empty() {
            log::warn!("No characters to initialize for this stage");
        }
        let mut slots = Vec::with_capacity(characters.len());
        let mut by_name = HashMap::with_capacity(characters.len());
        for (index, (name, def)) in characters.iter().enumerate() {
            slots.push(SlotView {
                id: format!("char_{index}"),
                name: name.clone(),
                width: def.width,
                height: def.height,
                sprite: def.sprites.get(DEFAULT_EMOTION).cloned(),
                opacity: 0.0,
                layout: None,
                animated: false,
                active_speaker: false,
            });
            by_name.insert(name.clone(), index);
        }
        Self {
            defs: characters.clone(),
            slots,
            by_name,
        }
    }

    /// Sprite for `name` showing `emotion`, falling back to the default sprite
    pub fn resolve_sprite(&self, name: &str, emotion: Option<&str>) -> Option<&str> {
        let def = self.defs.get(name)?;
        def.sprite(emotion.unwrap_or(DEFAULT_EMOTION))
    }

    /// Switch a character's sprite; unknown characters or sprites are ignored
    pub fn set_emotion(&mut self, name: &str, emotion: Option<&str>) {
        let Some(sprite) = self.resolve_sprite(name, emotion).map(str::to_string) else {
            log::warn!("No sprite for character '{name}' with emotion {emotion:?}");
            return;
        };
        if let Some(&index) = self.by_name.get(name) {
            self.slots[index].sprite = Some(sprite);
        }
    }

    /// Apply the layout for a set of visible characters
    ///
    /// Every slot is reset first so no highlight or animation lingers.
    pub fn position(&mut self, visible: &[String]) {
        for slot in &mut self.slots {
            slot.hide();
        }
        let layouts: &[Layout] = match visible.len() {
            1 => &[Layout::SingleCenter],
            2 => &[Layout::DualLeft, Layout::DualRight],
            _ => &[],
        };
        for (name, layout) in visible.iter().zip(layouts) {
            match self.by_name.get(name) {
                Some(&index) => self.slots[index].show(*layout),
                None => log::warn!("Visible character '{name}' is not defined in this stage"),
            }
        }
    }

    /// Mark the speaking character; everyone else loses the highlight
    pub fn highlight_speaker(&mut self, speaker: Option<&str>) {
        for slot in &mut self.slots {
            slot.active_speaker = speaker == Some(slot.name.as_str());
        }
    }

    pub fn slots(&self) -> &[SlotView] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&SlotView> {
        self.by_name.get(name).map(|&i| &self.slots[i])
    }

    pub fn visible_slots(&self) -> impl Iterator<Item = &SlotView> {
        self.slots.iter().filter(|s| s.is_visible())
    }
}
