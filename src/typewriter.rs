//! Character-by-character text reveal
//!
//! The typewriter is a plain resumable state: a target text, how many characters
//! are visible, and the interval between characters. Whoever owns the clock calls
//! [`Typewriter::tick`] (or [`Typewriter::advance`] with elapsed time); a click on
//! the text box calls [`Typewriter::skip`]. Both paths report completion exactly
//! once per reveal.

use serde::{Deserialize, Serialize};

/// Token replaced by the player's name before a reveal starts
pub const PLAYER_NAME_TOKEN: &str = "{{player_name}}";

/// Replace every `{{player_name}}` token
pub fn substitute(text: &str, player_name: &str) -> String {
    text.replace(PLAYER_NAME_TOKEN, player_name)
}

/// What a tick or skip did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStatus {
    /// Nothing is being revealed
    Idle,
    /// More characters remain
    Typing,
    /// The reveal just finished; reported once
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Typewriter {
    target: Vec<char>,
    revealed: usize,
    interval_ms: u64,
    /// Milliseconds accumulated towards the next character
    pending_ms: u64,
    active: bool,
}

impl Typewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start revealing `text`, replacing any reveal in progress
    ///
    /// Empty text completes immediately.
    pub fn reveal(&mut self, text: &str, interval_ms: u64) -> RevealStatus {
        self.target = text.chars().collect();
        self.revealed = 0;
        self.interval_ms = interval_ms;
        self.pending_ms = 0;
        if self.target.is_empty() {
            self.active = false;
            return RevealStatus::Completed;
        }
        self.active = true;
        RevealStatus::Typing
    }

    /// Reveal one more character
    pub fn tick(&mut self) -> RevealStatus {
        if !self.active {
            return RevealStatus::Idle;
        }
        self.revealed = (self.revealed + 1).min(self.target.len());
        if self.revealed == self.target.len() {
            self.active = false;
            RevealStatus::Completed
        } else {
            RevealStatus::Typing
        }
    }

    /// Feed wall-clock time; reveals as many characters as fit
    pub fn advance(&mut self, elapsed_ms: u64) -> RevealStatus {
        if !self.active {
            return RevealStatus::Idle;
        }
        if self.interval_ms == 0 {
            return self.skip();
        }
        self.pending_ms += elapsed_ms;
        let mut status = RevealStatus::Typing;
        while self.pending_ms >= self.interval_ms && self.active {
            self.pending_ms -= self.interval_ms;
            status = self.tick();
        }
        status
    }

    /// Show the whole text now
    ///
    /// Returns `Completed` only if the reveal was still running, so a skip after
    /// natural completion is a no-op.
    pub fn skip(&mut self) -> RevealStatus {
        if !self.active {
            return RevealStatus::Idle;
        }
        self.revealed = self.target.len();
        self.active = false;
        RevealStatus::Completed
    }

    pub fn is_typing(&self) -> bool {
        self.active
    }

    /// Currently visible prefix
    pub fn visible(&self) -> String {
        self.target[..self.revealed].iter().collect()
    }
}
