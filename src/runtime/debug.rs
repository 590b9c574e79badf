//! Debug logging for runtime execution
//!
//! Routes engine tracing through the `log` facade with one target per category,
//! so `RUST_LOG=vnquiz::flow=debug` selects what to see. Verbose categories are
//! gated by `DebugConfig`; warnings and errors always pass.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Environment variable that turns verbose engine tracing on
pub const DEBUG_ENV: &str = "VNQUIZ_DEBUG";

/// Debug log category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebugCategory {
    /// Node entry and phase changes
    Engine,
    /// Choices, jumps and returns to menu
    Flow,
    /// Score and stage bookkeeping
    Scoring,
    /// Typewriter reveals
    Reveal,
}

impl DebugCategory {
    pub fn target(self) -> &'static str {
        match self {
            Self::Engine => "vnquiz::engine",
            Self::Flow => "vnquiz::flow",
            Self::Scoring => "vnquiz::scoring",
            Self::Reveal => "vnquiz::reveal",
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Enable verbose logging
    pub enabled: bool,
    /// Enabled categories
    pub categories: HashSet<DebugCategory>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        let mut categories = HashSet::new();
        categories.insert(DebugCategory::Engine);
        categories.insert(DebugCategory::Flow);
        categories.insert(DebugCategory::Scoring);

        Self {
            enabled: std::env::var(DEBUG_ENV).is_ok(),
            categories,
        }
    }
}

impl DebugConfig {
    /// Everything on, regardless of the environment
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            categories: [
                DebugCategory::Engine,
                DebugCategory::Flow,
                DebugCategory::Scoring,
                DebugCategory::Reveal,
            ]
            .into_iter()
            .collect(),
        }
    }

    fn allows(&self, category: DebugCategory, level: log::Level) -> bool {
        level <= log::Level::Warn || (self.enabled && self.categories.contains(&category))
    }
}

/// Log a message in a category
pub fn log(config: &DebugConfig, category: DebugCategory, level: log::Level, message: &str) {
    if !config.allows(category, level) {
        return;
    }
    log::log!(target: category.target(), level, "{message}");
}
