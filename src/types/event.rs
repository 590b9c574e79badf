//! External events that can be sent to the runtime

use serde::{Deserialize, Serialize};

/// External events that drive the dialogue state machine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    /// Enter the first node of the stage
    Start,
    /// One typewriter interval elapsed
    Tick,
    /// Wall-clock time passed; reveals as many characters as fit
    Elapsed { ms: u64 },
    /// User clicked the text box while text was being revealed
    Skip,
    /// User activated the button at `index` of the last offered buttons
    Choose { index: usize },
}
