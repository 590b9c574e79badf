//! Infrastructure layer - adapters for the collaborator traits
//!
//! This layer contains implementations that deal with external concerns
//! like the file system and the game backend.

pub mod repositories;

pub use repositories::*;
