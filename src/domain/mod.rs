//! Domain layer - contracts of the collaborators and the errors of the game
//!
//! The engine itself is pure; everything that crosses a process boundary is
//! described here as a trait.

pub mod errors;
pub mod repositories;
pub mod value_objects;

pub use errors::*;
pub use repositories::*;
pub use value_objects::*;
