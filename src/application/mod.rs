//! Application layer: reading outlines and inspecting the resulting forest
//!
//! Sits between the domain (pure tree logic) and the CLI.

pub mod error;
pub mod error_ext;
pub mod inspect;
pub mod outline;

pub use error::{ApplicationError, ApplicationResult};
pub use inspect::{TraversalOrder, TreeStats};
pub use outline::{OutlineForest, OutlineReader};
