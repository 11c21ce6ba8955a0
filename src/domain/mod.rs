//! Domain layer: the forest, its mutations, queries and traversals
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod mutation;
pub mod node_ref;
pub mod render;
pub mod traversal;

pub use arena::{Forest, NodeId};
pub use error::{TreeError, TreeResult};
pub use node_ref::NodeRef;
pub use render::{Outline, OutlineStyle, ToTermTree};
pub use traversal::{BreadthFirst, PathBetween, Postorder, Preorder, Walk, Walker};
