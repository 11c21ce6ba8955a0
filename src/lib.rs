//! arbor: mutable trees stored in a generational arena.
//!
//! Nodes live in a [`Forest`] and are addressed by [`NodeId`] handles. Every
//! structural edit (insert, remove, reparent, discard) goes through the forest
//! and bumps its generation, so a detached walker created before the edit
//! reports [`TreeError::StaleIterator`] instead of visiting a changed shape.
//!
//! ```
//! use arbor::{Forest, TreeError};
//!
//! let mut forest = Forest::new();
//! let root = forest.new_node("root");
//! let child = forest.new_node("child");
//! forest.add(root, child)?;
//!
//! let node = forest.node(child)?;
//! assert_eq!(node.level(), 1);
//! assert!(forest.node(root)?.is_ancestor_of(child));
//! # Ok::<(), TreeError>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    BreadthFirst, Forest, NodeId, NodeRef, Outline, OutlineStyle, PathBetween, Postorder,
    Preorder, ToTermTree, TreeError, TreeResult, Walk, Walker,
};
