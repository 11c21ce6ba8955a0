//! Diagnostic renderers.
//!
//! Both walk the subtree recursively on their own instead of going through the
//! walkers, so rendering never observes a stale walker.

use std::fmt;

use termtree::Tree;
use tracing::instrument;

use crate::domain::node_ref::NodeRef;

/// Layout of the indented outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineStyle {
    /// Spaces per level
    pub indent: usize,
    /// Text written before each value
    pub prefix: String,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            indent: 2,
            prefix: "+- ".to_string(),
        }
    }
}

/// Displayable outline of a subtree, one line per node.
///
/// ```text
/// +- a
///   +- b
///     +- d
///   +- c
/// ```
pub struct Outline<'a, 's, T> {
    node: NodeRef<'a, T>,
    style: &'s OutlineStyle,
}

impl<'a, T> NodeRef<'a, T> {
    pub fn outline<'s>(&self, style: &'s OutlineStyle) -> Outline<'a, 's, T> {
        Outline { node: *self, style }
    }
}

impl<T: fmt::Display> Outline<'_, '_, T> {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, node: NodeRef<'_, T>, level: usize) -> fmt::Result {
        write!(f, "{:width$}", "", width = level * self.style.indent)?;
        writeln!(f, "{}{}", self.style.prefix, node.value())?;
        for child in node.children() {
            self.write_node(f, child, level + 1)?;
        }
        Ok(())
    }
}

impl<T: fmt::Display> fmt::Display for Outline<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.node, 0)
    }
}

impl<T: fmt::Display> fmt::Display for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.outline(&OutlineStyle::default()), f)
    }
}

/*
termtree draws the box characters; the conversion only has to mirror the
children recursively into Tree leaves.
 */
pub trait ToTermTree {
    fn to_term_tree(&self) -> Tree<String>;
}

impl<T: fmt::Display> ToTermTree for NodeRef<'_, T> {
    #[instrument(level = "trace")]
    fn to_term_tree(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children().map(|c| c.to_term_tree()).collect();
        Tree::new(self.value().to_string()).with_leaves(leaves)
    }
}
