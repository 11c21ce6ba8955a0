//! Inspection service: lookups, traversal listings and statistics over an outline forest.

use tracing::{debug, instrument};

use crate::application::outline::OutlineForest;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{NodeId, NodeRef, OutlineStyle, ToTermTree};

/// Traversal used for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    Preorder,
    Postorder,
    BreadthFirst,
}

/// Shape summary of one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub root: String,
    pub nodes: usize,
    pub depth: usize,
    pub leaves: usize,
}

impl OutlineForest {
    fn root_refs(&self) -> impl Iterator<Item = NodeRef<'_, String>> + '_ {
        self.roots.iter().filter_map(|&id| self.forest.get(id))
    }

    /// First node carrying `value`, searching each tree in preorder.
    #[instrument(level = "debug", skip(self))]
    pub fn find(&self, value: &str) -> ApplicationResult<NodeId> {
        self.root_refs()
            .flat_map(|root| root.preorder())
            .find(|node| node.value() == value)
            .map(|node| node.id())
            .ok_or_else(|| ApplicationError::NodeValueNotFound(value.to_string()))
    }

    /// Values of every tree in the requested order, one list per root.
    pub fn walk(&self, order: TraversalOrder) -> Vec<Vec<String>> {
        self.root_refs()
            .map(|root| {
                let values: Vec<String> = match order {
                    TraversalOrder::Preorder => root.preorder().map(|n| n.value().clone()).collect(),
                    TraversalOrder::Postorder => {
                        root.postorder().map(|n| n.value().clone()).collect()
                    }
                    TraversalOrder::BreadthFirst => {
                        root.breadth_first().map(|n| n.value().clone()).collect()
                    }
                };
                values
            })
            .collect()
    }

    /// Values on the path from the node valued `from` down to the node valued `to`.
    #[instrument(level = "debug", skip(self))]
    pub fn path(&self, from: &str, to: &str) -> ApplicationResult<Vec<String>> {
        let ancestor = self.find(from)?;
        let descendant = self.forest.node(self.find(to)?)?;
        let path: Vec<String> = descendant
            .path_from(ancestor)?
            .map(|n| n.value().clone())
            .collect();
        debug!(len = path.len(), "path resolved");
        Ok(path)
    }

    pub fn stats(&self) -> Vec<TreeStats> {
        self.root_refs()
            .map(|root| TreeStats {
                root: root.value().clone(),
                nodes: root.preorder().count(),
                depth: root.depth(),
                leaves: root.leaf_count(),
            })
            .collect()
    }

    /// Indented outline of every tree.
    pub fn render_outline(&self, style: &OutlineStyle) -> String {
        self.root_refs()
            .map(|root| root.outline(style).to_string())
            .collect()
    }

    /// Box-drawing rendering of every tree.
    pub fn render_tree(&self) -> String {
        self.root_refs()
            .map(|root| root.to_term_tree().to_string())
            .collect()
    }
}
