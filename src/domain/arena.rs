use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node_ref::NodeRef;

/// Stable handle to a node in a [`Forest`].
///
/// Handles stay valid across any re-parenting. Once the node is discarded the
/// handle resolves to [`TreeError::NodeNotFound`], even if the arena slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}@{}", slot, generation)
    }
}

/// Tree node stored in the arena.
#[derive(Debug)]
pub(crate) struct Node<T> {
    /// User payload
    pub(crate) value: T,
    /// Parent handle, None for root nodes
    pub(crate) parent: Option<NodeId>,
    /// Child handles in insertion order
    pub(crate) children: Vec<NodeId>,
}

/// Arena owning every node of one or more trees.
///
/// Nodes are created standalone and linked with the mutation operations. The
/// forest keeps a generation counter that changes on every structural write;
/// detached walkers compare against it to detect that the shape changed under them.
///
/// Node storage stays private; nodes are read through [`NodeRef`] views.
///
/// ```compile_fail
/// use arbor::domain::arena::Node;
/// ```
#[derive(Debug)]
pub struct Forest<T> {
    /// Arena storage for all nodes
    arena: Arena<Node<T>>,
    /// Bumped on every write to parent/children links
    generation: u64,
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Forest<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            generation: 0,
        }
    }

    /// Create a standalone node: no parent, no children.
    #[instrument(level = "trace", skip_all)]
    pub fn new_node(&mut self, value: T) -> NodeId {
        NodeId(self.arena.insert(Node {
            value,
            parent: None,
            children: Vec::new(),
        }))
    }

    /// Number of live nodes across all trees.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, T>> {
        if self.contains(id) {
            Some(NodeRef::new(self, id))
        } else {
            None
        }
    }

    /// Read-only view of a node, failing if the handle is stale.
    pub fn node(&self, id: NodeId) -> TreeResult<NodeRef<'_, T>> {
        self.get(id).ok_or(TreeError::NodeNotFound(id))
    }

    pub fn value(&self, id: NodeId) -> TreeResult<&T> {
        self.arena
            .get(id.0)
            .map(|node| &node.value)
            .ok_or(TreeError::NodeNotFound(id))
    }

    /// Mutable access to a payload. Not a structural change.
    pub fn value_mut(&mut self, id: NodeId) -> TreeResult<&mut T> {
        self.arena
            .get_mut(id.0)
            .map(|node| &mut node.value)
            .ok_or(TreeError::NodeNotFound(id))
    }

    /// Handles of all parentless nodes, in arena order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.arena
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(idx, _)| NodeId(idx))
    }

    pub(crate) fn slot(&self, id: NodeId) -> TreeResult<&Node<T>> {
        self.arena.get(id.0).ok_or(TreeError::NodeNotFound(id))
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> TreeResult<&mut Node<T>> {
        self.arena.get_mut(id.0).ok_or(TreeError::NodeNotFound(id))
    }

    /// Node lookup for handles reached through parent/children links.
    ///
    /// Panics if the link is dangling: that is broken bookkeeping, not a caller error.
    pub(crate) fn linked(&self, id: NodeId) -> &Node<T> {
        match self.arena.get(id.0) {
            Some(node) => node,
            None => panic!("dangling link to {}: forest bookkeeping is broken", id),
        }
    }

    pub(crate) fn linked_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.arena.get_mut(id.0) {
            Some(node) => node,
            None => panic!("dangling link to {}: forest bookkeeping is broken", id),
        }
    }

    pub(crate) fn release(&mut self, id: NodeId) -> Option<Node<T>> {
        self.arena.remove(id.0)
    }

    pub(crate) fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
