//! Read-only view of a node and the relationship queries built on it.

use std::fmt;

use tracing::instrument;

use crate::domain::arena::{Forest, Node, NodeId};
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::traversal::{BreadthFirst, PathBetween, Postorder, Preorder, Walk};

/// Borrowed handle to a live node.
///
/// Holding a `NodeRef` borrows the forest, so the shape it observes cannot
/// change while it exists. Two refs are equal when they point at the same node
/// of the same forest.
pub struct NodeRef<'a, T> {
    forest: &'a Forest<T>,
    id: NodeId,
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T> PartialEq for NodeRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.forest, other.forest)
    }
}

impl<T> Eq for NodeRef<'_, T> {}

impl<T> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.id).finish()
    }
}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn new(forest: &'a Forest<T>, id: NodeId) -> Self {
        Self { forest, id }
    }

    fn slot(&self) -> &'a Node<T> {
        self.forest.linked(self.id)
    }

    fn at(&self, id: NodeId) -> Self {
        Self::new(self.forest, id)
    }

    /// Resolve an optional handle, treating stale handles as absent.
    fn resolve(&self, node: Option<NodeId>) -> Option<Self> {
        node.and_then(|id| self.forest.get(id))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn forest(&self) -> &'a Forest<T> {
        self.forest
    }

    pub fn value(&self) -> &'a T {
        &self.slot().value
    }

    pub fn parent(&self) -> Option<Self> {
        self.slot().parent.map(|p| self.at(p))
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeRef<'a, T>> + ExactSizeIterator + 'a {
        let forest = self.forest;
        self.slot()
            .children
            .iter()
            .map(move |&c| NodeRef::new(forest, c))
    }

    pub fn child_count(&self) -> usize {
        self.slot().children.len()
    }

    pub fn child(&self, index: usize) -> TreeResult<Self> {
        let children = &self.slot().children;
        children
            .get(index)
            .map(|&c| self.at(c))
            .ok_or(TreeError::OutOfRange {
                index,
                len: children.len(),
            })
    }

    /// Position of `child` among the children, by identity.
    pub fn index_of(&self, child: NodeId) -> Option<usize> {
        self.slot().children.iter().position(|&c| c == child)
    }

    pub fn is_root(&self) -> bool {
        self.slot().parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.slot().children.is_empty()
    }

    pub fn root(&self) -> Self {
        let mut current = *self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Parent hops from this node to its root. A root is at level 0.
    pub fn level(&self) -> usize {
        let mut levels = 0;
        let mut current = self.slot().parent;
        while let Some(id) = current {
            levels += 1;
            current = self.forest.linked(id).parent;
        }
        levels
    }

    /// Longest distance from this node down to a leaf of its subtree.
    ///
    /// Breadth-first order never decreases in level, so the last node visited
    /// is on the deepest level.
    #[instrument(level = "trace")]
    pub fn depth(&self) -> usize {
        let last = self.breadth_first().last().unwrap_or(*self);
        last.level() - self.level()
    }

    /// Nodes from the root down to this node, both included.
    pub fn path(&self) -> Vec<Self> {
        self.path_to_root(Some(*self), 0)
    }

    // The buffer is allocated once the walk reaches the top, when its length is known.
    fn path_to_root(&self, node: Option<Self>, depth: usize) -> Vec<Self> {
        match node {
            None => vec![*self; depth],
            Some(node) => {
                let mut path = self.path_to_root(node.parent(), depth + 1);
                let index = path.len() - depth - 1;
                path[index] = node;
                path
            }
        }
    }

    // ------------------------------------------------------------
    // Ancestry
    // ------------------------------------------------------------

    /// Whether this node is `node` or lies on `node`'s parent chain.
    ///
    /// Absent and stale handles are never descendants.
    pub fn is_ancestor_of(&self, node: impl Into<Option<NodeId>>) -> bool {
        let Some(node) = self.resolve(node.into()) else {
            return false;
        };
        let mut current = Some(node.id);
        while let Some(id) = current {
            if id == self.id {
                return true;
            }
            current = self.forest.linked(id).parent;
        }
        false
    }

    /// Whether `node` is an ancestor of this node (reflexive).
    pub fn is_descendant_of(&self, node: impl Into<Option<NodeId>>) -> bool {
        self.resolve(node.into())
            .is_some_and(|ancestor| ancestor.is_ancestor_of(self.id))
    }

    /// Nearest node that is an ancestor of both, or `None` for disjoint trees.
    pub fn shared_ancestor(&self, other: impl Into<Option<NodeId>>) -> Option<Self> {
        let other = self.resolve(other.into())?;
        if other == *self {
            return Some(other);
        }

        let (level1, level2) = (self.level(), other.level());
        let (mut deeper, mut shallower, diff) = if level2 > level1 {
            (other, *self, level2 - level1)
        } else {
            (*self, other, level1 - level2)
        };
        for _ in 0..diff {
            deeper = deeper.parent()?;
        }

        loop {
            if deeper == shallower {
                return Some(deeper);
            }
            match (deeper.parent(), shallower.parent()) {
                (Some(a), Some(b)) => {
                    deeper = a;
                    shallower = b;
                }
                (None, None) => return None,
                _ => panic!(
                    "nodes {} and {} reached the top at different levels",
                    deeper.id, shallower.id
                ),
            }
        }
    }

    /// Whether both nodes belong to the same tree.
    pub fn is_related(&self, other: impl Into<Option<NodeId>>) -> bool {
        self.resolve(other.into())
            .is_some_and(|other| other.root() == self.root())
    }

    // ------------------------------------------------------------
    // Children
    // ------------------------------------------------------------

    pub fn is_child(&self, node: impl Into<Option<NodeId>>) -> bool {
        self.resolve(node.into())
            .is_some_and(|node| node.slot().parent == Some(self.id))
    }

    pub fn first_child(&self) -> TreeResult<Self> {
        self.slot()
            .children
            .first()
            .map(|&c| self.at(c))
            .ok_or(TreeError::EmptyCollection(self.id))
    }

    pub fn last_child(&self) -> TreeResult<Self> {
        self.slot()
            .children
            .last()
            .map(|&c| self.at(c))
            .ok_or(TreeError::EmptyCollection(self.id))
    }

    /// Child following `child`, `None` if `child` is the last one.
    pub fn child_after(&self, child: NodeId) -> TreeResult<Option<Self>> {
        let index = self.index_of(child).ok_or(TreeError::NotAChild {
            parent: self.id,
            child,
        })?;
        Ok(self.slot().children.get(index + 1).map(|&c| self.at(c)))
    }

    /// Child preceding `child`, `None` if `child` is the first one.
    pub fn child_before(&self, child: NodeId) -> TreeResult<Option<Self>> {
        let index = self.index_of(child).ok_or(TreeError::NotAChild {
            parent: self.id,
            child,
        })?;
        Ok(index
            .checked_sub(1)
            .map(|before| self.at(self.slot().children[before])))
    }

    // ------------------------------------------------------------
    // Siblings
    // ------------------------------------------------------------

    /// Whether `node` shares this node's parent. A node is its own sibling.
    pub fn is_sibling(&self, node: impl Into<Option<NodeId>>) -> bool {
        let Some(node) = self.resolve(node.into()) else {
            return false;
        };
        if node == *self {
            return true;
        }
        match self.parent() {
            Some(parent) if node.slot().parent == Some(parent.id) => {
                assert!(
                    parent.index_of(node.id).is_some(),
                    "sibling {} has a different parent",
                    node.id
                );
                true
            }
            _ => false,
        }
    }

    /// Number of children of the parent, counting this node. 1 for a root.
    pub fn sibling_count(&self) -> usize {
        self.parent().map_or(1, |parent| parent.child_count())
    }

    /// Parent and this node's position in it.
    fn position(&self) -> Option<(Self, usize)> {
        let parent = self.parent()?;
        match parent.index_of(self.id) {
            Some(index) => Some((parent, index)),
            None => panic!("node {} is not a child of its parent {}", self.id, parent.id),
        }
    }

    pub fn next_sibling(&self) -> Option<Self> {
        let (parent, index) = self.position()?;
        parent.child(index + 1).ok()
    }

    pub fn previous_sibling(&self) -> Option<Self> {
        let (parent, index) = self.position()?;
        parent.child(index.checked_sub(1)?).ok()
    }

    // ------------------------------------------------------------
    // Leaves
    // ------------------------------------------------------------

    /// Leftmost leaf of this subtree; the node itself if it is a leaf.
    pub fn first_leaf(&self) -> Self {
        let mut node = *self;
        while let Ok(child) = node.first_child() {
            node = child;
        }
        node
    }

    /// Rightmost leaf of this subtree; the node itself if it is a leaf.
    pub fn last_leaf(&self) -> Self {
        let mut node = *self;
        while let Ok(child) = node.last_child() {
            node = child;
        }
        node
    }

    /// First leaf after this node's subtree, within the same tree.
    pub fn next_leaf(&self) -> Option<Self> {
        let mut node = *self;
        loop {
            node.parent()?;
            if let Some(next) = node.next_sibling() {
                return Some(next.first_leaf());
            }
            node = node.parent()?;
        }
    }

    /// Last leaf before this node's subtree, within the same tree.
    pub fn previous_leaf(&self) -> Option<Self> {
        let mut node = *self;
        loop {
            node.parent()?;
            if let Some(previous) = node.previous_sibling() {
                return Some(previous.last_leaf());
            }
            node = node.parent()?;
        }
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        let count = self.breadth_first().filter(|node| node.is_leaf()).count();
        assert!(count > 0, "subtree of {} has no leaves", self.id);
        count
    }

    // ------------------------------------------------------------
    // Preorder neighbours
    // ------------------------------------------------------------

    /// Node after this one in a preorder walk of the whole tree.
    pub fn next_node(&self) -> Option<Self> {
        if let Ok(child) = self.first_child() {
            return Some(child);
        }
        let mut node = *self;
        loop {
            if let Some(next) = node.next_sibling() {
                return Some(next);
            }
            node = node.parent()?;
        }
    }

    /// Node before this one in a preorder walk of the whole tree.
    pub fn previous_node(&self) -> Option<Self> {
        let parent = self.parent()?;
        match self.previous_sibling() {
            Some(previous) => Some(previous.last_leaf()),
            None => Some(parent),
        }
    }

    // ------------------------------------------------------------
    // Traversals
    // ------------------------------------------------------------

    /// Each node before its subtree, children left to right.
    pub fn preorder(&self) -> Walk<'a, T, Preorder> {
        Walk::new(self.forest, Preorder::start(self.forest, self.id))
    }

    /// Each node after its subtree, starting with the leftmost leaf.
    pub fn postorder(&self) -> Walk<'a, T, Postorder> {
        Walk::new(self.forest, Postorder::start(self.forest, self.id))
    }

    /// Alias of [`NodeRef::postorder`].
    pub fn depth_first(&self) -> Walk<'a, T, Postorder> {
        self.postorder()
    }

    /// Level by level, left to right within a level.
    pub fn breadth_first(&self) -> Walk<'a, T, BreadthFirst> {
        Walk::new(self.forest, BreadthFirst::start(self.forest, self.id))
    }

    /// Nodes from `ancestor` down to this node, both included.
    ///
    /// # Errors
    /// [`TreeError::NotAnAncestor`] if `ancestor` is not on this node's parent chain.
    pub fn path_from(&self, ancestor: NodeId) -> TreeResult<Walk<'a, T, PathBetween>> {
        let walker = PathBetween::new(self.forest, ancestor, self.id)?;
        Ok(Walk::new(self.forest, walker))
    }
}
