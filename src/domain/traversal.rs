//! Traversal walkers.
//!
//! A walker holds only node handles and the forest generation seen at creation,
//! never a borrow. It can be kept across mutations of the forest: the next step
//! then fails with [`TreeError::StaleIterator`] instead of reading the changed
//! shape. [`Walker::iter`] wraps a walker into an ordinary borrowing iterator.

use std::collections::VecDeque;

use tracing::instrument;

use crate::domain::arena::{Forest, NodeId};
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node_ref::NodeRef;

/// Forest generation captured when a walker was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp(u64);

impl Stamp {
    fn take<T>(forest: &Forest<T>) -> Self {
        Self(forest.generation())
    }

    fn check<T>(&self, forest: &Forest<T>) -> TreeResult<()> {
        let found = forest.generation();
        if found == self.0 {
            Ok(())
        } else {
            Err(TreeError::StaleIterator {
                expected: self.0,
                found,
            })
        }
    }
}

/// Single-pass, forward-only sequence of node handles.
pub trait Walker {
    /// Advance one step.
    ///
    /// # Errors
    /// [`TreeError::StaleIterator`] if the forest changed shape since the walker was created.
    /// [`TreeError::NodeNotFound`] if a handle does not resolve in `forest`.
    fn walk_next<T>(&mut self, forest: &Forest<T>) -> TreeResult<Option<NodeId>>;

    /// Forest generation captured when the walker was created.
    fn generation(&self) -> u64;

    /// Borrow `forest` and iterate the remaining nodes.
    ///
    /// The borrow keeps the forest from changing, so staleness is checked once, here.
    ///
    /// # Errors
    /// [`TreeError::StaleIterator`] if the forest changed shape since the walker was created.
    ///
    /// # Panics
    /// During iteration, if the walker was created on a different forest.
    fn iter<T>(self, forest: &Forest<T>) -> TreeResult<Walk<'_, T, Self>>
    where
        Self: Sized,
    {
        Stamp(self.generation()).check(forest)?;
        Ok(Walk::new(forest, self))
    }

    /// Drain the remaining handles, failing on the first stale step.
    fn collect_ids<T>(mut self, forest: &Forest<T>) -> TreeResult<Vec<NodeId>>
    where
        Self: Sized,
    {
        let mut ids = Vec::new();
        while let Some(id) = self.walk_next(forest)? {
            ids.push(id);
        }
        Ok(ids)
    }
}

/// Borrowing iterator over a walker whose stamp matched the forest.
pub struct Walk<'a, T, W> {
    forest: &'a Forest<T>,
    walker: W,
}

impl<'a, T, W: Walker> Walk<'a, T, W> {
    /// Wrap a walker known to be current for `forest`.
    pub(crate) fn new(forest: &'a Forest<T>, walker: W) -> Self {
        Self { forest, walker }
    }
}

impl<'a, T, W: Walker> Iterator for Walk<'a, T, W> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.walker.walk_next(self.forest) {
            Ok(next) => next.map(|id| NodeRef::new(self.forest, id)),
            Err(e) => panic!("walk over a borrowed forest failed: {}", e),
        }
    }
}

/// Preorder: a stack of sibling cursors, each `(parent, next child index)`.
#[derive(Debug, Clone)]
pub struct Preorder {
    stamp: Stamp,
    root: Option<NodeId>,
    stack: Vec<(NodeId, usize)>,
}

impl Preorder {
    pub fn new<T>(forest: &Forest<T>, root: NodeId) -> TreeResult<Self> {
        forest.slot(root)?;
        Ok(Self::start(forest, root))
    }

    pub(crate) fn start<T>(forest: &Forest<T>, root: NodeId) -> Self {
        Self {
            stamp: Stamp::take(forest),
            root: Some(root),
            stack: Vec::new(),
        }
    }
}

impl Walker for Preorder {
    fn generation(&self) -> u64 {
        self.stamp.0
    }

    #[instrument(level = "trace", skip_all)]
    fn walk_next<T>(&mut self, forest: &Forest<T>) -> TreeResult<Option<NodeId>> {
        self.stamp.check(forest)?;

        if let Some(root) = self.root.take() {
            if !forest.slot(root)?.children.is_empty() {
                self.stack.push((root, 0));
            }
            return Ok(Some(root));
        }

        while let Some(cursor) = self.stack.last_mut() {
            let (parent, next) = *cursor;
            let Some(&child) = forest.slot(parent)?.children.get(next) else {
                self.stack.pop();
                continue;
            };
            cursor.1 += 1;
            if !forest.slot(child)?.children.is_empty() {
                self.stack.push((child, 0));
            }
            return Ok(Some(child));
        }
        Ok(None)
    }
}

/// Postorder: an explicit work-stack of `(node, next child index)` frames.
///
/// A node is yielded when its frame runs out of children, so the stack never
/// grows past the depth of the subtree.
#[derive(Debug, Clone)]
pub struct Postorder {
    stamp: Stamp,
    stack: Vec<(NodeId, usize)>,
}

impl Postorder {
    pub fn new<T>(forest: &Forest<T>, root: NodeId) -> TreeResult<Self> {
        forest.slot(root)?;
        Ok(Self::start(forest, root))
    }

    pub(crate) fn start<T>(forest: &Forest<T>, root: NodeId) -> Self {
        Self {
            stamp: Stamp::take(forest),
            stack: vec![(root, 0)],
        }
    }
}

impl Walker for Postorder {
    fn generation(&self) -> u64 {
        self.stamp.0
    }

    #[instrument(level = "trace", skip_all)]
    fn walk_next<T>(&mut self, forest: &Forest<T>) -> TreeResult<Option<NodeId>> {
        self.stamp.check(forest)?;

        while let Some(frame) = self.stack.last_mut() {
            let (node, next) = *frame;
            match forest.slot(node)?.children.get(next) {
                Some(&child) => {
                    frame.1 += 1;
                    self.stack.push((child, 0));
                }
                None => {
                    self.stack.pop();
                    return Ok(Some(node));
                }
            }
        }
        Ok(None)
    }
}

/// Breadth-first: a FIFO queue of sibling cursors.
#[derive(Debug, Clone)]
pub struct BreadthFirst {
    stamp: Stamp,
    root: Option<NodeId>,
    queue: VecDeque<(NodeId, usize)>,
}

impl BreadthFirst {
    pub fn new<T>(forest: &Forest<T>, root: NodeId) -> TreeResult<Self> {
        forest.slot(root)?;
        Ok(Self::start(forest, root))
    }

    pub(crate) fn start<T>(forest: &Forest<T>, root: NodeId) -> Self {
        Self {
            stamp: Stamp::take(forest),
            root: Some(root),
            queue: VecDeque::new(),
        }
    }
}

impl Walker for BreadthFirst {
    fn generation(&self) -> u64 {
        self.stamp.0
    }

    #[instrument(level = "trace", skip_all)]
    fn walk_next<T>(&mut self, forest: &Forest<T>) -> TreeResult<Option<NodeId>> {
        self.stamp.check(forest)?;

        if let Some(root) = self.root.take() {
            if !forest.slot(root)?.children.is_empty() {
                self.queue.push_back((root, 0));
            }
            return Ok(Some(root));
        }

        while let Some(cursor) = self.queue.front_mut() {
            let (parent, next) = *cursor;
            let Some(&child) = forest.slot(parent)?.children.get(next) else {
                self.queue.pop_front();
                continue;
            };
            cursor.1 += 1;
            if !forest.slot(child)?.children.is_empty() {
                self.queue.push_back((child, 0));
            }
            return Ok(Some(child));
        }
        Ok(None)
    }
}

/// Inclusive path from an ancestor down to a descendant.
///
/// Collected eagerly at creation by walking up from the descendant.
#[derive(Debug, Clone)]
pub struct PathBetween {
    stamp: Stamp,
    stack: Vec<NodeId>,
}

impl PathBetween {
    /// # Errors
    /// [`TreeError::NotAnAncestor`] if `ancestor` is not on `descendant`'s parent chain.
    #[instrument(level = "trace", skip(forest))]
    pub fn new<T>(forest: &Forest<T>, ancestor: NodeId, descendant: NodeId) -> TreeResult<Self> {
        forest.slot(ancestor)?;
        forest.slot(descendant)?;

        let mut stack = vec![descendant];
        let mut current = descendant;
        while current != ancestor {
            match forest.linked(current).parent {
                Some(parent) => {
                    stack.push(parent);
                    current = parent;
                }
                None => {
                    return Err(TreeError::NotAnAncestor {
                        ancestor,
                        descendant,
                    })
                }
            }
        }

        Ok(Self {
            stamp: Stamp::take(forest),
            stack,
        })
    }

    /// Nodes not yet yielded.
    pub fn remaining(&self) -> usize {
        self.stack.len()
    }
}

impl Walker for PathBetween {
    fn generation(&self) -> u64 {
        self.stamp.0
    }

    fn walk_next<T>(&mut self, forest: &Forest<T>) -> TreeResult<Option<NodeId>> {
        self.stamp.check(forest)?;
        match self.stack.pop() {
            Some(id) => {
                forest.slot(id)?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }
}
