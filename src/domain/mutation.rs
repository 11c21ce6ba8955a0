//! Structural mutation: the only writers of parent/children links.

use tracing::{debug, instrument, trace};

use crate::domain::arena::{Forest, NodeId};
use crate::domain::error::{TreeError, TreeResult};

impl<T> Forest<T> {
    /// Link `child` into `parent`'s children at `index`.
    ///
    /// A child that already has a parent is detached from it first, so the
    /// number of nodes in the forest stays the same. `index` is checked against
    /// the child count after that detach.
    ///
    /// # Errors
    /// * [`TreeError::CycleDetected`] if `child` is `parent` or one of its ancestors
    /// * [`TreeError::OutOfRange`] if `index` is past the end of the child list
    /// * [`TreeError::NodeNotFound`] for a stale handle
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, parent: NodeId, index: usize, child: NodeId) -> TreeResult<()> {
        self.slot(parent)?;
        let old_parent = self.slot(child)?.parent;

        if self.reaches(parent, child) {
            return Err(TreeError::CycleDetected { parent, child });
        }

        let mut len = self.linked(parent).children.len();
        if old_parent == Some(parent) {
            len -= 1;
        }
        if index > len {
            return Err(TreeError::OutOfRange { index, len });
        }

        if let Some(old) = old_parent {
            trace!(%old, "detaching before re-parent");
            self.unlink(old, child);
        }
        self.linked_mut(parent).children.insert(index, child);
        self.linked_mut(child).parent = Some(parent);
        self.bump_generation();
        Ok(())
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Re-adding an existing child moves it to the end.
    #[instrument(level = "debug", skip(self))]
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        let mut len = self.slot(parent)?.children.len();
        if self.slot(child)?.parent == Some(parent) {
            len -= 1;
        }
        self.insert(parent, len, child)
    }

    /// Detach the child at `index` and return its handle.
    ///
    /// The detached node keeps its subtree and stays in the forest as a root.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, parent: NodeId, index: usize) -> TreeResult<NodeId> {
        let len = self.slot(parent)?.children.len();
        if index >= len {
            return Err(TreeError::OutOfRange { index, len });
        }

        let child = self.linked_mut(parent).children.remove(index);
        self.linked_mut(child).parent = None;
        self.bump_generation();
        Ok(child)
    }

    /// Detach `child` from `parent`, found by identity.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.slot(child)?;
        let index = self
            .slot(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(TreeError::NotAChild { parent, child })?;
        self.remove(parent, index).map(|_| ())
    }

    /// Detach every child of `parent`, last index first.
    ///
    /// Returns the detached handles in their former child order.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_all_children(&mut self, parent: NodeId) -> TreeResult<Vec<NodeId>> {
        let len = self.slot(parent)?.children.len();
        let mut removed = Vec::with_capacity(len);
        for index in (0..len).rev() {
            removed.push(self.remove(parent, index)?);
        }
        removed.reverse();
        Ok(removed)
    }

    /// Detach `node` from its parent. No-op for a root.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_from_parent(&mut self, node: NodeId) -> TreeResult<()> {
        if let Some(parent) = self.slot(node)?.parent {
            self.remove_child(parent, node)?;
        }
        Ok(())
    }

    /// Replace the payload of `node`, returning the previous one.
    pub fn set_value(&mut self, node: NodeId, value: T) -> TreeResult<T> {
        Ok(std::mem::replace(&mut self.slot_mut(node)?.value, value))
    }

    /// Detach `node` and release it together with its whole subtree.
    ///
    /// Returns the number of nodes released. Handles into the subtree are stale afterwards.
    #[instrument(level = "debug", skip(self))]
    pub fn discard(&mut self, node: NodeId) -> TreeResult<usize> {
        self.remove_from_parent(node)?;

        let mut released = 0;
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(slot) = self.release(current) {
                stack.extend(slot.children);
                released += 1;
            }
        }
        self.bump_generation();
        debug!(released, "subtree discarded");
        Ok(released)
    }

    /// Whether `target` is `from` or lies on `from`'s parent chain.
    fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut current = Some(from);
        while let Some(id) = current {
            if id == target {
                return true;
            }
            current = self.linked(id).parent;
        }
        false
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        let children = &mut self.linked_mut(parent).children;
        let index = children.iter().position(|&c| c == child);
        assert!(
            index.is_some(),
            "node {} lists parent {} but is not among its children",
            child,
            parent
        );
        if let Some(index) = index {
            children.remove(index);
        }
    }
}
