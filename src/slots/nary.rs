//! Variable-arity layouts.

use crate::arena::NodeId;
use crate::errors::{TreeError, TreeResult};
use crate::slots::{ChildSlots, MovePolicy};

/// N slots fixed at construction; any slot may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantNarySlots {
    slots: Box<[Option<NodeId>]>,
}

impl ConstantNarySlots {
    pub fn new(arity: usize) -> Self {
        Self {
            slots: vec![None; arity].into_boxed_slice(),
        }
    }
}

impl ChildSlots for ConstantNarySlots {
    type Zone = usize;

    const LAYOUT: &'static str = "constant n-ary";

    fn child_count(&self) -> usize {
        self.slots.len()
    }

    fn child_at(&self, index: usize) -> Option<NodeId> {
        self.slots.get(index).copied().flatten()
    }

    fn put(&mut self, index: usize, child: Option<NodeId>) -> Option<NodeId> {
        match self.slots.get_mut(index) {
            Some(slot) => std::mem::replace(slot, child),
            None => None,
        }
    }
}

/// Compacting list of children. There are never empty slots: removing a child
/// shifts the following ones down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NarySlots {
    children: Vec<NodeId>,
}

impl NarySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            children: Vec::with_capacity(capacity),
        }
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.children
    }
}

impl ChildSlots for NarySlots {
    type Zone = usize;

    const LAYOUT: &'static str = "n-ary";

    const MOVE_POLICY: MovePolicy = MovePolicy::Insert;

    const RECURSIVE_CLEAR: bool = false;

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_at(&self, index: usize) -> Option<NodeId> {
        self.children.get(index).copied()
    }

    fn put(&mut self, index: usize, child: Option<NodeId>) -> Option<NodeId> {
        match child {
            Some(child) => self
                .children
                .get_mut(index)
                .map(|slot| std::mem::replace(slot, child)),
            None => self.take(index),
        }
    }

    fn take(&mut self, index: usize) -> Option<NodeId> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    fn insert(&mut self, index: usize, child: NodeId) -> TreeResult<()> {
        if index > self.children.len() {
            return Err(TreeError::out_of_range(index, self.children.len()));
        }
        self.children.insert(index, child);
        Ok(())
    }

    fn index_of(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    fn occupied(&self) -> Vec<(usize, NodeId)> {
        self.children.iter().copied().enumerate().collect()
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
