//! Child-slot layouts.
//!
//! A layout decides how many children a node has and how they are addressed.
//! Fixed layouts (binary, quad, oct) keep one named field per zone; the n-ary
//! layouts keep a boxed slice or a compacting vector; the icosep decorator adds a
//! single extra slot on top of a fixed layout.

use std::fmt;

use crate::arena::NodeId;
use crate::errors::{TreeError, TreeResult};

mod fixed;
mod icosep;
mod nary;

pub use fixed::{BinarySlots, BinaryTreeZone, OctSlots, OctTreeZone, QuadSlots, QuadTreeZone};
pub use icosep::{IcosepSlots, IcosepZone};
pub use nary::{ConstantNarySlots, NarySlots};

/// How `move_to` treats an occupied destination slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePolicy {
    /// The occupant is evicted and becomes parentless. Out-of-range indices are errors.
    Replace,
    /// Later children shift up by one. Indices are clamped into `[0, len]`.
    Insert,
}

impl MovePolicy {
    pub fn is_dynamic(self) -> bool {
        matches!(self, Self::Insert)
    }
}

/// Ordinal designation of a child slot.
pub trait Zone: Copy + Eq + fmt::Debug {
    fn index(self) -> usize;
    fn from_index(index: usize) -> Option<Self>;
}

/// A zone enumeration with a fixed number of members.
pub trait FixedZone: Zone {
    const COUNT: usize;
}

impl Zone for usize {
    fn index(self) -> usize {
        self
    }

    fn from_index(index: usize) -> Option<Self> {
        Some(index)
    }
}

/// Storage for the children of one node.
///
/// Implementations only store ids. Parent links, the running non-null count and
/// event firing are handled by [`Forest`](crate::Forest), which validates indices
/// before calling [`put`](ChildSlots::put) or [`take`](ChildSlots::take).
pub trait ChildSlots: fmt::Debug {
    type Zone: Zone;

    /// Short layout name; see [`layout_name`](ChildSlots::layout_name).
    const LAYOUT: &'static str;

    const MOVE_POLICY: MovePolicy = MovePolicy::Replace;

    /// Whether `clear` also clears the subtrees it detaches.
    const RECURSIVE_CLEAR: bool = true;

    /// Layout name as shown to users; decorators include their base layout.
    fn layout_name() -> String {
        Self::LAYOUT.to_owned()
    }

    fn child_count(&self) -> usize;

    /// Occupant of `index`, `None` for an empty or out-of-range slot.
    fn child_at(&self, index: usize) -> Option<NodeId>;

    /// Overwrites slot `index` and returns the previous occupant.
    /// Writing `Some` never shifts other children.
    fn put(&mut self, index: usize, child: Option<NodeId>) -> Option<NodeId>;

    /// Empties slot `index`. Compacting layouts shift later children down.
    fn take(&mut self, index: usize) -> Option<NodeId> {
        self.put(index, None)
    }

    /// Inserts `child` at `index`, shifting later children up.
    fn insert(&mut self, index: usize, child: NodeId) -> TreeResult<()> {
        let _ = (index, child);
        Err(TreeError::unsupported("insert_child", Self::layout_name()))
    }

    fn index_of(&self, child: NodeId) -> Option<usize> {
        (0..self.child_count()).find(|&index| self.child_at(index) == Some(child))
    }

    /// Occupied slots in index order.
    fn occupied(&self) -> Vec<(usize, NodeId)> {
        (0..self.child_count())
            .filter_map(|index| self.child_at(index).map(|child| (index, child)))
            .collect()
    }

    fn is_leaf(&self) -> bool {
        (0..self.child_count()).all(|index| self.child_at(index).is_none())
    }
}
