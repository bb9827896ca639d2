//! Structural-change notifications.
//!
//! Every event is delivered first to the listeners of the node it originates
//! from, then to the listeners of each ancestor, ending at the root. Delivery is
//! synchronous and cannot be cancelled. Listeners only see the event, never the
//! forest, so they cannot observe a half-applied mutation.

use std::fmt;

use crate::arena::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeEventKind {
    ChildAdded,
    ChildRemoved,
    ParentChanged,
    DataChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent<D> {
    ChildAdded {
        parent: NodeId,
        index: usize,
        child: NodeId,
    },
    ChildRemoved {
        parent: NodeId,
        index: usize,
        child: NodeId,
    },
    ParentChanged {
        node: NodeId,
        old_parent: Option<NodeId>,
        new_parent: Option<NodeId>,
    },
    DataChanged {
        node: NodeId,
        removed: Vec<D>,
        added: Vec<D>,
        /// Number of items held by the node after the change.
        count: usize,
    },
}

impl<D> TreeEvent<D> {
    pub fn kind(&self) -> TreeEventKind {
        match self {
            Self::ChildAdded { .. } => TreeEventKind::ChildAdded,
            Self::ChildRemoved { .. } => TreeEventKind::ChildRemoved,
            Self::ParentChanged { .. } => TreeEventKind::ParentChanged,
            Self::DataChanged { .. } => TreeEventKind::DataChanged,
        }
    }

    /// The node whose state changed.
    pub fn source(&self) -> NodeId {
        match self {
            Self::ChildAdded { parent, .. } | Self::ChildRemoved { parent, .. } => *parent,
            Self::ParentChanged { node, .. } | Self::DataChanged { node, .. } => *node,
        }
    }

    /// Signed change in user-data count; zero for structural events.
    pub fn delta(&self) -> isize {
        match self {
            Self::DataChanged { removed, added, .. } => added.len() as isize - removed.len() as isize,
            _ => 0,
        }
    }
}

pub trait TreeNodeListener<D> {
    fn on_event(&mut self, event: &TreeEvent<D>);
}

impl<D, F> TreeNodeListener<D> for F
where
    F: FnMut(&TreeEvent<D>),
{
    fn on_event(&mut self, event: &TreeEvent<D>) {
        self(event)
    }
}

/// Handle returned by `add_listener`, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

pub(crate) struct Listeners<D> {
    entries: Vec<(ListenerId, Box<dyn TreeNodeListener<D>>)>,
}

impl<D> Default for Listeners<D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<D> fmt::Debug for Listeners<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}

impl<D> Listeners<D> {
    pub(crate) fn add(&mut self, id: ListenerId, listener: Box<dyn TreeNodeListener<D>>) {
        self.entries.push((id, listener));
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(candidate, _)| *candidate != id);
        before != self.entries.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn notify(&mut self, event: &TreeEvent<D>) {
        for (_, listener) in self.entries.iter_mut() {
            listener.on_event(event);
        }
    }
}
