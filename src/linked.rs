//! Operations that depend on the parent link: removal from the parent, moves
//! between parents and relinking after reconstruction.

use tracing::{debug, instrument};

use crate::arena::{Forest, NodeId};
use crate::errors::{TreeError, TreeResult};
use crate::event::TreeEvent;
use crate::slots::{ChildSlots, MovePolicy, Zone};

impl<D, S: ChildSlots> Forest<D, S> {
    /// Empties the parent slot holding `id`. Returns the former parent.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_from_parent(&mut self, id: NodeId) -> TreeResult<Option<NodeId>> {
        self.node(id)?;
        let Some(parent) = self.parent_of(id) else {
            // Dangling link to a destroyed parent
            self.set_parent_reference(id, None);
            return Ok(None);
        };
        match self.node(parent)?.slots.index_of(id) {
            Some(index) => {
                self.detach_slot(parent, index)?;
            }
            None => self.set_parent_reference(id, None),
        }
        Ok(Some(parent))
    }

    /// Removes `id` together with every ancestor that would be left empty by the
    /// removal, as one structural change at the topmost such ancestor.
    ///
    /// An ancestor collapses when `id`'s branch is its only child and it holds
    /// no user data. Roots never collapse. Returns the parent the removed branch
    /// was detached from.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_deeply_from_parent(&mut self, id: NodeId) -> TreeResult<Option<NodeId>> {
        self.node(id)?;
        let mut top = id;
        while let Some(parent) = self.parent_of(top) {
            let node = self.node(parent)?;
            let collapses = node.non_null_children == 1 && node.data.is_empty();
            if collapses && self.parent_of(parent).is_some() {
                top = parent;
            } else {
                break;
            }
        }
        debug!(%id, %top, "Removing branch");
        self.remove_from_parent(top)
    }

    /// Moves `id` under `new_parent` at `index`.
    ///
    /// Fixed layouts replace: an occupant of the destination slot is evicted and
    /// becomes parentless, and an index outside the arity is an error. Dynamic
    /// layouts insert: later children shift up, nothing is evicted, and the index
    /// is clamped into `[0, len]`.
    ///
    /// All slots are updated before any event fires. Then child-removed fires on
    /// the old parent, child-added on the new one, and parent-changed on `id`,
    /// reaching both the new and the old ancestor chains. Returns `false` when
    /// `new_parent` already is the parent.
    #[instrument(level = "debug", skip(self))]
    pub fn move_to(&mut self, id: NodeId, new_parent: NodeId, index: usize) -> TreeResult<bool> {
        self.node(id)?;
        let count = self.child_count(new_parent)?;
        let index = match S::MOVE_POLICY {
            MovePolicy::Replace if index >= count => {
                return Err(TreeError::out_of_range(index, count));
            }
            MovePolicy::Replace => index,
            MovePolicy::Insert => index.min(count),
        };
        let old_parent = self.parent_of(id);
        if old_parent == Some(new_parent) {
            return Ok(false);
        }
        self.check_attachable(new_parent, id)?;

        let mut old_slot = None;
        if let Some(parent) = old_parent {
            let node = self.node_mut(parent)?;
            if let Some(old_index) = node.slots.index_of(id) {
                node.slots.take(old_index);
                node.non_null_children -= 1;
                old_slot = Some((parent, old_index));
            }
        }

        match S::MOVE_POLICY {
            MovePolicy::Replace => {
                self.detach_slot(new_parent, index)?;
                self.node_mut(new_parent)?.slots.put(index, Some(id));
            }
            MovePolicy::Insert => {
                self.node_mut(new_parent)?.slots.insert(index, id)?;
            }
        }
        self.node_mut(new_parent)?.non_null_children += 1;
        self.set_parent_reference(id, Some(new_parent));
        debug!(%id, %new_parent, index, "Moved node");

        if let Some((parent, old_index)) = old_slot {
            self.fire(
                parent,
                TreeEvent::ChildRemoved {
                    parent,
                    index: old_index,
                    child: id,
                },
            );
        }
        self.fire(
            new_parent,
            TreeEvent::ChildAdded {
                parent: new_parent,
                index,
                child: id,
            },
        );
        let mut targets = self.chain_to_root(id);
        if let Some(parent) = old_parent {
            for ancestor in self.chain_to_root(parent) {
                if !targets.contains(&ancestor) {
                    targets.push(ancestor);
                }
            }
        }
        self.notify(
            &targets,
            &TreeEvent::ParentChanged {
                node: id,
                old_parent,
                new_parent: Some(new_parent),
            },
        );
        Ok(true)
    }

    pub fn move_to_zone(&mut self, id: NodeId, new_parent: NodeId, zone: S::Zone) -> TreeResult<bool> {
        self.move_to(id, new_parent, zone.index())
    }

    /// Re-establishes the parent link of every node below `root` from the slot
    /// contents, without firing events. Returns the number of links written.
    #[instrument(level = "debug", skip(self))]
    pub fn relink_parents(&mut self, root: NodeId) -> TreeResult<usize> {
        self.node(root)?;
        let links: Vec<(NodeId, NodeId)> = self
            .iter_preorder(root)
            .flat_map(|(parent, node)| {
                node.slots
                    .occupied()
                    .into_iter()
                    .map(move |(_, child)| (parent, child))
            })
            .collect();
        for (parent, child) in &links {
            self.set_parent_reference(*child, Some(*parent));
        }
        Ok(links.len())
    }

    /// Rebuilds every parent link in the forest from the slot contents. Nodes
    /// referenced by no slot become roots.
    #[instrument(level = "debug", skip(self))]
    pub fn relink_all_parents(&mut self) -> usize {
        let mut links = Vec::new();
        let mut all = Vec::with_capacity(self.len());
        for (parent, node) in self.nodes() {
            all.push(parent);
            links.extend(node.slots.occupied().into_iter().map(|(_, child)| (parent, child)));
        }
        for id in all {
            self.set_parent_reference(id, None);
        }
        for (parent, child) in &links {
            self.set_parent_reference(*child, Some(*parent));
        }
        debug!(count = links.len(), "Relinked parents");
        links.len()
    }
}
