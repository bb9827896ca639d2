//! Child-slot queries and mutators shared by every layout.

use tracing::{debug, instrument};

use crate::arena::{Forest, NodeId};
use crate::errors::{TreeError, TreeResult};
use crate::event::TreeEvent;
use crate::slots::{ChildSlots, Zone};

impl<D, S: ChildSlots> Forest<D, S> {
    pub fn child_count(&self, id: NodeId) -> TreeResult<usize> {
        Ok(self.node(id)?.slots.child_count())
    }

    pub fn non_null_child_count(&self, id: NodeId) -> TreeResult<usize> {
        Ok(self.node(id)?.non_null_children)
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> TreeResult<Option<NodeId>> {
        let slots = &self.node(id)?.slots;
        let count = slots.child_count();
        if index >= count {
            return Err(TreeError::out_of_range(index, count));
        }
        Ok(slots.child_at(index))
    }

    pub fn child_at_zone(&self, id: NodeId, zone: S::Zone) -> TreeResult<Option<NodeId>> {
        self.child_at(id, zone.index())
    }

    /// Snapshot of every slot, empty ones included.
    pub fn children(&self, id: NodeId) -> TreeResult<Vec<Option<NodeId>>> {
        let slots = &self.node(id)?.slots;
        Ok((0..slots.child_count())
            .map(|index| slots.child_at(index))
            .collect())
    }

    pub fn index_of(&self, id: NodeId, child: NodeId) -> TreeResult<Option<usize>> {
        Ok(self.node(id)?.slots.index_of(child))
    }

    pub fn zone_of(&self, id: NodeId, child: NodeId) -> TreeResult<Option<S::Zone>> {
        Ok(self.index_of(id, child)?.and_then(S::Zone::from_index))
    }

    pub fn is_leaf(&self, id: NodeId) -> TreeResult<bool> {
        Ok(self.node(id)?.slots.is_leaf())
    }

    /// A leaf without user data.
    pub fn is_empty_node(&self, id: NodeId) -> TreeResult<bool> {
        let node = self.node(id)?;
        Ok(node.slots.is_leaf() && node.data.is_empty())
    }

    pub fn is_valid(&self, id: NodeId) -> TreeResult<bool> {
        self.node(id)?;
        Ok(true)
    }

    /// Places `child` in slot `index` of `parent`, or empties the slot for `None`.
    ///
    /// Returns `false` when the slot already holds `child`. The previous
    /// occupant loses its parent. A child attached elsewhere is detached from
    /// its old parent first, so it is never reachable from two parents.
    #[instrument(level = "debug", skip(self))]
    pub fn set_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        child: Option<NodeId>,
    ) -> TreeResult<bool> {
        let count = self.child_count(parent)?;
        if index >= count {
            return Err(TreeError::out_of_range(index, count));
        }
        let current = self.node(parent)?.slots.child_at(index);
        if current == child {
            return Ok(false);
        }
        let Some(child) = child else {
            self.detach_slot(parent, index)?;
            return Ok(true);
        };
        self.check_attachable(parent, child)?;

        if let Some(occupant) = current {
            self.release_occupant(parent, index, occupant)?;
        }

        match self.parent_of(child) {
            Some(old_parent) if old_parent == parent => {
                self.shift_within(parent, index, child)?;
            }
            old_parent => {
                if old_parent.is_some() {
                    self.remove_from_parent(child)?;
                }
                let node = self.node_mut(parent)?;
                node.slots.put(index, Some(child));
                node.non_null_children += 1;
                self.attach_events(parent, index, child);
            }
        }
        Ok(true)
    }

    pub fn set_child_at_zone(
        &mut self,
        parent: NodeId,
        zone: S::Zone,
        child: Option<NodeId>,
    ) -> TreeResult<bool> {
        self.set_child_at(parent, zone.index(), child)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<bool> {
        match self.index_of(parent, child)? {
            Some(index) => Ok(self.detach_slot(parent, index)?.is_some()),
            None => Ok(false),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> TreeResult<Option<NodeId>> {
        let count = self.child_count(parent)?;
        if index >= count {
            return Err(TreeError::out_of_range(index, count));
        }
        self.detach_slot(parent, index)
    }

    /// Appends `child`; only layouts with dynamic arity support this.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<bool> {
        let count = self.child_count(parent)?;
        self.insert_child(parent, count, child)
    }

    /// Inserts `child` before position `index`, shifting later children up.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> TreeResult<bool> {
        let count = self.child_count(parent)?;
        if !S::MOVE_POLICY.is_dynamic() {
            return Err(TreeError::unsupported("insert_child", S::layout_name()));
        }
        if index > count {
            return Err(TreeError::out_of_range(index, count));
        }
        self.check_attachable(parent, child)?;

        match self.parent_of(child) {
            Some(old_parent) if old_parent == parent => {
                let Some(from) = self.node(parent)?.slots.index_of(child) else {
                    return Err(TreeError::illegal(format!(
                        "{child} claims {parent} as parent but is not one of its children"
                    )));
                };
                let target = if from < index { index - 1 } else { index };
                if target == from {
                    return Ok(false);
                }
                let slots = &mut self.node_mut(parent)?.slots;
                slots.take(from);
                slots.insert(target, child)?;
                self.fire(parent, TreeEvent::ChildRemoved { parent, index: from, child });
                self.fire(parent, TreeEvent::ChildAdded { parent, index: target, child });
                return Ok(true);
            }
            Some(_) => {
                self.remove_from_parent(child)?;
            }
            None => {}
        }

        let node = self.node_mut(parent)?;
        node.slots.insert(index, child)?;
        node.non_null_children += 1;
        self.attach_events(parent, index, child);
        Ok(true)
    }

    /// Detaches and returns the last child of a dynamic-arity node.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_last_child(&mut self, parent: NodeId) -> TreeResult<NodeId> {
        let count = self.child_count(parent)?;
        if !S::MOVE_POLICY.is_dynamic() {
            return Err(TreeError::unsupported("remove_last_child", S::layout_name()));
        }
        if count == 0 {
            return Err(TreeError::illegal(format!("{parent} has no child to remove")));
        }
        self.detach_slot(parent, count - 1)?
            .ok_or_else(|| TreeError::illegal(format!("last slot of {parent} is empty")))
    }

    /// `1 + min` over the present children; 1 for a leaf.
    pub fn min_height(&self, id: NodeId) -> TreeResult<usize> {
        Ok(self.height_bounds(id)?.0)
    }

    /// `1 + max` over the present children; 1 for a leaf.
    pub fn max_height(&self, id: NodeId) -> TreeResult<usize> {
        Ok(self.height_bounds(id)?.1)
    }

    #[instrument(level = "trace", skip(self))]
    fn height_bounds(&self, id: NodeId) -> TreeResult<(usize, usize)> {
        let mut bounds: Option<(usize, usize)> = None;
        for (_, child) in self.node(id)?.slots.occupied() {
            let (min, max) = self.height_bounds(child)?;
            bounds = Some(match bounds {
                None => (min, max),
                Some((lo, hi)) => (lo.min(min), hi.max(max)),
            });
        }
        let (min, max) = bounds.unwrap_or((0, 0));
        Ok((1 + min, 1 + max))
    }

    /// Height of every leaf below `id`, in depth-first pre-order.
    /// The enumeration root counts as height 1.
    #[instrument(level = "debug", skip(self))]
    pub fn heights(&self, id: NodeId) -> TreeResult<Vec<usize>> {
        let mut heights = Vec::new();
        self.collect_heights(id, 1, &mut heights)?;
        Ok(heights)
    }

    fn collect_heights(&self, id: NodeId, height: usize, heights: &mut Vec<usize>) -> TreeResult<()> {
        let children = self.node(id)?.slots.occupied();
        if children.is_empty() {
            heights.push(height);
        } else {
            for (_, child) in children {
                self.collect_heights(child, height + 1, heights)?;
            }
        }
        Ok(())
    }

    /// Number of nodes in the subtree rooted at `id`, `id` included.
    pub fn deep_node_count(&self, id: NodeId) -> TreeResult<usize> {
        let mut count = 1;
        for (_, child) in self.node(id)?.slots.occupied() {
            count += self.deep_node_count(child)?;
        }
        Ok(count)
    }

    pub fn deep_user_data_count(&self, id: NodeId) -> TreeResult<usize> {
        let node = self.node(id)?;
        let mut count = node.data.len();
        for (_, child) in node.slots.occupied() {
            count += self.deep_user_data_count(child)?;
        }
        Ok(count)
    }

    /// Rejects attaching `child` below itself.
    pub(crate) fn check_attachable(&self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.node(child)?;
        if self.chain_to_root(parent).contains(&child) {
            return Err(TreeError::illegal(format!(
                "cannot attach {child} into its own subtree under {parent}"
            )));
        }
        Ok(())
    }

    /// Empties slot `index`, clears the former child's parent link and fires
    /// parent-changed on the child, then child-removed on `parent`.
    pub(crate) fn detach_slot(&mut self, parent: NodeId, index: usize) -> TreeResult<Option<NodeId>> {
        let node = self.node_mut(parent)?;
        let Some(child) = node.slots.take(index) else {
            return Ok(None);
        };
        node.non_null_children -= 1;
        self.set_parent_reference(child, None);
        debug!(%parent, index, %child, "Detached child");
        self.fire(
            child,
            TreeEvent::ParentChanged {
                node: child,
                old_parent: Some(parent),
                new_parent: None,
            },
        );
        self.fire(parent, TreeEvent::ChildRemoved { parent, index, child });
        Ok(Some(child))
    }

    /// Like `detach_slot`, but leaves the slot content alone because the
    /// caller overwrites it right after.
    fn release_occupant(&mut self, parent: NodeId, index: usize, occupant: NodeId) -> TreeResult<()> {
        self.node_mut(parent)?.non_null_children -= 1;
        self.set_parent_reference(occupant, None);
        self.fire(
            occupant,
            TreeEvent::ParentChanged {
                node: occupant,
                old_parent: Some(parent),
                new_parent: None,
            },
        );
        self.fire(parent, TreeEvent::ChildRemoved { parent, index, child: occupant });
        Ok(())
    }

    /// Moves `child` from its current slot of `parent` into slot `index`.
    fn shift_within(&mut self, parent: NodeId, index: usize, child: NodeId) -> TreeResult<()> {
        let node = self.node_mut(parent)?;
        let from = node.slots.index_of(child);
        node.slots.put(index, Some(child));
        let mut target = index;
        match from {
            Some(from) => {
                node.slots.take(from);
                if S::MOVE_POLICY.is_dynamic() && from < index {
                    target -= 1;
                }
                self.fire(parent, TreeEvent::ChildRemoved { parent, index: from, child });
            }
            None => node.non_null_children += 1,
        }
        self.fire(parent, TreeEvent::ChildAdded { parent, index: target, child });
        Ok(())
    }

    /// Links `child` to `parent` and fires parent-changed then child-added.
    fn attach_events(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.set_parent_reference(child, Some(parent));
        debug!(%parent, index, %child, "Attached child");
        self.fire(
            child,
            TreeEvent::ParentChanged {
                node: child,
                old_parent: None,
                new_parent: Some(parent),
            },
        );
        self.fire(parent, TreeEvent::ChildAdded { parent, index, child });
    }

    /// Writes the parent link without firing anything.
    pub(crate) fn set_parent_reference(&mut self, child: NodeId, parent: Option<NodeId>) {
        if let Ok(node) = self.node_mut(child) {
            node.parent = parent;
        }
    }
}

impl<D: Clone, S: ChildSlots> Forest<D, S> {
    /// Detaches every child and drops the node's user data.
    ///
    /// Layouts with `RECURSIVE_CLEAR` also clear each detached subtree, after it
    /// has left this node. Detached nodes stay alive in the arena; use
    /// [`destroy`](Forest::destroy) to free them.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self, id: NodeId) -> TreeResult<()> {
        let mut occupied = self.node(id)?.slots.occupied();
        if S::MOVE_POLICY.is_dynamic() {
            // Compacting layouts: detach from the back so indices stay valid
            occupied.reverse();
        }
        for (index, child) in occupied {
            self.detach_slot(id, index)?;
            if S::RECURSIVE_CLEAR {
                self.clear(child)?;
            }
        }
        self.remove_all_user_data(id)?;
        Ok(())
    }
}
