//! User-data access on forest nodes.
//!
//! Every mutation fires one data-changed event carrying the removed and added
//! items. [`UserDataView`] routes its mutations through the same methods, so
//! generic code editing payloads through the view cannot bypass notification.

use tracing::{instrument, trace};

use crate::arena::{Forest, NodeId};
use crate::errors::{TreeError, TreeResult};
use crate::event::TreeEvent;
use crate::store::UserDataIter;

impl<D, S> Forest<D, S> {
    pub fn user_data(&self, id: NodeId) -> TreeResult<UserDataIter<'_, D>> {
        Ok(self.node(id)?.data.iter())
    }

    pub fn first_user_data(&self, id: NodeId) -> TreeResult<Option<&D>> {
        Ok(self.node(id)?.data.first())
    }

    pub fn user_data_at(&self, id: NodeId, index: usize) -> TreeResult<&D> {
        self.node(id)?.data.try_get(index)
    }

    pub fn user_data_count(&self, id: NodeId) -> TreeResult<usize> {
        Ok(self.node(id)?.data.len())
    }
}

impl<D: Clone, S> Forest<D, S> {
    fn fire_data_changed(&mut self, id: NodeId, removed: Vec<D>, added: Vec<D>) {
        let count = self.arena_data_len(id);
        trace!(%id, removed = removed.len(), added = added.len(), "User data changed");
        self.fire(
            id,
            TreeEvent::DataChanged {
                node: id,
                removed,
                added,
                count,
            },
        );
    }

    fn arena_data_len(&self, id: NodeId) -> usize {
        self.get_node(id).map_or(0, |node| node.data.len())
    }

    #[instrument(level = "trace", skip(self, item))]
    pub fn add_user_data(&mut self, id: NodeId, item: D) -> TreeResult<bool> {
        self.add_all_user_data(id, vec![item])
    }

    /// Appends `items`; returns `false` and fires nothing when `items` is empty.
    #[instrument(level = "trace", skip(self, items))]
    pub fn add_all_user_data(
        &mut self,
        id: NodeId,
        items: impl IntoIterator<Item = D>,
    ) -> TreeResult<bool> {
        let items: Vec<D> = items.into_iter().collect();
        if !self.node_mut(id)?.data.extend(items.iter().cloned()) {
            return Ok(false);
        }
        self.fire_data_changed(id, Vec::new(), items);
        Ok(true)
    }

    #[instrument(level = "trace", skip(self, item))]
    pub fn insert_user_data(&mut self, id: NodeId, index: usize, item: D) -> TreeResult<()> {
        self.insert_all_user_data(id, index, vec![item])?;
        Ok(())
    }

    #[instrument(level = "trace", skip(self, items))]
    pub fn insert_all_user_data(&mut self, id: NodeId, index: usize, items: Vec<D>) -> TreeResult<bool> {
        if !self.node_mut(id)?.data.insert(index, items.clone())? {
            return Ok(false);
        }
        self.fire_data_changed(id, Vec::new(), items);
        Ok(true)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn remove_user_data_at(&mut self, id: NodeId, index: usize) -> TreeResult<D> {
        let removed = self.node_mut(id)?.data.remove_at(index)?;
        self.fire_data_changed(id, vec![removed.clone()], Vec::new());
        Ok(removed)
    }

    /// Drops every item and releases the storage.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_all_user_data(&mut self, id: NodeId) -> TreeResult<bool> {
        let removed = self.node_mut(id)?.data.take_all();
        if removed.is_empty() {
            return Ok(false);
        }
        self.fire_data_changed(id, removed, Vec::new());
        Ok(true)
    }

    /// Replaces the whole content with one event carrying both sides.
    #[instrument(level = "trace", skip(self, items))]
    pub fn set_user_data(&mut self, id: NodeId, items: impl IntoIterator<Item = D>) -> TreeResult<bool> {
        let items: Vec<D> = items.into_iter().collect();
        let node = self.node_mut(id)?;
        if items.is_empty() && node.data.is_empty() {
            return Ok(false);
        }
        let removed = node.data.replace_all(items.iter().cloned());
        self.fire_data_changed(id, removed, items);
        Ok(true)
    }

    /// Overwrites the item at `index`, or appends when `index` equals the count.
    /// Returns the overwritten item.
    #[instrument(level = "trace", skip(self, item))]
    pub fn set_user_data_at(&mut self, id: NodeId, index: usize, item: D) -> TreeResult<Option<D>> {
        let data = &mut self.node_mut(id)?.data;
        let count = data.len();
        if index > count {
            return Err(TreeError::out_of_range(index, count));
        }
        let old = if index == count {
            data.push(item.clone());
            None
        } else {
            Some(data.replace_at(index, item.clone())?)
        };
        self.fire_data_changed(id, old.iter().cloned().collect(), vec![item]);
        Ok(old)
    }

    /// Removes items failing `keep`; returns whether anything was removed.
    pub fn retain_user_data(&mut self, id: NodeId, keep: impl FnMut(&D) -> bool) -> TreeResult<bool> {
        let removed = self.node_mut(id)?.data.retain(keep);
        if removed.is_empty() {
            return Ok(false);
        }
        self.fire_data_changed(id, removed, Vec::new());
        Ok(true)
    }

    /// Live, notifying view over the user data of `id`.
    pub fn user_data_view(&mut self, id: NodeId) -> TreeResult<UserDataView<'_, D, S>> {
        self.node(id)?;
        Ok(UserDataView { forest: self, id })
    }
}

impl<D: Clone + PartialEq, S> Forest<D, S> {
    /// Removes the first item equal to `item`.
    #[instrument(level = "trace", skip(self, item))]
    pub fn remove_user_data(&mut self, id: NodeId, item: &D) -> TreeResult<bool> {
        let Some(removed) = self.node_mut(id)?.data.remove_item(item) else {
            return Ok(false);
        };
        self.fire_data_changed(id, vec![removed], Vec::new());
        Ok(true)
    }

    /// Removes every item equal to one of `items`.
    pub fn remove_all_of_user_data(&mut self, id: NodeId, items: &[D]) -> TreeResult<bool> {
        self.retain_user_data(id, |candidate| !items.contains(candidate))
    }
}

/// Mutable view over one node's user data. Mutations fire the same events as
/// the corresponding [`Forest`] methods.
pub struct UserDataView<'a, D, S> {
    forest: &'a mut Forest<D, S>,
    id: NodeId,
}

impl<'a, D: Clone, S> UserDataView<'a, D, S> {
    pub fn node(&self) -> NodeId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.forest.arena_data_len(self.id)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&D> {
        self.forest.user_data_at(self.id, index).ok()
    }

    pub fn iter(&self) -> UserDataIter<'_, D> {
        match self.forest.get_node(self.id) {
            Some(node) => node.data.iter(),
            None => UserDataIter::Empty,
        }
    }

    pub fn push(&mut self, item: D) -> TreeResult<bool> {
        self.forest.add_user_data(self.id, item)
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = D>) -> TreeResult<bool> {
        self.forest.add_all_user_data(self.id, items)
    }

    pub fn insert(&mut self, index: usize, item: D) -> TreeResult<()> {
        self.forest.insert_user_data(self.id, index, item)
    }

    pub fn remove_at(&mut self, index: usize) -> TreeResult<D> {
        self.forest.remove_user_data_at(self.id, index)
    }

    /// Overwrites the item at `index` and returns the previous one.
    pub fn set(&mut self, index: usize, item: D) -> TreeResult<D> {
        let count = self.len();
        if index >= count {
            return Err(TreeError::out_of_range(index, count));
        }
        self.forest
            .set_user_data_at(self.id, index, item)?
            .ok_or_else(|| TreeError::out_of_range(index, count))
    }

    pub fn retain(&mut self, keep: impl FnMut(&D) -> bool) -> TreeResult<bool> {
        self.forest.retain_user_data(self.id, keep)
    }

    pub fn clear(&mut self) -> TreeResult<bool> {
        self.forest.remove_all_user_data(self.id)
    }
}

impl<'a, D: Clone + PartialEq, S> UserDataView<'a, D, S> {
    pub fn contains(&self, item: &D) -> bool {
        self.forest
            .get_node(self.id)
            .is_some_and(|node| node.data.contains(item))
    }

    pub fn index_of(&self, item: &D) -> Option<usize> {
        self.forest
            .get_node(self.id)
            .and_then(|node| node.data.position(item))
    }

    pub fn remove(&mut self, item: &D) -> TreeResult<bool> {
        self.forest.remove_user_data(self.id, item)
    }
}
