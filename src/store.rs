//! Per-node ordered multi-value user data.
//!
//! The store keeps items in insertion order and allows duplicates. It is backed
//! either by a `Vec` or a `LinkedList`, and releases its backing storage as soon
//! as it becomes empty. The store itself fires nothing: mutators hand back what
//! they removed so [`Forest`](crate::Forest) can notify listeners.

use std::collections::{linked_list, LinkedList};
use std::{fmt, mem, slice};

use crate::errors::{TreeError, TreeResult};

#[derive(Debug, Clone)]
enum Backing<D> {
    Array(Vec<D>),
    Linked(LinkedList<D>),
}

#[derive(Clone)]
pub struct UserDataStore<D> {
    linked: bool,
    items: Option<Backing<D>>,
}

impl<D> Default for UserDataStore<D> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<D: fmt::Debug> fmt::Debug for UserDataStore<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<D> UserDataStore<D> {
    pub fn new(linked: bool) -> Self {
        Self {
            linked,
            items: None,
        }
    }

    pub fn from_items(linked: bool, items: impl IntoIterator<Item = D>) -> Self {
        let mut store = Self::new(linked);
        store.extend(items);
        store
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn len(&self) -> usize {
        match &self.items {
            None => 0,
            Some(Backing::Array(items)) => items.len(),
            Some(Backing::Linked(items)) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether backing storage is currently allocated.
    pub fn is_allocated(&self) -> bool {
        self.items.is_some()
    }

    pub fn iter(&self) -> UserDataIter<'_, D> {
        match &self.items {
            None => UserDataIter::Empty,
            Some(Backing::Array(items)) => UserDataIter::Array(items.iter()),
            Some(Backing::Linked(items)) => UserDataIter::Linked(items.iter()),
        }
    }

    pub fn first(&self) -> Option<&D> {
        self.iter().next()
    }

    pub fn get(&self, index: usize) -> Option<&D> {
        match &self.items {
            None => None,
            Some(Backing::Array(items)) => items.get(index),
            Some(Backing::Linked(items)) => items.iter().nth(index),
        }
    }

    pub fn try_get(&self, index: usize) -> TreeResult<&D> {
        self.get(index)
            .ok_or_else(|| TreeError::out_of_range(index, self.len()))
    }

    /// Appends all items; returns `false` when there was nothing to add.
    pub fn extend(&mut self, items: impl IntoIterator<Item = D>) -> bool {
        let before = self.len();
        match self.backing_mut() {
            Backing::Array(list) => list.extend(items),
            Backing::Linked(list) => list.extend(items),
        }
        let changed = self.len() != before;
        self.release_if_empty();
        changed
    }

    pub fn push(&mut self, item: D) {
        self.extend(std::iter::once(item));
    }

    /// Inserts `items` before position `index`; `index == len` appends.
    pub fn insert(&mut self, index: usize, items: Vec<D>) -> TreeResult<bool> {
        let len = self.len();
        if index > len {
            return Err(TreeError::out_of_range(index, len));
        }
        if items.is_empty() {
            return Ok(false);
        }
        match self.backing_mut() {
            Backing::Array(list) => {
                let tail = list.split_off(index);
                list.extend(items);
                list.extend(tail);
            }
            Backing::Linked(list) => {
                let mut tail = list.split_off(index);
                list.extend(items);
                list.append(&mut tail);
            }
        }
        Ok(true)
    }

    pub fn remove_at(&mut self, index: usize) -> TreeResult<D> {
        let len = self.len();
        if index >= len {
            return Err(TreeError::out_of_range(index, len));
        }
        let removed = match self.items.as_mut() {
            Some(Backing::Array(list)) => Some(list.remove(index)),
            Some(Backing::Linked(list)) => {
                let mut tail = list.split_off(index);
                let removed = tail.pop_front();
                list.append(&mut tail);
                removed
            }
            None => None,
        };
        self.release_if_empty();
        removed.ok_or_else(|| TreeError::out_of_range(index, len))
    }

    /// Replaces the item at `index` and returns the previous one.
    pub fn replace_at(&mut self, index: usize, item: D) -> TreeResult<D> {
        let len = self.len();
        let slot = match self.items.as_mut() {
            Some(Backing::Array(list)) => list.get_mut(index),
            Some(Backing::Linked(list)) => list.iter_mut().nth(index),
            None => None,
        };
        slot.map(|slot| mem::replace(slot, item))
            .ok_or_else(|| TreeError::out_of_range(index, len))
    }

    /// Keeps the items matching `keep` and returns the others in order.
    pub fn retain(&mut self, mut keep: impl FnMut(&D) -> bool) -> Vec<D> {
        let Some(backing) = self.items.take() else {
            return Vec::new();
        };
        let (kept, removed): (Vec<D>, Vec<D>) = match backing {
            Backing::Array(list) => list.into_iter().partition(|item| keep(item)),
            Backing::Linked(list) => list.into_iter().partition(|item| keep(item)),
        };
        self.extend(kept);
        removed
    }

    /// Empties the store and releases its storage.
    pub fn take_all(&mut self) -> Vec<D> {
        match self.items.take() {
            None => Vec::new(),
            Some(Backing::Array(list)) => list,
            Some(Backing::Linked(list)) => list.into_iter().collect(),
        }
    }

    /// Replaces the whole content and returns the previous items.
    pub fn replace_all(&mut self, items: impl IntoIterator<Item = D>) -> Vec<D> {
        let old = self.take_all();
        self.extend(items);
        old
    }

    fn backing_mut(&mut self) -> &mut Backing<D> {
        let linked = self.linked;
        self.items.get_or_insert_with(|| {
            if linked {
                Backing::Linked(LinkedList::new())
            } else {
                Backing::Array(Vec::new())
            }
        })
    }

    fn release_if_empty(&mut self) {
        if self.len() == 0 {
            self.items = None;
        }
    }
}

impl<D: PartialEq> UserDataStore<D> {
    pub fn contains(&self, item: &D) -> bool {
        self.iter().any(|candidate| candidate == item)
    }

    pub fn position(&self, item: &D) -> Option<usize> {
        self.iter().position(|candidate| candidate == item)
    }

    /// Removes the first item equal to `item`.
    pub fn remove_item(&mut self, item: &D) -> Option<D> {
        let index = self.position(item)?;
        self.remove_at(index).ok()
    }
}

pub enum UserDataIter<'a, D> {
    Empty,
    Array(slice::Iter<'a, D>),
    Linked(linked_list::Iter<'a, D>),
}

impl<'a, D> Iterator for UserDataIter<'a, D> {
    type Item = &'a D;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Empty => None,
            Self::Array(iter) => iter.next(),
            Self::Linked(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Empty => (0, Some(0)),
            Self::Array(iter) => iter.size_hint(),
            Self::Linked(iter) => iter.size_hint(),
        }
    }
}
