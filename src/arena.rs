use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::config::ForestSettings;
use crate::errors::{TreeError, TreeResult};
use crate::event::{ListenerId, Listeners, TreeEvent, TreeNodeListener};
use crate::slots::ChildSlots;
use crate::store::UserDataStore;

/// Handle of a node inside a [`Forest`].
///
/// Ids are generational: once a node is destroyed its id never resolves again,
/// even if the arena reuses the slot. Parent links are stored as plain ids, so a
/// child pointing at a destroyed parent simply sees no parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

impl From<Index> for NodeId {
    fn from(index: Index) -> Self {
        Self(index)
    }
}

impl NodeId {
    pub fn index(self) -> Index {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "node#{}v{}", slot, generation)
    }
}

/// Tree node in the arena-based forest.
pub struct TreeNode<D, S> {
    /// Payload items attached to this node
    pub(crate) data: UserDataStore<D>,
    /// Non-owning link to the parent, None for roots
    pub(crate) parent: Option<NodeId>,
    /// Child slots owned by this node
    pub(crate) slots: S,
    /// Running count of occupied child slots
    pub(crate) non_null_children: usize,
    pub(crate) listeners: Listeners<D>,
}

impl<D: fmt::Debug, S: fmt::Debug> fmt::Debug for TreeNode<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("data", &self.data)
            .field("parent", &self.parent)
            .field("slots", &self.slots)
            .field("non_null_children", &self.non_null_children)
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<D, S> TreeNode<D, S> {
    pub fn user_data(&self) -> &UserDataStore<D> {
        &self.data
    }

    /// Parent link as stored; it may point at a destroyed node.
    /// Use [`Forest::parent`] for the resolved value.
    pub fn raw_parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    pub fn non_null_child_count(&self) -> usize {
        self.non_null_children
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Arena holding every node of one tree kind.
///
/// Nodes own their children through the child slots; children point back at
/// their parent with a plain id. All structural operations live on the forest
/// because they touch several nodes at once.
pub struct Forest<D, S> {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode<D, S>>,
    settings: ForestSettings,
    next_listener: u64,
}

impl<D: fmt::Debug, S: fmt::Debug> fmt::Debug for Forest<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forest")
            .field("arena", &self.arena)
            .field("settings", &self.settings)
            .field("next_listener", &self.next_listener)
            .finish()
    }
}

impl<D, S> Default for Forest<D, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, S> Forest<D, S> {
    pub fn new() -> Self {
        Self::with_settings(ForestSettings::default())
    }

    pub fn with_settings(settings: ForestSettings) -> Self {
        Self {
            arena: Arena::with_capacity(settings.initial_capacity),
            settings,
            next_listener: 0,
        }
    }

    pub fn settings(&self) -> &ForestSettings {
        &self.settings
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    /// Creates a detached node with the given child layout.
    #[instrument(level = "trace", skip(self, slots))]
    pub fn create_node_with(&mut self, slots: S) -> NodeId {
        self.insert_node(slots, UserDataStore::new(self.settings.linked_user_data))
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode<D, S>> {
        self.arena.get(id.0)
    }

    /// Every live node, in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &TreeNode<D, S>)> + '_ {
        self.arena.iter().map(|(index, node)| (NodeId(index), node))
    }

    /// Live nodes without a (live) parent.
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes()
            .filter(|(_, node)| self.resolve_parent(node.parent).is_none())
            .map(|(id, _)| id)
            .collect()
    }

    pub(crate) fn insert_node(&mut self, slots: S, data: UserDataStore<D>) -> NodeId {
        let node = TreeNode {
            data,
            parent: None,
            slots,
            non_null_children: 0,
            listeners: Listeners::default(),
        };
        let id = NodeId(self.arena.insert(node));
        trace!(%id, "Created node");
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> TreeResult<&TreeNode<D, S>> {
        self.arena.get(id.0).ok_or(TreeError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut TreeNode<D, S>> {
        self.arena.get_mut(id.0).ok_or(TreeError::NodeNotFound(id))
    }

    /// Resolves the parent link of `id`; a destroyed parent reads as absent.
    pub fn parent(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.resolve_parent(self.node(id)?.parent))
    }

    pub(crate) fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.arena
            .get(id.0)
            .and_then(|node| self.resolve_parent(node.parent))
    }

    fn resolve_parent(&self, parent: Option<NodeId>) -> Option<NodeId> {
        parent.filter(|parent| self.arena.contains(parent.0))
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        self.node(id)?;
        Ok(self.chain_to_root(id))
    }

    pub(crate) fn chain_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut cursor = self.parent_of(id);
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.parent_of(current);
        }
        chain
    }

    /// Topmost ancestor of `id`, `id` itself for a root.
    pub fn root_of(&self, id: NodeId) -> TreeResult<NodeId> {
        Ok(*self.ancestors(id)?.last().unwrap_or(&id))
    }

    pub fn is_root(&self, id: NodeId) -> TreeResult<bool> {
        Ok(self.parent(id)?.is_none())
    }

    /// Distance from `id` to its root; 0 for a root.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self, id: NodeId) -> TreeResult<usize> {
        Ok(self.ancestors(id)?.len() - 1)
    }

    #[instrument(level = "debug", skip(self, listener))]
    pub fn add_listener<L>(&mut self, id: NodeId, listener: L) -> TreeResult<ListenerId>
    where
        L: TreeNodeListener<D> + 'static,
    {
        let listener_id = ListenerId(self.next_listener);
        self.node_mut(id)?.listeners.add(listener_id, Box::new(listener));
        self.next_listener += 1;
        Ok(listener_id)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_listener(&mut self, id: NodeId, listener: ListenerId) -> TreeResult<bool> {
        Ok(self.node_mut(id)?.listeners.remove(listener))
    }

    /// Delivers `event` to `origin` and then to every ancestor, root last.
    pub(crate) fn fire(&mut self, origin: NodeId, event: TreeEvent<D>) {
        let chain = self.chain_to_root(origin);
        self.notify(&chain, &event);
    }

    pub(crate) fn notify(&mut self, targets: &[NodeId], event: &TreeEvent<D>) {
        trace!(kind = ?event.kind(), source = %event.source(), targets = targets.len(), "Firing event");
        for target in targets {
            if let Some(node) = self.arena.get_mut(target.0) {
                node.listeners.notify(event);
            }
        }
    }
}

impl<D, S: ChildSlots> Forest<D, S> {
    /// Removes `id` and its whole subtree from the arena, detaching it from its
    /// parent first. Returns the number of nodes dropped.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy(&mut self, id: NodeId) -> TreeResult<usize> {
        self.remove_from_parent(id)?;
        let doomed: Vec<NodeId> = self.iter_postorder(id).map(|(node_id, _)| node_id).collect();
        for node_id in &doomed {
            self.arena.remove(node_id.0);
        }
        debug!(%id, count = doomed.len(), "Destroyed subtree");
        Ok(doomed.len())
    }

    /// Pre-order walk of the subtree rooted at `root`.
    pub fn iter_preorder(&self, root: NodeId) -> TreeIterator<'_, D, S> {
        TreeIterator::new(self, root)
    }

    /// Post-order walk of the subtree rooted at `root`.
    pub fn iter_postorder(&self, root: NodeId) -> PostOrderIterator<'_, D, S> {
        PostOrderIterator::new(self, root)
    }
}

impl<D, S: ChildSlots + Default> Forest<D, S> {
    /// Creates a detached node with an empty default layout.
    pub fn create_node(&mut self) -> NodeId {
        self.create_node_with(S::default())
    }

    pub fn create_node_with_data(&mut self, items: impl IntoIterator<Item = D>) -> NodeId {
        let data = UserDataStore::from_items(self.settings.linked_user_data, items);
        self.insert_node(S::default(), data)
    }
}

pub struct TreeIterator<'a, D, S> {
    forest: &'a Forest<D, S>,
    stack: Vec<NodeId>,
}

impl<'a, D, S> TreeIterator<'a, D, S> {
    fn new(forest: &'a Forest<D, S>, root: NodeId) -> Self {
        let mut stack = Vec::new();
        if forest.contains(root) {
            stack.push(root);
        }
        Self { forest, stack }
    }
}

impl<'a, D, S: ChildSlots> Iterator for TreeIterator<'a, D, S> {
    type Item = (NodeId, &'a TreeNode<D, S>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current) {
                // Push children in reverse order for left-to-right traversal
                for (_, child) in node.slots.occupied().into_iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, D, S> {
    forest: &'a Forest<D, S>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, D, S> PostOrderIterator<'a, D, S> {
    fn new(forest: &'a Forest<D, S>, root: NodeId) -> Self {
        let mut stack = Vec::new();
        if forest.contains(root) {
            stack.push((root, false));
        }
        Self { forest, stack }
    }
}

impl<'a, D, S: ChildSlots> Iterator for PostOrderIterator<'a, D, S> {
    type Item = (NodeId, &'a TreeNode<D, S>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current) {
                if !visited {
                    self.stack.push((current, true));
                    for (_, child) in node.slots.occupied().into_iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current, node));
                }
            }
        }
        None
    }
}
