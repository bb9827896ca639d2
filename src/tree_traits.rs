use std::fmt;

use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::arena::{Forest, NodeId};
use crate::errors::TreeResult;
use crate::slots::{ChildSlots, Zone};

/// Renders a subtree as a printable `termtree::Tree`.
pub trait TreeNodeConvert {
    fn to_tree_string(&self, root: NodeId) -> TreeResult<Tree<String>>;
}

impl<D: fmt::Display, S: ChildSlots> TreeNodeConvert for Forest<D, S> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, root: NodeId) -> TreeResult<Tree<String>> {
        fn build_tree<D: fmt::Display, S: ChildSlots>(
            forest: &Forest<D, S>,
            node_id: NodeId,
            label: String,
        ) -> TreeResult<Tree<String>> {
            let node = forest.node(node_id)?;
            let mut tree = Tree::new(label);
            for (index, child) in node.slots.occupied() {
                let zone = S::Zone::from_index(index)
                    .map(|zone| format!("{zone:?}"))
                    .unwrap_or_else(|| index.to_string());
                let label = format!("{zone}: {}", forest.describe(child)?);
                tree.push(build_tree(forest, child, label)?);
            }
            Ok(tree)
        }

        build_tree(self, root, self.describe(root)?)
    }
}

impl<D: fmt::Display, S> Forest<D, S> {
    /// The user data of `id` as `[a, b, c]`.
    pub fn describe(&self, id: NodeId) -> TreeResult<String> {
        Ok(format!("[{}]", self.node(id)?.data.iter().join(", ")))
    }
}
