//! Arena-based node framework for spatial partitioning trees.
//!
//! A [`Forest`] stores every node of one tree kind. The child layout decides
//! the kind: binary, quad and oct nodes have named zones, constant n-ary nodes
//! have N slots that may be empty, n-ary nodes keep a compacting list, and the
//! icosep variants add one slot for items straddling a split boundary.
//!
//! Parents own their children through the slots; children refer back to their
//! parent with a non-owning [`NodeId`]. Structural changes fire events that
//! bubble from the changed node up to its root.

pub mod arena;
pub mod config;
pub mod data;
pub mod errors;
pub mod event;
pub mod linked;
pub mod slots;
pub mod store;
pub mod structure;
pub mod tree_traits;
pub mod util;

pub use arena::{Forest, NodeId, TreeNode};
pub use config::ForestSettings;
pub use data::UserDataView;
pub use errors::{TreeError, TreeResult};
pub use event::{ListenerId, TreeEvent, TreeEventKind, TreeNodeListener};
pub use slots::{
    BinarySlots, BinaryTreeZone, ChildSlots, ConstantNarySlots, FixedZone, IcosepSlots, IcosepZone,
    MovePolicy, NarySlots, OctSlots, OctTreeZone, QuadSlots, QuadTreeZone, Zone,
};
pub use store::UserDataStore;
pub use tree_traits::TreeNodeConvert;

pub type BinaryTree<D> = Forest<D, BinarySlots>;
pub type QuadTree<D> = Forest<D, QuadSlots>;
pub type OctTree<D> = Forest<D, OctSlots>;
pub type ConstantNaryTree<D> = Forest<D, ConstantNarySlots>;
pub type NaryTree<D> = Forest<D, NarySlots>;
pub type IcosepBinaryTree<D> = Forest<D, IcosepSlots<BinarySlots>>;
pub type IcosepQuadTree<D> = Forest<D, IcosepSlots<QuadSlots>>;
pub type IcosepOctTree<D> = Forest<D, IcosepSlots<OctSlots>>;

pub type IcosepBinaryTreeZone = IcosepZone<BinaryTreeZone>;
pub type IcosepQuadTreeZone = IcosepZone<QuadTreeZone>;
pub type IcosepOctTreeZone = IcosepZone<OctTreeZone>;
