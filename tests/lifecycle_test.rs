//! Tests for node lifetime, traversal and deep removal.

use std::cell::RefCell;
use std::rc::Rc;

use rstest::{fixture, rstest};

use spatial_tree::util::testing;
use spatial_tree::{
    BinaryTree, NaryTree, NodeId, QuadTree, TreeError, TreeEvent, TreeNodeConvert,
};

struct Spine {
    forest: NaryTree<u32>,
    root: NodeId,
    a: NodeId,
    b: NodeId,
    c: NodeId,
}

/// R -> A -> B -> C, a single branch without user data.
#[fixture]
fn spine() -> Spine {
    testing::init_test_setup();
    let mut forest = NaryTree::new();
    let root = forest.create_node();
    let a = forest.create_node();
    let b = forest.create_node();
    let c = forest.create_node();
    forest.add_child(root, a).unwrap();
    forest.add_child(a, b).unwrap();
    forest.add_child(b, c).unwrap();
    Spine { forest, root, a, b, c }
}

// ============================================================
// Deep removal
// ============================================================

#[rstest]
fn given_empty_branch_when_removing_deeply_then_branch_collapses_below_root(spine: Spine) {
    let Spine { mut forest, root, a, b, c } = spine;
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    forest
        .add_listener(root, move |event: &TreeEvent<u32>| sink.borrow_mut().push(event.clone()))
        .unwrap();

    assert_eq!(forest.remove_deeply_from_parent(c).unwrap(), Some(root));

    // One structural change at the top of the collapsed branch
    assert_eq!(
        *seen.borrow(),
        vec![TreeEvent::ChildRemoved {
            parent: root,
            index: 0,
            child: a,
        }]
    );
    assert!(forest.is_leaf(root).unwrap());
    assert_eq!(forest.parent(a).unwrap(), None);
    // The collapsed branch stays linked internally
    assert_eq!(forest.parent(c).unwrap(), Some(b));
}

#[rstest]
fn given_ancestor_with_data_when_removing_deeply_then_collapse_stops_there(spine: Spine) {
    let Spine { mut forest, a, b, c, .. } = spine;
    forest.add_user_data(b, 7).unwrap();

    assert_eq!(forest.remove_deeply_from_parent(c).unwrap(), Some(b));

    assert!(forest.is_leaf(b).unwrap());
    assert_eq!(forest.parent(b).unwrap(), Some(a));
}

#[rstest]
fn given_ancestor_with_siblings_when_removing_deeply_then_collapse_stops_there(spine: Spine) {
    let Spine { mut forest, a, b, c, .. } = spine;
    let sibling = forest.create_node();
    forest.add_child(a, sibling).unwrap();

    assert_eq!(forest.remove_deeply_from_parent(c).unwrap(), Some(a));

    assert_eq!(forest.children(a).unwrap(), vec![Some(sibling)]);
    assert_eq!(forest.parent(b).unwrap(), None);
}

#[rstest]
fn given_root_when_removing_from_parent_then_nothing_to_do(spine: Spine) {
    let Spine { mut forest, root, .. } = spine;

    assert_eq!(forest.remove_from_parent(root).unwrap(), None);
    assert_eq!(forest.remove_deeply_from_parent(root).unwrap(), None);
}

// ============================================================
// Traversal and navigation
// ============================================================

#[rstest]
fn given_spine_when_walking_then_pre_and_post_order_mirror(spine: Spine) {
    let Spine { forest, root, a, b, c } = spine;

    let pre: Vec<NodeId> = forest.iter_preorder(root).map(|(id, _)| id).collect();
    let post: Vec<NodeId> = forest.iter_postorder(root).map(|(id, _)| id).collect();

    assert_eq!(pre, vec![root, a, b, c]);
    assert_eq!(post, vec![c, b, a, root]);
    assert_eq!(forest.ancestors(c).unwrap(), vec![c, b, a, root]);
    assert_eq!(forest.depth(c).unwrap(), 3);
    assert_eq!(forest.root_of(c).unwrap(), root);
    assert!(forest.is_root(root).unwrap());
    assert!(!forest.is_root(a).unwrap());
}

#[test]
fn given_binary_tree_when_walking_preorder_then_left_before_right() {
    let mut forest: BinaryTree<u32> = BinaryTree::new();
    let root = forest.create_node();
    let left = forest.create_node();
    let right = forest.create_node();
    let left_right = forest.create_node();
    forest.set_child_at(root, 1, Some(right)).unwrap();
    forest.set_child_at(root, 0, Some(left)).unwrap();
    forest.set_child_at(left, 1, Some(left_right)).unwrap();

    let pre: Vec<NodeId> = forest.iter_preorder(root).map(|(id, _)| id).collect();
    let post: Vec<NodeId> = forest.iter_postorder(root).map(|(id, _)| id).collect();

    assert_eq!(pre, vec![root, left, left_right, right]);
    assert_eq!(post, vec![left_right, left, right, root]);
}

#[test]
fn given_detached_nodes_when_listing_roots_then_each_tree_appears_once() {
    let mut forest: QuadTree<u32> = QuadTree::new();
    let first = forest.create_node();
    let second = forest.create_node();
    let child = forest.create_node();
    forest.set_child_at(first, 0, Some(child)).unwrap();

    let roots = forest.roots();

    assert_eq!(roots.len(), 2);
    assert!(roots.contains(&first));
    assert!(roots.contains(&second));
}

// ============================================================
// Destruction
// ============================================================

#[rstest]
fn given_subtree_when_destroying_then_ids_stop_resolving(spine: Spine) {
    let Spine { mut forest, root, a, b, c } = spine;

    assert_eq!(forest.destroy(b).unwrap(), 2);

    assert_eq!(forest.len(), 2);
    assert!(!forest.contains(b));
    assert!(!forest.contains(c));
    assert!(forest.is_leaf(a).unwrap());
    assert!(matches!(forest.parent(c), Err(TreeError::NodeNotFound(id)) if id == c));
    assert!(matches!(
        forest.add_user_data(b, 1),
        Err(TreeError::NodeNotFound(_))
    ));
    assert_eq!(forest.deep_node_count(root).unwrap(), 2);
}

#[test]
fn given_destroyed_slot_when_reused_then_old_id_stays_dead() {
    let mut forest: QuadTree<u32> = QuadTree::new();
    let doomed = forest.create_node();
    forest.destroy(doomed).unwrap();

    let fresh = forest.create_node();

    assert_ne!(doomed, fresh);
    assert!(!forest.contains(doomed));
    assert!(forest.is_valid(fresh).unwrap());
    assert!(forest.is_valid(doomed).is_err());
}

// ============================================================
// Rendering
// ============================================================

#[test]
fn given_quad_tree_when_rendering_then_zones_and_data_appear() {
    let mut forest: QuadTree<u32> = QuadTree::new();
    let root = forest.create_node_with_data([1, 2]);
    let child = forest.create_node_with_data([3]);
    forest.set_child_at(root, 1, Some(child)).unwrap();

    let rendered = forest.to_tree_string(root).unwrap().to_string();

    assert_eq!(forest.describe(root).unwrap(), "[1, 2]");
    assert!(rendered.starts_with("[1, 2]"));
    assert!(rendered.contains("NorthEast: [3]"));
}
