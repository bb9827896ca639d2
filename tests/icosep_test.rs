//! Tests for the icosep variants of the fixed layouts.

use rstest::rstest;

use spatial_tree::util::testing;
use spatial_tree::{
    BinaryTreeZone, IcosepBinaryTree, IcosepOctTree, IcosepQuadTree, IcosepQuadTreeZone,
    IcosepZone, OctTreeZone, QuadTree, QuadTreeZone, TreeError, TreeNodeConvert, Zone,
};

#[test]
fn given_icosep_quad_when_counting_children_then_one_more_than_quad() {
    testing::init_test_setup();
    let mut plain: QuadTree<u8> = QuadTree::new();
    let mut icosep: IcosepQuadTree<u8> = IcosepQuadTree::new();
    let p = plain.create_node();
    let i = icosep.create_node();

    assert_eq!(icosep.child_count(i).unwrap(), plain.child_count(p).unwrap() + 1);

    let child = icosep.create_node();
    icosep.set_child_at_zone(i, IcosepZone::Icosep, Some(child)).unwrap();
    // Arity does not depend on population
    assert_eq!(icosep.child_count(i).unwrap(), 5);
    assert_eq!(icosep.non_null_child_count(i).unwrap(), 1);
}

#[rstest]
#[case(IcosepZone::Base(QuadTreeZone::NorthWest), 0)]
#[case(IcosepZone::Base(QuadTreeZone::SouthEast), 3)]
#[case(IcosepZone::Icosep, 4)]
fn given_icosep_quad_zone_when_indexing_then_intersection_is_last(
    #[case] zone: IcosepQuadTreeZone,
    #[case] index: usize,
) {
    assert_eq!(zone.index(), index);
    assert_eq!(IcosepQuadTreeZone::from_index(index), Some(zone));
}

#[test]
fn given_icosep_binary_and_oct_when_counting_then_three_and_nine() {
    let mut binary: IcosepBinaryTree<u8> = IcosepBinaryTree::new();
    let mut oct: IcosepOctTree<u8> = IcosepOctTree::new();
    let b = binary.create_node();
    let o = oct.create_node();

    assert_eq!(binary.child_count(b).unwrap(), 3);
    assert_eq!(oct.child_count(o).unwrap(), 9);
    assert_eq!(IcosepZone::<BinaryTreeZone>::Icosep.index(), 2);
    assert_eq!(IcosepZone::<OctTreeZone>::Icosep.index(), 8);
    assert_eq!(IcosepZone::<OctTreeZone>::from_index(9), None);
}

#[test]
fn given_icosep_child_when_reading_back_then_slot_and_zone_agree() {
    let mut forest: IcosepQuadTree<&'static str> = IcosepQuadTree::new();
    let root = forest.create_node();
    let straddler = forest.create_node_with_data(["straddles"]);
    let quadrant = forest.create_node();

    forest.set_child_at(root, 4, Some(straddler)).unwrap();
    forest
        .set_child_at_zone(root, IcosepZone::Base(QuadTreeZone::NorthEast), Some(quadrant))
        .unwrap();

    let slots = forest.get_node(root).unwrap().slots();
    assert_eq!(slots.icosep(), Some(straddler));
    assert_eq!(slots.base().north_east(), Some(quadrant));
    assert_eq!(forest.zone_of(root, straddler).unwrap(), Some(IcosepZone::Icosep));
    assert_eq!(
        forest.children(root).unwrap(),
        vec![None, Some(quadrant), None, None, Some(straddler)]
    );
}

#[test]
fn given_icosep_slot_when_index_past_it_then_index_out_of_range() {
    let mut forest: IcosepQuadTree<u8> = IcosepQuadTree::new();
    let root = forest.create_node();
    let child = forest.create_node();

    assert!(matches!(
        forest.set_child_at(root, 5, Some(child)),
        Err(TreeError::IndexOutOfRange { index: 5, len: 5 })
    ));
    assert!(matches!(
        forest.add_child(root, child),
        Err(TreeError::UnsupportedOperation { ref layout, .. }) if layout == "icosep quad"
    ));
}

#[test]
fn given_icosep_subtree_when_measuring_and_clearing_then_icosep_slot_counts() {
    let mut forest: IcosepQuadTree<&'static str> = IcosepQuadTree::new();
    let root = forest.create_node();
    let straddler = forest.create_node_with_data(["s"]);
    let quadrant = forest.create_node();
    let deeper = forest.create_node_with_data(["d"]);
    forest.set_child_at_zone(root, IcosepZone::Icosep, Some(straddler)).unwrap();
    forest
        .set_child_at_zone(root, IcosepZone::Base(QuadTreeZone::SouthWest), Some(quadrant))
        .unwrap();
    forest.set_child_at(quadrant, 4, Some(deeper)).unwrap();

    // Quadrant (index 2) is visited before the icosep slot (index 4)
    assert_eq!(forest.heights(root).unwrap(), vec![3, 2]);
    assert_eq!(forest.deep_node_count(root).unwrap(), 4);

    let rendered = forest.to_tree_string(root).unwrap().to_string();
    assert!(rendered.contains("Icosep: [s]"));
    assert!(rendered.contains("Base(SouthWest): []"));

    forest.clear(root).unwrap();
    assert!(forest.is_leaf(root).unwrap());
    assert!(forest.is_leaf(quadrant).unwrap());
    assert_eq!(forest.user_data_count(deeper).unwrap(), 0);
}
