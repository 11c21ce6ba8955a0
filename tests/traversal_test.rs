//! Integration tests for traversal orders and stale-walker detection.

use std::collections::HashSet;

use arbor::util::testing;
use arbor::{
    BreadthFirst, Forest, NodeId, NodeRef, PathBetween, Postorder, Preorder, TreeError, Walker,
};
use rstest::{fixture, rstest};

#[fixture]
fn forest() -> (Forest<char>, Vec<NodeId>) {
    testing::init_test_setup();
    // A(B(D, E), C)
    let mut forest = Forest::new();
    let ids: Vec<NodeId> = "ABCDE".chars().map(|v| forest.new_node(v)).collect();
    let (a, b, c, d, e) = (ids[0], ids[1], ids[2], ids[3], ids[4]);
    forest.add(a, b).unwrap();
    forest.add(a, c).unwrap();
    forest.add(b, d).unwrap();
    forest.add(b, e).unwrap();
    (forest, ids)
}

/// Wider and deeper tree: every node gets `fanout` children down to `levels`.
fn grown(levels: usize, fanout: usize) -> (Forest<usize>, NodeId) {
    let mut forest = Forest::new();
    let root = forest.new_node(0);
    let mut frontier = vec![root];
    for _ in 0..levels {
        let mut next = Vec::new();
        for parent in frontier {
            for _ in 0..fanout {
                let child = forest.new_node(forest.len());
                forest.add(parent, child).unwrap();
                next.push(child);
            }
        }
        frontier = next;
    }
    (forest, root)
}

fn position(order: &[NodeRef<'_, usize>], id: NodeId) -> usize {
    order.iter().position(|n| n.id() == id).unwrap()
}

fn letters<'a>(nodes: impl Iterator<Item = NodeRef<'a, char>>) -> String {
    nodes.map(|n| *n.value()).collect()
}

#[rstest]
fn given_scenario_when_traversing_then_documented_orders(forest: (Forest<char>, Vec<NodeId>)) {
    let (forest, ids) = forest;
    let a = forest.node(ids[0]).unwrap();
    let e = forest.node(ids[4]).unwrap();

    assert_eq!(letters(a.preorder()), "ABDEC");
    assert_eq!(letters(a.postorder()), "DEBCA");
    assert_eq!(letters(a.depth_first()), "DEBCA");
    assert_eq!(letters(a.breadth_first()), "ABCDE");
    assert_eq!(letters(e.path_from(ids[0]).unwrap()), "ABE");
}

#[rstest]
#[case(1, 1)]
#[case(3, 2)]
#[case(4, 3)]
fn given_tree_when_traversing_in_each_order_then_same_node_set(
    #[case] levels: usize,
    #[case] fanout: usize,
) {
    let (forest, root) = grown(levels, fanout);
    let root = forest.node(root).unwrap();

    let pre: Vec<_> = root.preorder().map(|n| n.id()).collect();
    let post: Vec<_> = root.postorder().map(|n| n.id()).collect();
    let bfs: Vec<_> = root.breadth_first().map(|n| n.id()).collect();

    assert_eq!(pre.len(), forest.len());
    for order in [&pre, &post, &bfs] {
        let unique: HashSet<_> = order.iter().collect();
        assert_eq!(unique.len(), order.len(), "each node exactly once");
    }
    let pre_set: HashSet<_> = pre.iter().collect();
    let post_set: HashSet<_> = post.iter().collect();
    let bfs_set: HashSet<_> = bfs.iter().collect();
    assert_eq!(pre_set, post_set);
    assert_eq!(pre_set, bfs_set);
}

#[rstest]
fn given_tree_when_traversing_then_ancestors_before_or_after_descendants() {
    let (forest, root) = grown(3, 3);
    let root = forest.node(root).unwrap();

    let pre: Vec<_> = root.preorder().collect();
    let post: Vec<_> = root.postorder().collect();
    for node in root.preorder() {
        for descendant in node.preorder().skip(1) {
            assert!(position(&pre, node.id()) < position(&pre, descendant.id()));
            assert!(position(&post, node.id()) > position(&post, descendant.id()));
        }
    }
}

#[rstest]
fn given_tree_when_traversing_breadth_first_then_levels_never_decrease() {
    let (forest, root) = grown(3, 2);
    let levels: Vec<_> = forest
        .node(root)
        .unwrap()
        .breadth_first()
        .map(|n| n.level())
        .collect();

    assert!(levels.windows(2).all(|w| w[0] <= w[1]));
}

#[rstest]
fn given_ancestor_and_descendant_when_walking_path_then_length_law() {
    let (forest, root) = grown(3, 2);
    let root_ref = forest.node(root).unwrap();

    for node in root_ref.preorder() {
        for ancestor in node.path() {
            let path: Vec<_> = node.path_from(ancestor.id()).unwrap().collect();
            assert_eq!(path.len(), node.level() - ancestor.level() + 1);
            assert_eq!(path.first().map(|n| n.id()), Some(ancestor.id()));
            assert_eq!(path.last().map(|n| n.id()), Some(node.id()));
        }
    }
}

#[rstest]
fn given_non_ancestor_when_walking_path_then_not_an_ancestor(
    forest: (Forest<char>, Vec<NodeId>),
) {
    let (forest, ids) = forest;
    let (c, d) = (ids[2], ids[3]);

    let err = forest.node(d).unwrap().path_from(c).err();

    assert_eq!(
        err,
        Some(TreeError::NotAnAncestor {
            ancestor: c,
            descendant: d
        })
    );
}

#[rstest]
fn given_deep_chain_when_postorder_then_starts_at_bottom_leaf() {
    let mut forest = Forest::new();
    let root = forest.new_node(0usize);
    let mut tip = root;
    for i in 1..10_000 {
        let next = forest.new_node(i);
        forest.add(tip, next).unwrap();
        tip = next;
    }

    let first = Postorder::new(&forest, root)
        .unwrap()
        .iter(&forest)
        .unwrap()
        .next()
        .map(|n| *n.value());

    assert_eq!(first, Some(9_999));
}

fn assert_stale_after_growth<W: Walker>(forest: &mut Forest<char>, mut walker: W, leaf: NodeId) {
    assert!(walker.walk_next(&*forest).unwrap().is_some());
    let before = forest.generation();

    let extra = forest.new_node('X');
    forest.add(leaf, extra).unwrap();

    assert_eq!(
        walker.walk_next(&*forest),
        Err(TreeError::StaleIterator {
            expected: before,
            found: before + 1
        })
    );
}

#[rstest]
#[case::preorder("preorder")]
#[case::postorder("postorder")]
#[case::breadth_first("breadth_first")]
#[case::path("path")]
fn given_structural_change_when_stepping_detached_walker_then_stale(
    forest: (Forest<char>, Vec<NodeId>),
    #[case] kind: &str,
) {
    let (mut forest, ids) = forest;
    let (a, e) = (ids[0], ids[4]);
    match kind {
        "preorder" => {
            let walker = Preorder::new(&forest, a).unwrap();
            assert_stale_after_growth(&mut forest, walker, e)
        }
        "postorder" => {
            let walker = Postorder::new(&forest, a).unwrap();
            assert_stale_after_growth(&mut forest, walker, e)
        }
        "breadth_first" => {
            let walker = BreadthFirst::new(&forest, a).unwrap();
            assert_stale_after_growth(&mut forest, walker, e)
        }
        _ => {
            let walker = PathBetween::new(&forest, a, e).unwrap();
            assert_stale_after_growth(&mut forest, walker, e)
        }
    }
}

#[rstest]
fn given_stale_walker_when_wrapped_then_stale_error(forest: (Forest<char>, Vec<NodeId>)) {
    let (mut forest, ids) = forest;
    let walker = Preorder::new(&forest, ids[0]).unwrap();
    forest.remove_from_parent(ids[1]).unwrap();

    assert!(matches!(
        walker.clone().iter(&forest),
        Err(TreeError::StaleIterator { .. })
    ));
    assert!(matches!(
        walker.collect_ids(&forest),
        Err(TreeError::StaleIterator { .. })
    ));
}

#[rstest]
fn given_discarded_root_when_creating_walker_then_not_found(forest: (Forest<char>, Vec<NodeId>)) {
    let (mut forest, ids) = forest;
    forest.discard(ids[2]).unwrap();

    assert_eq!(
        BreadthFirst::new(&forest, ids[2]).err(),
        Some(TreeError::NodeNotFound(ids[2]))
    );
}
