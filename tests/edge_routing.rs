use techtree::config::TreeConfig;
use techtree::graph::TechGraph;
use techtree::route::{Anchor, EdgeRouter, SegmentKind};
use techtree::tree::TechTree;
use techtree_test_utils::builders::{ItemConfigBuilder, TreeConfigBuilder};
use techtree_test_utils::init_tracing;

/// Pin everything so the geometry under test is exactly what we authored.
fn route(cfg: &TreeConfig) -> (TechGraph, EdgeRouter) {
    let graph = TechGraph::from_config(cfg);
    let mut router = EdgeRouter::new();
    router.rebuild(&graph);
    (graph, router)
}

fn find<'r>(
    router: &'r EdgeRouter,
    kind: SegmentKind,
    anchor: Anchor,
) -> &'r techtree::route::RouteSegment {
    router
        .segments()
        .iter()
        .find(|s| s.kind == kind && s.anchor == anchor)
        .unwrap_or_else(|| panic!("no {kind:?} segment at {anchor:?}"))
}

#[test]
fn edges_into_one_child_share_the_arrow() {
    init_tracing();

    // P1 routes down, P2 routes up, both into C's cell.
    let cfg = TreeConfigBuilder::new()
        .with_item("P1", ItemConfigBuilder::new(0).pinned_at(0, 0).build())
        .with_item("P2", ItemConfigBuilder::new(0).pinned_at(0, 2).build())
        .with_item("C", ItemConfigBuilder::new(0).prereq("P1").prereq("P2").pinned_at(1, 1).build())
        .build();

    let (_graph, router) = route(&cfg);

    let arrow = find(&router, SegmentKind::EndArrow, Anchor::new(1, 1));
    assert_eq!(arrow.destinations.len(), 1);
    assert!(arrow.destinations.contains("C"));

    // Both verticals land in the shared channel column, one per row gap.
    assert_eq!(
        router
            .segments()
            .iter()
            .filter(|s| s.kind == SegmentKind::Vertical)
            .count(),
        2
    );
    // Exactly one arrow exists even though two edges terminate at C.
    assert_eq!(
        router
            .segments()
            .iter()
            .filter(|s| s.kind == SegmentKind::EndArrow)
            .count(),
        1
    );
}

#[test]
fn shared_channel_segment_collects_both_destinations() {
    init_tracing();

    // Both edges leave P through the same stub; the segment is stored once
    // with both children as destinations.
    let cfg = TreeConfigBuilder::new()
        .with_item("P", ItemConfigBuilder::new(0).pinned_at(0, 0).build())
        .with_item("C1", ItemConfigBuilder::new(0).prereq("P").pinned_at(1, 0).build())
        .with_item("C2", ItemConfigBuilder::new(0).prereq("P").pinned_at(1, 1).build())
        .build();

    let (_graph, router) = route(&cfg);

    let stub = find(&router, SegmentKind::StartStub, Anchor::new(1, 0));
    assert_eq!(stub.destinations.len(), 2);
    assert!(stub.destinations.contains("C1"));
    assert!(stub.destinations.contains("C2"));
}

#[test]
fn same_row_edge_routes_straight_through() {
    init_tracing();

    let cfg = TreeConfigBuilder::new()
        .with_item("P", ItemConfigBuilder::new(0).pinned_at(0, 0).build())
        .with_item("C", ItemConfigBuilder::new(0).prereq("P").pinned_at(2, 0).build())
        .build();

    let (_graph, router) = route(&cfg);

    assert!(
        router
            .segments()
            .iter()
            .all(|s| s.kind != SegmentKind::Vertical),
        "a same-row edge must not produce a vertical run"
    );
    find(&router, SegmentKind::Horizontal, Anchor::new(1, 0));
    find(&router, SegmentKind::StartStub, Anchor::new(1, 0));
    find(&router, SegmentKind::EndArrow, Anchor::new(2, 0));
}

#[test]
fn highlight_marks_only_incoming_paths_and_clears() {
    init_tracing();

    let cfg = TreeConfigBuilder::new()
        .with_item("A", ItemConfigBuilder::new(0).pinned_at(0, 0).build())
        .with_item("B", ItemConfigBuilder::new(0).prereq("A").pinned_at(1, 0).build())
        .with_item("C", ItemConfigBuilder::new(0).prereq("B").pinned_at(2, 1).build())
        .with_item("X", ItemConfigBuilder::new(0).pinned_at(0, 3).build())
        .with_item("Y", ItemConfigBuilder::new(0).prereq("X").pinned_at(1, 3).build())
        .build();

    let mut tree = TechTree::build(&cfg);

    // Hovering C lights its whole ancestry chain but not the X -> Y edge.
    tree.set_highlighted("C");
    for segment in tree.segments() {
        let expected = segment.destinations.contains("B") || segment.destinations.contains("C");
        assert_eq!(
            segment.highlighted, expected,
            "unexpected highlight state for {:?} at {:?}",
            segment.kind, segment.anchor
        );
    }

    tree.clear_highlighted();
    assert!(tree.segments().iter().all(|s| !s.highlighted));
}

#[test]
fn relayout_rebuilds_segments_from_fresh_coordinates() {
    init_tracing();

    let cfg = TreeConfigBuilder::new()
        .with_item("P", ItemConfigBuilder::new(0).pinned_at(0, 0).build())
        .with_item("C", ItemConfigBuilder::new(0).prereq("P").build())
        .build();

    let mut tree = TechTree::build(&cfg);
    let stub_columns = |tree: &TechTree| -> Vec<i32> {
        tree.segments()
            .iter()
            .filter(|s| s.kind == SegmentKind::StartStub)
            .map(|s| s.anchor.x)
            .collect()
    };
    assert_eq!(stub_columns(&tree), vec![1]);

    tree.move_item("P", 3, 0);

    // Nothing may still reference the superseded column.
    assert_eq!(stub_columns(&tree), vec![4]);
    let c = tree.item("C").unwrap();
    assert!(c.x > 3, "auto child must clear the moved parent");
}
