mod common;

use common::synthetic_image::{
    decision_sheet, rounded_sheet, thick_arrow, two_boxes_with_arrow, Canvas,
};
use flowchart_detector::geometry::BoundingBox;
use flowchart_detector::{ExtractorParams, FlowchartExtractor, ShapeId, ShapeKind, TextRegion};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn arrow_between_two_boxes_becomes_directed_edge() {
    init_logger();
    let canvas = two_boxes_with_arrow();
    let regions = vec![
        TextRegion::new(BoundingBox::new(30.0, 52.0, 60.0, 68.0), "Start", 0.9),
        TextRegion::new(BoundingBox::new(140.0, 52.0, 170.0, 68.0), "End", 0.9),
        TextRegion::new(BoundingBox::new(100.0, 100.0, 120.0, 110.0), "stray", 0.2),
    ];
    let report = FlowchartExtractor::new(ExtractorParams::default())
        .process(&canvas.view(), &regions)
        .expect("extraction succeeds");
    let graph = &report.graph;

    assert_eq!(graph.shapes.len(), 2, "{graph:?}");
    assert!(graph.shapes.iter().all(|s| s.kind == ShapeKind::Rectangle));
    assert_eq!(graph.shapes[0].text.as_deref(), Some("Start"));
    assert_eq!(graph.shapes[1].text.as_deref(), Some("End"));

    assert_eq!(graph.edges.len(), 1, "{graph:?}");
    let edge = &graph.edges[0];
    assert_eq!(edge.source, Some(ShapeId(0)));
    assert_eq!(edge.target, Some(ShapeId(1)));
    assert!(edge.directed);
    assert_eq!(edge.label, None);

    let d = &report.diagnostics;
    assert_eq!(d.dropped_connectors, 0);
    assert_eq!(d.dangling_edges, 0);
    assert_eq!(d.unassociated_text, 1);
}

#[test]
fn stroke_width_does_not_change_the_graph() {
    init_logger();
    for t in 2..=8 {
        let report = FlowchartExtractor::default()
            .process(&thick_arrow(t).view(), &[])
            .expect("extraction succeeds");
        let graph = &report.graph;
        assert_eq!(graph.shapes.len(), 2, "width {t}: {graph:?}");
        assert_eq!(graph.edges.len(), 1, "width {t}: {graph:?}");
        let edge = &graph.edges[0];
        assert_eq!(edge.source, Some(ShapeId(0)), "width {t}");
        assert_eq!(edge.target, Some(ShapeId(1)), "width {t}");
        assert!(edge.directed, "width {t}");
    }
}

#[test]
fn ellipse_and_stadium_outlines_are_classified() {
    init_logger();
    let report = FlowchartExtractor::default()
        .process(&rounded_sheet().view(), &[])
        .expect("extraction succeeds");
    let graph = &report.graph;
    let kinds: Vec<ShapeKind> = graph.shapes.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![ShapeKind::Ellipse, ShapeKind::Terminator], "{graph:?}");

    assert_eq!(graph.edges.len(), 1, "{graph:?}");
    assert_eq!(graph.edges[0].source, Some(ShapeId(0)));
    assert_eq!(graph.edges[0].target, Some(ShapeId(1)));

    let mermaid = graph.to_mermaid();
    assert!(mermaid.contains("n0((\"n0\"))"), "{mermaid}");
    assert!(mermaid.contains("n1([\"n1\"])"), "{mermaid}");
    assert!(mermaid.contains("n0 --> n1"), "{mermaid}");
}

#[test]
fn decision_branches_get_yes_and_no_labels() {
    init_logger();
    let canvas = decision_sheet();
    let regions = vec![
        TextRegion::new(BoundingBox::new(80.0, 62.0, 120.0, 78.0), "Valid?", 0.9),
        TextRegion::new(BoundingBox::new(106.0, 135.0, 128.0, 147.0), "Yes", 0.8),
        TextRegion::new(BoundingBox::new(160.0, 50.0, 184.0, 60.0), "No", 0.8),
        TextRegion::new(BoundingBox::new(80.0, 182.0, 120.0, 198.0), "Save", 0.9),
        TextRegion::new(BoundingBox::new(220.0, 62.0, 260.0, 78.0), "Reject", 0.9),
    ];
    let report = FlowchartExtractor::default()
        .process(&canvas.view(), &regions)
        .expect("extraction succeeds");
    let graph = &report.graph;

    let kinds: Vec<ShapeKind> = graph.shapes.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![ShapeKind::Diamond, ShapeKind::Rectangle, ShapeKind::Rectangle],
        "{graph:?}"
    );
    assert_eq!(graph.shapes[0].text.as_deref(), Some("Valid?"));
    assert_eq!(graph.shapes[1].text.as_deref(), Some("Reject"));
    assert_eq!(graph.shapes[2].text.as_deref(), Some("Save"));

    assert_eq!(graph.edges.len(), 2, "{graph:?}");
    let to = |id: u32| {
        graph
            .edges
            .iter()
            .find(|e| e.target == Some(ShapeId(id)))
            .unwrap_or_else(|| panic!("no edge into {id}: {graph:?}"))
    };
    let no = to(1);
    let yes = to(2);
    assert_eq!(no.source, Some(ShapeId(0)));
    assert_eq!(yes.source, Some(ShapeId(0)));
    assert!(no.directed && yes.directed);
    assert_eq!(no.label.as_deref(), Some("no"));
    assert_eq!(yes.label.as_deref(), Some("yes"));
    assert_eq!(report.diagnostics.unassociated_text, 0);

    let mermaid = graph.to_mermaid();
    assert!(mermaid.contains("n0{\"Valid?\"}"), "{mermaid}");
    assert!(mermaid.contains("n0 -->|yes| n2"), "{mermaid}");
    assert!(mermaid.contains("n0 -->|no| n1"), "{mermaid}");
}

#[test]
fn noise_only_image_gives_empty_graph() {
    init_logger();
    let mut canvas = Canvas::new(200, 150);
    canvas.speckle(120, 7);
    let report = FlowchartExtractor::default()
        .process(&canvas.view(), &[])
        .expect("noise is not an error");
    assert!(report.graph.shapes.is_empty(), "{:?}", report.graph);
    assert!(report.graph.edges.is_empty());
    assert!(report.diagnostics.ink_pixels > 0);
}

#[test]
fn connector_with_one_free_end_is_dangling() {
    init_logger();
    let mut canvas = Canvas::new(220, 120);
    canvas.rect(20, 40, 70, 80);
    canvas.fill(70, 60, 150, 62);
    canvas.head_right(150, 162, 61.0, 6.0);
    let report = FlowchartExtractor::default()
        .process(&canvas.view(), &[])
        .expect("extraction succeeds");
    assert_eq!(report.graph.edges.len(), 1, "{:?}", report.graph);
    let edge = &report.graph.edges[0];
    assert_eq!(edge.source, Some(ShapeId(0)));
    assert_eq!(edge.target, None);
    assert!(edge.directed);
    assert_eq!(report.diagnostics.dangling_edges, 1);
    assert!(report.graph.to_mermaid().contains("n0 --> unresolved0"));
}

#[test]
fn floating_line_is_dropped() {
    init_logger();
    let mut canvas = two_boxes_with_arrow();
    canvas.fill(40, 105, 160, 107);
    let report = FlowchartExtractor::default()
        .process(&canvas.view(), &[])
        .expect("extraction succeeds");
    assert_eq!(report.graph.edges.len(), 1);
    assert_eq!(report.diagnostics.dropped_connectors, 1);
}
