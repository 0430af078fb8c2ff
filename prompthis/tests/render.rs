use prompthis::algorithms::bubble::bubble_outline;
use prompthis::algorithms::tapered::tapered_edge_svg;
use prompthis::algorithms::winding::{encloses_all, polygon_area};
use prompthis::config::{OutlineParams, TaperParams};
use prompthis::geometry::rect::rect_intersect;
use prompthis::geometry::scale::GraphicNode;
use prompthis::model::{RectNode, Vec2};
use prompthis::svg::polygon_to_svg;

#[test]
fn tapered_edges_are_closed_slivers() {
    let params = TaperParams::default();
    for (src, tgt, mid) in [
        (Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(50.0, 30.0)),
        (Vec2::new(10.0, 80.0), Vec2::new(-40.0, -5.0), Vec2::new(0.0, 0.0)),
        (Vec2::new(5.0, 5.0), Vec2::new(5.0, 200.0), Vec2::new(5.0, 100.0)),
    ] {
        let d = tapered_edge_svg(src, tgt, mid, &params);
        assert!(d.starts_with("M "), "{}", d);
        assert!(d.ends_with(" Z"), "{}", d);
        assert_eq!(d.matches(" L ").count(), 1, "{}", d);
        assert!(!d.contains("NaN"));
    }
}

#[test]
fn outline_wraps_a_cluster_and_not_its_neighbours() {
    let members = [
        RectNode::new(0.0, 0.0, 32.0, 32.0),
        RectNode::new(70.0, 10.0, 32.0, 32.0),
        RectNode::new(20.0, 80.0, 32.0, 32.0),
        RectNode::new(90.0, 90.0, 32.0, 32.0),
    ];
    let others = [RectNode::new(400.0, 0.0, 32.0, 32.0), RectNode::new(0.0, 400.0, 32.0, 32.0)];
    let outline = bubble_outline(&members, &others, 4.0, &OutlineParams::default());
    assert!(encloses_all(&outline, members.iter().map(RectNode::center)));
    assert!(!encloses_all(&outline, others.iter().map(RectNode::center)));
    assert!(polygon_area(&outline).abs() > 4.0 * 32.0 * 32.0);
    let d = polygon_to_svg(&outline);
    assert!(d.starts_with("M ") && d.ends_with(" Z"));
}

#[test]
fn rect_intersection_cases() {
    let a = RectNode::new(0.0, 0.0, 10.0, 10.0);
    assert!(rect_intersect(&a, &RectNode::new(5.0, 5.0, 10.0, 10.0)));
    assert!(!rect_intersect(&a, &RectNode::new(20.0, 20.0, 5.0, 5.0)));
    assert!(rect_intersect(&a, &RectNode::new(10.0, 0.0, 5.0, 5.0)));
}

#[test]
fn identity_rescale_keeps_rects() {
    let g = GraphicNode::identity();
    let r = RectNode::new(3.5, -2.0, 8.0, 9.0);
    assert_eq!(g.rescale(&r, true), r);
    let moved = g.with_x_scale(|x: f32| x * 2.0).rescale(&r, true);
    assert_eq!(moved, RectNode::new(7.0, -2.0, 8.0, 9.0));
}
