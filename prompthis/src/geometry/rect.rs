//! Rectangle predicates used for layout collision checks.

use crate::model::RectNode;

/// Separating-axis test. Rectangles are disjoint only when one lies strictly
/// beyond the other on some axis, so touching edges count as intersecting.
pub fn rect_intersect(a: &RectNode, b: &RectNode) -> bool {
    !(a.x + a.width < b.x
        || b.x + b.width < a.x
        || a.y + a.height < b.y
        || b.y + b.height < a.y)
}

/// Bounding box of a set of rectangles as (minx, miny, maxx, maxy).
pub fn rects_bbox(rects: &[RectNode]) -> Option<(f32, f32, f32, f32)> {
    let mut it = rects.iter();
    let first = it.next()?;
    let mut b = (first.x, first.y, first.max_x(), first.max_y());
    for r in it {
        b.0 = b.0.min(r.x);
        b.1 = b.1.min(r.y);
        b.2 = b.2.max(r.max_x());
        b.3 = b.3.max(r.max_y());
    }
    Some(b)
}
