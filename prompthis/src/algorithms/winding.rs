//! Point-in-outline tests and polygon measures for cluster outlines.
//!
//! Winding uses a horizontal ray with signed crossings, so it works for
//! outlines traced in either orientation.

use crate::model::Vec2;

/// Number of times `polygon` winds around `(px, py)`; 0 means outside.
/// Sign follows the polygon's orientation.
pub fn winding_number(px: f32, py: f32, polygon: &[Vec2]) -> i32 {
    if polygon.len() < 3 {
        return 0;
    }
    let n = polygon.len();
    let mut winding = 0i32;
    for i in 0..n {
        let p1 = polygon[i];
        let p2 = polygon[(i + 1) % n];
        if p1.y <= py {
            if p2.y > py && cross(p1.x - px, p1.y - py, p2.x - px, p2.y - py) > 0.0 {
                winding += 1;
            }
        } else if p2.y <= py && cross(p1.x - px, p1.y - py, p2.x - px, p2.y - py) < 0.0 {
            winding -= 1;
        }
    }
    winding
}

#[inline]
pub fn point_in_polygon_nonzero(px: f32, py: f32, polygon: &[Vec2]) -> bool {
    winding_number(px, py, polygon) != 0
}

/// Does the outline enclose every point?
pub fn encloses_all(polygon: &[Vec2], points: impl IntoIterator<Item = Vec2>) -> bool {
    points.into_iter().all(|p| point_in_polygon_nonzero(p.x, p.y, polygon))
}

#[inline]
fn cross(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    ax * by - ay * bx
}

/// Signed shoelace area; positive for counter-clockwise in y-up axes.
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let n = polygon.len();
    let mut a = 0.0f32;
    for i in 0..n {
        let p = polygon[i];
        let q = polygon[(i + 1) % n];
        a += p.x * q.y - q.x * p.y;
    }
    0.5 * a
}

/// Area centroid of an outline. Falls back to the vertex
/// mean for degenerate outlines.
pub fn polygon_centroid(polygon: &[Vec2]) -> Option<Vec2> {
    if polygon.is_empty() {
        return None;
    }
    let area = polygon_area(polygon);
    if area.abs() <= crate::geometry::tolerance::EPS_AREA {
        let n = polygon.len() as f32;
        let (sx, sy) = polygon.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        return Some(Vec2::new(sx / n, sy / n));
    }
    let n = polygon.len();
    let (mut cx, mut cy) = (0.0f32, 0.0f32);
    for i in 0..n {
        let p = polygon[i];
        let q = polygon[(i + 1) % n];
        let f = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * f;
        cy += (p.y + q.y) * f;
    }
    Some(Vec2::new(cx / (6.0 * area), cy / (6.0 * area)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(0.0, 10.0)]
    }

    #[test]
    fn winding_inside_and_outside() {
        let sq = square();
        assert_eq!(winding_number(5.0, 5.0, &sq), 1);
        assert_eq!(winding_number(-5.0, 5.0, &sq), 0);
        assert_eq!(winding_number(5.0, 15.0, &sq), 0);
        let rev: Vec<Vec2> = sq.iter().rev().copied().collect();
        assert_eq!(winding_number(5.0, 5.0, &rev), -1);
    }

    #[test]
    fn encloses_checks_every_point() {
        let sq = square();
        assert!(encloses_all(&sq, [Vec2::new(1.0, 1.0), Vec2::new(9.0, 9.0)]));
        assert!(!encloses_all(&sq, [Vec2::new(1.0, 1.0), Vec2::new(11.0, 9.0)]));
        assert!(!point_in_polygon_nonzero(1.0, 1.0, &sq[..2]));
    }

    #[test]
    fn area_and_centroid() {
        let sq = square();
        assert_eq!(polygon_area(&sq), 100.0);
        assert_eq!(polygon_centroid(&sq), Some(Vec2::new(5.0, 5.0)));
        let line = [Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0)];
        assert_eq!(polygon_centroid(&line), Some(Vec2::new(1.0, 0.0)));
        assert_eq!(polygon_centroid(&[]), None);
    }
}
