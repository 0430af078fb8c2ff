//! Uniform cubic B-spline smoothing of closed polygons.

use crate::model::Vec2;

pub const DEFAULT_GRANULARITY: usize = 6;

#[inline]
fn basis(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        (-t3 + 3.0 * t2 - 3.0 * t + 1.0) / 6.0,
        (3.0 * t3 - 6.0 * t2 + 4.0) / 6.0,
        (-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) / 6.0,
        t3 / 6.0,
    ]
}

/// Sample the closed B-spline whose control polygon is `points`,
/// `granularity` samples per control point. The curve approximates rather
/// than interpolates, so corners are rounded off.
pub fn closed_bspline(points: &[Vec2], granularity: usize) -> Vec<Vec2> {
    let n = points.len();
    if n < 3 || granularity == 0 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(n * granularity);
    for i in 0..n {
        let p0 = points[(i + n - 1) % n];
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let p3 = points[(i + 2) % n];
        for k in 0..granularity {
            let w = basis(k as f32 / granularity as f32);
            out.push(Vec2 {
                x: w[0] * p0.x + w[1] * p1.x + w[2] * p2.x + w[3] * p3.x,
                y: w[0] * p0.y + w[1] * p1.y + w[2] * p2.y + w[3] * p3.y,
            });
        }
    }
    out
}
