//! Greedy polyline simplification: a run of points collapses to its end
//! points while every interior point stays within `tolerance` of the chord.
//! Tolerance 0 drops exactly collinear points only; a negative tolerance
//! disables the pass.

use super::math::dist_point_to_seg_sq;
use crate::model::Vec2;

fn run_fits(points: &[Vec2], start: usize, end: usize, tol2: f32) -> bool {
    let a = points[start];
    let b = points[end];
    points[start + 1..end]
        .iter()
        .all(|p| dist_point_to_seg_sq(p.x, p.y, a.x, a.y, b.x, b.y) <= tol2)
}

pub fn simplify(points: &[Vec2], tolerance: f32, closed: bool) -> Vec<Vec2> {
    if tolerance < 0.0 || points.len() < 3 {
        return points.to_vec();
    }
    let tol2 = tolerance * tolerance;
    let n = points.len();
    let mut out = vec![points[0]];
    let mut start = 0;
    while start < n - 1 {
        let mut end = start + 1;
        while end + 1 < n && run_fits(points, start, end + 1, tol2) {
            end += 1;
        }
        out.push(points[end]);
        start = end;
    }
    if closed {
        // the seam between last and first point is a chord too
        while out.len() > 3 {
            let m = out.len();
            let (a, p, b) = (out[m - 2], out[m - 1], out[0]);
            if dist_point_to_seg_sq(p.x, p.y, a.x, a.y, b.x, b.y) <= tol2 {
                out.pop();
            } else {
                break;
            }
        }
        if out.len() > 3 {
            let m = out.len();
            let (a, p, b) = (out[m - 1], out[0], out[1]);
            if dist_point_to_seg_sq(p.x, p.y, a.x, a.y, b.x, b.y) <= tol2 {
                out.remove(0);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 { Vec2 { x, y } }

    #[test]
    fn drops_collinear_points_at_zero_tolerance() {
        let pts = [v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0), v(2.0, 2.0)];
        assert_eq!(simplify(&pts, 0.0, false), vec![v(0.0, 0.0), v(2.0, 0.0), v(2.0, 2.0)]);
    }

    #[test]
    fn closed_square_with_midpoints() {
        let pts = [
            v(0.0, 0.0), v(5.0, 0.0), v(10.0, 0.0), v(10.0, 10.0),
            v(0.0, 10.0), v(0.0, 5.0),
        ];
        let out = simplify(&pts, 0.0, true);
        assert_eq!(out, vec![v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)]);
    }

    #[test]
    fn negative_tolerance_disables() {
        let pts = [v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0)];
        assert_eq!(simplify(&pts, -1.0, false).len(), 3);
    }

    #[test]
    fn tolerance_absorbs_jitter() {
        let pts = [v(0.0, 0.0), v(1.0, 0.05), v(2.0, -0.05), v(3.0, 0.0)];
        assert_eq!(simplify(&pts, 0.1, false), vec![v(0.0, 0.0), v(3.0, 0.0)]);
    }
}
