//! Centripetal Catmull-Rom interpolation emitted as cubic Bézier segments.
//!
//! Knot spacing is `|p_i p_{i+1}|^alpha`; alpha 0.5 is the centripetal
//! variant, which never forms cusps or self-intersections within a segment.
//! The first and last segments use the missing neighbour's zero spacing, so
//! the curve starts and ends exactly at the end points.

use super::path::Path;
use super::tolerance::EPS_KNOT;
use crate::model::Vec2;

pub const CENTRIPETAL: f32 = 0.5;

struct CatmullRom {
    alpha: f32,
    path: Path,
    count: usize,
    p0: Vec2,
    p1: Vec2,
    p2: Vec2,
    l01_a: f32,
    l12_a: f32,
    l23_a: f32,
    l01_2a: f32,
    l12_2a: f32,
    l23_2a: f32,
}

impl CatmullRom {
    fn new(alpha: f32) -> Self {
        CatmullRom {
            alpha,
            path: Path::new(),
            count: 0,
            p0: Vec2::default(),
            p1: Vec2::default(),
            p2: Vec2::default(),
            l01_a: 0.0,
            l12_a: 0.0,
            l23_a: 0.0,
            l01_2a: 0.0,
            l12_2a: 0.0,
            l23_2a: 0.0,
        }
    }

    fn point(&mut self, p: Vec2) {
        if self.count > 0 {
            let dx = self.p2.x - p.x;
            let dy = self.p2.y - p.y;
            self.l23_2a = (dx * dx + dy * dy).powf(self.alpha);
            self.l23_a = self.l23_2a.sqrt();
        }
        match self.count {
            0 => { self.count = 1; self.path.move_to(p); }
            1 => self.count = 2,
            2 => { self.count = 3; self.segment(p); }
            _ => self.segment(p),
        }
        self.l01_a = self.l12_a;
        self.l12_a = self.l23_a;
        self.l01_2a = self.l12_2a;
        self.l12_2a = self.l23_2a;
        self.p0 = self.p1;
        self.p1 = self.p2;
        self.p2 = p;
    }

    // Segment p1 -> p2, with p0 and `next` as the neighbours.
    fn segment(&mut self, next: Vec2) {
        let (p0, p1, p2) = (self.p0, self.p1, self.p2);
        let mut c1 = p1;
        if self.l01_a > EPS_KNOT {
            let a = 2.0 * self.l01_2a + 3.0 * self.l01_a * self.l12_a + self.l12_2a;
            let n = 3.0 * self.l01_a * (self.l01_a + self.l12_a);
            c1.x = (p1.x * a - p0.x * self.l12_2a + p2.x * self.l01_2a) / n;
            c1.y = (p1.y * a - p0.y * self.l12_2a + p2.y * self.l01_2a) / n;
        }
        let mut c2 = p2;
        if self.l23_a > EPS_KNOT {
            let b = 2.0 * self.l23_2a + 3.0 * self.l23_a * self.l12_a + self.l12_2a;
            let m = 3.0 * self.l23_a * (self.l23_a + self.l12_a);
            c2.x = (p2.x * b + p1.x * self.l23_2a - next.x * self.l12_2a) / m;
            c2.y = (p2.y * b + p1.y * self.l23_2a - next.y * self.l12_2a) / m;
        }
        self.path.cubic_to(c1, c2, p2);
    }

    fn finish(mut self) -> Path {
        match self.count {
            2 => { let p = self.p2; self.path.line_to(p); }
            3 => { let p = self.p2; self.point(p); }
            _ => {}
        }
        self.path
    }
}

/// Interpolating curve through `points`. Two points give a straight line,
/// one point a bare move.
pub fn catmull_rom(points: &[Vec2], alpha: f32) -> Path {
    let mut c = CatmullRom::new(alpha);
    for &p in points {
        c.point(p);
    }
    c.finish()
}
