//! Marching-squares boundary trace over a sampled scalar grid.

use crate::model::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dir {
    N,
    E,
    S,
    W,
}

/// Row-major grid of samples; sample `(i, j)` covers the cell whose top-left
/// pixel is `origin + (i, j) * cell`.
#[derive(Clone, Debug)]
pub struct Grid {
    pub origin: Vec2,
    pub cell: f32,
    pub width: usize,
    pub height: usize,
    pub values: Vec<f32>,
}

impl Grid {
    pub fn new(origin: Vec2, cell: f32, width: usize, height: usize) -> Self {
        Grid { origin, cell, width, height, values: vec![0.0; width * height] }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[j * self.width + i]
    }

    #[inline]
    pub fn add(&mut self, i: usize, j: usize, v: f32) {
        self.values[j * self.width + i] += v;
    }

    /// Pixel centre of sample `(i, j)`.
    #[inline]
    pub fn center(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new(
            self.origin.x + (i as f32 + 0.5) * self.cell,
            self.origin.y + (j as f32 + 0.5) * self.cell,
        )
    }

    /// Index range of samples whose centres fall in `[lo, hi]` along x.
    pub fn span_x(&self, lo: f32, hi: f32) -> (usize, usize) {
        span(self.origin.x, self.cell, self.width, lo, hi)
    }

    pub fn span_y(&self, lo: f32, hi: f32) -> (usize, usize) {
        span(self.origin.y, self.cell, self.height, lo, hi)
    }

    fn inside(&self, i: isize, j: isize, threshold: f32) -> bool {
        if i < 0 || j < 0 || i as usize >= self.width || j as usize >= self.height {
            return false;
        }
        self.get(i as usize, j as usize) >= threshold
    }

    // Window (x, y) has samples (x-1, y-1) .. (x, y) at its corners.
    fn state(&self, x: isize, y: isize, threshold: f32) -> u8 {
        let mut s = 0u8;
        if self.inside(x - 1, y - 1, threshold) { s |= 1; }
        if self.inside(x, y - 1, threshold) { s |= 2; }
        if self.inside(x - 1, y, threshold) { s |= 4; }
        if self.inside(x, y, threshold) { s |= 8; }
        s
    }

    /// Boundary of the region containing the first sample (row-major) at or
    /// above `threshold`, as a closed polygon of cell corners. Empty when no
    /// sample qualifies.
    pub fn trace(&self, threshold: f32) -> Vec<Vec2> {
        let Some(first) = self.values.iter().position(|&v| v >= threshold) else {
            return Vec::new();
        };
        let sx = (first % self.width) as isize;
        let sy = (first / self.width) as isize;
        let max_steps = 4 * (self.width + 1) * (self.height + 1);
        let mut out = Vec::new();
        let (mut x, mut y) = (sx, sy);
        let mut prev: Option<Dir> = None;
        for _ in 0..max_steps {
            out.push(Vec2::new(
                self.origin.x + x as f32 * self.cell,
                self.origin.y + y as f32 * self.cell,
            ));
            let dir = match self.state(x, y, threshold) {
                0 | 2 | 3 | 7 => Dir::E,
                4 | 12 | 14 => Dir::W,
                6 => if prev == Some(Dir::N) { Dir::W } else { Dir::E },
                1 | 5 | 13 => Dir::N,
                9 => if prev == Some(Dir::E) { Dir::N } else { Dir::S },
                8 | 10 | 11 => Dir::S,
                _ => break,
            };
            match dir {
                Dir::N => y -= 1,
                Dir::E => x += 1,
                Dir::S => y += 1,
                Dir::W => x -= 1,
            }
            prev = Some(dir);
            if x == sx && y == sy {
                return out;
            }
        }
        tracing::warn!(width = self.width, height = self.height, "contour trace did not close");
        out
    }
}

fn span(origin: f32, cell: f32, n: usize, lo: f32, hi: f32) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let a = ((lo - origin) / cell - 0.5).ceil().max(0.0) as usize;
    let b = (((hi - origin) / cell - 0.5).floor() + 1.0).max(0.0) as usize;
    (a.min(n), b.min(n))
}
