//! Coordinate rescaling from projection space into screen space.

use crate::model::{RectNode, Vec2};
use serde::{Deserialize, Serialize};

/// Linear map from `domain` to `range`, the scale the web client builds
/// for projection coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f32, f32),
    pub range: (f32, f32),
}

impl Default for LinearScale {
    fn default() -> Self {
        LinearScale { domain: (0.0, 1.0), range: (0.0, 1.0) }
    }
}

impl LinearScale {
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    /// Scale whose domain spans the given values; a degenerate span maps to
    /// the range midpoint.
    pub fn fit<I: IntoIterator<Item = f32>>(values: I, range: (f32, f32)) -> Self {
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for v in values {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if !lo.is_finite() || !hi.is_finite() {
            return LinearScale { domain: (0.0, 1.0), range };
        }
        LinearScale { domain: (lo, hi), range }
    }

    pub fn apply(&self, v: f32) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return 0.5 * (r0 + r1);
        }
        r0 + (v - d0) / span * (r1 - r0)
    }
}

/// Positioned element whose coordinates can be rescaled.
pub trait Positioned: Clone {
    fn position(&self) -> Vec2;
    fn with_position(&self, p: Vec2) -> Self;
}

impl Positioned for Vec2 {
    fn position(&self) -> Vec2 { *self }
    fn with_position(&self, p: Vec2) -> Self { p }
}

impl Positioned for RectNode {
    fn position(&self) -> Vec2 { Vec2 { x: self.x, y: self.y } }
    fn with_position(&self, p: Vec2) -> Self { RectNode { x: p.x, y: p.y, ..*self } }
}

/// Applies independent x/y scales to nodes, producing transformed copies.
pub struct GraphicNode<X, Y> {
    x_scale: X,
    y_scale: Y,
}

fn identity(v: f32) -> f32 { v }

impl GraphicNode<fn(f32) -> f32, fn(f32) -> f32> {
    pub fn identity() -> Self {
        GraphicNode { x_scale: identity, y_scale: identity }
    }
}

impl GraphicNode<LinearScale, LinearScale> {
    pub fn linear(x: LinearScale, y: LinearScale) -> Self {
        GraphicNode { x_scale: x, y_scale: y }
    }

    pub fn node<N: Positioned>(&self, n: &N) -> N {
        let p = n.position();
        n.with_position(Vec2 { x: self.x_scale.apply(p.x), y: self.y_scale.apply(p.y) })
    }

    pub fn nodes<N: Positioned>(&self, ns: &[N]) -> Vec<N> {
        ns.iter().map(|n| self.node(n)).collect()
    }
}

impl<X, Y> GraphicNode<X, Y>
where
    X: Fn(f32) -> f32,
    Y: Fn(f32) -> f32,
{
    pub fn new(x_scale: X, y_scale: Y) -> Self {
        GraphicNode { x_scale, y_scale }
    }

    pub fn with_x_scale<X2: Fn(f32) -> f32>(self, x_scale: X2) -> GraphicNode<X2, Y> {
        GraphicNode { x_scale, y_scale: self.y_scale }
    }

    pub fn with_y_scale<Y2: Fn(f32) -> f32>(self, y_scale: Y2) -> GraphicNode<X, Y2> {
        GraphicNode { x_scale: self.x_scale, y_scale }
    }

    /// Rescaled copy of `n`; with `rescale == false` the copy is untouched.
    pub fn rescale<N: Positioned>(&self, n: &N, rescale: bool) -> N {
        if !rescale {
            return n.clone();
        }
        let p = n.position();
        n.with_position(Vec2 { x: (self.x_scale)(p.x), y: (self.y_scale)(p.y) })
    }

    pub fn rescale_all<N: Positioned>(&self, ns: &[N]) -> Vec<N> {
        ns.iter().map(|n| self.rescale(n, true)).collect()
    }
}
