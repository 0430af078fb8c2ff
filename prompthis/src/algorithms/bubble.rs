//! Bubble-set outlines around clustered image nodes.
//!
//! Members and the virtual edges linking them raise a potential field,
//! non-member rectangles lower it, and the iso-contour at the threshold is
//! the outline. If the contour misses a member the field is relaxed and
//! traced again.

use crate::algorithms::winding::encloses_all;
use crate::config::OutlineParams;
use crate::geometry::bspline::{closed_bspline, DEFAULT_GRANULARITY};
use crate::geometry::marching::Grid;
use crate::geometry::math::{dist_point_to_rect_sq, dist_point_to_seg_sq, seg_hits_rect};
use crate::geometry::rect::rects_bbox;
use crate::geometry::simplify::simplify;
use crate::geometry::tolerance::{EPS_POS, MAX_FIELD_CELLS};
use crate::model::{RectNode, Vec2};

/// Weight of obstacles relative to members.
pub const NEGATIVE_INFLUENCE: f32 = -0.8;
const MAX_ROUTING_DEPTH: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

#[derive(Clone, Copy, Debug)]
struct Influence {
    node: f32,
    edge: f32,
    negative: f32,
    threshold: f32,
}

fn dist(a: Vec2, b: Vec2) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

fn obstacles_hit(a: Vec2, b: Vec2, obstacles: &[RectNode]) -> usize {
    obstacles.iter().filter(|r| seg_hits_rect(a.x, a.y, b.x, b.y, r)).count()
}

/// Route `a -> b` around `obstacles` through corners of the obstacles,
/// pushed out by `buffer`. A corner that clears the blocker on both legs is
/// preferred; otherwise the nearest corner reachable from `a` is taken and
/// the rest of the run is routed from there, so walls longer than the gap
/// are walked around corner by corner. Gives up and keeps a straight run
/// after `MAX_ROUTING_DEPTH` detours.
fn route(a: Vec2, b: Vec2, obstacles: &[RectNode], buffer: f32, depth: usize, out: &mut Vec<Segment>) {
    let blocker = obstacles
        .iter()
        .filter(|r| seg_hits_rect(a.x, a.y, b.x, b.y, r))
        .min_by(|r, s| {
            dist_point_to_rect_sq(a.x, a.y, r).total_cmp(&dist_point_to_rect_sq(a.x, a.y, s))
        });
    let Some(blocker) = blocker.filter(|_| depth < MAX_ROUTING_DEPTH) else {
        out.push(Segment { a, b });
        return;
    };
    let p = blocker.padded(buffer);
    let corners = [
        Vec2::new(p.x, p.y),
        Vec2::new(p.max_x(), p.y),
        Vec2::new(p.x, p.max_y()),
        Vec2::new(p.max_x(), p.max_y()),
    ];
    let clear = |from: Vec2, to: Vec2| !seg_hits_rect(from.x, from.y, to.x, to.y, blocker);
    let detour_len = |c: &Vec2, d: &Vec2| (dist(a, *c) + dist(*c, b)).total_cmp(&(dist(a, *d) + dist(*d, b)));
    let reachable: Vec<Vec2> = corners.into_iter().filter(|&c| dist(a, c) > EPS_POS && clear(a, c)).collect();
    let detour = reachable
        .iter()
        .copied()
        .filter(|&c| clear(c, b))
        .min_by(detour_len)
        .or_else(|| reachable.iter().copied().min_by(detour_len));
    match detour {
        Some(c) => {
            route(a, c, obstacles, buffer, depth + 1, out);
            route(c, b, obstacles, buffer, depth + 1, out);
        }
        None => out.push(Segment { a, b }),
    }
}

/// Virtual edges joining the members into one tree. Members are visited by
/// distance to their common centroid; each one links to the visited member
/// that is cheapest to reach, cost being length times one plus the number of
/// obstacles crossed.
pub fn virtual_edges(members: &[RectNode], obstacles: &[RectNode], buffer: f32) -> Vec<Segment> {
    if members.len() < 2 {
        return Vec::new();
    }
    let centers: Vec<Vec2> = members.iter().map(RectNode::center).collect();
    let n = centers.len() as f32;
    let mid = Vec2::new(
        centers.iter().map(|c| c.x).sum::<f32>() / n,
        centers.iter().map(|c| c.y).sum::<f32>() / n,
    );
    let mut order: Vec<usize> = (0..centers.len()).collect();
    order.sort_by(|&i, &j| dist(centers[i], mid).total_cmp(&dist(centers[j], mid)));

    let mut out = Vec::new();
    for (k, &i) in order.iter().enumerate().skip(1) {
        let c = centers[i];
        let cost = |j: usize| dist(c, centers[j]) * (1 + obstacles_hit(c, centers[j], obstacles)) as f32;
        let Some(&best) = order[..k].iter().min_by(|&&p, &&q| cost(p).total_cmp(&cost(q))) else {
            continue;
        };
        route(centers[best], c, obstacles, buffer, 0, &mut out);
    }
    out
}

fn field_grid(members: &[RectNode], margin: f32, pixel_group: usize) -> Option<Grid> {
    let (minx, miny, maxx, maxy) = rects_bbox(members)?;
    let (x0, y0) = (minx - margin, miny - margin);
    let (w, h) = (maxx - minx + 2.0 * margin, maxy - miny + 2.0 * margin);
    let longest = w.max(h);
    let cell = (pixel_group.max(1) as f32).max(longest / MAX_FIELD_CELLS as f32);
    let cols = (w / cell).ceil() as usize;
    let rows = (h / cell).ceil() as usize;
    if cols == 0 || rows == 0 {
        return None;
    }
    Some(Grid::new(Vec2::new(x0, y0), cell, cols, rows))
}

/// Adds `factor * (r1 - d)^2 / (r1 - r0)^2` to cells within `r1` of a shape,
/// where `d` comes from `dist_sq`. The value reaches `factor` at `d == r0`.
fn splat(
    grid: &mut Grid,
    bounds: (f32, f32, f32, f32),
    r0: f32,
    r1: f32,
    factor: f32,
    only_positive: bool,
    dist_sq: impl Fn(Vec2) -> f32,
) {
    let norm = (r1 - r0).powi(2);
    let (i0, i1) = grid.span_x(bounds.0 - r1, bounds.2 + r1);
    let (j0, j1) = grid.span_y(bounds.1 - r1, bounds.3 + r1);
    for j in j0..j1 {
        for i in i0..i1 {
            if only_positive && grid.get(i, j) <= 0.0 {
                continue;
            }
            let d = dist_sq(grid.center(i, j)).sqrt();
            if d < r1 {
                grid.add(i, j, factor * (r1 - d).powi(2) / norm);
            }
        }
    }
}

fn fill_field(
    grid: &mut Grid,
    members: &[RectNode],
    edges: &[Segment],
    obstacles: &[RectNode],
    p: &OutlineParams,
    inf: Influence,
) {
    grid.values.iter_mut().for_each(|v| *v = 0.0);
    for r in members {
        splat(grid, (r.x, r.y, r.max_x(), r.max_y()), p.node_r0, p.node_r1, inf.node, false, |c| {
            dist_point_to_rect_sq(c.x, c.y, r)
        });
    }
    for s in edges {
        let bounds = (s.a.x.min(s.b.x), s.a.y.min(s.b.y), s.a.x.max(s.b.x), s.a.y.max(s.b.y));
        splat(grid, bounds, p.edge_r0, p.edge_r1, inf.edge, false, |c| {
            dist_point_to_seg_sq(c.x, c.y, s.a.x, s.a.y, s.b.x, s.b.y)
        });
    }
    if inf.negative != 0.0 {
        for r in obstacles {
            splat(grid, (r.x, r.y, r.max_x(), r.max_y()), p.node_r0, p.node_r1, inf.negative, true, |c| {
                dist_point_to_rect_sq(c.x, c.y, r)
            });
        }
    }
}

/// Raw iso-contour around `members` (already padded), before smoothing.
pub fn contour(members: &[RectNode], others: &[RectNode], params: &OutlineParams) -> Vec<Vec2> {
    let margin = params.node_r1.max(params.edge_r1) + params.edge_r0;
    let Some(mut grid) = field_grid(members, margin, params.pixel_group) else {
        return Vec::new();
    };
    let edges = virtual_edges(members, others, params.edge_r0);
    let mut inf = Influence { node: 1.0, edge: 1.0, negative: NEGATIVE_INFLUENCE, threshold: params.threshold };
    let centers = || members.iter().map(RectNode::center);
    let mut last = Vec::new();
    for iteration in 0..params.max_iterations.max(1) {
        fill_field(&mut grid, members, &edges, others, params, inf);
        let traced = grid.trace(inf.threshold);
        if !traced.is_empty() && encloses_all(&traced, centers()) {
            tracing::debug!(iteration, members = members.len(), points = traced.len(), "outline traced");
            return traced;
        }
        if !traced.is_empty() {
            last = traced;
        }
        inf.threshold *= 0.95;
        inf.node *= 1.2;
        inf.edge *= 1.2;
        inf.negative *= 0.8;
    }
    tracing::warn!(members = members.len(), iterations = params.max_iterations, "outline leaves members outside");
    last
}

/// Smoothed outline around `members`, avoiding `others` where possible.
/// Both sets are grown by `padding` first. No members, no outline.
pub fn bubble_outline(members: &[RectNode], others: &[RectNode], padding: f32, params: &OutlineParams) -> Vec<Vec2> {
    if members.is_empty() {
        return Vec::new();
    }
    let members: Vec<RectNode> = members.iter().map(|r| r.padded(padding)).collect();
    let others: Vec<RectNode> = others.iter().map(|r| r.padded(padding)).collect();
    let raw = contour(&members, &others, params);
    let coarse = simplify(&raw, 0.0, true);
    let smooth = closed_bspline(&coarse, DEFAULT_GRANULARITY);
    simplify(&smooth, 0.0, true)
}
