use crate::model::RectNode;

/// Squared distance from a point to segment (x1,y1)-(x2,y2).
pub fn dist_point_to_seg_sq(px: f32, py: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let vx = x2 - x1; let vy = y2 - y1;
    let vv = vx*vx + vy*vy;
    let t = if vv > 0.0 { (((px - x1)*vx + (py - y1)*vy) / vv).clamp(0.0, 1.0) } else { 0.0 };
    let dx = px - (x1 + t * vx); let dy = py - (y1 + t * vy);
    dx*dx + dy*dy
}

/// Squared distance from a point to a rectangle; 0 inside.
pub fn dist_point_to_rect_sq(px: f32, py: f32, r: &RectNode) -> f32 {
    let dx = if px < r.x { r.x - px } else if px > r.max_x() { px - r.max_x() } else { 0.0 };
    let dy = if py < r.y { r.y - py } else if py > r.max_y() { py - r.max_y() } else { 0.0 };
    dx*dx + dy*dy
}

/// Does segment (x1,y1)-(x2,y2) pass through the interior of `r`?
/// Liang-Barsky clipping against the rectangle.
pub fn seg_hits_rect(x1: f32, y1: f32, x2: f32, y2: f32, r: &RectNode) -> bool {
    let dx = x2 - x1; let dy = y2 - y1;
    let mut t0 = 0.0f32; let mut t1 = 1.0f32;
    let checks = [(-dx, x1 - r.x), (dx, r.max_x() - x1), (-dy, y1 - r.y), (dy, r.max_y() - y1)];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 { return false; }
            continue;
        }
        let t = q / p;
        if p < 0.0 { if t > t1 { return false; } if t > t0 { t0 = t; } }
        else { if t < t0 { return false; } if t < t1 { t1 = t; } }
    }
    t0 < t1
}
