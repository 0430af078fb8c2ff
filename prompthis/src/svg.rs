use crate::geometry::path::{Path, PathCmd};
use crate::model::Vec2;

pub fn path_to_svg(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(path.cmds.len());
    for c in &path.cmds {
        match *c {
            PathCmd::MoveTo(p) => parts.push(format!("M {} {}", p.x, p.y)),
            PathCmd::LineTo(p) => parts.push(format!("L {} {}", p.x, p.y)),
            PathCmd::CubicTo(c1, c2, p) => {
                parts.push(format!("C {} {}, {} {}, {} {}", c1.x, c1.y, c2.x, c2.y, p.x, p.y))
            }
            PathCmd::Close => parts.push("Z".to_string()),
        }
    }
    parts.join(" ")
}

/// Closed polygon as `M x y L … Z`; empty input gives an empty string.
pub fn polygon_to_svg(points: &[Vec2]) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    let mut d = format!("M {} {}", first.x, first.y);
    for p in rest {
        d.push_str(&format!(" L {} {}", p.x, p.y));
    }
    d.push_str(" Z");
    d
}
