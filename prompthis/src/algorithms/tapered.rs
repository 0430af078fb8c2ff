//! Tapered edges: a closed sliver from a wide source end to a point at the
//! target, bent through a control point.

use crate::config::TaperParams;
use crate::geometry::catmull_rom::{catmull_rom, CENTRIPETAL};
use crate::geometry::path::Path;
use crate::model::Vec2;
use crate::svg::path_to_svg;

/// Outline of an edge from `src` to `tgt` passing near `mid`. The two sides
/// are offset perpendicular to `src -> tgt`: by `mid_offset` at `mid` and by
/// twice that at `src`; both meet at `tgt`.
pub fn tapered_edge(src: Vec2, tgt: Vec2, mid: Vec2, params: &TaperParams) -> Path {
    let theta = (tgt.y - src.y).atan2(tgt.x - src.x);
    let phi = theta + std::f32::consts::FRAC_PI_2;
    let (s, c) = phi.sin_cos();
    let mid_off = params.mid_offset;
    let src_off = 2.0 * mid_off;
    let pm1 = Vec2::new(mid.x + mid_off * c, mid.y + mid_off * s);
    let pm2 = Vec2::new(mid.x - mid_off * c, mid.y - mid_off * s);
    let ps1 = Vec2::new(src.x + src_off * c, src.y + src_off * s);
    let ps2 = Vec2::new(src.x - src_off * c, src.y - src_off * s);

    let mut path = catmull_rom(&[ps1, pm1, tgt], CENTRIPETAL);
    path.connect(&catmull_rom(&[tgt, pm2, ps2], CENTRIPETAL));
    path.close();
    path
}

pub fn tapered_edge_svg(src: Vec2, tgt: Vec2, mid: Vec2, params: &TaperParams) -> String {
    path_to_svg(&tapered_edge(src, tgt, mid, params))
}
