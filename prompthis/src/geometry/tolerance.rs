// Centralized tolerances for outline geometry

pub const EPS_POS: f32 = 1e-4;            // point coincidence threshold (px)
pub const EPS_AREA: f32 = 1e-8;           // outline area below which a centroid degenerates
pub const EPS_KNOT: f32 = 1e-12;          // Catmull-Rom knot spacing below which a tangent is skipped

// Potential field sampling cap (cells per axis)
pub const MAX_FIELD_CELLS: usize = 2048;
