use crate::model::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCmd {
    MoveTo(Vec2),
    LineTo(Vec2),
    CubicTo(Vec2, Vec2, Vec2),
    Close,
}

/// Renderable path; serialized by `svg::path_to_svg`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub cmds: Vec<PathCmd>,
}

impl Path {
    pub fn new() -> Self { Path { cmds: Vec::new() } }

    pub fn move_to(&mut self, p: Vec2) { self.cmds.push(PathCmd::MoveTo(p)); }
    pub fn line_to(&mut self, p: Vec2) { self.cmds.push(PathCmd::LineTo(p)); }
    pub fn cubic_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2) { self.cmds.push(PathCmd::CubicTo(c1, c2, p)); }
    pub fn close(&mut self) { self.cmds.push(PathCmd::Close); }

    pub fn is_empty(&self) -> bool { self.cmds.is_empty() }

    /// Current pen position after the last command.
    pub fn end(&self) -> Option<Vec2> {
        let mut start = None;
        let mut cur = None;
        for c in &self.cmds {
            match *c {
                PathCmd::MoveTo(p) => { start = Some(p); cur = Some(p); }
                PathCmd::LineTo(p) | PathCmd::CubicTo(_, _, p) => cur = Some(p),
                PathCmd::Close => cur = start,
            }
        }
        cur
    }

    /// Append `other` as a continuation of this subpath: its leading move
    /// becomes a line so the two halves form one outline.
    pub fn connect(&mut self, other: &Path) {
        let mut first = true;
        for c in &other.cmds {
            match *c {
                PathCmd::MoveTo(p) if first => self.line_to(p),
                cmd => self.cmds.push(cmd),
            }
            first = false;
        }
    }
}
