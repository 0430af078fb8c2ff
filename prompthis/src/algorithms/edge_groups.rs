//! Aggregation of word edges into edge groups.
//!
//! Edges and group descriptors come from the edge-derivation service; a
//! group owns every edge with the same (word, action, src_clu, tgt_clu).

use std::collections::HashMap;

use crate::model::{EdgeGroup, GroupKey, RawEdgeGroup, Vec2, WordEdge};

/// Attach member edges to each group descriptor. `idx` is the descriptor's
/// input position. If two descriptors share a key, the later one owns the
/// matching edges and the earlier one is left empty.
pub fn group_edges(edges: &[WordEdge], raw: Vec<RawEdgeGroup>) -> Vec<EdgeGroup> {
    let mut owner: HashMap<GroupKey<'_>, usize> = HashMap::with_capacity(raw.len());
    for (gi, g) in raw.iter().enumerate() {
        if let Some(prev) = owner.insert(g.key(), gi) {
            tracing::warn!(
                word = %g.word,
                action = %g.action,
                src_clu = g.src_clu,
                tgt_clu = g.tgt_clu,
                shadowed = prev,
                owner = gi,
                "duplicate edge group key; later group owns the edges"
            );
        }
    }
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); raw.len()];
    for (ei, e) in edges.iter().enumerate() {
        if let Some(&gi) = owner.get(&e.key()) {
            members[gi].push(ei);
        }
    }
    drop(owner);
    raw.into_iter()
        .zip(members)
        .enumerate()
        .map(|(idx, (g, edges))| EdgeGroup {
            idx,
            word: g.word,
            action: g.action,
            changes: g.changes,
            src_clu: g.src_clu,
            tgt_clu: g.tgt_clu,
            weight: g.weight,
            edges,
            bary_center: None,
        })
        .collect()
}

/// Mean of the midpoints of the member edges' endpoints. Edges with an
/// endpoint outside `positions` are ignored.
pub fn bary_center(edges: &[WordEdge], members: &[usize], positions: &[Vec2]) -> Option<Vec2> {
    bary_center_with(edges, members, |i| positions.get(i).copied())
}

/// `bary_center` over a sparse position lookup.
pub fn bary_center_with(
    edges: &[WordEdge],
    members: &[usize],
    position: impl Fn(usize) -> Option<Vec2>,
) -> Option<Vec2> {
    let mut sx = 0.0f32;
    let mut sy = 0.0f32;
    let mut n = 0usize;
    for e in members.iter().filter_map(|&i| edges.get(i)) {
        let (Some(a), Some(b)) = (position(e.src), position(e.tgt)) else {
            continue;
        };
        sx += 0.5 * (a.x + b.x);
        sy += 0.5 * (a.y + b.y);
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some(Vec2 { x: sx / n as f32, y: sy / n as f32 })
}

/// One derivation cycle's edges and groups; replaced wholesale when edges
/// are derived again.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeGroups {
    edges: Vec<WordEdge>,
    groups: Vec<EdgeGroup>,
}

impl EdgeGroups {
    pub fn new() -> Self {
        EdgeGroups::default()
    }

    pub fn derive(edges: Vec<WordEdge>, raw: Vec<RawEdgeGroup>, positions: Option<&[Vec2]>) -> Self {
        let groups = group_edges(&edges, raw);
        let mut out = EdgeGroups { edges, groups };
        if let Some(p) = positions {
            out.update_bary_centers(p);
        }
        tracing::debug!(edges = out.edges.len(), groups = out.groups.len(), "edge groups derived");
        out
    }

    /// Recompute label anchors, e.g. after the layout changed.
    pub fn update_bary_centers(&mut self, positions: &[Vec2]) {
        self.update_bary_centers_with(|i| positions.get(i).copied());
    }

    pub fn update_bary_centers_with(&mut self, position: impl Fn(usize) -> Option<Vec2>) {
        for g in &mut self.groups {
            g.bary_center = bary_center_with(&self.edges, &g.edges, &position);
        }
    }

    pub fn edges(&self) -> &[WordEdge] { &self.edges }
    pub fn groups(&self) -> &[EdgeGroup] { &self.groups }
    pub fn is_empty(&self) -> bool { self.groups.is_empty() }

    /// Groups whose weight reaches `min_weight`, heaviest first.
    pub fn strongest(&self, min_weight: f64) -> Vec<&EdgeGroup> {
        let mut gs: Vec<&EdgeGroup> = self.groups.iter().filter(|g| g.weight >= min_weight).collect();
        gs.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        gs
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(word: &str, action: &str, src: usize, tgt: usize, clu: (i64, i64), weight: f64) -> WordEdge {
        WordEdge {
            word: word.into(),
            action: action.into(),
            changes: Vec::new(),
            src,
            tgt,
            src_clu: clu.0,
            tgt_clu: clu.1,
            src_pmt: 0,
            tgt_pmt: 1,
            ratio: 1.0,
            weight,
        }
    }

    fn group(word: &str, action: &str, clu: (i64, i64), weight: f64) -> RawEdgeGroup {
        RawEdgeGroup {
            word: word.into(),
            action: action.into(),
            changes: Vec::new(),
            src_clu: clu.0,
            tgt_clu: clu.1,
            weight,
        }
    }

    #[test]
    fn groups_collect_matching_edges() {
        let edges = vec![edge("cat", "add", 0, 1, (0, 1), 0.5), edge("dog", "add", 0, 1, (0, 1), 0.5)];
        let gs = group_edges(&edges, vec![group("cat", "add", (0, 1), 0.5)]);
        assert_eq!(gs.len(), 1);
        assert_eq!(gs[0].edges, vec![0]);
        assert_eq!(gs[0].idx, 0);
    }

    #[test]
    fn every_key_component_matters() {
        let edges = vec![
            edge("cat", "add", 0, 1, (0, 1), 1.0),
            edge("cat", "remove", 0, 1, (0, 1), 1.0),
            edge("cat", "add", 0, 1, (1, 1), 1.0),
            edge("cat", "add", 0, 1, (0, 2), 1.0),
            edge("cat", "add", 2, 3, (0, 1), 1.0),
        ];
        let gs = group_edges(&edges, vec![group("dog", "add", (0, 1), 1.0), group("cat", "add", (0, 1), 1.0)]);
        assert!(gs[0].edges.is_empty());
        assert_eq!(gs[1].edges, vec![0, 4]);
        assert_eq!(gs[1].idx, 1);
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let edges = vec![edge("cat", "add", 0, 1, (0, 1), 1.0)];
        let gs = group_edges(&edges, vec![group("cat", "add", (0, 1), 1.0), group("cat", "add", (0, 1), 2.0)]);
        assert!(gs[0].edges.is_empty());
        assert_eq!(gs[1].edges, vec![0]);
    }

    #[test]
    fn bary_center_averages_midpoints() {
        let edges = vec![edge("a", "add", 0, 1, (0, 0), 1.0), edge("a", "add", 1, 2, (0, 0), 1.0)];
        let pos = [Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(2.0, 4.0)];
        let g = EdgeGroups::derive(edges, vec![group("a", "add", (0, 0), 1.0)], Some(&pos[..]));
        // midpoints (1,0) and (2,2)
        assert_eq!(g.groups()[0].bary_center, Some(Vec2::new(1.5, 1.0)));
        assert_eq!(g.groups()[0].edges, vec![0, 1]);
    }

    #[test]
    fn bary_center_skips_unknown_positions() {
        let edges = vec![edge("a", "add", 0, 9, (0, 0), 1.0)];
        assert_eq!(bary_center(&edges, &[0], &[Vec2::new(0.0, 0.0)]), None);
    }

    #[test]
    fn strongest_filters_and_orders() {
        let g = EdgeGroups::derive(
            Vec::new(),
            vec![group("a", "add", (0, 0), 0.2), group("b", "add", (0, 0), 0.9), group("c", "add", (0, 0), 0.5)],
            None,
        );
        let words: Vec<&str> = g.strongest(0.5).iter().map(|g| g.word.as_str()).collect();
        assert_eq!(words, vec!["b", "c"]);
    }
}
