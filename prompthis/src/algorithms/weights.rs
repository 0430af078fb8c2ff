//! Image importance from grouped edge weights.

use crate::model::{EdgeGroup, WordEdge};

/// Sum of grouped edge weights incident to each image. Edges not owned by
/// any group do not count; endpoints outside `image_count` are skipped.
pub fn image_weights(image_count: usize, edges: &[WordEdge], groups: &[EdgeGroup]) -> Vec<f64> {
    let mut weights = vec![0.0f64; image_count];
    for g in groups {
        for &ei in &g.edges {
            let Some(e) = edges.get(ei) else {
                tracing::warn!(group = g.idx, edge = ei, "group references a missing edge");
                continue;
            };
            for end in [e.src, e.tgt] {
                match weights.get_mut(end) {
                    Some(w) => *w += e.weight,
                    None => tracing::warn!(image = end, image_count, "edge endpoint outside image list"),
                }
            }
        }
    }
    weights
}

/// Image indices ordered by descending weight; ties keep index order.
pub fn rank_images(image_count: usize, edges: &[WordEdge], groups: &[EdgeGroup]) -> Vec<usize> {
    let weights = image_weights(image_count, edges, groups);
    rank_by_weight(&weights)
}

pub fn rank_by_weight(weights: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    // sort_by is stable
    order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));
    order
}
