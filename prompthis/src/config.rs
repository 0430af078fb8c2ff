//! User-adjustable thresholds and rendering parameters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{check_range, Error, Result};

/// Bubble-set outline parameters. Radii are in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineParams {
    pub padding: f32,
    /// Side of one potential-field cell.
    pub pixel_group: usize,
    pub node_r0: f32,
    pub node_r1: f32,
    pub edge_r0: f32,
    pub edge_r1: f32,
    pub threshold: f32,
    pub max_iterations: usize,
}

impl Default for OutlineParams {
    fn default() -> Self {
        OutlineParams {
            padding: 4.0,
            pixel_group: 4,
            node_r0: 15.0,
            node_r1: 50.0,
            edge_r0: 10.0,
            edge_r1: 20.0,
            threshold: 1.0,
            max_iterations: 20,
        }
    }
}

impl OutlineParams {
    pub fn validate(&self) -> Result<()> {
        check_range("outline.padding", self.padding as f64, 0.0, 1e4)?;
        check_range("outline.pixel_group", self.pixel_group as f64, 1.0, 256.0)?;
        check_range("outline.node_r0", self.node_r0 as f64, f64::MIN_POSITIVE, 1e4)?;
        check_range("outline.node_r1", self.node_r1 as f64, self.node_r0 as f64, 1e4)?;
        check_range("outline.edge_r0", self.edge_r0 as f64, f64::MIN_POSITIVE, 1e4)?;
        check_range("outline.edge_r1", self.edge_r1 as f64, self.edge_r0 as f64, 1e4)?;
        if self.node_r1 <= self.node_r0 || self.edge_r1 <= self.edge_r0 {
            return Err(Error::InvalidArgument("outline r1 must exceed r0".into()));
        }
        check_range("outline.threshold", self.threshold as f64, f64::MIN_POSITIVE, 1e3)?;
        check_range("outline.max_iterations", self.max_iterations as f64, 1.0, 1000.0)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaperParams {
    /// Half-width at the control point; the source end is twice as wide.
    pub mid_offset: f32,
}

impl Default for TaperParams {
    fn default() -> Self {
        TaperParams { mid_offset: 2.0 }
    }
}

/// Session-wide controls. Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    /// Consecutive prompts above this similarity share a stage; also the
    /// prompt-pair cut.
    pub min_similarity: f64,
    pub cluster_thresh: f64,
    /// Edge groups lighter than this are not drawn.
    pub edge_weight_thresh: f64,
    pub outline: OutlineParams,
    pub taper: TaperParams,
}

impl Default for Controls {
    fn default() -> Self {
        Controls {
            min_similarity: 0.6,
            cluster_thresh: 0.5,
            edge_weight_thresh: 0.5,
            outline: OutlineParams::default(),
            taper: TaperParams::default(),
        }
    }
}

impl Controls {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let c: Controls = serde_json::from_str(s)?;
        c.validate()?;
        Ok(c)
    }

    pub fn from_json_value(v: Value) -> Result<Self> {
        let c: Controls = serde_json::from_value(v)?;
        c.validate()?;
        Ok(c)
    }

    pub fn validate(&self) -> Result<()> {
        check_range("min_similarity", self.min_similarity, 0.0, 1.0)?;
        check_range("cluster_thresh", self.cluster_thresh, 0.0, 1.0)?;
        check_range("edge_weight_thresh", self.edge_weight_thresh, 0.0, f64::MAX)?;
        check_range("taper.mid_offset", self.taper.mid_offset as f64, 0.0, 1e3)?;
        self.outline.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_gives_defaults() {
        let c = Controls::from_json_str("{}").unwrap();
        assert_eq!(c, Controls::default());
        assert_eq!(c.outline.pixel_group, 4);
        assert_eq!(c.taper.mid_offset, 2.0);
    }

    #[test]
    fn partial_nested_override() {
        let c = Controls::from_json_value(json!({
            "min_similarity": 0.75,
            "outline": { "padding": 8.0 }
        }))
        .unwrap();
        assert_eq!(c.min_similarity, 0.75);
        assert_eq!(c.outline.padding, 8.0);
        assert_eq!(c.outline.node_r1, 50.0);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = Controls::from_json_value(json!({ "min_similarity": 1.5 })).unwrap_err();
        assert_eq!(err.code(), "out_of_range");
    }

    #[test]
    fn rejects_inverted_radii() {
        let err = Controls::from_json_value(json!({ "outline": { "edge_r0": 20.0, "edge_r1": 20.0 } })).unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
        let err = Controls::from_json_value(json!({ "outline": { "node_r1": 5.0 } })).unwrap_err();
        assert_eq!(err.code(), "out_of_range");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert_eq!(Controls::from_json_str("{").unwrap_err().code(), "json_parse");
        assert_eq!(Controls::from_json_str(r#"{"cluster_thresh":"x"}"#).unwrap_err().code(), "json_parse");
    }
}
