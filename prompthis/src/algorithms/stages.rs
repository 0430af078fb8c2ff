//! Segmentation of a session's prompts into exploration stages.
//!
//! A stage is a contiguous run of prompt indices whose consecutive prompts
//! are similar enough to count as one phase. Stages always partition
//! `[0, n)` in ascending order; every operation below preserves that.

use crate::algorithms::similarity::SimilarityMatrix;
use crate::error::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StageSegmenter {
    stages: Vec<Vec<usize>>,
}

/// What `update` did, for callers that redraw incrementally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageUpdate {
    /// The single new index joined the last stage.
    Extended,
    /// The single new index opened a new stage.
    Appended,
    /// Stages were rebuilt from scratch.
    Rebuilt,
}

impl StageSegmenter {
    pub fn new() -> Self {
        StageSegmenter { stages: Vec::new() }
    }

    /// Rebuild from an explicit partition (restoring saved view state).
    pub fn from_stages(stages: Vec<Vec<usize>>) -> Result<Self> {
        let s = StageSegmenter { stages };
        s.check_partition()?;
        Ok(s)
    }

    pub fn stages(&self) -> &[Vec<usize>] { &self.stages }

    /// Number of prompt indices covered by the stages.
    pub fn covered(&self) -> usize {
        self.stages.iter().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.stages.clear();
    }

    /// Bring the stages up to date with `matrix`. When exactly one prompt was
    /// appended since the last call only that prompt is placed; otherwise
    /// (bulk load, threshold change) everything is recomputed.
    pub fn update(&mut self, matrix: &SimilarityMatrix, threshold: f64) -> StageUpdate {
        let n = matrix.len();
        let covered = self.covered();
        if covered > 0 && n == covered + 1 {
            let last = n - 1;
            if matrix.get(last - 1, last) > threshold {
                if let Some(stage) = self.stages.last_mut() {
                    stage.push(last);
                }
                tracing::debug!(index = last, "prompt joined last stage");
                return StageUpdate::Extended;
            }
            self.stages.push(vec![last]);
            tracing::debug!(index = last, "prompt opened a new stage");
            return StageUpdate::Appended;
        }
        self.recompute(matrix, threshold);
        StageUpdate::Rebuilt
    }

    /// Full recompute: scan consecutive pairs and cut wherever similarity
    /// does not exceed `threshold`.
    pub fn recompute(&mut self, matrix: &SimilarityMatrix, threshold: f64) {
        let n = matrix.len();
        let mut stages: Vec<Vec<usize>> = Vec::new();
        for step in 0..n {
            if step > 0 && matrix.get(step - 1, step) > threshold {
                if let Some(stage) = stages.last_mut() {
                    stage.push(step);
                    continue;
                }
            }
            stages.push(vec![step]);
        }
        tracing::debug!(prompts = n, stages = stages.len(), threshold, "stages recomputed");
        self.stages = stages;
    }

    /// Manual re-segmentation at prompt `at`. If `at` opens a stage other
    /// than the first, that stage is merged into its predecessor; if it opens
    /// the first stage nothing changes. Otherwise the stage holding `at` is
    /// split so that `at` opens a new stage.
    pub fn segment(&mut self, at: usize) -> Result<()> {
        let covered = self.covered();
        if at >= covered {
            return Err(Error::InvalidArgument(format!(
                "segment index {} outside the {} staged prompts",
                at, covered
            )));
        }
        if let Some(k) = self.stages.iter().position(|s| s.first() == Some(&at)) {
            if k > 0 {
                let tail = self.stages.remove(k);
                self.stages[k - 1].extend(tail);
            }
            return Ok(());
        }
        let (k, pos) = self
            .stages
            .iter()
            .enumerate()
            .find_map(|(k, s)| s.iter().position(|&i| i == at).map(|pos| (k, pos)))
            .ok_or_else(|| Error::InvalidArgument(format!("prompt {} is not staged", at)))?;
        let tail = self.stages[k].split_off(pos);
        self.stages.insert(k + 1, tail);
        Ok(())
    }

    fn check_partition(&self) -> Result<()> {
        let mut expect = 0usize;
        for (k, s) in self.stages.iter().enumerate() {
            if s.is_empty() {
                return Err(Error::InvalidArgument(format!("stage {} is empty", k)));
            }
            for &i in s {
                if i != expect {
                    return Err(Error::InvalidArgument(format!(
                        "stage {} holds prompt {} where {} was expected",
                        k, i, expect
                    )));
                }
                expect += 1;
            }
        }
        Ok(())
    }
}
