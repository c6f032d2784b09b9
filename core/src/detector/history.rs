use ndarray::Array2;

use crate::detector::state_machine::DetectionState;
use crate::prelude::{DetectorError, DetectorResult};

/// Append-only columnar store of per-sample detection snapshots.
///
/// One vector per field (structure-of-arrays) keeps bulk export
/// cache-friendly; the score column is flat with `hypothesis_count` entries
/// per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionHistory {
    hypothesis_count: usize,
    frame_detected: Vec<bool>,
    max_found: Vec<bool>,
    scores: Vec<f32>,
    max_score: Vec<f32>,
    frequency_offset: Vec<f32>,
    frequency_index: Vec<u32>,
    chip_since_last_det: Vec<u64>,
    chip_from_max: Vec<u64>,
}

impl DetectionHistory {
    pub fn new(hypothesis_count: usize) -> Self {
        Self::with_len(hypothesis_count, 0)
    }

    /// Pre-sized history of zeroed snapshots, for bulk construction via
    /// [`DetectionHistory::set`].
    pub fn with_len(hypothesis_count: usize, len: usize) -> Self {
        Self {
            hypothesis_count,
            frame_detected: vec![false; len],
            max_found: vec![false; len],
            scores: vec![0.0; hypothesis_count * len],
            max_score: vec![0.0; len],
            frequency_offset: vec![0.0; len],
            frequency_index: vec![0; len],
            chip_since_last_det: vec![0; len],
            chip_from_max: vec![0; len],
        }
    }

    /// Builds a history from an ordered snapshot sequence. The hypothesis
    /// count is inferred from the first element; an empty sequence or a
    /// disagreeing element is an error.
    pub fn from_states(states: &[DetectionState]) -> DetectorResult<Self> {
        let first = states.first().ok_or(DetectorError::EmptyHistory)?;
        let mut history = Self::with_len(first.hypothesis_count(), states.len());
        for (index, state) in states.iter().enumerate() {
            history.set(index, state)?;
        }
        Ok(history)
    }

    pub fn len(&self) -> usize {
        self.max_score.len()
    }

    pub fn is_empty(&self) -> bool {
        self.max_score.is_empty()
    }

    pub fn hypothesis_count(&self) -> usize {
        self.hypothesis_count
    }

    fn check_state(&self, state: &DetectionState) -> DetectorResult<()> {
        if state.hypothesis_count() != self.hypothesis_count {
            return Err(DetectorError::HypothesisMismatch {
                expected: self.hypothesis_count,
                found: state.hypothesis_count(),
            });
        }
        Ok(())
    }

    /// Appends one snapshot; amortized O(1).
    pub fn append(&mut self, state: &DetectionState) -> DetectorResult<()> {
        self.check_state(state)?;
        self.frame_detected.push(state.frame_detected);
        self.max_found.push(state.max_found);
        self.scores.extend_from_slice(&state.scores);
        self.max_score.push(state.max_score);
        self.frequency_offset.push(state.frequency_offset);
        self.frequency_index.push(state.frequency_index);
        self.chip_since_last_det.push(state.chip_since_last_det);
        self.chip_from_max.push(state.chip_from_max);
        Ok(())
    }

    /// Overwrites the snapshot at `index`. Only meaningful during bulk
    /// construction; live history is never corrected in place.
    pub fn set(&mut self, index: usize, state: &DetectionState) -> DetectorResult<()> {
        if index >= self.len() {
            return Err(DetectorError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        self.check_state(state)?;
        self.frame_detected[index] = state.frame_detected;
        self.max_found[index] = state.max_found;
        self.max_score[index] = state.max_score;
        self.frequency_offset[index] = state.frequency_offset;
        self.frequency_index[index] = state.frequency_index;
        self.chip_since_last_det[index] = state.chip_since_last_det;
        self.chip_from_max[index] = state.chip_from_max;
        let base = index * self.hypothesis_count;
        self.scores[base..base + self.hypothesis_count].copy_from_slice(&state.scores);
        Ok(())
    }

    pub fn frame_detected(&self) -> &[bool] {
        &self.frame_detected
    }

    pub fn max_found(&self) -> &[bool] {
        &self.max_found
    }

    /// Flat score column, `hypothesis_count` entries per sample.
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    pub fn max_score(&self) -> &[f32] {
        &self.max_score
    }

    pub fn frequency_offset(&self) -> &[f32] {
        &self.frequency_offset
    }

    pub fn frequency_index(&self) -> &[u32] {
        &self.frequency_index
    }

    pub fn chip_since_last_det(&self) -> &[u64] {
        &self.chip_since_last_det
    }

    pub fn chip_from_max(&self) -> &[u64] {
        &self.chip_from_max
    }

    /// Score matrix with one row per hypothesis and one column per sample.
    pub fn scores_matrix(&self) -> Array2<f32> {
        Array2::from_shape_vec((self.len(), self.hypothesis_count), self.scores.clone())
            .expect("score column length is hypothesis_count * len")
            .reversed_axes()
    }
}
