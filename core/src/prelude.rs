use serde::{Deserialize, Serialize};

/// Fixed configuration for one detector instance.
///
/// The detector never reconfigures in flight; construct a new instance when
/// any of these change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Reference chip sequence the stream is correlated against.
    pub reference: Vec<f32>,
    /// Correlation window length in chips.
    pub window: usize,
    /// Number of frequency hypotheses evaluated in parallel.
    pub hypotheses: usize,
    /// Detection threshold applied to the per-sample peak score.
    pub threshold: f32,
    /// Together with `step_denominator`, the fraction of samples that take
    /// the exact full-recompute correlation path.
    pub step_numerator: u32,
    pub step_denominator: u32,
    /// Normalize scores by the windowed signal energy before thresholding.
    pub normed: bool,
}

impl DetectorConfig {
    /// Default parameter set paired with the supplied chip sequence.
    pub fn with_reference(reference: Vec<f32>) -> Self {
        Self {
            reference,
            window: 60,
            hypotheses: 1,
            threshold: 140.0,
            step_numerator: 1,
            step_denominator: 1,
            normed: true,
        }
    }

    /// Rejects malformed parameters before any sample is processed.
    pub fn validate(&self) -> DetectorResult<()> {
        if self.reference.is_empty() {
            return Err(DetectorError::InvalidConfig(
                "reference sequence is empty".into(),
            ));
        }
        if self.window == 0 {
            return Err(DetectorError::InvalidConfig(
                "correlation window must be positive".into(),
            ));
        }
        if self.hypotheses == 0 {
            return Err(DetectorError::InvalidConfig(
                "hypothesis count must be positive".into(),
            ));
        }
        if self.step_numerator == 0 || self.step_denominator == 0 {
            return Err(DetectorError::InvalidConfig(
                "step terms must be positive".into(),
            ));
        }
        if self.step_numerator > self.step_denominator {
            return Err(DetectorError::InvalidConfig(format!(
                "step numerator {} exceeds denominator {}",
                self.step_numerator, self.step_denominator
            )));
        }
        Ok(())
    }
}

/// Common error type for detector construction and history access.
#[derive(thiserror::Error, Debug)]
pub enum DetectorError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("malformed sample stream: {0}")]
    MalformedStream(String),
    #[error("index {index} out of range for history of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("cannot build a history from an empty state sequence")]
    EmptyHistory,
    #[error("hypothesis count mismatch: expected {expected}, found {found}")]
    HypothesisMismatch { expected: usize, found: usize },
}

pub type DetectorResult<T> = Result<T, DetectorError>;
