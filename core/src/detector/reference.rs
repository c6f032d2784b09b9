use crate::prelude::{DetectorError, DetectorResult};

/// Immutable chip sequence used as the correlation template.
#[derive(Debug, Clone)]
pub struct ReferenceSequence {
    chips: Vec<f32>,
}

impl ReferenceSequence {
    pub fn new(chips: Vec<f32>) -> DetectorResult<Self> {
        if chips.is_empty() {
            return Err(DetectorError::InvalidConfig(
                "reference sequence is empty".into(),
            ));
        }
        Ok(Self { chips })
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    /// Chip at position `index`, repeating the sequence cyclically so windows
    /// longer than the sequence wrap around it.
    pub fn chip(&self, index: usize) -> f32 {
        self.chips[index % self.chips.len()]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.chips
    }
}
