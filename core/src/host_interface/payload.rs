use serde::{Deserialize, Serialize};

/// Origin of a sample stream handed to the detector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StreamSource {
    Synthetic,
    Capture,
    Replay,
}

/// Ancillary metadata accompanying each sample block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamAncillary {
    pub timestamp: f64,
    pub source: StreamSource,
    pub chip_rate_hz: f32,
    pub sample_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Interleaved I/Q block consumed by the detection core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamPayload {
    pub samples: Vec<f32>,
    pub ancillary: StreamAncillary,
}

impl StreamPayload {
    pub fn new(samples: Vec<f32>, ancillary: StreamAncillary) -> Self {
        Self { samples, ancillary }
    }
}
