use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use csynccore::detector::StreamDriver;
use csynccore::host_interface::{ingest, StreamPayload};
use csynccore::math::StatsHelper;

pub struct RunSummary {
    pub samples: usize,
    /// Count of chips where a preamble was flagged as present.
    pub frame_count: usize,
    pub best_score: f32,
    pub best_lane: u32,
    pub best_offset: f32,
    pub first_latch_chip: Option<usize>,
    pub peak_chip: Option<usize>,
    pub input_rms: f32,
    pub max_score_trace: Vec<f32>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    reference: Vec<f32>,
}

impl Runner {
    pub fn new(config: WorkflowConfig, reference: Vec<f32>) -> Self {
        Self { config, reference }
    }

    pub fn reference(&self) -> &[f32] {
        &self.reference
    }

    pub fn execute(&self, payload: &StreamPayload) -> anyhow::Result<RunSummary> {
        let samples = ingest::deinterleave(&payload.samples)
            .context("deinterleaving stream payload")?;
        let input_rms = StatsHelper::rms(&samples);

        let detector_config = self.config.to_detector_config(self.reference.clone());
        let mut driver = StreamDriver::new(&detector_config)
            .context("constructing stream driver")?;
        for &sample in &samples {
            driver.push(sample).context("processing stream sample")?;
        }
        let history = driver.into_history();

        let mut frame_count = 0;
        let mut best_score = 0.0f32;
        let mut best_lane = 0u32;
        let mut best_offset = 0.0f32;
        let mut first_latch_chip = None;
        let mut peak_chip = None;
        let mut previously_detected = false;
        for index in 0..history.len() {
            let detected = history.frame_detected()[index];
            if detected {
                frame_count += 1;
                if !previously_detected && first_latch_chip.is_none() {
                    first_latch_chip = Some(index);
                }
            }
            previously_detected = detected;
            let score = history.max_score()[index];
            if score > best_score {
                best_score = score;
                best_lane = history.frequency_index()[index];
                best_offset = history.frequency_offset()[index];
                peak_chip = Some(index);
            }
        }

        Ok(RunSummary {
            samples: samples.len(),
            frame_count,
            best_score,
            best_lane,
            best_offset,
            first_latch_chip,
            peak_chip,
            input_rms,
            max_score_trace: history.max_score().to_vec(),
        })
    }
}
