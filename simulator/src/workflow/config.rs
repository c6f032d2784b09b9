use anyhow::Context;
use csynccore::prelude::DetectorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub pn_length: usize,
    pub window: usize,
    pub hypotheses: usize,
    pub threshold: f32,
    pub step_numerator: u32,
    pub step_denominator: u32,
    pub normed: bool,
    pub seed: u64,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        pn_length: usize,
        window: usize,
        hypotheses: usize,
        threshold: f32,
        seed: u64,
    ) -> Self {
        Self {
            pn_length,
            window,
            hypotheses,
            threshold,
            step_numerator: 1,
            step_denominator: 1,
            normed: true,
            seed,
        }
    }

    pub fn to_detector_config(&self, reference: Vec<f32>) -> DetectorConfig {
        DetectorConfig {
            reference,
            window: self.window,
            hypotheses: self.hypotheses,
            threshold: self.threshold,
            step_numerator: self.step_numerator,
            step_denominator: self.step_denominator,
            normed: self.normed,
        }
    }
}
