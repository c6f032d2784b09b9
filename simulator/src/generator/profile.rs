use anyhow::Context;
use csynccore::host_interface::{ingest, StreamAncillary, StreamPayload, StreamSource};
use num_complex::Complex32;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Configuration for generating a synthetic chip stream with one embedded
/// preamble.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub pn_length: usize,
    /// Noise-only chips before the preamble.
    pub lead_in: usize,
    /// Noise-only chips after the preamble.
    pub tail: usize,
    pub amplitude: f32,
    pub noise: f32,
    /// Frequency offset applied to the embedded preamble, in cycles/chip.
    pub frequency_offset: f32,
    pub seed: u64,
    pub description: Option<String>,
    pub scenario: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            pn_length: 63,
            lead_in: 128,
            tail: 128,
            amplitude: 1.0,
            noise: 0.02,
            frequency_offset: 0.0,
            seed: 0,
            description: None,
            scenario: None,
        }
    }
}

/// Seeded ±1 chip sequence shared by the generator and the detector.
pub fn build_reference(pn_length: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..pn_length.max(1))
        .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
        .collect()
}

fn build_sample_vector(
    config: &GeneratorConfig,
    reference: &[f32],
) -> anyhow::Result<Vec<Complex32>> {
    let total = config
        .lead_in
        .checked_add(reference.len())
        .and_then(|count| count.checked_add(config.tail))
        .context("overflow computing sample count for generator")?;

    // Noise seed is decoupled from the chip seed so the same reference can
    // be embedded in different realizations.
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    let mut samples = Vec::with_capacity(total);

    for index in 0..total {
        let mut value = Complex32::new(0.0, 0.0);
        if index >= config.lead_in && index < config.lead_in + reference.len() {
            let chip = reference[index - config.lead_in];
            let phase = 2.0 * PI * config.frequency_offset * index as f32;
            value = Complex32::from_polar(config.amplitude, phase) * chip;
        }
        if config.noise > 0.0 {
            value += Complex32::new(
                rng.gen_range(-config.noise..config.noise),
                rng.gen_range(-config.noise..config.noise),
            );
        }
        samples.push(value);
    }

    Ok(samples)
}

pub fn build_stream_payload_from_config(
    config: &GeneratorConfig,
    reference: &[f32],
) -> anyhow::Result<StreamPayload> {
    let samples = build_sample_vector(config, reference)?;
    let ancillary = StreamAncillary {
        timestamp: 0.0,
        source: StreamSource::Synthetic,
        chip_rate_hz: 1.0,
        sample_count: samples.len(),
        description: config.description.clone(),
    };
    Ok(StreamPayload::new(ingest::interleave(&samples), ancillary))
}

/// Convenience builder returning both the chips and the stream embedding
/// them with default scenario settings.
pub fn build_stream_payload(pn_length: usize, seed: u64) -> anyhow::Result<(Vec<f32>, StreamPayload)> {
    let reference = build_reference(pn_length, seed);
    let config = GeneratorConfig {
        pn_length,
        seed,
        ..Default::default()
    };
    let payload = build_stream_payload_from_config(&config, &reference)?;
    Ok((reference, payload))
}
