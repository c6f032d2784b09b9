use num_complex::Complex32;
use std::f32::consts::PI;

use crate::detector::reference::ReferenceSequence;
use crate::math::stats::SlidingEnergy;
use crate::prelude::{DetectorConfig, DetectorResult};

/// Samples between rotator phasor renormalizations.
const PHASE_RENORM_INTERVAL: u64 = 1024;

/// Winning lane for one processed sample. Ties resolve to the lowest index
/// so the reduction stays deterministic regardless of evaluation order.
#[derive(Debug, Clone, Copy)]
pub struct LaneSelection {
    pub best_index: usize,
    pub best_score: f32,
    pub best_offset: f32,
}

/// One correlator lane: the stream derotated under a single frequency
/// hypothesis, accumulated against the reference template.
struct CorrelatorLane {
    /// Resolved hypothesis value, in cycles per chip.
    offset: f32,
    /// Per-chip derotation step for this hypothesis.
    step: Complex32,
    /// Current derotation phasor, advanced once per sample.
    phase: Complex32,
    /// Ring of derotated samples covering the correlation window.
    rotated: Vec<Complex32>,
    /// Chip-weighted products matching `rotated` slot for slot.
    products: Vec<Complex32>,
    acc: Complex32,
}

impl CorrelatorLane {
    fn new(offset: f32, window: usize) -> Self {
        let step = Complex32::from_polar(1.0, -2.0 * PI * offset);
        Self {
            offset,
            step,
            phase: Complex32::new(1.0, 0.0),
            rotated: vec![Complex32::new(0.0, 0.0); window],
            products: vec![Complex32::new(0.0, 0.0); window],
            acc: Complex32::new(0.0, 0.0),
        }
    }
}

/// Bank of `hypotheses` independent correlator lanes sharing one energy
/// window. Lanes are mutually independent per sample; they are evaluated in
/// ascending index order and reduced with a strict-greater comparison.
pub struct HypothesisBank {
    reference: ReferenceSequence,
    lanes: Vec<CorrelatorLane>,
    energy: SlidingEnergy,
    scores: Vec<f32>,
    window: usize,
    head: usize,
    filled: usize,
    chip_index: u64,
    step_numerator: u32,
    step_denominator: u32,
    normed: bool,
}

impl HypothesisBank {
    pub fn new(config: &DetectorConfig) -> DetectorResult<Self> {
        config.validate()?;
        let reference = ReferenceSequence::new(config.reference.clone())?;
        let count = config.hypotheses;
        let window = config.window;
        let lanes = (0..count)
            .map(|k| CorrelatorLane::new(Self::offset_for(k, count, window), window))
            .collect();
        Ok(Self {
            reference,
            lanes,
            energy: SlidingEnergy::new(window),
            scores: vec![0.0; count],
            window,
            head: 0,
            filled: 0,
            chip_index: 0,
            step_numerator: config.step_numerator,
            step_denominator: config.step_denominator,
            normed: config.normed,
        })
    }

    /// Hypothesis values are evenly spaced around zero, spanning one
    /// correlation-null width (±1/(2·window) cycles per chip).
    fn offset_for(lane: usize, count: usize, window: usize) -> f32 {
        (lane as f32 - (count as f32 - 1.0) / 2.0) / (count as f32 * window as f32)
    }

    /// Whether the sample at `index` takes the exact full-recompute path.
    /// Exactly `step_numerator` of every `step_denominator` consecutive
    /// indices do, and the choice depends on the index alone.
    fn takes_full_path(index: u64, numerator: u32, denominator: u32) -> bool {
        (index.wrapping_mul(u64::from(numerator))) % u64::from(denominator) < u64::from(numerator)
    }

    pub fn hypothesis_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn frequency_offset(&self, lane: usize) -> f32 {
        self.lanes[lane].offset
    }

    /// Scores produced for the most recent sample, in lane order.
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    /// Updates every lane with one sample and returns the winning lane.
    ///
    /// The incremental path slides the accumulator while keeping stale chip
    /// weights for retained samples; the full path realigns the template to
    /// the current window and resums, which also bounds float drift.
    pub fn process(&mut self, sample: Complex32) -> LaneSelection {
        let full_path =
            Self::takes_full_path(self.chip_index, self.step_numerator, self.step_denominator);
        let renorm_phase = self.chip_index % PHASE_RENORM_INTERVAL == 0 && self.chip_index > 0;

        self.energy.push(sample.norm_sqr());
        if full_path {
            self.energy.resum();
        }
        let rms = self.energy.rms();

        let window = self.window;
        let at_capacity = self.filled == window;
        let insert = if at_capacity { self.head } else { self.filled };
        let reference = &self.reference;

        for (lane_index, lane) in self.lanes.iter_mut().enumerate() {
            if renorm_phase {
                let magnitude = lane.phase.norm();
                if magnitude > 0.0 {
                    lane.phase /= magnitude;
                }
            }
            let rotated = sample * lane.phase;
            lane.phase *= lane.step;

            if at_capacity {
                lane.acc -= lane.products[insert];
            }
            lane.rotated[insert] = rotated;
            let weight_index = if at_capacity { window - 1 } else { self.filled };
            lane.products[insert] = rotated * reference.chip(weight_index);
            lane.acc += lane.products[insert];

            if full_path {
                let length = if at_capacity { window } else { self.filled + 1 };
                let start = if at_capacity { (insert + 1) % window } else { 0 };
                let mut acc = Complex32::new(0.0, 0.0);
                for position in 0..length {
                    let slot = (start + position) % window;
                    let product = lane.rotated[slot] * reference.chip(position);
                    lane.products[slot] = product;
                    acc += product;
                }
                lane.acc = acc;
            }

            let raw = lane.acc.norm();
            self.scores[lane_index] = if self.normed {
                if rms <= f32::EPSILON {
                    0.0
                } else {
                    raw / rms
                }
            } else {
                raw
            };
        }

        if at_capacity {
            self.head = (self.head + 1) % window;
        } else {
            self.filled += 1;
        }
        self.chip_index += 1;

        let mut best_index = 0;
        let mut best_score = self.scores[0];
        for (lane_index, &score) in self.scores.iter().enumerate().skip(1) {
            if score > best_score {
                best_index = lane_index;
                best_score = score;
            }
        }

        LaneSelection {
            best_index,
            best_score,
            best_offset: self.lanes[best_index].offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::DetectorConfig;

    fn config(reference: Vec<f32>, window: usize, hypotheses: usize) -> DetectorConfig {
        DetectorConfig {
            window,
            hypotheses,
            threshold: 1.0,
            ..DetectorConfig::with_reference(reference)
        }
    }

    #[test]
    fn construction_rejects_invalid_config() {
        assert!(HypothesisBank::new(&config(Vec::new(), 4, 1)).is_err());
        assert!(HypothesisBank::new(&config(vec![1.0], 0, 1)).is_err());
        assert!(HypothesisBank::new(&config(vec![1.0], 4, 0)).is_err());
    }

    #[test]
    fn single_hypothesis_resolves_to_zero_offset() {
        let bank = HypothesisBank::new(&config(vec![1.0, -1.0], 4, 1)).unwrap();
        assert_eq!(bank.frequency_offset(0), 0.0);
    }

    #[test]
    fn hypothesis_offsets_are_symmetric() {
        let bank = HypothesisBank::new(&config(vec![1.0, -1.0], 8, 5)).unwrap();
        assert!((bank.frequency_offset(0) + bank.frequency_offset(4)).abs() < 1e-7);
        assert_eq!(bank.frequency_offset(2), 0.0);
    }

    #[test]
    fn zero_stream_scores_zero_and_ties_resolve_low() {
        let mut bank = HypothesisBank::new(&config(vec![1.0, -1.0, 1.0], 4, 3)).unwrap();
        for _ in 0..16 {
            let selection = bank.process(Complex32::new(0.0, 0.0));
            assert_eq!(selection.best_index, 0);
            assert_eq!(selection.best_score, 0.0);
        }
    }

    #[test]
    fn aligned_reference_reaches_full_correlation() {
        let chips = vec![1.0, -1.0, -1.0, 1.0, 1.0, 1.0, -1.0, -1.0];
        let mut bank = HypothesisBank::new(&config(chips.clone(), 8, 1)).unwrap();
        let mut last = 0.0;
        for &chip in &chips {
            last = bank.process(Complex32::new(chip, 0.0)).best_score;
        }
        // Unit chips: |acc| == window and window RMS == 1.
        assert!((last - 8.0).abs() < 1e-3);
    }

    #[test]
    fn raw_scores_skip_normalization() {
        let chips = vec![1.0, 1.0, -1.0, -1.0];
        let mut cfg = config(chips.clone(), 4, 1);
        cfg.normed = false;
        let mut bank = HypothesisBank::new(&cfg).unwrap();
        let mut last = 0.0;
        for &chip in &chips {
            last = bank.process(Complex32::new(2.0 * chip, 0.0)).best_score;
        }
        // Doubled amplitude doubles the raw accumulation.
        assert!((last - 8.0).abs() < 1e-3);
    }

    #[test]
    fn decimation_path_is_deterministic() {
        assert!(HypothesisBank::takes_full_path(0, 1, 3));
        assert!(!HypothesisBank::takes_full_path(1, 1, 3));
        assert!(!HypothesisBank::takes_full_path(2, 1, 3));
        assert!(HypothesisBank::takes_full_path(3, 1, 3));
        for index in 0..32 {
            assert!(HypothesisBank::takes_full_path(index, 1, 1));
            assert_eq!(
                HypothesisBank::takes_full_path(index, 2, 3),
                index % 3 != 1
            );
        }
    }
}
