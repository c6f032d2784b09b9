use num_complex::Complex32;

use crate::detector::bank::HypothesisBank;
use crate::detector::history::DetectionHistory;
use crate::detector::state_machine::{DetectionState, DetectionStateMachine};
use crate::host_interface::ingest;
use crate::prelude::{DetectorConfig, DetectorResult};
use crate::telemetry::log::EventLog;
use crate::telemetry::metrics::MetricsRecorder;

/// Feeds samples through the hypothesis bank and state machine, appending
/// exactly one snapshot per sample. Strictly causal: the snapshot for sample
/// `i` depends only on samples `0..=i`.
pub struct StreamDriver {
    bank: HypothesisBank,
    machine: DetectionStateMachine,
    history: DetectionHistory,
    logger: EventLog,
    metrics: MetricsRecorder,
    chips_processed: u64,
    was_detected: bool,
    was_peaked: bool,
}

impl StreamDriver {
    pub fn new(config: &DetectorConfig) -> DetectorResult<Self> {
        config.validate()?;
        let bank = HypothesisBank::new(config)?;
        let machine = DetectionStateMachine::new(config.threshold, config.window as u64);
        let history = DetectionHistory::new(config.hypotheses);
        Ok(Self {
            bank,
            machine,
            history,
            logger: EventLog::new(),
            metrics: MetricsRecorder::new(),
            chips_processed: 0,
            was_detected: false,
            was_peaked: false,
        })
    }

    /// Processes one complex sample and appends the resulting snapshot.
    pub fn push(&mut self, sample: Complex32) -> DetectorResult<DetectionState> {
        let selection = self.bank.process(sample);
        let state = self
            .machine
            .step(self.bank.scores(), selection.best_index, selection.best_offset);

        self.chips_processed += 1;
        self.metrics.record_sample();
        if state.frame_detected && !self.was_detected {
            self.logger
                .frame_latched(self.chips_processed, selection.best_index, selection.best_score);
            self.metrics.record_frame();
        }
        if state.max_found && !self.was_peaked {
            self.logger
                .peak_confirmed(self.chips_processed, state.frequency_index, state.max_score);
            self.metrics.record_peak();
        }
        self.was_detected = state.frame_detected;
        self.was_peaked = state.max_found;

        self.history.append(&state)?;
        Ok(state)
    }

    /// Consumes an interleaved I/Q block. Malformed input is rejected before
    /// any sample is processed, so no partial history is produced.
    pub fn process_interleaved(&mut self, samples: &[f32]) -> DetectorResult<()> {
        let block = ingest::deinterleave(samples)?;
        for sample in block {
            self.push(sample)?;
        }
        self.logger
            .record(&format!("processed {} chips", self.chips_processed));
        Ok(())
    }

    pub fn history(&self) -> &DetectionHistory {
        &self.history
    }

    /// Hands the history off for export; the driver is done at that point.
    pub fn into_history(self) -> DetectionHistory {
        self.history
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    pub fn chips_processed(&self) -> u64 {
        self.chips_processed
    }

    /// One-shot run over an interleaved block.
    pub fn run(config: &DetectorConfig, samples: &[f32]) -> DetectorResult<DetectionHistory> {
        let mut driver = Self::new(config)?;
        driver.process_interleaved(samples)?;
        Ok(driver.into_history())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    /// Barker-13: aperiodic autocorrelation sidelobes of at most one chip.
    const BARKER_13: [f32; 13] = [
        1.0, 1.0, 1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, 1.0, -1.0, 1.0,
    ];

    fn barker_config(hypotheses: usize, threshold: f32) -> DetectorConfig {
        DetectorConfig {
            window: BARKER_13.len(),
            hypotheses,
            threshold,
            ..DetectorConfig::with_reference(BARKER_13.to_vec())
        }
    }

    /// Lead-in zeros, the reference rotated by `offset` cycles/chip, then
    /// trailing zeros, as an interleaved block.
    fn embedded_stream(lead_in: usize, tail: usize, offset: f32) -> Vec<f32> {
        let mut block = vec![0.0; 2 * lead_in];
        for (position, &chip) in BARKER_13.iter().enumerate() {
            let index = lead_in + position;
            let phase = 2.0 * PI * offset * index as f32;
            let sample = Complex32::from_polar(1.0, phase) * chip;
            block.push(sample.re);
            block.push(sample.im);
        }
        block.extend(std::iter::repeat(0.0).take(2 * tail));
        block
    }

    fn noisy_stream(samples: usize) -> Vec<f32> {
        // Deterministic LCG so reruns see the identical stream.
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut block = Vec::with_capacity(2 * samples);
        for _ in 0..2 * samples {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            block.push(((state >> 40) as f32 / 8388608.0) - 1.0);
        }
        block
    }

    #[test]
    fn history_length_matches_samples_fed() {
        let config = barker_config(3, 6.0);
        let history = StreamDriver::run(&config, &noisy_stream(41)).unwrap();
        assert_eq!(history.len(), 41);
        assert_eq!(history.scores().len(), 3 * 41);
    }

    #[test]
    fn zero_stream_never_latches() {
        let config = barker_config(2, 1.0);
        let history = StreamDriver::run(&config, &vec![0.0; 200]).unwrap();
        assert_eq!(history.len(), 100);
        assert!(history.frame_detected().iter().all(|&flag| !flag));
        assert!(history.max_found().iter().all(|&flag| !flag));
    }

    #[test]
    fn odd_length_input_leaves_no_partial_history() {
        let config = barker_config(1, 6.0);
        let mut driver = StreamDriver::new(&config).unwrap();
        assert!(driver.process_interleaved(&[1.0, 2.0, 3.0]).is_err());
        assert_eq!(driver.history().len(), 0);
    }

    #[test]
    fn embedded_preamble_latches_at_alignment() {
        let lead_in = 20;
        let config = barker_config(4, 9.0);
        // Hypothesis 3 of 4: offset (3 - 1.5) / (4 * 13) cycles/chip.
        let offset = 1.5 / (4.0 * 13.0);
        let history = StreamDriver::run(&config, &embedded_stream(lead_in, 20, offset)).unwrap();

        let aligned = lead_in + BARKER_13.len() - 1;
        let first_latch = history
            .frame_detected()
            .iter()
            .position(|&flag| flag)
            .expect("preamble should latch");
        assert_eq!(first_latch, aligned);
        assert_eq!(history.chip_since_last_det()[aligned], 0);
        assert_eq!(history.chip_from_max()[aligned], 0);

        let first_peak = history
            .max_found()
            .iter()
            .position(|&flag| flag)
            .expect("peak should be confirmed");
        assert!(first_peak >= aligned);
        assert_eq!(history.frequency_index()[first_peak], 3);
        assert!((history.frequency_offset()[first_peak] - offset).abs() < 1e-6);
        assert!(history.max_score()[first_peak] > 12.0);
    }

    #[test]
    fn counters_step_by_one_between_resets() {
        let config = barker_config(2, 2.5);
        let history = StreamDriver::run(&config, &noisy_stream(300)).unwrap();

        let frame = history.frame_detected();
        let since_det = history.chip_since_last_det();
        let from_max = history.chip_from_max();
        for index in 1..history.len() {
            assert!(since_det[index] == 0 || since_det[index] == since_det[index - 1] + 1);
            assert!(from_max[index] == 0 || from_max[index] == from_max[index - 1] + 1);
            let latched_here = frame[index] && !frame[index - 1];
            assert_eq!(since_det[index] == 0, latched_here);
        }
        assert_eq!(since_det[0] == 0, frame[0]);
    }

    #[test]
    fn max_found_never_precedes_detection() {
        let config = barker_config(2, 2.5);
        let history = StreamDriver::run(&config, &noisy_stream(300)).unwrap();
        for index in 0..history.len() {
            assert!(!history.max_found()[index] || history.frame_detected()[index]);
        }
    }

    #[test]
    fn identical_runs_reproduce_the_history() {
        let config = barker_config(3, 4.0);
        let block = noisy_stream(256);
        let first = StreamDriver::run(&config, &block).unwrap();
        let second = StreamDriver::run(&config, &block).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn decimated_runs_stay_deterministic() {
        let config = DetectorConfig {
            step_numerator: 1,
            step_denominator: 4,
            ..barker_config(2, 4.0)
        };
        let block = noisy_stream(128);
        let first = StreamDriver::run(&config, &block).unwrap();
        let second = StreamDriver::run(&config, &block).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 128);
    }

    #[test]
    fn metrics_track_the_run() {
        let config = barker_config(1, 6.0);
        let mut driver = StreamDriver::new(&config).unwrap();
        driver
            .process_interleaved(&embedded_stream(10, 10, 0.0))
            .unwrap();
        let snapshot = driver.metrics().snapshot();
        assert_eq!(snapshot.samples_processed as u64, driver.chips_processed());
        assert_eq!(snapshot.frames_latched, 1);
        assert_eq!(snapshot.peaks_confirmed, 1);
    }
}
