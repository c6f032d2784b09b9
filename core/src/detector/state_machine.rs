/// Fraction of the running max a candidate may fall to before the peak is
/// declared behind us.
const PEAK_DROP_RATIO: f32 = 0.5;

/// Snapshot of the detector after one processed sample. Produced exactly
/// once per sample and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionState {
    /// True while a detection cycle is active.
    pub frame_detected: bool,
    /// True once the cycle's correlation peak has been confirmed.
    pub max_found: bool,
    /// Per-hypothesis scores for this sample, in stable lane order.
    pub scores: Vec<f32>,
    /// Best score seen since the current cycle began.
    pub max_score: f32,
    /// Resolved hypothesis value at the peak, in cycles per chip.
    pub frequency_offset: f32,
    /// Hypothesis index at the peak.
    pub frequency_index: u32,
    /// Samples since the detection latch last reset.
    pub chip_since_last_det: u64,
    /// Samples since the running peak was last updated.
    pub chip_from_max: u64,
}

impl DetectionState {
    pub fn hypothesis_count(&self) -> usize {
        self.scores.len()
    }
}

/// Phase of the latch/peak-tracking policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionPhase {
    /// No active detection cycle.
    Searching,
    /// Threshold crossed; the true peak may still improve.
    Latched,
    /// Peak confirmed; counters keep running until the cycle ends.
    Peaked,
}

/// Causal reduction of per-sample score vectors into latched detection
/// state. The threshold crossing only says a frame is somewhere nearby;
/// tracking the post-crossing maximum resolves the chip boundary
/// (`chip_from_max`) and the best-fit hypothesis.
pub struct DetectionStateMachine {
    threshold: f32,
    /// Samples without peak improvement before the peak is confirmed.
    grace_chips: u64,
    phase: DetectionPhase,
    frame_detected: bool,
    max_found: bool,
    max_score: f32,
    frequency_offset: f32,
    frequency_index: u32,
    chip_since_last_det: u64,
    chip_from_max: u64,
}

impl DetectionStateMachine {
    pub fn new(threshold: f32, grace_chips: u64) -> Self {
        Self {
            threshold,
            grace_chips: grace_chips.max(1),
            phase: DetectionPhase::Searching,
            frame_detected: false,
            max_found: false,
            max_score: 0.0,
            frequency_offset: 0.0,
            frequency_index: 0,
            chip_since_last_det: 0,
            chip_from_max: 0,
        }
    }

    pub fn phase(&self) -> DetectionPhase {
        self.phase
    }

    /// Advances one sample and returns the resulting snapshot.
    pub fn step(&mut self, scores: &[f32], best_index: usize, best_offset: f32) -> DetectionState {
        let candidate = scores[best_index];
        let mut latch_reset = false;
        let mut peak_reset = false;

        match self.phase {
            DetectionPhase::Searching => {
                if candidate >= self.threshold {
                    self.phase = DetectionPhase::Latched;
                    self.frame_detected = true;
                    self.max_found = false;
                    self.record_peak(candidate, best_index, best_offset);
                    latch_reset = true;
                    peak_reset = true;
                }
            }
            DetectionPhase::Latched => {
                if candidate > self.max_score {
                    self.record_peak(candidate, best_index, best_offset);
                    peak_reset = true;
                } else if self.chip_from_max + 1 >= self.grace_chips
                    || candidate < self.max_score * PEAK_DROP_RATIO
                {
                    self.phase = DetectionPhase::Peaked;
                    self.max_found = true;
                }
            }
            DetectionPhase::Peaked => {
                if candidate < self.threshold {
                    // Cycle complete. Stale peak fields persist until the
                    // next latch overwrites them.
                    self.phase = DetectionPhase::Searching;
                    self.frame_detected = false;
                    self.max_found = false;
                } else if candidate > self.max_score {
                    self.record_peak(candidate, best_index, best_offset);
                    peak_reset = true;
                }
            }
        }

        self.chip_since_last_det = if latch_reset {
            0
        } else {
            self.chip_since_last_det + 1
        };
        self.chip_from_max = if peak_reset { 0 } else { self.chip_from_max + 1 };

        DetectionState {
            frame_detected: self.frame_detected,
            max_found: self.max_found,
            scores: scores.to_vec(),
            max_score: self.max_score,
            frequency_offset: self.frequency_offset,
            frequency_index: self.frequency_index,
            chip_since_last_det: self.chip_since_last_det,
            chip_from_max: self.chip_from_max,
        }
    }

    fn record_peak(&mut self, score: f32, index: usize, offset: f32) {
        self.max_score = score;
        self.frequency_index = index as u32;
        self.frequency_offset = offset;
    }
}
