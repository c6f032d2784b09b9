use num_complex::Complex32;

pub struct StatsHelper;

impl StatsHelper {
    /// Root-mean-square magnitude of a complex sample block.
    pub fn rms(samples: &[Complex32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f32 = samples.iter().map(|s| s.norm_sqr()).sum();
        (sum_sq / samples.len() as f32).sqrt()
    }
}

/// Running energy estimate over a fixed-length sample window.
#[derive(Debug, Clone)]
pub struct SlidingEnergy {
    powers: Vec<f32>,
    head: usize,
    filled: usize,
    sum: f32,
}

impl SlidingEnergy {
    pub fn new(window: usize) -> Self {
        Self {
            powers: vec![0.0; window.max(1)],
            head: 0,
            filled: 0,
            sum: 0.0,
        }
    }

    /// Admits one sample power, evicting the oldest once the window is full.
    pub fn push(&mut self, power: f32) {
        self.sum += power - self.powers[self.head];
        self.powers[self.head] = power;
        self.head = (self.head + 1) % self.powers.len();
        if self.filled < self.powers.len() {
            self.filled += 1;
        }
    }

    /// Exact resum of the window, clearing accumulated float drift.
    pub fn resum(&mut self) {
        self.sum = self.powers.iter().sum();
    }

    /// Mean power over the samples admitted so far (zero before any sample).
    pub fn mean(&self) -> f32 {
        if self.filled == 0 {
            0.0
        } else {
            self.sum / self.filled as f32
        }
    }

    pub fn rms(&self) -> f32 {
        self.mean().max(0.0).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_zero_sequence_yields_zero() {
        assert_eq!(StatsHelper::rms(&[]), 0.0);
        assert_eq!(
            StatsHelper::rms(&[Complex32::new(0.0, 0.0), Complex32::new(0.0, 0.0)]),
            0.0
        );
    }

    #[test]
    fn rms_handles_unit_circle_samples() {
        let samples = [Complex32::new(1.0, 0.0), Complex32::new(0.0, -1.0)];
        assert!((StatsHelper::rms(&samples) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sliding_energy_tracks_window_mean() {
        let mut energy = SlidingEnergy::new(2);
        assert_eq!(energy.mean(), 0.0);

        energy.push(4.0);
        assert!((energy.mean() - 4.0).abs() < 1e-6);

        energy.push(2.0);
        assert!((energy.mean() - 3.0).abs() < 1e-6);

        // 4.0 leaves the window.
        energy.push(6.0);
        assert!((energy.mean() - 4.0).abs() < 1e-6);
        assert!((energy.rms() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn resum_matches_incremental_sum() {
        let mut energy = SlidingEnergy::new(4);
        for power in [1.0, 2.5, 0.5, 3.0, 1.5] {
            energy.push(power);
        }
        let before = energy.mean();
        energy.resum();
        assert!((energy.mean() - before).abs() < 1e-5);
    }
}
