use num_complex::Complex32;
use std::f32::consts::PI;

/// Generates a constant-amplitude complex tone as an interleaved block, for
/// quick manual checks against the detector.
#[allow(dead_code)]
pub fn tone(length: usize, cycles_per_sample: f32) -> Vec<f32> {
    (0..length)
        .flat_map(|index| {
            let phase = 2.0 * PI * cycles_per_sample * index as f32;
            let sample = Complex32::from_polar(1.0, phase);
            [sample.re, sample.im]
        })
        .collect()
}
