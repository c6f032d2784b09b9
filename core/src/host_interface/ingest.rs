use num_complex::Complex32;

use crate::prelude::{DetectorError, DetectorResult};

/// Splits an interleaved `[re, im, re, im, ...]` block into complex samples.
/// An odd-length block is rejected before any sample is produced.
pub fn deinterleave(samples: &[f32]) -> DetectorResult<Vec<Complex32>> {
    if samples.len() % 2 != 0 {
        return Err(DetectorError::MalformedStream(format!(
            "interleaved block has odd length {}",
            samples.len()
        )));
    }
    Ok(samples
        .chunks_exact(2)
        .map(|pair| Complex32::new(pair[0], pair[1]))
        .collect())
}

/// Flattens complex samples back into an interleaved block.
pub fn interleave(samples: &[Complex32]) -> Vec<f32> {
    samples
        .iter()
        .flat_map(|sample| [sample.re, sample.im])
        .collect()
}
