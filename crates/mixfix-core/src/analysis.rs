//! Waveform amplitude analysis
//!
//! Reduces a decoded audio signal to a fixed-length envelope of mean
//! absolute amplitudes, one value per time block. The envelope drives the
//! waveform display and its played/unplayed progress split.

use crate::error::{AudioError, AudioResult};
use crate::types::Sample;

/// Fixed-resolution amplitude envelope of one track
///
/// Values are non-negative means of `abs(sample)` per block. They are not
/// clamped: normalized sources stay at or below 1.0, but hot sources can
/// exceed it, so renderers clamp when mapping to pixel height.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeEnvelope {
    values: Vec<Sample>,
}

impl AmplitudeEnvelope {
    /// Amplitude values in time order
    pub fn values(&self) -> &[Sample] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Compute the amplitude envelope of a sample buffer.
///
/// Block size is `samples.len() / block_count` (truncating division); each
/// envelope value is the mean of `abs(sample)` over one block, so the
/// trailing remainder shorter than a block is dropped. When the buffer has
/// fewer samples than blocks, the envelope degrades to one block per
/// sample with no zero padding.
///
/// Deterministic: the same input always produces the same envelope.
pub fn extract(samples: &[Sample], block_count: usize) -> AudioResult<AmplitudeEnvelope> {
    if samples.is_empty() {
        return Err(AudioError::InvalidInput("empty sample buffer".to_string()));
    }
    if block_count == 0 {
        return Err(AudioError::InvalidInput(
            "block count must be at least 1".to_string(),
        ));
    }

    let block_size = samples.len() / block_count;

    // Fewer samples than blocks: one block per sample
    if block_size == 0 {
        let values = samples.iter().map(|s| s.abs()).collect();
        return Ok(AmplitudeEnvelope { values });
    }

    let mut values = Vec::with_capacity(block_count);
    for block in 0..block_count {
        let start = block * block_size;
        let end = start + block_size;
        let sum: f32 = samples[start..end].iter().map(|s| s.abs()).sum();
        values.push(sum / block_size as f32);
    }

    Ok(AmplitudeEnvelope { values })
}
