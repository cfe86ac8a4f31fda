//! Waveform bar layout
//!
//! Maps an amplitude envelope and the current playhead into positioned,
//! colored bars. Pure functions of their inputs: every call recomputes
//! from scratch, so redraw frequency cannot accumulate error.

use mixfix_core::analysis::AmplitudeEnvelope;

use crate::theme::{
    Color, WaveformConfig, PLAYED_SYNC_COLOR, PLAYED_UNSYNC_COLOR, UNPLAYED_COLOR,
};

/// One drawable waveform bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformBar {
    /// Left edge in pixels
    pub x: f32,
    /// Top edge in pixels (bars are vertically centered)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

/// Fraction of the track already played
///
/// Returns 0.0 while the duration is unknown (still loading), guarding
/// the division by zero.
pub fn playback_progress(position: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        0.0
    } else {
        position / duration
    }
}

/// Lay out one track's waveform bars.
///
/// Bars fill the configured width left to right, one per envelope value.
/// A bar counts as played when its normalized left edge sits before the
/// playhead fraction. Amplitudes above 1.0 clamp to full height; the
/// envelope itself is unclamped by contract.
pub fn render_bars(
    envelope: &AmplitudeEnvelope,
    position: f64,
    duration: f64,
    synchronized: bool,
    config: &WaveformConfig,
) -> Vec<WaveformBar> {
    if envelope.is_empty() || config.width <= 0.0 {
        return Vec::new();
    }

    let progress = playback_progress(position, duration);
    let bar_width = config.width / envelope.len() as f32;

    envelope
        .values()
        .iter()
        .enumerate()
        .map(|(i, &amplitude)| {
            let x = i as f32 * bar_width;
            let height = amplitude.clamp(0.0, 1.0) * config.height;
            let played = ((x / config.width) as f64) < progress;
            let color = if played {
                if synchronized {
                    PLAYED_SYNC_COLOR
                } else {
                    PLAYED_UNSYNC_COLOR
                }
            } else {
                UNPLAYED_COLOR
            };

            WaveformBar {
                x,
                y: (config.height - height) / 2.0,
                width: (bar_width - config.bar_gap).max(0.0),
                height,
                color,
            }
        })
        .collect()
}
