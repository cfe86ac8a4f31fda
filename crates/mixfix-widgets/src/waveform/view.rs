//! Terminal waveform view
//!
//! Renders laid-out bars as a fixed-width strip of block glyphs with
//! ANSI true-color escapes. Columns sample the bar list, so any envelope
//! resolution maps onto any strip width.

use super::bars::WaveformBar;
use crate::theme::{Color, WaveformConfig};

/// Block glyph ramp from silent to full amplitude
const GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn color_escape(color: Color) -> String {
    format!(
        "\x1b[38;2;{};{};{}m",
        (color.r * 255.0) as u8,
        (color.g * 255.0) as u8,
        (color.b * 255.0) as u8
    )
}

fn glyph_for(bar: &WaveformBar, full_height: f32) -> char {
    if full_height <= 0.0 {
        return GLYPHS[0];
    }
    let fraction = (bar.height / full_height).clamp(0.0, 1.0);
    let idx = (fraction * (GLYPHS.len() - 1) as f32).round() as usize;
    GLYPHS[idx.min(GLYPHS.len() - 1)]
}

/// Render bars into a colored strip of `columns` glyphs
///
/// Each column shows the bar at its sampled index; the strip ends with a
/// color reset. An empty bar list produces an empty string.
pub fn waveform_strip(bars: &[WaveformBar], columns: usize, config: &WaveformConfig) -> String {
    if bars.is_empty() || columns == 0 {
        return String::new();
    }

    let mut strip = String::new();
    for col in 0..columns {
        let idx = col * bars.len() / columns;
        let bar = &bars[idx];
        strip.push_str(&color_escape(bar.color));
        strip.push(glyph_for(bar, config.height));
    }
    strip.push_str("\x1b[0m");
    strip
}
