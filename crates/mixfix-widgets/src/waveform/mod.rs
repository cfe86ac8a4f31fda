//! Waveform display
//!
//! Pure layout of an amplitude envelope into drawable bars, plus a
//! terminal view that maps bars onto a colored glyph strip.

mod bars;
mod view;

pub use bars::{playback_progress, render_bars, WaveformBar};
pub use view::waveform_strip;
