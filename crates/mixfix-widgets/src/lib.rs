//! Shared UI widgets for Mix Fix
//!
//! Pure rendering layer for the waveform display: takes amplitude
//! envelopes plus transport state from mixfix-core and produces drawable
//! bars or a colored terminal strip.
//!
//! ## Architecture
//!
//! - **Layout**: `render_bars` turns an envelope + playhead into
//!   positioned, colored bars; stateless, callable at any redraw rate
//! - **View**: `waveform_strip` maps bars onto a fixed-width glyph strip
//!   with ANSI true-color escapes for terminal surfaces
//!
//! No toolkit dependency; callers remap the bar geometry to whatever
//! surface they draw on.

pub mod theme;
pub mod waveform;

// Re-export commonly used items
pub use theme::{Color, WaveformConfig, PLAYED_SYNC_COLOR, PLAYED_UNSYNC_COLOR, UNPLAYED_COLOR};
pub use waveform::{playback_progress, render_bars, waveform_strip, WaveformBar};
