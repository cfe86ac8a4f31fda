//! Shared theme constants for Mix Fix UI components
//!
//! Color scheme and layout constants used by the waveform display.

/// RGB color with float components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a color from RGB components
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Played portion of a synchronized track - Green (#1DB954)
pub const PLAYED_SYNC_COLOR: Color = Color::from_rgb(0.11, 0.73, 0.33);

/// Played portion of an unsynchronized track - Red (#FF4444)
pub const PLAYED_UNSYNC_COLOR: Color = Color::from_rgb(1.0, 0.27, 0.27);

/// Unplayed portion of any track - Dark Gray (#2A2A2A)
pub const UNPLAYED_COLOR: Color = Color::from_rgb(0.16, 0.16, 0.16);

/// Waveform display configuration
#[derive(Debug, Clone)]
pub struct WaveformConfig {
    /// Canvas width in pixels
    pub width: f32,
    /// Canvas height in pixels
    pub height: f32,
    /// Gap between bars in pixels
    pub bar_gap: f32,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 100.0,
            bar_gap: 1.0,
        }
    }
}
