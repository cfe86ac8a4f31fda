//! Playback output seam
//!
//! The transport layer drives audio through this trait instead of a
//! concrete device API, one sink per track. The player binary provides a
//! rodio-backed implementation plus a silent fallback for sessions
//! without an output device; tests provide scripted doubles.

use std::path::Path;

use crate::error::AudioResult;

/// One track's audio-output handle
///
/// Implementations own the playback chain for a single source. Sinks
/// start paused at position zero; the transport applies volume and
/// position before the first play.
pub trait TrackOutput {
    /// Start or resume playback at the current position.
    ///
    /// Usable after the source has ended: playing again restarts the
    /// source instead of leaving the output silent.
    fn play(&mut self) -> AudioResult<()>;

    /// Pause playback, keeping the current position
    fn pause(&mut self);

    /// Move the playhead to `position` seconds from the start.
    ///
    /// Usable after the source has ended, so a replay can re-anchor
    /// before it starts.
    fn seek(&mut self, position: f64) -> AudioResult<()>;

    /// Set the output gain in `[0, 1]`
    fn set_volume(&mut self, volume: f32);

    /// Current playhead position in seconds
    fn position(&self) -> f64;

    /// True once the source has played to its end.
    ///
    /// Clears when a later play or seek restarts the source.
    fn is_finished(&self) -> bool;
}

/// Creates one output sink per track source
pub trait OutputFactory {
    /// Open a paused sink for the given audio file
    fn open(&self, source: &Path) -> AudioResult<Box<dyn TrackOutput>>;
}
