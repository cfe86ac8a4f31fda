//! Common types for Mix Fix
//!
//! Fundamental identifiers and playback states shared between the engine,
//! the loader, and the player binary.

use std::sync::atomic::{AtomicU64, Ordering};

/// Audio sample type (32-bit float, one analysis channel)
pub type Sample = f32;

/// Number of amplitude blocks in a waveform envelope
pub const DEFAULT_BLOCK_COUNT: usize = 200;

static NEXT_TRACK_ID: AtomicU64 = AtomicU64::new(1);

/// Track identifier, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(pub u64);

impl TrackId {
    /// Allocate the next unused track ID
    pub fn next() -> Self {
        Self(NEXT_TRACK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Load state of a track's audio source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Ready,
    Error,
}

/// Format a position in seconds as `m:ss` for display
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_ids_are_unique() {
        let a = TrackId::next();
        let b = TrackId::next();
        let c = TrackId::next();

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(a.0 < b.0 && b.0 < c.0);
    }

    #[test]
    fn test_load_state_default() {
        assert_eq!(LoadState::default(), LoadState::Unloaded);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(5.2), "0:05");
        assert_eq!(format_time(65.4), "1:05");
        assert_eq!(format_time(659.9), "10:59");
        // Minutes do not wrap into hours
        assert_eq!(format_time(3600.0), "60:00");
        // Negative positions clamp to zero
        assert_eq!(format_time(-3.0), "0:00");
    }
}
