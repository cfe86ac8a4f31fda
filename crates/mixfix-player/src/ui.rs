//! Terminal status rendering
//!
//! One line per track: row number, name, transport state, position,
//! sync marker, volume, and the colored waveform strip.

use mixfix_core::engine::{MasterState, Track};
use mixfix_core::{format_time, LoadState};
use mixfix_widgets::{render_bars, waveform_strip, WaveformConfig};

/// Render the master transport line
pub fn master_row(master: &MasterState) -> String {
    let state = if master.is_playing { "playing" } else { "stopped" };
    format!(
        "master   {:>7}  {}/{}  vol {:.2}",
        state,
        format_time(master.position),
        format_time(master.max_duration),
        master.volume
    )
}

/// Render one track's status line
///
/// `index` is the 1-based row number accepted by track commands.
pub fn track_row(index: usize, track: &Track, waveform: &WaveformConfig, columns: usize) -> String {
    let state = match track.load_state() {
        LoadState::Unloaded => "empty",
        LoadState::Loading => "loading",
        LoadState::Ready if track.is_playing() => "playing",
        LoadState::Ready => "ready",
        LoadState::Error => "failed",
    };

    let sync = if track.synchronized() { "sync" } else { "free" };

    let strip = match track.envelope() {
        Some(envelope) => {
            let bars = render_bars(
                envelope,
                track.position(),
                track.duration(),
                track.synchronized(),
                waveform,
            );
            waveform_strip(&bars, columns, waveform)
        }
        None if track.load_state() == LoadState::Loading => "analyzing audio...".to_string(),
        None => String::new(),
    };

    format!(
        "[{}] {:<24.24} {:>7}  {}/{}  {}  vol {:.2}  {}",
        index,
        track.name(),
        state,
        format_time(track.position()),
        format_time(track.duration()),
        sync,
        track.volume(),
        strip
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::NullOutputFactory;
    use mixfix_core::analysis::extract;
    use mixfix_core::loader::AnalyzedTrack;
    use mixfix_core::output::OutputFactory;
    use mixfix_core::TrackId;
    use std::path::{Path, PathBuf};

    fn waveform() -> WaveformConfig {
        WaveformConfig::default()
    }

    #[test]
    fn test_master_row_stopped() {
        let master = MasterState::default();
        let row = master_row(&master);
        assert!(row.contains("stopped"));
        assert!(row.contains("0:00/0:00"));
        assert!(row.contains("vol 1.00"));
    }

    #[test]
    fn test_track_row_shows_name_and_index() {
        let track = Track::new(TrackId::next(), PathBuf::from("/music/vocals take 3.wav"));
        let row = track_row(2, &track, &waveform(), 16);
        assert!(row.starts_with("[2]"));
        assert!(row.contains("vocals take 3"));
        assert!(row.contains("empty"));
        assert!(row.contains("sync"));
    }

    #[test]
    fn test_track_row_loading_placeholder() {
        let mut track = Track::new(TrackId::next(), PathBuf::from("/music/drums.flac"));
        track.begin_load();
        let row = track_row(1, &track, &waveform(), 16);
        assert!(row.contains("loading"));
        assert!(row.contains("analyzing audio..."));
    }

    #[test]
    fn test_track_row_ready_has_waveform_glyphs() {
        let mut track = Track::new(TrackId::next(), PathBuf::from("/music/bass.wav"));
        let generation = track.begin_load();
        let analyzed = AnalyzedTrack {
            duration_seconds: 30.0,
            sample_rate: 44_100,
            envelope: extract(&vec![0.5; 400], 20).unwrap(),
        };
        let sink = NullOutputFactory.open(Path::new("/music/bass.wav")).unwrap();
        track.complete_load(generation, analyzed, sink).unwrap();

        let row = track_row(1, &track, &waveform(), 20);
        assert!(row.contains("ready"));
        assert!(row.contains("0:00/0:30"));
        // Half-amplitude blocks render as the mid ramp glyph
        assert!(row.contains('▅'));
    }
}
