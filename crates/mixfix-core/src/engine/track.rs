//! Track transport
//!
//! One transport per loaded audio file: load lifecycle, play/pause,
//! seeking, volume, and the synchronization flag that slaves the track to
//! the master clock. The owning engine observes side effects through the
//! `TrackEvent` values returned by transport operations.

use std::path::{Path, PathBuf};

use crate::analysis::AmplitudeEnvelope;
use crate::error::{AudioError, AudioResult};
use crate::loader::AnalyzedTrack;
use crate::output::TrackOutput;
use crate::types::{LoadState, TrackId};

/// Notification from one transport to the owning engine
#[derive(Debug, Clone, PartialEq)]
pub enum TrackEvent {
    /// A load completed and the track's duration is now known
    DurationChanged(f64),
    /// The track played to the end of its source
    PlaybackEnded,
    /// A load failed; the track is inert until reloaded
    LoadFailed(String),
}

/// Playback transport for a single track
pub struct Track {
    id: TrackId,
    name: String,
    source: PathBuf,
    /// Follows the master clock while true
    synchronized: bool,
    load_state: LoadState,
    is_playing: bool,
    /// Playhead in seconds; refreshed from the sink while playing
    position: f64,
    /// Source duration in seconds, 0.0 until loaded
    duration: f64,
    /// Per-track gain in [0, 1]; stored here so it survives reloads
    volume: f32,
    /// Incremented by every begin_load; stale loader results are rejected
    generation: u64,
    sink: Option<Box<dyn TrackOutput>>,
    envelope: Option<AmplitudeEnvelope>,
}

impl Track {
    /// Create an unloaded track for the given source file
    pub fn new(id: TrackId, source: PathBuf) -> Self {
        let name = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown")
            .to_string();

        Self {
            id,
            name,
            source,
            synchronized: true,
            load_state: LoadState::Unloaded,
            is_playing: false,
            position: 0.0,
            duration: 0.0,
            volume: 1.0,
            generation: 0,
            sink: None,
            envelope: None,
        }
    }

    // --- Load lifecycle ---

    /// Start a new load, superseding any in-flight one.
    ///
    /// Drops the previous sink and envelope and returns the generation to
    /// tag the loader request with.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.sink = None;
        self.envelope = None;
        self.load_state = LoadState::Loading;
        self.is_playing = false;
        self.position = 0.0;
        self.generation
    }

    /// Adopt a finished load if it is still the current generation
    pub fn complete_load(
        &mut self,
        generation: u64,
        analyzed: AnalyzedTrack,
        mut sink: Box<dyn TrackOutput>,
    ) -> AudioResult<TrackEvent> {
        if generation != self.generation {
            return Err(AudioError::Superseded);
        }

        sink.set_volume(self.volume);
        self.duration = analyzed.duration_seconds;
        self.envelope = Some(analyzed.envelope);
        self.sink = Some(sink);
        self.load_state = LoadState::Ready;
        self.is_playing = false;
        self.position = 0.0;

        Ok(TrackEvent::DurationChanged(self.duration))
    }

    /// Record a failed load if it is still the current generation
    pub fn fail_load(&mut self, generation: u64, message: String) -> AudioResult<TrackEvent> {
        if generation != self.generation {
            return Err(AudioError::Superseded);
        }

        self.load_state = LoadState::Error;
        self.is_playing = false;
        self.sink = None;
        Ok(TrackEvent::LoadFailed(message))
    }

    // --- Playback controls ---

    /// Set the playing flag, re-anchoring the playhead to `seek_to`.
    ///
    /// No-op unless the track is Ready. Both starting and stopping seek
    /// to `seek_to` first, so the track snaps back to the master clock
    /// instead of wherever its own playback had drifted. A sink that
    /// refuses to start is contained here: logged, track stays stopped.
    pub fn set_playing(&mut self, playing: bool, seek_to: f64) {
        if self.load_state != LoadState::Ready {
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let target = seek_to.clamp(0.0, self.duration);

        if playing {
            if let Err(e) = sink.seek(target) {
                log::warn!("[TRACK] Seek to {:.2}s failed on {}: {}", target, self.id, e);
            }
            self.position = target;
            match sink.play() {
                Ok(()) => self.is_playing = true,
                Err(e) => {
                    log::warn!("[TRACK] Playback rejected on {}: {}", self.id, e);
                    self.is_playing = false;
                }
            }
        } else {
            sink.pause();
            if let Err(e) = sink.seek(target) {
                log::warn!("[TRACK] Seek to {:.2}s failed on {}: {}", target, self.id, e);
            }
            self.position = target;
            self.is_playing = false;
        }
    }

    /// Follow the master clock if this track is synchronized.
    ///
    /// Runs on every master seek, playing or not: synchronized tracks are
    /// continuously re-slaved, unsynchronized tracks keep their position.
    pub fn seek_if_synchronized(&mut self, master_position: f64) {
        if !self.synchronized || self.load_state != LoadState::Ready {
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let target = master_position.clamp(0.0, self.duration);
        if let Err(e) = sink.seek(target) {
            log::warn!(
                "[TRACK] Sync seek to {:.2}s failed on {}: {}",
                target,
                self.id,
                e
            );
        }
        self.position = target;
    }

    /// Set the per-track gain, clamped to [0, 1]
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = self.sink.as_mut() {
            sink.set_volume(self.volume);
        }
    }

    /// Nudge the per-track gain by a delta, clamped like `set_volume`
    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.volume + delta);
    }

    /// Flip whether this track follows the master clock
    pub fn toggle_synchronization(&mut self) {
        self.synchronized = !self.synchronized;
    }

    // --- Progress ---

    /// Refresh the playhead from the sink and detect end of source.
    ///
    /// While playing, position tracks the sink (capped at duration); once
    /// the sink reports its source exhausted the track stops itself and
    /// pins the playhead to the end.
    pub fn tick(&mut self) -> Option<TrackEvent> {
        if self.load_state != LoadState::Ready || !self.is_playing {
            return None;
        }
        let sink = self.sink.as_mut()?;

        if sink.is_finished() {
            self.is_playing = false;
            self.position = self.duration;
            return Some(TrackEvent::PlaybackEnded);
        }

        self.position = sink.position().min(self.duration);
        None
    }

    /// Release the sink and decode resources. Idempotent.
    pub fn dispose(&mut self) {
        self.sink = None;
        self.envelope = None;
        self.is_playing = false;
        self.load_state = LoadState::Unloaded;
    }

    // --- Accessors ---

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn synchronized(&self) -> bool {
        self.synchronized
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn envelope(&self) -> Option<&AmplitudeEnvelope> {
        self.envelope.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct SinkState {
        playing: bool,
        position: f64,
        volume: f32,
        finished: bool,
        reject_play: bool,
        seeks: Vec<f64>,
    }

    #[derive(Clone, Default)]
    struct MockSink {
        state: Rc<RefCell<SinkState>>,
    }

    impl TrackOutput for MockSink {
        fn play(&mut self) -> AudioResult<()> {
            let mut s = self.state.borrow_mut();
            if s.reject_play {
                return Err(AudioError::PlaybackRejected("scripted refusal".to_string()));
            }
            s.playing = true;
            s.finished = false;
            Ok(())
        }

        fn pause(&mut self) {
            self.state.borrow_mut().playing = false;
        }

        fn seek(&mut self, position: f64) -> AudioResult<()> {
            let mut s = self.state.borrow_mut();
            s.position = position;
            s.seeks.push(position);
            s.finished = false;
            Ok(())
        }

        fn set_volume(&mut self, volume: f32) {
            self.state.borrow_mut().volume = volume;
        }

        fn position(&self) -> f64 {
            self.state.borrow().position
        }

        fn is_finished(&self) -> bool {
            self.state.borrow().finished
        }
    }

    fn analyzed(duration: f64) -> AnalyzedTrack {
        AnalyzedTrack {
            duration_seconds: duration,
            sample_rate: 8000,
            envelope: analysis::extract(&[0.5; 100], 10).unwrap(),
        }
    }

    fn ready_track(duration: f64) -> (Track, MockSink) {
        let mut track = Track::new(TrackId::next(), PathBuf::from("/music/one.wav"));
        let generation = track.begin_load();
        let sink = MockSink::default();
        track
            .complete_load(generation, analyzed(duration), Box::new(sink.clone()))
            .unwrap();
        (track, sink)
    }

    #[test]
    fn test_new_track_defaults() {
        let track = Track::new(TrackId::next(), PathBuf::from("/music/one.wav"));

        assert_eq!(track.name(), "one");
        assert!(track.synchronized());
        assert_eq!(track.load_state(), LoadState::Unloaded);
        assert!(!track.is_playing());
        assert_eq!(track.duration(), 0.0);
        assert_eq!(track.volume(), 1.0);
        assert!(track.envelope().is_none());
    }

    #[test]
    fn test_load_lifecycle() {
        let mut track = Track::new(TrackId::next(), PathBuf::from("/music/one.wav"));

        let generation = track.begin_load();
        assert_eq!(track.load_state(), LoadState::Loading);

        let sink = MockSink::default();
        let event = track
            .complete_load(generation, analyzed(10.0), Box::new(sink.clone()))
            .unwrap();

        assert_eq!(event, TrackEvent::DurationChanged(10.0));
        assert_eq!(track.load_state(), LoadState::Ready);
        assert_eq!(track.duration(), 10.0);
        assert!(track.envelope().is_some());
        // Stored volume is pushed onto the fresh sink
        assert_eq!(sink.state.borrow().volume, 1.0);
    }

    #[test]
    fn test_stale_generation_is_superseded() {
        let mut track = Track::new(TrackId::next(), PathBuf::from("/music/one.wav"));

        let first = track.begin_load();
        let second = track.begin_load();
        assert!(second > first);

        let result = track.complete_load(first, analyzed(10.0), Box::new(MockSink::default()));
        assert!(matches!(result, Err(AudioError::Superseded)));
        assert_eq!(track.load_state(), LoadState::Loading);

        let result = track.fail_load(first, "too late".to_string());
        assert!(matches!(result, Err(AudioError::Superseded)));
        assert_eq!(track.load_state(), LoadState::Loading);
    }

    #[test]
    fn test_failed_load_is_inert() {
        let mut track = Track::new(TrackId::next(), PathBuf::from("/music/one.wav"));
        let generation = track.begin_load();

        let event = track.fail_load(generation, "corrupt file".to_string()).unwrap();
        assert_eq!(event, TrackEvent::LoadFailed("corrupt file".to_string()));
        assert_eq!(track.load_state(), LoadState::Error);

        track.set_playing(true, 0.0);
        assert!(!track.is_playing());
    }

    #[test]
    fn test_set_playing_requires_ready() {
        let mut track = Track::new(TrackId::next(), PathBuf::from("/music/one.wav"));

        track.set_playing(true, 0.0);
        assert!(!track.is_playing());

        track.begin_load();
        track.set_playing(true, 0.0);
        assert!(!track.is_playing());
    }

    #[test]
    fn test_play_seeks_then_plays() {
        let (mut track, sink) = ready_track(10.0);

        track.set_playing(true, 3.0);

        assert!(track.is_playing());
        assert_eq!(track.position(), 3.0);
        let state = sink.state.borrow();
        assert!(state.playing);
        assert_eq!(state.seeks, vec![3.0]);
    }

    #[test]
    fn test_stop_reanchors_position() {
        let (mut track, sink) = ready_track(10.0);
        track.set_playing(true, 0.0);
        sink.state.borrow_mut().position = 4.5;

        track.set_playing(false, 7.0);

        assert!(!track.is_playing());
        assert_eq!(track.position(), 7.0);
        assert!(!sink.state.borrow().playing);
    }

    #[test]
    fn test_seek_target_clamped_to_duration() {
        let (mut track, _sink) = ready_track(10.0);

        track.set_playing(true, 25.0);
        assert_eq!(track.position(), 10.0);
    }

    #[test]
    fn test_playback_rejection_is_contained() {
        let (mut track, sink) = ready_track(10.0);
        sink.state.borrow_mut().reject_play = true;

        track.set_playing(true, 0.0);

        assert!(!track.is_playing());
        assert_eq!(track.load_state(), LoadState::Ready);
    }

    #[test]
    fn test_seek_if_synchronized_respects_flag() {
        let (mut track, _sink) = ready_track(10.0);

        track.toggle_synchronization();
        track.seek_if_synchronized(5.0);
        assert_eq!(track.position(), 0.0);

        track.toggle_synchronization();
        track.seek_if_synchronized(5.0);
        assert_eq!(track.position(), 5.0);
    }

    #[test]
    fn test_volume_clamped_and_applied() {
        let (mut track, sink) = ready_track(10.0);

        track.set_volume(1.7);
        assert_eq!(track.volume(), 1.0);

        track.adjust_volume(-0.4);
        assert!((track.volume() - 0.6).abs() < 1e-6);
        assert!((sink.state.borrow().volume - 0.6).abs() < 1e-6);

        track.adjust_volume(-2.0);
        assert_eq!(track.volume(), 0.0);
    }

    #[test]
    fn test_volume_set_before_ready_reaches_sink() {
        let mut track = Track::new(TrackId::next(), PathBuf::from("/music/one.wav"));
        track.set_volume(0.3);

        let generation = track.begin_load();
        let sink = MockSink::default();
        track
            .complete_load(generation, analyzed(10.0), Box::new(sink.clone()))
            .unwrap();

        assert!((sink.state.borrow().volume - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_tick_refreshes_position() {
        let (mut track, sink) = ready_track(10.0);
        track.set_playing(true, 0.0);

        sink.state.borrow_mut().position = 4.2;
        assert_eq!(track.tick(), None);
        assert_eq!(track.position(), 4.2);
    }

    #[test]
    fn test_tick_detects_end_of_source() {
        let (mut track, sink) = ready_track(10.0);
        track.set_playing(true, 0.0);

        sink.state.borrow_mut().finished = true;
        let event = track.tick();

        assert_eq!(event, Some(TrackEvent::PlaybackEnded));
        assert!(!track.is_playing());
        assert_eq!(track.position(), 10.0);
    }

    #[test]
    fn test_replay_after_end_restarts_track() {
        let (mut track, sink) = ready_track(10.0);
        track.set_playing(true, 0.0);
        sink.state.borrow_mut().finished = true;
        assert_eq!(track.tick(), Some(TrackEvent::PlaybackEnded));

        track.set_playing(true, 2.0);

        assert!(track.is_playing());
        assert_eq!(track.position(), 2.0);
        // The restarted source must not re-end on the next refresh
        assert_eq!(track.tick(), None);
        assert!(track.is_playing());
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let (mut track, _sink) = ready_track(10.0);
        track.set_playing(true, 0.0);

        track.dispose();
        track.dispose();

        assert_eq!(track.load_state(), LoadState::Unloaded);
        assert!(!track.is_playing());
        assert!(track.envelope().is_none());
    }
}
