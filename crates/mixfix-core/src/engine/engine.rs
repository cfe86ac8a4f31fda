//! Playback synchronization engine
//!
//! Owns the track registry and the master transport: one master clock
//! fans play/stop/seek/volume out to every track in insertion order, and
//! synchronized tracks keep following the master position. Engine
//! operations never fail outright; tracks that are not Ready are skipped
//! and load failures degrade to a per-track Error state.

use std::path::PathBuf;

use crate::error::AudioError;
use crate::loader::{TrackLoader, TrackLoadResult};
use crate::output::OutputFactory;
use crate::types::TrackId;

use super::track::{Track, TrackEvent};

/// Master transport state shared by all synchronized tracks
#[derive(Debug, Clone, Copy)]
pub struct MasterState {
    /// Master playhead in seconds; moves only on explicit seeks
    pub position: f64,
    /// Master gain in [0, 1]; overwrites every track's gain when set
    pub volume: f32,
    /// True between play_all and stop_all (or a track ending)
    pub is_playing: bool,
    /// Longest duration ever observed; never shrinks within a session
    pub max_duration: f64,
}

impl Default for MasterState {
    fn default() -> Self {
        Self {
            position: 0.0,
            volume: 1.0,
            is_playing: false,
            max_duration: 0.0,
        }
    }
}

/// Multi-track engine coordinating transports under one master clock
pub struct PlaybackEngine {
    /// Tracks in insertion order; commands fan out in this order
    tracks: Vec<Track>,
    master: MasterState,
    factory: Box<dyn OutputFactory>,
    loader: TrackLoader,
}

impl PlaybackEngine {
    /// Create an engine with the given output backend and envelope resolution
    pub fn new(factory: Box<dyn OutputFactory>, envelope_blocks: usize) -> Self {
        Self {
            tracks: Vec::new(),
            master: MasterState::default(),
            factory,
            loader: TrackLoader::spawn(envelope_blocks),
        }
    }

    // --- Track registry ---

    /// Ingest audio files: register one track per path and start loading.
    ///
    /// New tracks default to synchronized. Returns the assigned ids in
    /// input order.
    pub fn add_tracks(&mut self, paths: Vec<PathBuf>) -> Vec<TrackId> {
        let mut ids = Vec::with_capacity(paths.len());

        for path in paths {
            let mut track = Track::new(TrackId::next(), path);
            let generation = track.begin_load();
            if let Err(e) = self
                .loader
                .load(track.id(), generation, track.source().to_path_buf())
            {
                log::error!("Failed to queue load for {}: {}", track.id(), e);
            }
            log::info!("[TRACK] Added {} ({})", track.id(), track.name());
            ids.push(track.id());
            self.tracks.push(track);
        }

        ids
    }

    /// Remove a track and release its resources.
    ///
    /// The master max_duration keeps its high-water mark.
    pub fn remove_track(&mut self, id: TrackId) {
        if let Some(idx) = self.tracks.iter().position(|t| t.id() == id) {
            let mut track = self.tracks.remove(idx);
            track.dispose();
            log::info!("[TRACK] Removed {} ({})", id, track.name());
        }
    }

    // --- Master transport ---

    /// Start every Ready track from the master position (one-shot fan-out).
    ///
    /// Tracks still loading or in Error are skipped and do not start
    /// retroactively once ready; the master flag goes true regardless of
    /// per-track readiness.
    pub fn play_all(&mut self) {
        for track in &mut self.tracks {
            track.set_playing(true, self.master.position);
        }
        self.master.is_playing = true;
    }

    /// Stop every track, re-anchoring each to the master position
    pub fn stop_all(&mut self) {
        for track in &mut self.tracks {
            track.set_playing(false, self.master.position);
        }
        self.master.is_playing = false;
    }

    /// Set the master gain and overwrite every track's gain with it
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master.volume = volume.clamp(0.0, 1.0);
        for track in &mut self.tracks {
            track.set_volume(self.master.volume);
        }
    }

    /// Move the master clock; synchronized tracks follow immediately
    pub fn set_master_position(&mut self, position: f64) {
        self.master.position = position.clamp(0.0, self.master.max_duration);
        for track in &mut self.tracks {
            track.seek_if_synchronized(self.master.position);
        }
    }

    // --- Per-track controls ---

    pub fn set_track_volume(&mut self, id: TrackId, volume: f32) {
        if let Some(track) = self.track_mut(id) {
            track.set_volume(volume);
        }
    }

    pub fn adjust_track_volume(&mut self, id: TrackId, delta: f32) {
        if let Some(track) = self.track_mut(id) {
            track.adjust_volume(delta);
        }
    }

    pub fn toggle_synchronization(&mut self, id: TrackId) {
        if let Some(track) = self.track_mut(id) {
            track.toggle_synchronization();
        }
    }

    // --- Track notifications ---

    /// A track's duration became known; the master range only grows
    pub fn on_track_duration_changed(&mut self, id: TrackId, duration: f64) {
        if duration > self.master.max_duration {
            self.master.max_duration = duration;
            log::debug!("[TRACK] {} extended master range to {:.1}s", id, duration);
        }
    }

    /// Any single track reaching its end clears the master playing flag.
    /// Other tracks keep playing until stopped explicitly.
    pub fn on_track_playback_ended(&mut self, id: TrackId) {
        log::info!("[TRACK] {} reached end of source", id);
        self.master.is_playing = false;
    }

    // --- Event pump ---

    /// Apply finished loads and refresh playing tracks.
    ///
    /// Returns the notifications applied this round, for the control
    /// surface to display.
    pub fn poll(&mut self) -> Vec<(TrackId, TrackEvent)> {
        let mut events = Vec::new();

        while let Some(result) = self.loader.try_recv() {
            if let Some(event) = self.apply_load_result(result) {
                events.push(event);
            }
        }

        for idx in 0..self.tracks.len() {
            if let Some(event) = self.tracks[idx].tick() {
                let id = self.tracks[idx].id();
                self.handle_track_event(id, &event);
                events.push((id, event));
            }
        }

        events
    }

    /// Adopt one loader result, rejecting stale generations.
    ///
    /// On success a sink is opened for the track's source; a sink that
    /// cannot open converts the load into a failure for that track.
    pub fn apply_load_result(&mut self, result: TrackLoadResult) -> Option<(TrackId, TrackEvent)> {
        let Some(idx) = self.tracks.iter().position(|t| t.id() == result.track_id) else {
            log::debug!("Dropping load result for removed track {}", result.track_id);
            return None;
        };

        let outcome = match result.result {
            Ok(analyzed) => {
                let source = self.tracks[idx].source().to_path_buf();
                match self.factory.open(&source) {
                    Ok(sink) => self.tracks[idx].complete_load(result.generation, analyzed, sink),
                    Err(e) => self.tracks[idx].fail_load(result.generation, e.to_string()),
                }
            }
            Err(message) => self.tracks[idx].fail_load(result.generation, message),
        };

        let id = self.tracks[idx].id();
        match outcome {
            Ok(event) => {
                self.handle_track_event(id, &event);
                Some((id, event))
            }
            Err(AudioError::Superseded) => {
                log::debug!("Superseded load result for {} dropped", id);
                None
            }
            Err(e) => {
                log::error!("Load result for {} not applied: {}", id, e);
                None
            }
        }
    }

    fn handle_track_event(&mut self, id: TrackId, event: &TrackEvent) {
        match event {
            TrackEvent::DurationChanged(duration) => self.on_track_duration_changed(id, *duration),
            TrackEvent::PlaybackEnded => self.on_track_playback_ended(id),
            TrackEvent::LoadFailed(message) => {
                log::error!("[TRACK] {} failed to load: {}", id, message);
            }
        }
    }

    // --- Accessors ---

    pub fn master(&self) -> &MasterState {
        &self.master
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id() == id)
    }
}
