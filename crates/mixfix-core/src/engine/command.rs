//! Lock-free command queue for engine control
//!
//! The input thread reads the control surface and pushes commands into a
//! bounded SPSC ring buffer; the control loop pops and applies them at
//! iteration boundaries. Push and pop are wait-free, so a burst of
//! commands never blocks either side.

use std::path::PathBuf;

use crate::types::TrackId;

/// Commands sent from the input thread to the control loop
///
/// Each variant is one atomic operation on the engine. Commands are
/// processed in arrival order at the start of each loop iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    // ─────────────────────────────────────────────────────────────
    // Ingestion
    // ─────────────────────────────────────────────────────────────
    /// Register the given audio files and start loading them
    AddTracks(Vec<PathBuf>),
    /// Remove a track and release its resources
    RemoveTrack(TrackId),

    // ─────────────────────────────────────────────────────────────
    // Master transport
    // ─────────────────────────────────────────────────────────────
    /// Start every Ready track from the master position
    PlayAll,
    /// Stop every track, re-anchoring to the master position
    StopAll,
    /// Set the master gain; overwrites every track's gain
    SetMasterVolume(f32),
    /// Move the master clock; synchronized tracks follow
    SetMasterPosition(f64),

    // ─────────────────────────────────────────────────────────────
    // Per-track controls
    // ─────────────────────────────────────────────────────────────
    /// Set one track's gain in [0, 1]
    SetTrackVolume { track_id: TrackId, volume: f32 },
    /// Nudge one track's gain by a delta
    AdjustTrackVolume { track_id: TrackId, delta: f32 },
    /// Flip whether one track follows the master clock
    ToggleSynchronization(TrackId),

    // ─────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────
    /// Print the current master and track status
    ShowStatus,
    /// Leave the control loop
    Quit,
}

/// Capacity of the command queue
///
/// A pasted playlist can queue a few dozen AddTracks/volume commands in
/// one burst; 256 leaves ample headroom at negligible memory cost.
pub const COMMAND_QUEUE_CAPACITY: usize = 256;

/// Create a new command channel (producer/consumer pair)
///
/// Returns `(Producer, Consumer)` where the producer belongs to the
/// input thread and the consumer to the control loop. The channel is
/// bounded at [`COMMAND_QUEUE_CAPACITY`] commands.
pub fn command_channel() -> (rtrb::Producer<EngineCommand>, rtrb::Consumer<EngineCommand>) {
    rtrb::RingBuffer::new(COMMAND_QUEUE_CAPACITY)
}
