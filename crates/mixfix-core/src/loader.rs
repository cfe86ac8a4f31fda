//! Background track loader
//!
//! Decodes audio files and computes amplitude envelopes off the control
//! thread: requests go to a dedicated loader thread over a channel, each
//! job runs on the rayon pool, and results come back over a second
//! channel tagged with the requesting track's load generation.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::analysis::{self, AmplitudeEnvelope};
use crate::decode;
use crate::types::TrackId;

// ────────────────────────────────────────────────────────────────────────────────
// Public Types
// ────────────────────────────────────────────────────────────────────────────────

/// Request to decode and analyze one track source
#[derive(Debug)]
pub struct TrackLoadRequest {
    /// Track that asked for the load
    pub track_id: TrackId,
    /// Load generation captured when the request was queued
    pub generation: u64,
    /// Path to the audio file
    pub source_path: PathBuf,
}

/// Result of a track load
#[derive(Debug)]
pub struct TrackLoadResult {
    /// Track that asked for the load
    pub track_id: TrackId,
    /// Load generation captured when the request was queued
    pub generation: u64,
    /// Decoded metadata and envelope (or error)
    pub result: Result<AnalyzedTrack, String>,
}

/// Decoded metadata plus the amplitude envelope of one source
#[derive(Debug, Clone)]
pub struct AnalyzedTrack {
    /// Source duration in seconds
    pub duration_seconds: f64,
    /// Source sample rate in Hz
    pub sample_rate: u32,
    /// Waveform envelope for the display
    pub envelope: AmplitudeEnvelope,
}

// ────────────────────────────────────────────────────────────────────────────────
// TrackLoader
// ────────────────────────────────────────────────────────────────────────────────

/// Background loader shared by the engine
///
/// Owns a dedicated request thread; decode + analysis jobs fan out to the
/// rayon thread pool so several tracks load in parallel.
pub struct TrackLoader {
    /// Channel to send load requests
    request_tx: Sender<TrackLoadRequest>,
    /// Channel to receive load results
    result_rx: Receiver<TrackLoadResult>,
    /// Loader thread handle
    _handle: JoinHandle<()>,
}

impl TrackLoader {
    /// Spawn the loader thread with the given envelope resolution
    pub fn spawn(block_count: usize) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<TrackLoadRequest>();
        let (result_tx, result_rx) = mpsc::channel::<TrackLoadResult>();

        let handle = thread::Builder::new()
            .name("track-loader".to_string())
            .spawn(move || {
                loader_thread(request_rx, result_tx, block_count);
            })
            .expect("Failed to spawn track loader thread");

        log::info!("TrackLoader spawned with {} envelope blocks", block_count);

        Self {
            request_tx,
            result_rx,
            _handle: handle,
        }
    }

    /// Queue a decode + analysis job (non-blocking)
    pub fn load(
        &self,
        track_id: TrackId,
        generation: u64,
        source_path: PathBuf,
    ) -> Result<(), String> {
        self.request_tx
            .send(TrackLoadRequest {
                track_id,
                generation,
                source_path,
            })
            .map_err(|e| format!("Loader thread disconnected: {}", e))
    }

    /// Try to receive a single result (non-blocking)
    pub fn try_recv(&self) -> Option<TrackLoadResult> {
        match self.result_rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("Loader thread disconnected unexpectedly");
                None
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// Background Thread
// ────────────────────────────────────────────────────────────────────────────────

fn loader_thread(rx: Receiver<TrackLoadRequest>, tx: Sender<TrackLoadResult>, block_count: usize) {
    log::info!("Track loader thread started");

    while let Ok(request) = rx.recv() {
        // Spawn to rayon thread pool so long decodes run in parallel
        let tx_clone = tx.clone();

        rayon::spawn(move || {
            handle_track_load(request, tx_clone, block_count);
        });
    }

    log::info!("Track loader thread exiting");
}

fn handle_track_load(request: TrackLoadRequest, tx: Sender<TrackLoadResult>, block_count: usize) {
    log::info!(
        "[PERF] TrackLoader: Loading {} from {:?}",
        request.track_id,
        request.source_path
    );

    let total_start = Instant::now();

    let result = decode_and_analyze(&request.source_path, block_count);

    match &result {
        Ok(analyzed) => {
            log::info!(
                "[PERF] TrackLoader: Analyzed {} ({:.1}s at {} Hz, {} blocks) in {:?}",
                request.track_id,
                analyzed.duration_seconds,
                analyzed.sample_rate,
                analyzed.envelope.len(),
                total_start.elapsed()
            );
        }
        Err(e) => {
            log::error!(
                "TrackLoader: Failed to load {:?}: {}",
                request.source_path,
                e
            );
        }
    }

    // The engine may already be gone during shutdown
    let _ = tx.send(TrackLoadResult {
        track_id: request.track_id,
        generation: request.generation,
        result,
    });
}

fn decode_and_analyze(path: &Path, block_count: usize) -> Result<AnalyzedTrack, String> {
    let decoded = decode::decode_audio(path).map_err(|e| e.to_string())?;
    let envelope = analysis::extract(&decoded.samples, block_count).map_err(|e| e.to_string())?;

    Ok(AnalyzedTrack {
        duration_seconds: decoded.duration_seconds(),
        sample_rate: decoded.sample_rate,
        envelope,
    })
}
