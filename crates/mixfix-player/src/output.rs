//! Rodio-backed track outputs
//!
//! Each track gets its own `Sink` on a shared output stream, so tracks
//! pause, seek, and fade independently instead of being summed into one
//! stream. When no audio device is available a silent factory keeps the
//! rest of the player (loading, analysis, status) usable.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use mixfix_core::error::{AudioError, AudioResult};
use mixfix_core::output::{OutputFactory, TrackOutput};

/// One rodio sink driving one track
pub struct RodioOutput {
    sink: Sink,
    /// Kept so a drained sink can queue a fresh decode and play again
    source: PathBuf,
}

impl RodioOutput {
    /// Queue the source again once the sink has drained.
    ///
    /// A sink plays its queued source exactly once, so replaying an ended
    /// track needs a fresh decode of the same file. Pausing before the
    /// append keeps the new source waiting for the seek and play that
    /// follow.
    fn requeue_if_drained(&mut self) -> AudioResult<()> {
        if !self.sink.empty() {
            return Ok(());
        }

        let file = File::open(&self.source).map_err(|e| {
            AudioError::PlaybackRejected(format!("Failed to reopen {:?}: {}", self.source, e))
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| {
            AudioError::PlaybackRejected(format!("Failed to decode {:?}: {}", self.source, e))
        })?;

        self.sink.pause();
        self.sink.append(decoder);
        Ok(())
    }
}

impl TrackOutput for RodioOutput {
    fn play(&mut self) -> AudioResult<()> {
        self.requeue_if_drained()?;
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek(&mut self, position: f64) -> AudioResult<()> {
        self.requeue_if_drained()?;
        self.sink
            .try_seek(Duration::from_secs_f64(position.max(0.0)))
            .map_err(|e| AudioError::PlaybackRejected(format!("Seek failed: {}", e)))
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn position(&self) -> f64 {
        self.sink.get_pos().as_secs_f64()
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}

/// Opens paused sinks on the default audio device
pub struct RodioOutputFactory {
    stream: OutputStream,
}

impl RodioOutputFactory {
    /// Connect to the default output device
    pub fn open_default() -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .context("Failed to open default audio output")?;
        // rodio logs to stderr when the stream is dropped. That's useful in
        // debugging, but noisy for a terminal app.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl OutputFactory for RodioOutputFactory {
    fn open(&self, source: &Path) -> AudioResult<Box<dyn TrackOutput>> {
        let file = File::open(source)
            .map_err(|e| AudioError::Load(format!("Failed to open {:?}: {}", source, e)))?;

        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| AudioError::Load(format!("Failed to decode {:?}: {}", source, e)))?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(decoder);
        sink.pause();

        Ok(Box::new(RodioOutput {
            sink,
            source: source.to_path_buf(),
        }))
    }
}

/// Track output that produces no sound
///
/// Position only moves on explicit seeks, and the track never reports
/// finished; end-of-track events need a real device.
pub struct NullOutput {
    position: f64,
}

impl TrackOutput for NullOutput {
    fn play(&mut self) -> AudioResult<()> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn seek(&mut self, position: f64) -> AudioResult<()> {
        self.position = position.max(0.0);
        Ok(())
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn position(&self) -> f64 {
        self.position
    }

    fn is_finished(&self) -> bool {
        false
    }
}

/// Factory handed to the engine when no audio device could be opened
#[derive(Default)]
pub struct NullOutputFactory;

impl OutputFactory for NullOutputFactory {
    fn open(&self, _source: &Path) -> AudioResult<Box<dyn TrackOutput>> {
        Ok(Box::new(NullOutput { position: 0.0 }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
