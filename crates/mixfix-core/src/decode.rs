//! Audio file decoding for waveform analysis
//!
//! Symphonia-backed decode of an audio file into normalized f32 samples.
//! Playback goes through each track's own output sink; this path only
//! feeds the amplitude extractor, so it keeps just channel 0.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{AudioError, AudioResult};
use crate::types::Sample;

/// Channel-0 samples of a decoded audio file
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Normalized samples of the first channel, in time order
    pub samples: Vec<Sample>,
    /// Source sample rate in Hz
    pub sample_rate: u32,
    /// Channel count of the source
    pub channels: u16,
}

impl DecodedAudio {
    /// Source duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode an audio file to channel-0 f32 samples using Symphonia
pub fn decode_audio(path: &Path) -> AudioResult<DecodedAudio> {
    let file = File::open(path)
        .map_err(|e| AudioError::Load(format!("Failed to open {}: {}", path.display(), e)))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Hint the probe with the file extension
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| AudioError::Load(e.to_string()))?;

    let mut format = probed.format;

    // Find the first audio track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::Load("No audio track found".to_string()))?;

    let track_id = track.id;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AudioError::Load("Unknown sample rate".to_string()))?;

    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(2);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::Load(e.to_string()))?;

    let mut samples: Vec<Sample> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    // Decode all packets
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                log::warn!("Error reading packet: {}", e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("Error decoding packet: {}", e);
                continue;
            }
        };

        // Initialize the sample buffer on first decode; the decoded spec is
        // authoritative for the interleave stride
        if sample_buf.is_none() {
            let spec = *decoded.spec();
            channels = spec.channels.count() as u16;
            let duration = decoded.capacity() as u64;
            sample_buf = Some(SampleBuffer::new(duration, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            // Packets decode to whole frames, so a fixed stride stays on channel 0
            samples.extend(buf.samples().iter().step_by(channels as usize).copied());
        }
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, frames: &[&[i16]]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for frame in frames {
            for &sample in *frame {
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_mono_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        // 16384/32768 = 0.5 exactly in 16-bit
        let frames: Vec<&[i16]> = (0..1000).map(|_| &[16384i16][..]).collect();
        write_wav(&path, 1, &frames);

        let decoded = decode_audio(&path).unwrap();
        assert_eq!(decoded.sample_rate, 8000);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.samples.len(), 1000);
        assert!(decoded.samples.iter().all(|&s| (s - 0.5).abs() < 1e-4));
    }

    #[test]
    fn test_decode_stereo_keeps_channel_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        // Left 0.25, right -0.75: only the left values should survive
        let frames: Vec<&[i16]> = (0..400).map(|_| &[8192i16, -24576i16][..]).collect();
        write_wav(&path, 2, &frames);

        let decoded = decode_audio(&path).unwrap();
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.samples.len(), 400);
        assert!(decoded.samples.iter().all(|&s| (s - 0.25).abs() < 1e-4));
    }

    #[test]
    fn test_duration_from_frame_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two_seconds.wav");
        let frames: Vec<&[i16]> = (0..16000).map(|_| &[0i16][..]).collect();
        write_wav(&path, 1, &frames);

        let decoded = decode_audio(&path).unwrap();
        assert!((decoded.duration_seconds() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_decode_missing_file_fails() {
        let result = decode_audio(Path::new("/nonexistent/missing.wav"));
        assert!(matches!(result, Err(AudioError::Load(_))));
    }
}
