use crate::scoring::{self, AudioDecoder, ScoreError};
use crate::types::AudioData;
use anyhow::{ensure, Context, Result};
use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// [`AudioDecoder`] backed by symphonia's default codec registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder {}

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: &[u8], hint: Option<&str>) -> scoring::Result<AudioData> {
        decode_bytes(bytes.to_vec(), hint)
            .map_err(|err| ScoreError::decode(hint.unwrap_or("none"), format!("{err:#}")))
    }
}

/// Decode an audio file to raw PCM samples (mono, f32)
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<AudioData> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str());
    decode_bytes(bytes, extension)
        .with_context(|| format!("Failed to decode audio file: {}", path.display()))
}

/// Decode an in-memory encoded stream to raw PCM samples (mono, f32)
pub fn decode_bytes(bytes: Vec<u8>, extension: Option<&str>) -> Result<AudioData> {
    ensure!(!bytes.is_empty(), "Audio stream is empty");
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    // Create hint from the container extension, if any
    let mut hint = Hint::new();
    if let Some(extension) = extension {
        hint.with_extension(extension);
    }

    // Probe the media source
    let probe_result = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Failed to probe audio format")?;

    let mut format = probe_result.format;

    // Find the first audio track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio tracks found in stream")?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Sample rate not specified in audio stream")?;

    // Create a decoder for the track
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create decoder")?;

    let mut all_samples = Vec::new();
    let mut skipped_packets = 0usize;

    loop {
        // Get the next packet
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                // End of stream
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(err).context("Failed to read packet"),
        };

        // Only process packets for our selected track
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                // Interleave whatever sample format came out, then average to mono
                let channels = decoded.spec().channels.count();
                let mut buffer =
                    SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
                buffer.copy_interleaved_ref(decoded);
                mix_down(buffer.samples(), channels, &mut all_samples);
            }
            Err(SymphoniaError::DecodeError(reason)) => {
                warn!(reason, "skipping corrupt audio packet");
                skipped_packets += 1;
            }
            Err(err) => return Err(err).context("Failed to decode audio packet"),
        }
    }

    ensure!(!all_samples.is_empty(), "Decoded stream contained no samples");
    debug!(
        samples = all_samples.len(),
        sample_rate,
        skipped_packets,
        "decoded audio stream"
    );

    Ok(AudioData {
        samples: all_samples,
        sample_rate,
    })
}

/// Average interleaved frames into mono, appending to `out`.
fn mix_down(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
        return;
    }
    out.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}

#[cfg(test)]
mod tests {
    use super::{decode_bytes, mix_down};

    #[test]
    fn mix_down_averages_frames() {
        let mut out = Vec::new();
        mix_down(&[1.0, 0.0, 0.5, -0.5, 0.2, 0.4], 2, &mut out);
        assert_eq!(out.len(), 3);
        assert!((out[0] - 0.5).abs() < 1e-6);
        assert!(out[1].abs() < 1e-6);
        assert!((out[2] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn mono_passes_through() {
        let mut out = vec![0.9];
        mix_down(&[0.1, 0.2], 1, &mut out);
        assert_eq!(out, vec![0.9, 0.1, 0.2]);
    }

    #[test]
    fn rejects_garbage_and_empty_streams() {
        assert!(decode_bytes(Vec::new(), None).is_err());
        assert!(decode_bytes(b"definitely not audio".to_vec(), Some("wav")).is_err());
    }
}
