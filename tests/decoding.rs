use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use hound::{SampleFormat, WavSpec, WavWriter};
use mimicry::audio::decoder::{decode_file, SymphoniaDecoder};
use mimicry::scoring::{AudioDecoder, ScoreError};
use mimicry::{ScoreRequest, Scorer, NEUTRAL_SCORE};
use tempfile::TempDir;

const SAMPLE_RATE: u32 = 22_050;

fn write_wav(dir: &Path, name: &str, channels: u16, frames: &[Vec<f32>]) -> PathBuf {
    let path = dir.join(name);
    let spec = WavSpec {
        channels,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).expect("create wav");
    for frame in frames {
        for &sample in frame {
            writer
                .write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                .expect("write sample");
        }
    }
    writer.finalize().expect("finalize wav");
    path
}

fn mono_tone(frequency: f32, amplitude: f32, duration_secs: f32) -> Vec<Vec<f32>> {
    let total = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..total)
        .map(|i| vec![amplitude * (2.0 * PI * frequency * i as f32 / SAMPLE_RATE as f32).sin()])
        .collect()
}

#[test]
fn decodes_mono_wav_file() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "tone.wav", 1, &mono_tone(220.0, 0.5, 0.5));

    let audio = decode_file(&path).expect("decode wav");
    assert_eq!(audio.sample_rate, SAMPLE_RATE);
    assert_eq!(audio.samples.len(), (SAMPLE_RATE / 2) as usize);
    let peak = audio.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    assert_abs_diff_eq!(peak, 0.5, epsilon = 0.01);
}

#[test]
fn stereo_is_mixed_to_mono() {
    let dir = TempDir::new().unwrap();
    let frames: Vec<Vec<f32>> = (0..1_000).map(|_| vec![0.5, -0.1]).collect();
    let path = write_wav(dir.path(), "stereo.wav", 2, &frames);

    let audio = decode_file(&path).expect("decode stereo wav");
    assert_eq!(audio.samples.len(), 1_000);
    for sample in &audio.samples {
        assert_abs_diff_eq!(*sample, 0.2, epsilon = 1e-3);
    }
}

#[test]
fn decoder_trait_reports_garbage_as_decode_failure() {
    let err = SymphoniaDecoder::new()
        .decode(b"RIFF but not really", Some("wav"))
        .unwrap_err();
    assert!(matches!(err, ScoreError::Decode { .. }));
}

#[test]
fn default_scorer_compares_files_on_disk() {
    let dir = TempDir::new().unwrap();
    let tone = mono_tone(441.0, 0.9, 1.0);
    let reference = write_wav(dir.path(), "reference.wav", 1, &tone);
    let attempt_path = write_wav(dir.path(), "attempt.wav", 1, &tone);
    let attempt = std::fs::read(&attempt_path).unwrap();
    let reference = reference.to_str().unwrap();

    let scorer = Scorer::with_defaults();
    let report = scorer
        .try_score(&ScoreRequest::new(&attempt, Some(reference)).with_hint(Some("wav")))
        .expect("score files");
    assert_abs_diff_eq!(report.score, 100.0, epsilon = 1e-6);

    let silent_path = write_wav(dir.path(), "silent.wav", 1, &vec![vec![0.0]; tone.len()]);
    let silent = std::fs::read(&silent_path).unwrap();
    let silent_score = scorer.score(&ScoreRequest::new(&silent, Some(reference)));
    assert_abs_diff_eq!(silent_score, 47.5, epsilon = 1e-6);
}

#[test]
fn default_scorer_falls_back_on_missing_reference_file() {
    let dir = TempDir::new().unwrap();
    let attempt_path = write_wav(dir.path(), "attempt.wav", 1, &mono_tone(300.0, 0.6, 0.3));
    let attempt = std::fs::read(&attempt_path).unwrap();
    let missing = dir.path().join("nope.wav");

    let score = Scorer::with_defaults().score(&ScoreRequest::new(
        &attempt,
        Some(missing.to_str().unwrap()),
    ));
    assert_eq!(score, NEUTRAL_SCORE);
}
