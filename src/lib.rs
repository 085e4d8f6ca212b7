//! Voice mimicry scoring: decode an attempt and a reference clip, extract a
//! handful of acoustic features from each, and rate their similarity on a
//! 0–100 scale.

pub mod audio;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod scoring;
pub mod types;

pub use scoring::scorer::{ScoreOutcome, ScoreRequest, Scorer};
pub use scoring::{FeatureSet, ScoreBreakdown, ScoreError, ScoreReport, NEUTRAL_SCORE};
pub use types::AudioData;
