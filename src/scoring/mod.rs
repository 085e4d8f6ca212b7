pub mod features;
pub mod scorer;
pub mod similarity;

use serde::Serialize;
use thiserror::Error;

use crate::types::AudioData;

pub use features::FeatureExtractor;
pub use scorer::Scorer;
pub use similarity::SimilarityCalculator;

/// Score reported whenever the reference is missing or any input fails to load.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Convenient alias for results returned by scoring modules.
pub type Result<T> = std::result::Result<T, ScoreError>;

/// Everything that can stop a scoring request before features are compared.
///
/// None of these cross the [`Scorer::score`] boundary; they collapse to
/// [`NEUTRAL_SCORE`] there.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to decode audio (format hint: {format}): {reason}")]
    Decode { format: String, reason: String },
    #[error("failed to fetch reference from {location}: {reason}")]
    Fetch { location: String, reason: String },
    #[error("no reference audio configured")]
    MissingReference,
}

impl ScoreError {
    pub fn decode(format: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            format: format.into(),
            reason: reason.to_string(),
        }
    }

    pub fn fetch(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

/// Turns compressed audio bytes into a mono sample buffer.
pub trait AudioDecoder {
    /// `hint` is a file extension (without the dot) when one is known.
    fn decode(&self, bytes: &[u8], hint: Option<&str>) -> Result<AudioData>;
}

/// Resolves a reference locator (URL or path) to raw bytes.
pub trait ReferenceFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/// Scalar features of a single buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FeatureSet {
    /// Seconds.
    pub duration: f64,
    /// RMS amplitude.
    pub energy: f64,
    /// Hz, 0 when the spectrum carries no magnitude.
    pub spectral_centroid: f64,
    /// Hz, 0 when no pitch was detected.
    pub fundamental_frequency: f64,
    /// Fraction of sign changes between adjacent samples, in [0, 1].
    pub zero_crossing_rate: f64,
}

/// Per-feature similarity sub-scores, each in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub duration: f64,
    pub energy: f64,
    pub spectral: f64,
    pub pitch: f64,
    pub rhythm: f64,
}

/// Relative importance of each sub-score in the combined metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    pub duration: f64,
    pub energy: f64,
    pub spectral: f64,
    pub pitch: f64,
    pub rhythm: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            duration: 0.25,
            energy: 0.20,
            spectral: 0.25,
            pitch: 0.20,
            rhythm: 0.10,
        }
    }
}

impl ScoringWeights {
    /// Weighted sum of the sub-scores, clamped to [0, 100].
    pub fn combine(&self, breakdown: &ScoreBreakdown) -> f64 {
        let total = self.duration * breakdown.duration
            + self.energy * breakdown.energy
            + self.spectral * breakdown.spectral
            + self.pitch * breakdown.pitch
            + self.rhythm * breakdown.rhythm;
        total.clamp(0.0, 100.0)
    }
}

/// Full outcome of comparing an attempt against its reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreReport {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub uploaded: FeatureSet,
    pub reference: FeatureSet,
}

impl ScoreReport {
    /// Score as shown to the player: one decimal place.
    pub fn rounded(&self) -> f64 {
        round_score(self.score)
    }
}

pub fn round_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}
