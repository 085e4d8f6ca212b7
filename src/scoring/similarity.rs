use crate::scoring::{FeatureSet, ScoreBreakdown, ScoringWeights, NEUTRAL_SCORE};

const DURATION_FLOOR_SECS: f64 = 0.1;
const RATIO_FLOOR: f64 = 0.001;
const PITCH_TOLERANCE_SEMITONES: f64 = 2.0;
const PITCH_NEAR_PENALTY: f64 = 25.0;
const PITCH_FAR_PENALTY: f64 = 20.0;

/// Compares two feature sets and folds the sub-scores into one metric.
#[derive(Debug, Default)]
pub struct SimilarityCalculator {
    weights: ScoringWeights,
}

impl SimilarityCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn breakdown(&self, uploaded: &FeatureSet, reference: &FeatureSet) -> ScoreBreakdown {
        ScoreBreakdown {
            duration: duration_similarity(uploaded.duration, reference.duration),
            energy: energy_similarity(uploaded.energy, reference.energy),
            spectral: spectral_similarity(uploaded.spectral_centroid, reference.spectral_centroid),
            pitch: pitch_similarity(
                uploaded.fundamental_frequency,
                reference.fundamental_frequency,
            ),
            rhythm: rhythm_similarity(uploaded.zero_crossing_rate, reference.zero_crossing_rate),
        }
    }

    pub fn score(&self, uploaded: &FeatureSet, reference: &FeatureSet) -> (f64, ScoreBreakdown) {
        let breakdown = self.breakdown(uploaded, reference);
        (self.weights.combine(&breakdown), breakdown)
    }
}

pub fn duration_similarity(d1: f64, d2: f64) -> f64 {
    let scale = d1.max(d2).max(DURATION_FLOOR_SECS);
    (100.0 - (d1 - d2).abs() / scale * 100.0).max(0.0)
}

pub fn energy_similarity(e1: f64, e2: f64) -> f64 {
    ratio_similarity(e1, e2)
}

/// Neutral when either side has no spectral content.
pub fn spectral_similarity(c1: f64, c2: f64) -> f64 {
    if c1 == 0.0 || c2 == 0.0 {
        return NEUTRAL_SCORE;
    }
    (100.0 - (c1 - c2).abs() / c1.max(c2) * 100.0).max(0.0)
}

/// Semitone distance scoring; neutral when either pitch is undetected.
pub fn pitch_similarity(f1: f64, f2: f64) -> f64 {
    if f1 == 0.0 || f2 == 0.0 {
        return NEUTRAL_SCORE;
    }
    let semitones = 12.0 * (f1 / f2).log2().abs();
    if semitones > PITCH_TOLERANCE_SEMITONES {
        (100.0 - (semitones - PITCH_TOLERANCE_SEMITONES) * PITCH_FAR_PENALTY).max(0.0)
    } else {
        (100.0 - semitones * PITCH_NEAR_PENALTY).max(0.0)
    }
}

/// Zero-crossing rates stand in for rhythm/texture.
pub fn rhythm_similarity(z1: f64, z2: f64) -> f64 {
    ratio_similarity(z1, z2)
}

fn ratio_similarity(a: f64, b: f64) -> f64 {
    a.min(b) / a.max(b).max(RATIO_FLOOR) * 100.0
}
