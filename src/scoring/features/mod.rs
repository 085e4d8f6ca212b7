mod pitch;
mod spectral;
mod statistics;

use tracing::debug;

use crate::scoring::FeatureSet;
use crate::types::AudioData;

pub use pitch::estimate_fundamental;
pub use spectral::{hann_window, magnitude_spectrum, spectral_centroid, SPECTRUM_WINDOW};
pub use statistics::{rms_energy, zero_crossing_rate};

/// Computes the scalar feature set of one buffer.
///
/// Extraction reads nothing but the buffer it is given, so the uploaded and
/// reference clips can be processed independently.
#[derive(Debug, Default)]
pub struct FeatureExtractor {}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(&self, audio: &AudioData) -> FeatureSet {
        let samples = audio.samples.as_slice();
        let features = FeatureSet {
            duration: audio.duration_secs(),
            energy: rms_energy(samples),
            spectral_centroid: spectral_centroid(samples, audio.sample_rate),
            fundamental_frequency: estimate_fundamental(samples, audio.sample_rate),
            zero_crossing_rate: zero_crossing_rate(samples),
        };
        debug!(
            samples = samples.len(),
            sample_rate = audio.sample_rate,
            duration = features.duration,
            energy = features.energy,
            centroid_hz = features.spectral_centroid,
            f0_hz = features.fundamental_frequency,
            zcr = features.zero_crossing_rate,
            "extracted features"
        );
        features
    }
}
