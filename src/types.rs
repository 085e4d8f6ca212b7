//! Core types shared by the decoding and scoring pipeline

/// Raw audio data representation (mono, f32 samples)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioData {
    /// Audio samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 44100)
    pub sample_rate: u32,
}

impl AudioData {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Length of the buffer in seconds; zero when the sample rate is unknown.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop everything after `limit_secs`, the way a recorder stops at its time limit.
    pub fn truncate_to(&mut self, limit_secs: f64) {
        if limit_secs < 0.0 || self.sample_rate == 0 {
            return;
        }
        let max_samples = (limit_secs * self.sample_rate as f64).ceil() as usize;
        self.samples.truncate(max_samples);
    }
}

#[cfg(test)]
mod tests {
    use super::AudioData;

    #[test]
    fn duration_follows_sample_rate() {
        let audio = AudioData::new(vec![0.0; 22_050], 44_100);
        assert!((audio.duration_secs() - 0.5).abs() < 1e-12);
        assert_eq!(AudioData::new(vec![0.0; 10], 0).duration_secs(), 0.0);
    }

    #[test]
    fn truncate_keeps_short_buffers_intact() {
        let mut audio = AudioData::new(vec![0.1; 8_000], 16_000);
        audio.truncate_to(1.0);
        assert_eq!(audio.samples.len(), 8_000);
        audio.truncate_to(0.25);
        assert_eq!(audio.samples.len(), 4_000);
    }
}
