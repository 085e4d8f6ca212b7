const MAX_PITCH_HZ: u32 = 800;
const MIN_PITCH_HZ: u32 = 80;
const VOICING_THRESHOLD: f64 = 0.3;

/// Autocorrelation pitch estimate in Hz, or 0 when nothing periodic enough is found.
///
/// Candidate lags run from `sample_rate / 800` to `min(sample_rate / 80, len / 2)`.
/// Each lag is scored by the mean of `x[i] * x[i + lag]` over
/// `min(3 * lag, len - lag)` samples; the first lag reaching the best mean wins.
pub fn estimate_fundamental(samples: &[f32], sample_rate: u32) -> f64 {
    let len = samples.len();
    let min_lag = ((sample_rate / MAX_PITCH_HZ) as usize).max(1);
    let max_lag = ((sample_rate / MIN_PITCH_HZ) as usize).min(len / 2);

    let mut best_lag = 0usize;
    let mut best_corr = 0.0f64;
    for lag in min_lag..=max_lag {
        let span = (3 * lag).min(len - lag);
        if span == 0 {
            continue;
        }
        let sum: f64 = samples[..span]
            .iter()
            .zip(&samples[lag..lag + span])
            .map(|(&a, &b)| a as f64 * b as f64)
            .sum();
        let corr = sum / span as f64;
        if corr > best_corr {
            best_corr = corr;
            best_lag = lag;
        }
    }

    if best_lag > 0 && best_corr > VOICING_THRESHOLD {
        sample_rate as f64 / best_lag as f64
    } else {
        0.0
    }
}
