use std::f64::consts::PI;

/// Leading samples analysed for the spectral centroid.
pub const SPECTRUM_WINDOW: usize = 2048;

/// Hann weights for a window of `len` samples.
pub fn hann_window(len: usize) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denom = (len - 1) as f64;
            (0..len)
                .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / denom).cos()))
                .collect()
        }
    }
}

/// Magnitudes of a direct DFT over bins `0..frame.len() / 2`.
///
/// Deliberately O(n·k): scores are calibrated against this exact transform.
pub fn magnitude_spectrum(frame: &[f64]) -> Vec<f64> {
    let n = frame.len();
    let bins = n / 2;
    let mut magnitudes = Vec::with_capacity(bins);
    for k in 0..bins {
        let mut re = 0.0;
        let mut im = 0.0;
        for (t, &value) in frame.iter().enumerate() {
            let angle = -2.0 * PI * k as f64 * t as f64 / n as f64;
            re += value * angle.cos();
            im += value * angle.sin();
        }
        magnitudes.push((re * re + im * im).sqrt());
    }
    magnitudes
}

/// Magnitude-weighted mean frequency of the windowed leading frame, in Hz.
pub fn spectral_centroid(samples: &[f32], sample_rate: u32) -> f64 {
    let len = samples.len().min(SPECTRUM_WINDOW);
    if len == 0 || sample_rate == 0 {
        return 0.0;
    }
    let frame: Vec<f64> = samples[..len]
        .iter()
        .zip(hann_window(len))
        .map(|(&s, w)| s as f64 * w)
        .collect();
    let magnitudes = magnitude_spectrum(&frame);
    let bin_hz = sample_rate as f64 / len as f64;

    let mut weighted = 0.0;
    let mut total = 0.0;
    for (k, &mag) in magnitudes.iter().enumerate() {
        weighted += k as f64 * bin_hz * mag;
        total += mag;
    }
    if total == 0.0 {
        0.0
    } else {
        weighted / total
    }
}
