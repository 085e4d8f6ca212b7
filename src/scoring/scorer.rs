use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::decoder::SymphoniaDecoder;
use crate::audio::fetch::SourceFetcher;
use crate::types::AudioData;

use super::{
    round_score, AudioDecoder, FeatureExtractor, ReferenceFetcher, Result, ScoreError,
    ScoreReport, ScoringWeights, SimilarityCalculator, NEUTRAL_SCORE,
};

/// One scoring request: the recorded attempt plus where to find its reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreRequest<'a> {
    /// Encoded bytes of the recorded attempt.
    pub attempt: &'a [u8],
    /// File extension of the attempt, used as a container hint.
    pub attempt_hint: Option<&'a str>,
    /// URL or path of the reference clip.
    pub reference: Option<&'a str>,
    /// Attempts are cut to this length before analysis.
    pub time_limit: Option<Duration>,
}

impl<'a> ScoreRequest<'a> {
    pub fn new(attempt: &'a [u8], reference: Option<&'a str>) -> Self {
        Self {
            attempt,
            reference,
            ..Self::default()
        }
    }

    pub fn with_hint(mut self, hint: Option<&'a str>) -> Self {
        self.attempt_hint = hint;
        self
    }

    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }
}

/// A request after the neutral fallback has been applied.
#[derive(Debug)]
pub enum ScoreOutcome {
    Scored(ScoreReport),
    /// The request could not be scored; the score is [`NEUTRAL_SCORE`].
    Neutral(ScoreError),
}

impl ScoreOutcome {
    pub fn score(&self) -> f64 {
        match self {
            Self::Scored(report) => report.score,
            Self::Neutral(_) => NEUTRAL_SCORE,
        }
    }

    pub fn rounded(&self) -> f64 {
        round_score(self.score())
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Self::Neutral(_))
    }
}

/// Decodes an attempt and its reference, then rates how closely they match.
pub struct Scorer<D, F> {
    decoder: D,
    fetcher: F,
    extractor: FeatureExtractor,
    similarity: SimilarityCalculator,
}

impl Scorer<SymphoniaDecoder, SourceFetcher> {
    /// Symphonia decoding with HTTP or filesystem reference lookup.
    pub fn with_defaults() -> Self {
        Self::new(SymphoniaDecoder::new(), SourceFetcher::new())
    }
}

impl<D, F> Scorer<D, F>
where
    D: AudioDecoder,
    F: ReferenceFetcher,
{
    pub fn new(decoder: D, fetcher: F) -> Self {
        Self {
            decoder,
            fetcher,
            extractor: FeatureExtractor::new(),
            similarity: SimilarityCalculator::new(),
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.similarity = SimilarityCalculator::with_weights(weights);
        self
    }

    /// Score in [0, 100]. Any failure along the way yields [`NEUTRAL_SCORE`].
    pub fn score(&self, request: &ScoreRequest<'_>) -> f64 {
        self.evaluate(request).score()
    }

    /// The only place a failed request collapses to the neutral score.
    pub fn evaluate(&self, request: &ScoreRequest<'_>) -> ScoreOutcome {
        match self.try_score(request) {
            Ok(report) => ScoreOutcome::Scored(report),
            Err(err) => {
                warn!(error = %err, "scoring failed; reporting neutral score");
                ScoreOutcome::Neutral(err)
            }
        }
    }

    /// Fallible form of [`Scorer::score`]; surfaces why a request could not be scored.
    pub fn try_score(&self, request: &ScoreRequest<'_>) -> Result<ScoreReport> {
        let location = request.reference.ok_or(ScoreError::MissingReference)?;

        let mut uploaded = self.decoder.decode(request.attempt, request.attempt_hint)?;
        if let Some(limit) = request.time_limit {
            let before = uploaded.duration_secs();
            uploaded.truncate_to(limit.as_secs_f64());
            if uploaded.duration_secs() < before {
                debug!(
                    before_secs = before,
                    limit_secs = limit.as_secs_f64(),
                    "attempt truncated to time limit"
                );
            }
        }

        let reference_bytes = self.fetcher.fetch(location)?;
        let reference = self
            .decoder
            .decode(&reference_bytes, extension_hint(location))?;

        let report = self.compare(&uploaded, &reference);
        info!(
            reference = location,
            score = report.score,
            "attempt scored"
        );
        Ok(report)
    }

    /// Pure comparison of two decoded buffers.
    pub fn compare(&self, uploaded: &AudioData, reference: &AudioData) -> ScoreReport {
        let uploaded_features = self.extractor.extract(uploaded);
        let reference_features = self.extractor.extract(reference);
        let (score, breakdown) = self
            .similarity
            .score(&uploaded_features, &reference_features);
        ScoreReport {
            score,
            breakdown,
            uploaded: uploaded_features,
            reference: reference_features,
        }
    }
}

/// Extension of the last path segment, ignoring any query string or fragment.
pub fn extension_hint(location: &str) -> Option<&str> {
    let trimmed = location
        .split(['?', '#'])
        .next()
        .unwrap_or(location);
    Path::new(trimmed)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
}
