use std::fs;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mimicry::audio::decoder::decode_file;
use mimicry::catalog::Catalog;
use mimicry::cli::{AssetsArgs, Cli, Command, FeaturesArgs, ScoreArgs};
use mimicry::config::AppConfig;
use mimicry::scoring::{FeatureExtractor, FeatureSet};
use mimicry::{ScoreOutcome, ScoreRequest, Scorer};

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    match cli.command {
        Command::Score(args) => handle_score(&args),
        Command::Features(args) => handle_features(&args),
        Command::Challenges(args) => handle_challenges(&args),
    }
}

/// Logs go to stderr so stdout carries only the score or report.
fn init_tracing() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("mimicry=info"))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

fn handle_score(args: &ScoreArgs) -> Result<()> {
    args.validate()
        .context("Failed to validate command-line arguments")?;

    let (reference, challenge_limit) = resolve_reference(args)?;
    let time_limit = args.time_limit().or(challenge_limit);

    let attempt = fs::read(&args.attempt)
        .with_context(|| format!("Failed to read attempt file {:?}", args.attempt))?;
    let hint = args.attempt.extension().and_then(|e| e.to_str());
    let request = ScoreRequest::new(&attempt, reference.as_deref())
        .with_hint(hint)
        .with_time_limit(time_limit);

    let outcome = Scorer::with_defaults().evaluate(&request);
    if !args.json {
        println!("{:.1}", outcome.rounded());
        return Ok(());
    }

    let report = match &outcome {
        ScoreOutcome::Scored(report) => json!({
            "score": outcome.rounded(),
            "neutral": false,
            "breakdown": report.breakdown,
            "uploaded": report.uploaded,
            "reference": report.reference,
        }),
        ScoreOutcome::Neutral(err) => json!({
            "score": outcome.rounded(),
            "neutral": true,
            "reason": err.to_string(),
        }),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Reference locator and the challenge's time limit, if a challenge was picked.
fn resolve_reference(args: &ScoreArgs) -> Result<(Option<String>, Option<Duration>)> {
    if let Some(reference) = &args.reference {
        return Ok((Some(reference.clone()), None));
    }
    let Some(id) = &args.challenge else {
        return Ok((None, None));
    };
    let catalog = load_catalog(&args.assets)?;
    let challenge = catalog
        .get(id)
        .ok_or_else(|| anyhow!("challenge '{}' not found", id))?;
    info!(id = %challenge.id, label = %challenge.label, "scoring against challenge");
    Ok((Some(challenge.reference.clone()), challenge.time_limit()))
}

fn handle_features(args: &FeaturesArgs) -> Result<()> {
    let audio = decode_file(&args.input)?;
    let features = FeatureExtractor::new().extract(&audio);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&features)?);
    } else {
        print_features(&features);
    }
    Ok(())
}

fn print_features(features: &FeatureSet) {
    println!("duration:           {:.3} s", features.duration);
    println!("energy (rms):       {:.5}", features.energy);
    println!("spectral centroid:  {:.1} Hz", features.spectral_centroid);
    if features.fundamental_frequency > 0.0 {
        println!("fundamental:        {:.1} Hz", features.fundamental_frequency);
    } else {
        println!("fundamental:        undetected");
    }
    println!("zero-crossing rate: {:.4}", features.zero_crossing_rate);
}

fn handle_challenges(args: &AssetsArgs) -> Result<()> {
    let catalog = load_catalog(args)?;
    for challenge in catalog.challenges() {
        match challenge.time_limit_ms {
            Some(ms) => println!(
                "{}\t{}\t{}\t{} ms",
                challenge.id, challenge.label, challenge.lyrics, ms
            ),
            None => println!("{}\t{}\t{}", challenge.id, challenge.label, challenge.lyrics),
        }
    }
    Ok(())
}

fn load_catalog(args: &AssetsArgs) -> Result<Catalog> {
    let config = AppConfig::from_override(args.assets_path.clone())?;
    config.load_catalog()
}
