use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Result};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "mimicry",
    version,
    about = "Voice mimicry scorer: compare a recorded attempt against a reference clip"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a recorded attempt against a reference clip or catalog challenge.
    Score(ScoreArgs),
    /// Print the acoustic features of a single audio file.
    Features(FeaturesArgs),
    /// List the challenges in the catalog.
    Challenges(AssetsArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct AssetsArgs {
    /// Optional override for the assets directory.
    #[arg(long = "assets-path")]
    pub assets_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Recorded attempt (WAV, MP3, OGG, FLAC, ...).
    #[arg(long, value_name = "FILE")]
    pub attempt: PathBuf,
    /// Reference clip as a local path or http(s) URL.
    #[arg(long, value_name = "PATH|URL", conflicts_with = "challenge")]
    pub reference: Option<String>,
    /// Catalog challenge whose reference clip should be used.
    #[arg(long, value_name = "ID")]
    pub challenge: Option<String>,
    /// Cut the attempt to this many milliseconds before scoring.
    #[arg(long = "time-limit-ms", value_name = "MS")]
    pub time_limit_ms: Option<u64>,
    /// Emit a JSON report with features and per-feature scores.
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub assets: AssetsArgs,
}

impl ScoreArgs {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.attempt.is_file(),
            "attempt file does not exist: {:?}",
            self.attempt
        );
        ensure!(
            self.time_limit_ms != Some(0),
            "time limit must be positive"
        );
        Ok(())
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}

#[derive(Args, Debug, Clone)]
pub struct FeaturesArgs {
    /// Audio file to analyse.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}
