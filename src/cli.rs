use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::github::DEFAULT_API_URL;
use crate::period::Period;
use crate::pipeline::FetchOptions;
use crate::score::ScoringConfig;

#[derive(Parser)]
#[command(name = "gboard")]
#[command(about = "Contributor leaderboard for hosted git repositories")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, short = 'r', global = true, help = "Repository as owner/repo or a repository URL")]
    pub repo: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true, help = "API token")]
    pub token: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, global = true, help = "API base URL")]
    pub api_url: String,

    #[arg(long, global = true, help = "Fail instead of running unauthenticated when no token is set")]
    pub require_token: bool,

    #[arg(long, global = true, help = "Path to cache directory [default: per-user cache dir, e.g. ~/.cache/gboard]")]
    pub cache: Option<PathBuf>,

    #[arg(long, global = true, help = "Do not read or write the commit detail cache")]
    pub no_cache: bool,

    #[arg(long, global = true, help = "Skip recovering line stats for contributors that report none")]
    pub no_backfill: bool,

    #[arg(long, global = true, default_value_t = 0, help = "Contributors backfilled at once (0 = unbounded)")]
    pub backfill_concurrency: usize,

    #[arg(long, global = true, default_value_t = 3, help = "Retries while upstream stats are still computing")]
    pub max_retries: u32,

    #[arg(long, global = true, default_value = "3s", value_parser = humantime::parse_duration, help = "Delay between retries (e.g. 3s, 1m)")]
    pub retry_delay: Duration,

    #[arg(long, short = 'v', global = true, help = "Verbose logging")]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            max_retries: self.max_retries,
            retry_delay: self.retry_delay,
            backfill_concurrency: self.backfill_concurrency,
            backfill: !self.no_backfill,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct ScoringArgs {
    #[arg(long, default_value_t = ScoringConfig::default().commit_weight)]
    pub commit_weight: f64,

    #[arg(long, default_value_t = ScoringConfig::default().additions_weight)]
    pub additions_weight: f64,

    #[arg(long, default_value_t = ScoringConfig::default().deletions_weight)]
    pub deletions_weight: f64,

    #[arg(long, default_value_t = ScoringConfig::default().lines_per_commit_baseline, help = "Lines per commit earning the full size bonus")]
    pub baseline: f64,
}

impl From<&ScoringArgs> for ScoringConfig {
    fn from(args: &ScoringArgs) -> Self {
        ScoringConfig {
            commit_weight: args.commit_weight,
            additions_weight: args.additions_weight,
            deletions_weight: args.deletions_weight,
            lines_per_commit_baseline: args.baseline,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank contributors by power score
    Rank {
        #[arg(long, short = 'p', value_enum, default_value_t = Period::All)]
        period: Period,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(long, help = "Show only the top N entries")]
        limit: Option<usize>,

        #[arg(long, help = "Rank records from a file written by `export --json` instead of fetching")]
        input: Option<PathBuf>,

        #[clap(flatten)]
        scoring: ScoringArgs,
    },
    /// Fetch, merge and backfill contributor records
    Export {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Score and classify a single set of totals
    Score {
        #[arg(long, default_value_t = 0)]
        commits: u64,

        #[arg(long, default_value_t = 0)]
        additions: u64,

        #[arg(long, default_value_t = 0)]
        deletions: u64,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[clap(flatten)]
        scoring: ScoringArgs,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        init_tracing(self.common.verbose);

        match self.command {
            Commands::Rank { period, json, ndjson, limit, input, scoring } => {
                crate::board::exec(self.common, period, json, ndjson, limit, input, (&scoring).into())
            }
            Commands::Export { json, ndjson } => crate::export::exec(self.common, json, ndjson),
            Commands::Score { commits, additions, deletions, json, scoring } => {
                crate::board::exec_score(commits, additions, deletions, json, (&scoring).into())
            }
        }
    }
}

/// RUST_LOG wins when set; otherwise `--verbose` means debug and the default is warn.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
