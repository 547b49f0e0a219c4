//! CLI flag definitions

use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use crate::config::Config;

/// rv - cigarette smokers rendezvous
#[derive(Debug, Parser)]
#[command(
    name = "rv",
    about = "Supplier, broker and three consumers meeting over rendezvous channels",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Milliseconds to run before cancelling every actor
    #[arg(long, value_name = "MS")]
    pub run_for_ms: Option<u64>,

    /// Milliseconds the coordinator waits between rounds
    #[arg(long, value_name = "MS")]
    pub pacing_delay_ms: Option<u64>,

    /// Fixed seed for the supplier's random pairs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many completed rounds
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<u64>,
}

impl Cli {
    /// Flags given on the command line win over the config file
    pub fn apply_overrides(&self, config: &mut Config) {
        debug!(?self, "Cli::apply_overrides: called");
        if let Some(ms) = self.run_for_ms {
            config.run_for_ms = ms;
        }
        if let Some(ms) = self.pacing_delay_ms {
            config.pacing_delay_ms = ms;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(rounds) = self.max_rounds {
            config.max_rounds = Some(rounds);
        }
        if let Some(level) = &self.log_level {
            config.log_level = Some(level.clone());
        }
    }
}
