//! CLI command definitions

use clap::{Parser, ValueEnum};
use house_domain::OutputFormat as DomainOutputFormat;
use std::path::PathBuf;

/// Format of the season summary printed after the finale
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Winner, final vote and eviction order
    Summary,
    /// Week-by-week record of the whole season
    Full,
    /// JSON output
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Summary => DomainOutputFormat::Summary,
            OutputFormat::Full => DomainOutputFormat::Full,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// CLI arguments for house-game
#[derive(Parser, Debug)]
#[command(name = "house-game")]
#[command(author, version, about = "Run a season of a house elimination game")]
#[command(long_about = r#"
Runs one season of a house elimination game: competitors compete for power,
nominate each other, vote each other out, and a jury of evictees crowns the
winner.

Each week has four phases:
1. Power competition: the winner becomes power-holder
2. Nominations: the power-holder puts two houseguests on the block
3. Veto: the veto winner may save a nominee
4. Eviction: the house votes one nominee out

Configuration files are loaded from (in priority order):
1. HOUSE_* environment variables (HOUSE_SEASON__SEED=7)
2. --config <path>     Explicit config file
3. ./house.toml        Project-level config
4. ~/.config/house-game/config.toml   Global config

Example:
  house-game --seed 42
  house-game --play-as Ada --roster-size 10
  house-game --fast -o json
"#)]
pub struct Cli {
    /// Seed for a reproducible season
    #[arg(short, long, value_name = "N")]
    pub seed: Option<u64>,

    /// Number of competitors
    #[arg(short = 'n', long, value_name = "N")]
    pub roster_size: Option<usize>,

    /// Play as this competitor (added to the cast if not already named)
    #[arg(short = 'p', long, value_name = "NAME")]
    pub play_as: Option<String>,

    /// Multiplier applied to every phase duration
    #[arg(long, value_name = "X")]
    pub pace: Option<f64>,

    /// Skip all waiting: no narration delays, instant phases
    #[arg(long)]
    pub fast: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress narration and progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write the season transcript as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub season_log: Option<PathBuf>,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "PATH")]
    pub trace_log: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["house-game"]);
        assert!(cli.seed.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.fast);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_full_flags() {
        let cli = Cli::parse_from([
            "house-game",
            "--seed",
            "42",
            "-n",
            "10",
            "--play-as",
            "Ada",
            "--fast",
            "-o",
            "json",
            "-vv",
            "--season-log",
            "season.jsonl",
        ]);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.roster_size, Some(10));
        assert_eq!(cli.play_as.as_deref(), Some("Ada"));
        assert!(cli.fast);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.season_log, Some(PathBuf::from("season.jsonl")));
    }

    #[test]
    fn test_output_format_into_domain() {
        assert_eq!(
            DomainOutputFormat::from(OutputFormat::Full),
            DomainOutputFormat::Full
        );
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
