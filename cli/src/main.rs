//! CLI entrypoint for house-game
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use house_application::{RunSeasonUseCase, SeasonParams};
use house_domain::OutputFormat;
use house_infrastructure::{
    ConfigLoader, FileConfig, JsonlSeasonLogger, SimulatedScoreProvider, seeded_rng,
};
use house_presentation::{
    Cli, ConsoleFormatter, ConsoleHumanDriver, ConsoleHumanPlayer, ConsolePresentation,
    OutputFormatter, ProgressReporter,
};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };
    config.validate().context("invalid configuration")?;

    let trace_log = cli.trace_log.clone().or(config.logging.trace_log.clone());
    let _guard = init_logging(cli.verbose, trace_log)?;

    info!("Starting house-game");

    if !config.output.color {
        colored::control::set_override(false);
    }

    let params = season_params(&cli, &config);
    let seed = params.seed.unwrap_or_else(rand::random);
    let params = params.with_seed(seed);
    info!("Season seed: {}", seed);

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping the season");
            ctrl_c.cancel();
        }
    });

    // === Dependency Injection ===
    let pace = params.pace;
    let mut use_case = RunSeasonUseCase::from_params(params, Box::new(seeded_rng(Some(seed))))?
        .with_score_provider(Arc::new(SimulatedScoreProvider::new()))
        .with_cancellation(cancel.clone());
    let roster = use_case.roster().clone();

    if !cli.quiet && config.output.narrate {
        let presentation = ConsolePresentation::new().with_pace(pace);
        if config.output.show_progress {
            let reporter = ProgressReporter::new();
            let presentation = presentation.with_printer(reporter.multi());
            use_case = use_case
                .with_presentation(Arc::new(presentation))
                .with_progress(Arc::new(reporter));
        } else {
            use_case = use_case.with_presentation(Arc::new(presentation));
        }
    }

    let season_log = cli.season_log.clone().or(config.logging.season_log.clone());
    if let Some(path) = season_log {
        match JsonlSeasonLogger::new(&path) {
            Some(logger) => {
                info!("Writing season log to {}", logger.path().display());
                use_case = use_case.with_logger(Arc::new(logger));
            }
            None => warn!("Season log disabled"),
        }
    }

    if roster.all().iter().any(|c| c.is_human) {
        let (player, events) = ConsoleHumanPlayer::channel();
        let driver = ConsoleHumanDriver::new(use_case.handle(), &roster);
        tokio::spawn(driver.run(events, cancel.child_token()));
        use_case = use_case.with_human_player(Arc::new(player));
    }

    let result = match use_case.run().await {
        Ok(result) => result,
        Err(e) if e.is_cancelled() => {
            eprintln!("Season cancelled.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    cancel.cancel();

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    println!("{}", ConsoleFormatter.format_as(format, &result, &roster));

    Ok(())
}

/// File config first, then command-line overrides
fn season_params(cli: &Cli, config: &FileConfig) -> SeasonParams {
    let mut params = config.to_season_params();
    if let Some(seed) = cli.seed {
        params = params.with_seed(seed);
    }
    if let Some(size) = cli.roster_size {
        params = params.with_roster_size(size);
    }
    if let Some(name) = &cli.play_as {
        params = params.with_human(name.clone());
    }
    if let Some(pace) = cli.pace {
        params = params.with_pace(pace);
    }
    if cli.fast {
        params = params
            .with_pace(0.0)
            .with_presentation_fallback(std::time::Duration::ZERO);
    }
    params
}

/// Stderr logging by verbosity, plus an optional non-blocking file copy
fn init_logging(verbose: u8, trace_log: Option<PathBuf>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match trace_log {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("cannot create trace log {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
