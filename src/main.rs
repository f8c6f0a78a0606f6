use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use scrim_stats::calculate::{self, XFactorScorer};
use scrim_stats::config::{AppConfig, ConfigOverrides};
use scrim_stats::ingest::{self, IngestPolicy, ParsedMap};
use scrim_stats::models::PlayerStatRow;

#[derive(Parser)]
#[command(name = "scrim-stats")]
#[command(about = "Overwatch scrim log analytics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Skip invalid records instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate logs and print an ingestion report per file
    Validate {
        /// Exported log files
        #[arg(required = true)]
        logs: Vec<PathBuf>,
    },

    /// Segment a map's kills into fights
    Fights {
        log: PathBuf,

        /// Only kills scored or suffered by this player
        #[arg(long)]
        player: Option<String>,

        /// Gap between kills that closes a fight, in seconds
        #[arg(long)]
        gap: Option<f64>,
    },

    /// Ultimate charge and hold times for a player
    Ultimates {
        log: PathBuf,

        #[arg(long)]
        player: String,
    },

    /// Hero-versus-hero duels for a player
    Duels {
        log: PathBuf,

        #[arg(long)]
        player: String,
    },

    /// X-Factor score for a player on one map
    Xfactor {
        log: PathBuf,

        #[arg(long)]
        player: String,

        #[arg(long)]
        gap: Option<f64>,
    },

    /// Composite SR leaderboard for a hero across many maps
    Leaderboard {
        #[arg(required = true)]
        logs: Vec<PathBuf>,

        #[arg(long)]
        hero: String,

        /// Show a single player's row instead of the full board
        #[arg(long)]
        player: Option<String>,

        #[arg(long)]
        min_maps: Option<u32>,

        #[arg(long)]
        min_time: Option<f64>,

        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        AppConfig::from_file(&cli.config)
            .with_context(|| format!("Failed to load config from {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };
    config
        .apply_overrides(&overrides(&cli))
        .context("Invalid command-line settings")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let fmt_layer = if cli.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    tracing::debug!("Starting scrim-stats v{}", env!("CARGO_PKG_VERSION"));

    let policy = if cli.skip_invalid {
        IngestPolicy::Skip
    } else {
        IngestPolicy::Abort
    };

    match cli.command {
        Commands::Validate { logs } => {
            let mut failed = 0;
            for path in &logs {
                match ingest::ingest_file(path, policy) {
                    Ok(parsed) => print_json(&ValidateOutput {
                        file: path.display().to_string(),
                        map_id: parsed.map_id.to_string(),
                        report: Some(parsed.report),
                        error: None,
                    })?,
                    Err(e) => {
                        failed += 1;
                        print_json(&ValidateOutput {
                            file: path.display().to_string(),
                            map_id: String::new(),
                            report: None,
                            error: Some(e.to_string()),
                        })?
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{} of {} logs failed validation", failed, logs.len());
            }
        }

        Commands::Fights { log, player, .. } => {
            let parsed = load(&log, policy)?;
            let gap = config.analytics.fight_gap_seconds;
            let fights = match &player {
                Some(player) => calculate::player_fights(&parsed.stream, player, gap),
                None => calculate::map_fights(&parsed.stream, gap),
            };
            print_json(&FightsOutput {
                map_id: parsed.map_id.to_string(),
                gap_seconds: gap,
                record: calculate::fight_record(&fights),
                fights,
            })?;
        }

        Commands::Ultimates { log, player } => {
            let parsed = load(&log, policy)?;
            print_json(&calculate::ultimate_timing(&parsed.stream, &player))?;
        }

        Commands::Duels { log, player } => {
            let parsed = load(&log, policy)?;
            let duels = calculate::player_duels(&parsed.stream, &player);
            print_json(&DuelsOutput {
                player_name: player,
                average_win_rate: calculate::average_duel_win_rate(&duels).ok(),
                duels,
            })?;
        }

        Commands::Xfactor { log, player, .. } => {
            let parsed = load(&log, policy)?;
            let scorer = XFactorScorer::new(config.analytics.fight_gap_seconds);
            let xfactor = scorer
                .score(&parsed.stream, &player)
                .with_context(|| format!("Cannot score {} on {}", player, log.display()))?;
            print_json(&xfactor)?;
        }

        Commands::Leaderboard { logs, hero, player, .. } => {
            let options = config.leaderboard_options();

            let mut rows: Vec<PlayerStatRow> = Vec::new();
            for path in &logs {
                rows.extend(load(path, policy)?.stat_rows);
            }
            tracing::info!("Loaded {} stat rows from {} logs", rows.len(), logs.len());

            match player {
                Some(player) => {
                    let row = calculate::lookup(&rows, &hero, &player, &options)
                        .with_context(|| format!("No {} rating for {}", hero, player))?;
                    print_json(&row)?;
                }
                None => {
                    let board = calculate::leaderboard(&rows, &hero, &options)
                        .with_context(|| format!("Cannot build {} leaderboard", hero))?;
                    print_json(&board)?;
                }
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct ValidateOutput {
    file: String,
    map_id: String,
    report: Option<ingest::IngestReport>,
    error: Option<String>,
}

#[derive(Serialize)]
struct FightsOutput {
    map_id: String,
    gap_seconds: f64,
    record: std::collections::BTreeMap<String, usize>,
    fights: Vec<scrim_stats::models::Fight>,
}

#[derive(Serialize)]
struct DuelsOutput {
    player_name: String,
    average_win_rate: Option<f64>,
    duels: Vec<scrim_stats::models::Duel>,
}

/// Flags that replace configuration values for this run.
fn overrides(cli: &Cli) -> ConfigOverrides {
    let mut overrides = ConfigOverrides {
        log_level: cli.log_level.clone(),
        ..ConfigOverrides::default()
    };
    match &cli.command {
        Commands::Fights { gap, .. } | Commands::Xfactor { gap, .. } => {
            overrides.fight_gap_seconds = *gap;
        }
        Commands::Leaderboard {
            min_maps,
            min_time,
            limit,
            ..
        } => {
            overrides.min_maps = *min_maps;
            overrides.min_time_seconds = *min_time;
            overrides.limit = *limit;
        }
        Commands::Validate { .. } | Commands::Ultimates { .. } | Commands::Duels { .. } => {}
    }
    overrides
}

fn load(path: &Path, policy: IngestPolicy) -> Result<ParsedMap> {
    ingest::ingest_file(path, policy)
        .with_context(|| format!("Failed to ingest {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
