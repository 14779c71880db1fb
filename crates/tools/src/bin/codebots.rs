//! CodeBots match runner
//!
//! Loads every bot in a directory, plays a match, and prints the scores.
//!
//! Usage: `codebots <bots-dir> [--config FILE] [--lines N] [--copies N]
//! [--turns N] [--games N] [--seed N] [--skip-invalid]`

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info, warn};

use codebots_runtime::{run_match, Blueprint, Declaration, MatchConfig, ScoreSink};
use codebots_tools::sources::load_sources;

#[derive(Parser, Debug)]
#[command(name = "codebots")]
#[command(about = "Run a CodeBots match over every bot in a directory")]
struct Args {
    /// Directory holding one source file per bot
    bots: PathBuf,

    /// Match config YAML; command-line values override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Instructions per program
    #[arg(long)]
    lines: Option<usize>,

    /// Copies of each bot placed per game
    #[arg(long)]
    copies: Option<usize>,

    /// Turns per game
    #[arg(long)]
    turns: Option<u64>,

    /// Number of games
    #[arg(long)]
    games: Option<u64>,

    /// Seed for a reproducible match
    #[arg(long)]
    seed: Option<u64>,

    /// Skip bots that fail to parse instead of aborting
    #[arg(long)]
    skip_invalid: bool,
}

/// Prints scores in the classic scoreboard format
struct ConsoleSink;

impl ScoreSink for ConsoleSink {
    fn emit(&mut self, declaration: &Declaration, score: u64) {
        match declaration {
            Declaration::Flag(name) => println!("> {} had {} points\n", name, score),
            Declaration::Tie => println!("> There were {} bots with equal flags\n", score),
        }
    }
}

fn main() {
    codebots_tools::init_logging();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match MatchConfig::load(path) {
            Ok(c) => {
                info!("Loaded config: {}", path.display());
                c
            }
            Err(e) => {
                error!("Failed to load config '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => MatchConfig::default(),
    };
    if let Some(lines) = args.lines {
        config.program_length = lines;
    }
    if let Some(copies) = args.copies {
        config.copies_per_source = copies;
    }
    if let Some(turns) = args.turns {
        config.turns_per_game = turns;
    }
    if let Some(games) = args.games {
        config.number_of_games = games;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Err(e) = config.validate() {
        error!("{}", e);
        process::exit(1);
    }

    info!("Loading bots from: {}", args.bots.display());
    let sources = match load_sources(&args.bots) {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let mut blueprints = Vec::with_capacity(sources.len());
    for source in &sources {
        match Blueprint::compile(source, config.program_length) {
            Ok(blueprint) => blueprints.push(blueprint),
            Err(e) if args.skip_invalid => warn!("Skipping bot: {}", e),
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        }
    }
    info!("  Bots: {}", blueprints.len());
    info!("  Copies: {}", config.copies_per_source);
    info!("  Games: {}", config.number_of_games);
    info!("  Turns: {}", config.turns_per_game);

    let report = match run_match(&blueprints, &config, &mut ConsoleSink) {
        Ok(report) => report,
        Err(e) => {
            error!("Match failed: {}", e);
            process::exit(1);
        }
    };

    info!(
        "Execution took {:.3} seconds",
        report.elapsed.as_secs_f64()
    );
}
