//! Match orchestration.
//!
//! A match compiles every source once, then plays a number of independent
//! games. Each game gets fresh bots, a fresh placement and its own seed
//! drawn from the match random source. Declarations from every game are
//! summed into one [`ScoreTable`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use codebots_vm::{parse_program, Instruction, LoadError};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::MatchConfig;
use crate::error::{Error, Result};
use crate::score::{ScoreSink, ScoreTable};
use crate::world::World;

/// Bot source text as supplied by a loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSource {
    pub name: String,
    pub source: String,
}

impl BotSource {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// A compiled program, copied into every bot spawned from it
#[derive(Debug, Clone)]
pub struct Blueprint {
    name: String,
    program: Vec<Arc<Instruction>>,
}

impl Blueprint {
    pub fn compile(
        source: &BotSource,
        program_length: usize,
    ) -> std::result::Result<Self, LoadError> {
        Self::from_source(&source.name, &source.source, program_length)
    }

    pub fn from_source(
        name: &str,
        source: &str,
        program_length: usize,
    ) -> std::result::Result<Self, LoadError> {
        Ok(Self {
            name: name.to_string(),
            program: parse_program(name, source, program_length)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &[Arc<Instruction>] {
        &self.program
    }
}

/// Compile every source, stopping at the first that fails.
pub fn compile_sources(
    sources: &[BotSource],
    program_length: usize,
) -> std::result::Result<Vec<Blueprint>, LoadError> {
    sources
        .iter()
        .map(|source| Blueprint::compile(source, program_length))
        .collect()
}

/// Summary of a finished match.
#[derive(Debug, Clone)]
pub struct MatchReport {
    /// Declarations summed over every game
    pub scores: ScoreTable,
    /// Games played
    pub games: u64,
    /// Bots placed in each game (zero when no game was played)
    pub population: usize,
    /// Wall-clock time for the whole match
    pub elapsed: Duration,
}

/// Play one game and return what its bots declare at the end.
///
/// The table holds one declaration per bot that was placed.
pub fn play_game(
    blueprints: &[Blueprint],
    config: &MatchConfig,
    game: u64,
    rng: SmallRng,
) -> Result<ScoreTable> {
    config.validate()?;
    let mut world = World::populate(
        blueprints,
        config.copies_per_source,
        config.program_length,
        rng,
    );
    debug!(
        game,
        bots = world.len(),
        width = world.width(),
        height = world.height(),
        "game started"
    );

    for turn in 0..config.turns_per_game {
        if config.progress_interval > 0 && turn % config.progress_interval == 0 {
            info!(game, turn, "progress");
        }
        world.run_round();
    }

    Ok(world.declarations().collect())
}

/// Play `config.number_of_games` games and emit the summed scores to `sink`.
pub fn run_match(
    blueprints: &[Blueprint],
    config: &MatchConfig,
    sink: &mut dyn ScoreSink,
) -> Result<MatchReport> {
    config.validate()?;
    if blueprints.is_empty() {
        return Err(Error::EmptyPopulation {
            sources: 0,
            copies: config.copies_per_source,
        });
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = SmallRng::seed_from_u64(seed);
    info!(
        seed,
        sources = blueprints.len(),
        copies = config.copies_per_source,
        games = config.number_of_games,
        turns = config.turns_per_game,
        "match started"
    );

    let started = Instant::now();
    let mut scores = ScoreTable::new();
    let mut population = 0;
    for game in 0..config.number_of_games {
        let game_rng = SmallRng::seed_from_u64(rng.random());
        let result = play_game(blueprints, config, game, game_rng)?;
        debug!(game, declared = result.total(), "game finished");
        population = result.total() as usize;
        scores.merge(&result);
    }
    let elapsed = started.elapsed();

    scores.emit(sink);
    info!(elapsed_ms = elapsed.as_millis() as u64, "match complete");

    Ok(MatchReport {
        scores,
        games: config.number_of_games,
        population,
        elapsed,
    })
}
