//! Integration test harness for CodeBots.
//!
//! This crate provides utilities for end-to-end testing of the full
//! pipeline: Source → Parse → Place → Execute turns → Declare → Score.

use codebots_runtime::{
    compile_sources, run_match, Blueprint, BotSource, Declaration, MatchConfig, Position,
    ScoreTable, World,
};
use codebots_vm::{parse_program, BotId, Var};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Test harness for driving a single world turn by turn.
pub struct TestHarness {
    world: World,
}

impl TestHarness {
    /// Create an empty world of the given size with a fixed seed.
    pub fn new(width: usize, height: usize, program_length: usize, seed: u64) -> Self {
        Self {
            world: World::new(
                width,
                height,
                program_length,
                SmallRng::seed_from_u64(seed),
            ),
        }
    }

    /// Create a world populated the way a match game is.
    ///
    /// # Panics
    ///
    /// Panics if any source fails to parse.
    pub fn populate(sources: &[(&str, &str)], config: &MatchConfig, seed: u64) -> Self {
        let blueprints = blueprints(sources, config.program_length);
        Self {
            world: World::populate(
                &blueprints,
                config.copies_per_source,
                config.program_length,
                SmallRng::seed_from_u64(seed),
            ),
        }
    }

    /// Place a bot facing `facing` (the value stored in D).
    ///
    /// # Panics
    ///
    /// Panics if the source fails to parse or the cell is taken.
    pub fn add_bot(&mut self, name: &str, source: &str, x: usize, y: usize, facing: i64) -> BotId {
        let length = codebots_vm::ExecutionContext::program_length(&self.world);
        let program = parse_program(name, source, length)
            .unwrap_or_else(|e| panic!("failed to parse {}: {}", name, e));
        let id = self
            .world
            .spawn(name, program, Position::new(x, y))
            .unwrap_or_else(|| panic!("cell ({}, {}) is not free", x, y));
        self.world.bot_mut(id).set_variable(Var::D, facing);
        id
    }

    /// Execute `n` full rounds.
    pub fn run_turns(&mut self, n: u64) {
        for _ in 0..n {
            self.world.run_round();
        }
    }

    /// Execute a single bot's turn.
    pub fn act(&mut self, id: BotId) {
        self.world.act(id);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn position(&self, id: BotId) -> Position {
        self.world.bot(id).position()
    }

    pub fn variable(&self, id: BotId, var: Var) -> i64 {
        self.world.bot(id).variable(var)
    }

    pub fn set_variable(&mut self, id: BotId, var: Var, value: i64) {
        self.world.bot_mut(id).set_variable(var, value);
    }

    /// What the bots would score if the game ended now
    pub fn scores(&self) -> ScoreTable {
        self.world.declarations().collect()
    }
}

/// Compile `(name, source)` pairs.
///
/// # Panics
///
/// Panics if any source fails to parse.
pub fn blueprints(sources: &[(&str, &str)], program_length: usize) -> Vec<Blueprint> {
    let sources: Vec<BotSource> = sources
        .iter()
        .map(|(name, source)| BotSource::new(*name, *source))
        .collect();
    compile_sources(&sources, program_length).unwrap_or_else(|e| panic!("{}", e))
}

/// Run a full match and return the scores in sink order.
///
/// # Panics
///
/// Panics if any source fails to parse or the match is rejected.
pub fn play(sources: &[(&str, &str)], config: &MatchConfig) -> Vec<(Declaration, u64)> {
    let blueprints = blueprints(sources, config.program_length);
    let mut sink = Vec::new();
    run_match(&blueprints, config, &mut sink).expect("match failed");
    sink
}
