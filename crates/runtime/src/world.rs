//! The grid world
//!
//! Owns every bot of one game, the occupancy map and the game's random
//! source, and implements [`ExecutionContext`] so instructions can reach
//! neighbours, variables and programs by coordinate.
//!
//! Opponents are never stored: each lookup re-reads the occupancy map, so a
//! bot that moved earlier in the round is seen at its new cell.

use std::collections::HashMap;
use std::sync::Arc;

use codebots_vm::{BotId, ExecutionContext, Instruction, LockKey, TurnGuard, Var};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace, warn};

use crate::bot::Bot;
use crate::runner::Blueprint;
use crate::score::Declaration;
use crate::types::Position;

/// Grid size for a population of `population` bots
///
/// `width = floor(sqrt(4n))`, `height = floor(4n / width) + 1`.
pub fn grid_dimensions(population: usize) -> (usize, usize) {
    let area = population * 4;
    let width = ((area as f64).sqrt() as usize).max(1);
    let height = area / width + 1;
    (width, height)
}

/// Cells that receive a bot at placement time
///
/// Staggered so every bot starts with free cells around it.
pub fn is_spawn_cell(position: Position) -> bool {
    let Position { x, y } = position;
    (x % 4 == 0 && y % 2 == 0) || (x % 4 == 2 && y % 2 == 1)
}

pub struct World {
    width: usize,
    height: usize,
    program_length: usize,
    bots: Vec<Bot>,
    occupancy: HashMap<Position, BotId>,
    rng: SmallRng,
}

impl World {
    /// Create an empty world.
    pub fn new(width: usize, height: usize, program_length: usize, rng: SmallRng) -> Self {
        Self {
            width,
            height,
            program_length,
            bots: Vec::new(),
            occupancy: HashMap::new(),
            rng,
        }
    }

    /// Create a world holding `copies` of every blueprint.
    ///
    /// The pool is shuffled, then spawn cells are filled in row-major order
    /// until the pool runs out.
    ///
    /// # Panics
    ///
    /// Panics if `program_length` is zero; [`play_game`](crate::play_game)
    /// validates the config before calling this.
    pub fn populate(
        blueprints: &[Blueprint],
        copies: usize,
        program_length: usize,
        mut rng: SmallRng,
    ) -> Self {
        let mut pool: Vec<&Blueprint> = Vec::with_capacity(blueprints.len() * copies);
        for _ in 0..copies {
            pool.extend(blueprints.iter());
        }
        pool.shuffle(&mut rng);

        let (width, height) = grid_dimensions(pool.len());
        let mut world = World::new(width, height, program_length, rng);

        'cells: for y in 0..height {
            for x in 0..width {
                let position = Position::new(x, y);
                if !is_spawn_cell(position) {
                    continue;
                }
                let Some(blueprint) = pool.pop() else {
                    break 'cells;
                };
                world.spawn(blueprint.name(), blueprint.program().to_vec(), position);
            }
        }

        if !pool.is_empty() {
            warn!(unplaced = pool.len(), width, height, "grid ran out of spawn cells");
        }
        debug!(bots = world.len(), width, height, "world populated");
        world
    }

    /// Place a bot with random D and E, returning `None` if the cell is taken.
    pub fn spawn(
        &mut self,
        name: &str,
        program: Vec<Arc<Instruction>>,
        position: Position,
    ) -> Option<BotId> {
        let length = self.program_length as i64;
        let direction = self.rng.random_range(0..length);
        let coin = self.rng.random_range(0..length);
        self.insert(Bot::new(name, program, position, direction, coin))
    }

    /// Place a fully built bot, returning `None` if its cell is taken.
    pub fn insert(&mut self, bot: Bot) -> Option<BotId> {
        let position = bot.position();
        if position.x >= self.width || position.y >= self.height {
            return None;
        }
        if self.occupancy.contains_key(&position) {
            return None;
        }
        let id = BotId(self.bots.len());
        self.occupancy.insert(position, id);
        self.bots.push(bot);
        Some(id)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }

    pub fn bots(&self) -> &[Bot] {
        &self.bots
    }

    pub fn bot(&self, id: BotId) -> &Bot {
        &self.bots[id.0]
    }

    pub fn bot_mut(&mut self, id: BotId) -> &mut Bot {
        &mut self.bots[id.0]
    }

    pub fn bot_at(&self, position: Position) -> Option<BotId> {
        self.occupancy.get(&position).copied()
    }

    /// The cell `id` faces
    pub fn facing(&self, id: BotId) -> Position {
        let bot = self.bot(id);
        bot.position()
            .step(bot.direction(), self.width, self.height)
    }

    /// Take one turn for `id`.
    ///
    /// Reseeds E, runs `program[C]` under a fresh recursion guard, then
    /// advances C (after the instruction, so a jump written into C lands on
    /// the line after its target).
    pub fn act(&mut self, id: BotId) {
        let length = self.program_length as i64;
        let coin = self.rng.random_range(0..length);
        self.bots[id.0].set_variable(Var::E, coin);

        let counter = self.bots[id.0].variable(Var::C).rem_euclid(length) as usize;
        let instruction = self.bots[id.0].line(counter);
        trace!(bot = %id, line = counter, %instruction, "act");

        let mut guard = TurnGuard::new();
        instruction.execute(self, id, &mut guard);

        let bot = &mut self.bots[id.0];
        let next = (bot.variable(Var::C) + 1).rem_euclid(length);
        bot.set_variable(Var::C, next);
    }

    /// Give every bot one turn, in id order.
    pub fn run_round(&mut self) {
        for index in 0..self.bots.len() {
            self.act(BotId(index));
        }
    }

    /// What every bot would declare if the game ended now
    pub fn declarations(&self) -> impl Iterator<Item = Declaration> + '_ {
        self.bots.iter().map(Bot::declare_flag)
    }
}

impl ExecutionContext for World {
    fn program_length(&self) -> usize {
        self.program_length
    }

    fn opponent(&self, bot: BotId) -> Option<BotId> {
        self.bot_at(self.facing(bot))
    }

    fn variable(&self, bot: BotId, var: Var) -> i64 {
        self.bots[bot.0].variable(var)
    }

    fn set_variable(&mut self, bot: BotId, var: Var, value: i64) {
        self.bots[bot.0].set_variable(var, value);
    }

    fn line(&self, bot: BotId, index: usize) -> Arc<Instruction> {
        self.bots[bot.0].line(index)
    }

    fn set_line(&mut self, bot: BotId, index: usize, instruction: Arc<Instruction>) {
        self.bots[bot.0].set_line(index, instruction);
    }

    fn add_lock(&mut self, bot: BotId, key: LockKey, token: u64) {
        self.bots[bot.0].add_lock(key, token);
    }

    fn consume_lock(&mut self, bot: BotId, key: LockKey) -> bool {
        self.bots[bot.0].consume_lock(key)
    }

    fn move_forward(&mut self, bot: BotId) -> bool {
        let from = self.bots[bot.0].position();
        let to = self.facing(bot);
        if self.occupancy.contains_key(&to) {
            return false;
        }
        self.occupancy.remove(&from);
        self.occupancy.insert(to, bot);
        self.bots[bot.0].set_position(to);
        true
    }
}
