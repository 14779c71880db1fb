//! Hand-wired execution context for unit tests.
//!
//! Bots do not live on a grid here; each one faces an explicitly chosen
//! other bot (or nobody).

use std::collections::HashMap;
use std::sync::Arc;

use crate::argument::Var;
use crate::context::{BotId, ExecutionContext, LockKey};
use crate::instruction::Instruction;

pub(crate) struct MockBot {
    pub vars: [i64; 5],
    pub program: Vec<Arc<Instruction>>,
    pub locks: HashMap<LockKey, Vec<u64>>,
    pub facing: Option<BotId>,
    pub moves: usize,
}

pub(crate) struct MockContext {
    pub length: usize,
    pub bots: Vec<MockBot>,
}

impl MockContext {
    /// One bot per name, each program all Flags of its own name
    pub fn new(length: usize, names: &[&str]) -> Self {
        let bots = names
            .iter()
            .map(|name| MockBot {
                vars: [0; 5],
                program: vec![Arc::new(Instruction::flag(*name)); length],
                locks: HashMap::new(),
                facing: None,
                moves: 0,
            })
            .collect();
        Self { length, bots }
    }

    pub fn face(&mut self, from: usize, to: usize) {
        self.bots[from].facing = Some(BotId(to));
    }

    pub fn set(&mut self, bot: usize, var: Var, value: i64) {
        self.bots[bot].vars[var.index()] = value;
    }

    pub fn get(&self, bot: usize, var: Var) -> i64 {
        self.bots[bot].vars[var.index()]
    }
}

impl ExecutionContext for MockContext {
    fn program_length(&self) -> usize {
        self.length
    }

    fn opponent(&self, bot: BotId) -> Option<BotId> {
        self.bots[bot.0].facing
    }

    fn variable(&self, bot: BotId, var: Var) -> i64 {
        self.bots[bot.0].vars[var.index()]
    }

    fn set_variable(&mut self, bot: BotId, var: Var, value: i64) {
        self.bots[bot.0].vars[var.index()] = value;
    }

    fn line(&self, bot: BotId, index: usize) -> Arc<Instruction> {
        self.bots[bot.0].program[index % self.length].clone()
    }

    fn set_line(&mut self, bot: BotId, index: usize, instruction: Arc<Instruction>) {
        let length = self.length;
        self.bots[bot.0].program[index % length] = instruction;
    }

    fn add_lock(&mut self, bot: BotId, key: LockKey, token: u64) {
        self.bots[bot.0].locks.entry(key).or_default().push(token);
    }

    fn consume_lock(&mut self, bot: BotId, key: LockKey) -> bool {
        self.bots[bot.0]
            .locks
            .get_mut(&key)
            .and_then(|tokens| tokens.pop())
            .is_some()
    }

    fn move_forward(&mut self, bot: BotId) -> bool {
        self.bots[bot.0].moves += 1;
        true
    }
}
