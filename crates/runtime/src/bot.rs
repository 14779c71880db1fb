//! Bot state
//!
//! A bot is its variables, its program, its position and the write-lock
//! tokens others (or itself) have placed on it. Bots live for one game.

use std::collections::HashMap;
use std::sync::Arc;

use codebots_vm::{Instruction, LockKey, Var};
use indexmap::IndexMap;

use crate::score::Declaration;
use crate::types::{Direction, Position};

#[derive(Debug, Clone)]
pub struct Bot {
    name: String,
    variables: [i64; 5],
    position: Position,
    program: Vec<Arc<Instruction>>,
    locks: HashMap<LockKey, Vec<u64>>,
}

impl Bot {
    /// Create a bot with A, B and C zeroed and the given D and E.
    pub fn new(
        name: impl Into<String>,
        program: Vec<Arc<Instruction>>,
        position: Position,
        direction: i64,
        coin: i64,
    ) -> Self {
        let mut variables = [0; 5];
        variables[Var::D.index()] = direction;
        variables[Var::E.index()] = coin;
        Self {
            name: name.into(),
            variables,
            position,
            program,
            locks: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn variable(&self, var: Var) -> i64 {
        self.variables[var.index()]
    }

    pub fn set_variable(&mut self, var: Var, value: i64) {
        self.variables[var.index()] = value;
    }

    pub fn direction(&self) -> Direction {
        Direction::from_variable(self.variable(Var::D))
    }

    pub fn program(&self) -> &[Arc<Instruction>] {
        &self.program
    }

    pub fn line(&self, index: usize) -> Arc<Instruction> {
        self.program[index % self.program.len()].clone()
    }

    pub fn set_line(&mut self, index: usize, instruction: Arc<Instruction>) {
        let length = self.program.len();
        self.program[index % length] = instruction;
    }

    pub fn add_lock(&mut self, key: LockKey, token: u64) {
        self.locks.entry(key).or_default().push(token);
    }

    /// Pop one lock token for `key`, returning whether one was held
    pub fn consume_lock(&mut self, key: LockKey) -> bool {
        self.locks
            .get_mut(&key)
            .and_then(|tokens| tokens.pop())
            .is_some()
    }

    /// Tokens currently held for `key`
    pub fn lock_count(&self, key: LockKey) -> usize {
        self.locks.get(&key).map_or(0, Vec::len)
    }

    /// The flag this bot declares at the end of a game.
    ///
    /// The most frequent Flag name in the program wins; a tie for the top
    /// count, or a program with no flags left, declares [`Declaration::Tie`].
    pub fn declare_flag(&self) -> Declaration {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for name in self.program.iter().filter_map(|i| i.flag_name()) {
            *counts.entry(name).or_insert(0) += 1;
        }

        let mut best: Option<(&str, usize)> = None;
        let mut tied = false;
        for (name, count) in counts {
            match best {
                Some((_, top)) if count < top => {}
                Some((_, top)) if count == top => tied = true,
                _ => {
                    best = Some((name, count));
                    tied = false;
                }
            }
        }

        match best {
            Some((name, _)) if !tied => Declaration::Flag(name.to_string()),
            _ => Declaration::Tie,
        }
    }
}
