//! Execution context
//!
//! The surface the VM executes against. The runtime's world implements it;
//! tests implement it over a hand-built line of bots.

use std::fmt;
use std::sync::Arc;

use crate::argument::Var;
use crate::instruction::Instruction;

/// Stable handle to a bot within one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BotId(pub usize);

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bot#{}", self.0)
    }
}

/// A value read through a reference
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A scalar, already reduced modulo the program length
    Number(i64),
    /// A program line
    Line(Arc<Instruction>),
}

impl Value {
    pub fn as_line(&self) -> Option<&Arc<Instruction>> {
        match self {
            Value::Line(instruction) => Some(instruction),
            Value::Number(_) => None,
        }
    }
}

/// What a write-lock protects on its owning bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKey {
    /// One of the bot's variables
    Variable(Var),
    /// One of the bot's program lines
    Line(usize),
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockKey::Variable(var) => write!(f, "{}", var),
            LockKey::Line(index) => write!(f, "#{}", index),
        }
    }
}

/// Execution context providing bot state and grid access
pub trait ExecutionContext {
    /// Number of instructions in every program
    fn program_length(&self) -> usize;

    /// The bot occupying the cell `bot` faces, if any
    fn opponent(&self, bot: BotId) -> Option<BotId>;

    /// Raw value of a variable
    fn variable(&self, bot: BotId, var: Var) -> i64;

    /// Assign a variable
    fn set_variable(&mut self, bot: BotId, var: Var, value: i64);

    /// Instruction at a program line (index is taken modulo the program length)
    fn line(&self, bot: BotId, index: usize) -> Arc<Instruction>;

    /// Replace a program line (index is taken modulo the program length)
    fn set_line(&mut self, bot: BotId, index: usize, instruction: Arc<Instruction>);

    /// Add one write-lock token
    fn add_lock(&mut self, bot: BotId, key: LockKey, token: u64);

    /// Consume one write-lock token, returning whether one was held
    fn consume_lock(&mut self, bot: BotId, key: LockKey) -> bool;

    /// Move one cell in the facing direction, returning whether the bot moved
    fn move_forward(&mut self, bot: BotId) -> bool;

    /// Step through `hops` opponents starting at `bot`
    ///
    /// Each hop follows the facing direction of the bot reached so far.
    fn step(&self, bot: BotId, hops: usize) -> Option<BotId> {
        let mut current = bot;
        for _ in 0..hops {
            current = self.opponent(current)?;
        }
        Some(current)
    }
}
