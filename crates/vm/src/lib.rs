//! CodeBots VM - Line-addressed bot instruction language
//!
//! Parses bot source into fixed-length programs and executes single
//! instructions against an [`ExecutionContext`] supplied by the runtime.
//! The VM never sees the grid: opponent lookup, variable storage and
//! movement are all reached through the context trait.

pub mod argument;
pub mod condition;
pub mod context;
pub mod error;
pub mod instruction;
pub mod program;

pub use argument::{
    Reference, ReferenceKind, Resolved, Target, Term, TermValue, Var, WriteOutcome,
};
pub use condition::Condition;
pub use context::{BotId, ExecutionContext, LockKey, Value};
pub use error::{LoadError, ParseError, ParseErrorKind, Result};
pub use instruction::{Instruction, Opcode, Operation, TurnGuard};
pub use program::parse_program;

#[cfg(test)]
mod testing;
