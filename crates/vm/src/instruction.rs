//! Instruction set
//!
//! Five instructions, each validated when parsed:
//!
//! | opcode | operands                | effect |
//! |--------|-------------------------|--------|
//! | Move   | -                       | step one cell in direction `D mod 4` if free |
//! | Flag   | -                       | none; names the bot that wrote it |
//! | Copy   | `src dst`               | write the value of `src` into `dst` |
//! | Block  | `target`                | add one write-lock token to `target` |
//! | If     | `cond lineA lineB`      | run `lineA` if `cond` holds, else `lineB` |
//!
//! Every instruction carries a fingerprint of its opcode and operands. The
//! fingerprint keys the per-turn recursion guard and doubles as the token a
//! Block places.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::trace;

use crate::argument::{Reference, ReferenceKind, WriteOutcome};
use crate::condition::Condition;
use crate::context::{BotId, ExecutionContext, Value};
use crate::error::{ParseError, Result};

/// Instruction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Move,
    Flag,
    Copy,
    Block,
    If,
}

impl Opcode {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "Move" => Some(Opcode::Move),
            "Flag" => Some(Opcode::Flag),
            "Copy" => Some(Opcode::Copy),
            "Block" => Some(Opcode::Block),
            "If" => Some(Opcode::If),
            _ => None,
        }
    }

    /// Number of operands in source text
    pub fn arity(self) -> usize {
        match self {
            Opcode::Move | Opcode::Flag => 0,
            Opcode::Block => 1,
            Opcode::Copy => 2,
            Opcode::If => 3,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Opcode::Move => "Move",
            Opcode::Flag => "Flag",
            Opcode::Copy => "Copy",
            Opcode::Block => "Block",
            Opcode::If => "If",
        };
        f.write_str(word)
    }
}

/// Instruction payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    Move,
    Flag {
        /// Name of the bot whose source declared this flag
        name: String,
    },
    Copy {
        source: Reference,
        destination: Reference,
    },
    Block {
        target: Reference,
    },
    If {
        condition: Condition,
        then_line: Reference,
        else_line: Reference,
    },
}

/// An immutable, validated instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    operation: Operation,
    fingerprint: u64,
}

impl Instruction {
    fn new(operation: Operation) -> Self {
        let mut hasher = DefaultHasher::new();
        operation.hash(&mut hasher);
        Self {
            fingerprint: hasher.finish(),
            operation,
        }
    }

    pub fn movement() -> Self {
        Self::new(Operation::Move)
    }

    /// A flag declaring `name`; also the pad instruction for short programs
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(Operation::Flag { name: name.into() })
    }

    pub fn copy(source: &str, destination: &str) -> Result<Self> {
        let source = Reference::parse(source)?;
        let destination = Reference::parse(destination)?;
        if destination.kind() == ReferenceKind::Immediate {
            return Err(ParseError::operand_kind(format!(
                "Copy cannot write to immediate '{}'",
                destination
            )));
        }
        if source.is_line() != destination.is_line() {
            return Err(ParseError::operand_kind(format!(
                "Copy between line and non-line ('{}' -> '{}')",
                source, destination
            )));
        }
        Ok(Self::new(Operation::Copy {
            source,
            destination,
        }))
    }

    pub fn block(target: &str) -> Result<Self> {
        let target = Reference::parse(target)?;
        if target.kind() == ReferenceKind::Immediate {
            return Err(ParseError::operand_kind(format!(
                "Block cannot lock immediate '{}'",
                target
            )));
        }
        Ok(Self::new(Operation::Block { target }))
    }

    pub fn branch(condition: &str, then_line: &str, else_line: &str) -> Result<Self> {
        let condition = Condition::parse(condition)?;
        let then_line = Reference::parse(then_line)?;
        let else_line = Reference::parse(else_line)?;
        if !then_line.is_line() || !else_line.is_line() {
            return Err(ParseError::operand_kind(format!(
                "If branches must be lines, found '{}' and '{}'",
                then_line, else_line
            )));
        }
        Ok(Self::new(Operation::If {
            condition,
            then_line,
            else_line,
        }))
    }

    /// Build an instruction from a source line split into words.
    ///
    /// `owner` is the loading bot's name, baked into Flag.
    pub fn parse_line(words: &[&str], owner: &str) -> Result<Self> {
        let Some((word, operands)) = words.split_first() else {
            return Err(ParseError::unknown_opcode(""));
        };
        let opcode = Opcode::from_word(word).ok_or_else(|| ParseError::unknown_opcode(word))?;
        if operands.len() != opcode.arity() {
            return Err(ParseError::arity(word, opcode.arity(), operands.len()));
        }
        match (opcode, operands) {
            (Opcode::Move, []) => Ok(Self::movement()),
            (Opcode::Flag, []) => Ok(Self::flag(owner)),
            (Opcode::Copy, [source, destination]) => Self::copy(source, destination),
            (Opcode::Block, [target]) => Self::block(target),
            (Opcode::If, [condition, then_line, else_line]) => {
                Self::branch(condition, then_line, else_line)
            }
            _ => Err(ParseError::arity(word, opcode.arity(), operands.len())),
        }
    }

    pub fn opcode(&self) -> Opcode {
        match self.operation {
            Operation::Move => Opcode::Move,
            Operation::Flag { .. } => Opcode::Flag,
            Operation::Copy { .. } => Opcode::Copy,
            Operation::Block { .. } => Opcode::Block,
            Operation::If { .. } => Opcode::If,
        }
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn is_flag(&self) -> bool {
        matches!(self.operation, Operation::Flag { .. })
    }

    /// The name a Flag declares
    pub fn flag_name(&self) -> Option<&str> {
        match &self.operation {
            Operation::Flag { name } => Some(name),
            _ => None,
        }
    }

    /// Execute on behalf of `bot`.
    ///
    /// Skipped when the guard has already seen this fingerprint this turn.
    pub fn execute(&self, ctx: &mut dyn ExecutionContext, bot: BotId, guard: &mut TurnGuard) {
        if !guard.enter(self.fingerprint) {
            trace!(%bot, instruction = %self, "recursion guard skipped instruction");
            return;
        }

        match &self.operation {
            Operation::Move => {
                ctx.move_forward(bot);
            }
            Operation::Flag { .. } => {}
            Operation::Copy {
                source,
                destination,
            } => {
                let Some(value) = source.read(&*ctx, bot) else {
                    trace!(%bot, instruction = %self, "copy source unresolved");
                    return;
                };
                match destination.write(ctx, bot, value) {
                    WriteOutcome::Applied => {}
                    outcome => trace!(%bot, instruction = %self, ?outcome, "copy dropped"),
                }
            }
            Operation::Block { target } => {
                let Some(resolved) = target.resolve(&*ctx, bot) else {
                    return;
                };
                if let Some(key) = resolved.lock_key() {
                    ctx.add_lock(resolved.owner, key, self.fingerprint);
                }
            }
            Operation::If {
                condition,
                then_line,
                else_line,
            } => {
                let line = if condition.evaluate(&*ctx, bot) {
                    then_line
                } else {
                    else_line
                };
                if let Some(Value::Line(next)) = line.read(&*ctx, bot) {
                    next.execute(ctx, bot, guard);
                }
            }
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operation {
            Operation::Move | Operation::Flag { .. } => write!(f, "{}", self.opcode()),
            Operation::Copy {
                source,
                destination,
            } => write!(f, "Copy {} {}", source, destination),
            Operation::Block { target } => write!(f, "Block {}", target),
            Operation::If {
                condition,
                then_line,
                else_line,
            } => write!(f, "If {} {} {}", condition, then_line, else_line),
        }
    }
}

/// Instructions already invoked during one bot's turn
///
/// Created fresh for every turn and threaded through nested If execution,
/// so a chain of Ifs can visit each distinct instruction at most once.
#[derive(Debug, Default)]
pub struct TurnGuard {
    invoked: HashSet<u64>,
}

impl TurnGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fingerprint, returning false if it was already recorded
    pub fn enter(&mut self, fingerprint: u64) -> bool {
        self.invoked.insert(fingerprint)
    }

    /// Number of distinct instructions invoked so far
    pub fn len(&self) -> usize {
        self.invoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoked.is_empty()
    }
}
