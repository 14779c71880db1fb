//! Operand references
//!
//! An operand names a value, a variable or a program line, optionally on a
//! bot reached by following facing directions ("opponent hops").
//!
//! Grammar:
//!
//! ```text
//! operand := [ '*'* '#' ] term ( '+' term )*
//! term    := '*'* ( integer | 'A' | 'B' | 'C' | 'D' | 'E' )
//! ```
//!
//! - A `#` marks a line reference; the stars before it are hops taken from
//!   the term owner before indexing its program.
//! - Stars before a term are hops taken from the executing bot before the
//!   term's variable is read. Stars on an integer are accepted and ignored.
//! - Without `#`, an operand with `+` or any integer term is immediate;
//!   a lone variable term is a variable reference.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::context::{BotId, ExecutionContext, LockKey, Value};
use crate::error::{ParseError, Result};

/// Bot variable names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Var {
    /// General purpose
    A,
    /// General purpose
    B,
    /// Program counter
    C,
    /// Facing direction
    D,
    /// Reseeded to a random line index every turn
    E,
}

impl Var {
    /// All variables in storage order
    pub const ALL: [Var; 5] = [Var::A, Var::B, Var::C, Var::D, Var::E];

    /// Storage slot of this variable
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Var::A),
            'B' => Some(Var::B),
            'C' => Some(Var::C),
            'D' => Some(Var::D),
            'E' => Some(Var::E),
            _ => None,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Var::A => "A",
            Var::B => "B",
            Var::C => "C",
            Var::D => "D",
            Var::E => "E",
        };
        f.write_str(name)
    }
}

/// What an operand addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// A number computed from the terms
    Immediate,
    /// A single variable on the owning bot
    Variable,
    /// A program line on the owning bot
    Line,
}

/// The payload of one term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermValue {
    Literal(i64),
    Variable(Var),
}

/// One `+`-separated term of an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Term {
    pub value: TermValue,
    /// Opponent hops taken from the executing bot before reading
    pub hops: usize,
}

impl Term {
    fn evaluate(&self, ctx: &dyn ExecutionContext, owner: BotId, length: i64) -> i64 {
        match self.value {
            TermValue::Literal(n) => n.rem_euclid(length),
            TermValue::Variable(var) => ctx.variable(owner, var).rem_euclid(length),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            TermValue::Literal(n) => write!(f, "{}", n),
            TermValue::Variable(var) => write!(f, "{}{}", "*".repeat(self.hops), var),
        }
    }
}

/// A parsed operand
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    kind: ReferenceKind,
    line_hops: usize,
    terms: Vec<Term>,
}

/// Where a resolved reference points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A plain number (already reduced modulo the program length)
    Number(i64),
    /// A variable on the owner
    Variable(Var),
    /// A program line on the owner
    Line(usize),
}

/// A reference resolved against the current grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub owner: BotId,
    pub target: Target,
}

impl Resolved {
    /// The lock slot a write to this target must check
    pub fn lock_key(&self) -> Option<LockKey> {
        match self.target {
            Target::Number(_) => None,
            Target::Variable(var) => Some(LockKey::Variable(var)),
            Target::Line(index) => Some(LockKey::Line(index)),
        }
    }
}

/// Result of a write attempt
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value was stored
    Applied,
    /// A lock token was consumed instead of writing
    Blocked,
    /// An opponent hop found no bot
    Unresolved,
    /// The target is a plain number
    NotWritable,
    /// A line was written to a variable or a number to a line
    KindMismatch,
}

impl Reference {
    /// Parse an operand.
    pub fn parse(text: &str) -> Result<Self> {
        let sections: Vec<&str> = text.split('#').collect();
        let (kind, line_hops, body) = match sections.as_slice() {
            [body] => (None, 0, *body),
            [prefix, body] => {
                if !prefix.chars().all(|c| c == '*') {
                    return Err(ParseError::malformed_operand(
                        text,
                        "only '*' may precede '#'",
                    ));
                }
                (Some(ReferenceKind::Line), prefix.len(), *body)
            }
            _ => {
                return Err(ParseError::malformed_operand(text, "more than one '#'"));
            }
        };

        let mut terms = Vec::new();
        let mut has_literal = false;
        for part in body.split('+') {
            let stripped = part.trim_start_matches('*');
            let hops = part.len() - stripped.len();
            if stripped.contains('*') {
                return Err(ParseError::malformed_operand(
                    text,
                    "'*' may only prefix a term",
                ));
            }
            if let Ok(n) = stripped.parse::<i64>() {
                has_literal = true;
                terms.push(Term {
                    value: TermValue::Literal(n),
                    hops: 0,
                });
                continue;
            }
            let mut chars = stripped.chars();
            let var = match (chars.next(), chars.next()) {
                (Some(c), None) => Var::from_char(c),
                _ => None,
            };
            match var {
                Some(var) => terms.push(Term {
                    value: TermValue::Variable(var),
                    hops,
                }),
                None => {
                    return Err(ParseError::malformed_operand(
                        text,
                        &format!("'{}' is neither a number nor a variable A-E", stripped),
                    ));
                }
            }
        }
        if terms.is_empty() {
            return Err(ParseError::malformed_operand(text, "no terms"));
        }

        let kind = kind.unwrap_or(if terms.len() > 1 || has_literal {
            ReferenceKind::Immediate
        } else {
            ReferenceKind::Variable
        });

        Ok(Self {
            kind,
            line_hops,
            terms,
        })
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn is_line(&self) -> bool {
        self.kind == ReferenceKind::Line
    }

    /// Hops taken from the term owner before indexing its program
    pub fn line_hops(&self) -> usize {
        self.line_hops
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// The variable named by a single-term reference
    pub fn variable_name(&self) -> Option<Var> {
        match self.terms.as_slice() {
            [Term {
                value: TermValue::Variable(var),
                ..
            }] => Some(*var),
            _ => None,
        }
    }

    /// Resolve to an owning bot and a target.
    ///
    /// Returns `None` when any opponent hop finds an empty cell.
    pub fn resolve(&self, ctx: &dyn ExecutionContext, bot: BotId) -> Option<Resolved> {
        let length = ctx.program_length() as i64;

        let (owner, target) = match self.terms.as_slice() {
            [term] => {
                let owner = ctx.step(bot, term.hops)?;
                let target = match term.value {
                    TermValue::Literal(n) => Target::Number(n.rem_euclid(length)),
                    TermValue::Variable(var) => Target::Variable(var),
                };
                (owner, target)
            }
            terms => {
                // Every term steps from the executing bot; the first owner is nominal.
                let mut nominal = None;
                let mut sum = 0;
                for term in terms {
                    let owner = ctx.step(bot, term.hops)?;
                    nominal.get_or_insert(owner);
                    sum = (sum + term.evaluate(ctx, owner, length)) % length;
                }
                (nominal?, Target::Number(sum))
            }
        };

        match self.kind {
            ReferenceKind::Line => {
                let index = match target {
                    Target::Number(n) => n,
                    Target::Variable(var) => ctx.variable(owner, var).rem_euclid(length),
                    Target::Line(index) => index as i64,
                };
                let owner = ctx.step(owner, self.line_hops)?;
                Some(Resolved {
                    owner,
                    target: Target::Line(index as usize),
                })
            }
            ReferenceKind::Immediate | ReferenceKind::Variable => Some(Resolved { owner, target }),
        }
    }

    /// Read the referenced value.
    pub fn read(&self, ctx: &dyn ExecutionContext, bot: BotId) -> Option<Value> {
        let resolved = self.resolve(ctx, bot)?;
        let length = ctx.program_length() as i64;
        let value = match resolved.target {
            Target::Number(n) => Value::Number(n),
            Target::Variable(var) => {
                Value::Number(ctx.variable(resolved.owner, var).rem_euclid(length))
            }
            Target::Line(index) => Value::Line(ctx.line(resolved.owner, index)),
        };
        Some(value)
    }

    /// Write a value through this reference.
    ///
    /// A held lock token on the target is consumed and the write dropped.
    pub fn write(&self, ctx: &mut dyn ExecutionContext, bot: BotId, value: Value) -> WriteOutcome {
        let Some(resolved) = self.resolve(&*ctx, bot) else {
            trace!(%bot, operand = %self, "write target unresolved");
            return WriteOutcome::Unresolved;
        };
        let Some(key) = resolved.lock_key() else {
            return WriteOutcome::NotWritable;
        };
        let matching = matches!(
            (key, &value),
            (LockKey::Variable(_), Value::Number(_)) | (LockKey::Line(_), Value::Line(_))
        );
        if !matching {
            return WriteOutcome::KindMismatch;
        }

        if ctx.consume_lock(resolved.owner, key) {
            trace!(%bot, owner = %resolved.owner, %key, "write blocked by lock");
            return WriteOutcome::Blocked;
        }

        match (key, value) {
            (LockKey::Variable(var), Value::Number(n)) => ctx.set_variable(resolved.owner, var, n),
            (LockKey::Line(index), Value::Line(instruction)) => {
                ctx.set_line(resolved.owner, index, instruction)
            }
            _ => return WriteOutcome::KindMismatch,
        }
        WriteOutcome::Applied
    }
}

impl FromStr for Reference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == ReferenceKind::Line {
            write!(f, "{}#", "*".repeat(self.line_hops))?;
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}
