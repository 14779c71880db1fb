//! If conditions
//!
//! Three forms:
//! - `a==b` compares values (numbers numerically, lines by full instruction)
//! - `a=b` compares structure (lines by opcode, scalars by operand text)
//! - `a` tests a single reference for truthiness
//!
//! A side that fails to resolve makes the whole condition false.

use std::fmt;
use std::str::FromStr;

use crate::argument::{Reference, ReferenceKind, Target, Var};
use crate::context::{BotId, ExecutionContext, Value};
use crate::error::{ParseError, Result};

/// A parsed If condition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// `a==b`
    Equal(Reference, Reference),
    /// `a=b`
    Matches(Reference, Reference),
    /// `a`
    Truthy(Reference),
}

impl Condition {
    /// Parse a condition.
    pub fn parse(text: &str) -> Result<Self> {
        if text.contains("==") {
            let (left, right) = split_pair(text, "==")?;
            return Ok(Condition::Equal(left, right));
        }
        if text.contains('=') {
            let (left, right) = split_pair(text, "=")?;
            return Ok(Condition::Matches(left, right));
        }
        Reference::parse(text)
            .map(Condition::Truthy)
            .map_err(|e| ParseError::malformed_condition(text, &e.message))
    }

    /// Evaluate against the executing bot.
    pub fn evaluate(&self, ctx: &dyn ExecutionContext, bot: BotId) -> bool {
        match self {
            Condition::Equal(left, right) => {
                match (left.read(ctx, bot), right.read(ctx, bot)) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            Condition::Matches(left, right) => {
                match (left.read(ctx, bot), right.read(ctx, bot)) {
                    (Some(Value::Line(a)), Some(Value::Line(b))) => a.opcode() == b.opcode(),
                    (Some(Value::Number(_)), Some(Value::Number(_))) => left == right,
                    _ => false,
                }
            }
            Condition::Truthy(reference) => truthy(reference, ctx, bot),
        }
    }
}

fn split_pair(text: &str, separator: &str) -> Result<(Reference, Reference)> {
    let parts: Vec<&str> = text.split(separator).collect();
    let [left, right] = parts.as_slice() else {
        return Err(ParseError::malformed_condition(
            text,
            &format!("expected exactly one '{}'", separator),
        ));
    };
    let left = Reference::parse(left)
        .map_err(|e| ParseError::malformed_condition(text, &e.message))?;
    let right = Reference::parse(right)
        .map_err(|e| ParseError::malformed_condition(text, &e.message))?;
    if left.is_line() != right.is_line() {
        return Err(ParseError::operand_kind(format!(
            "condition '{}' compares a line with a non-line",
            text
        )));
    }
    Ok((left, right))
}

fn truthy(reference: &Reference, ctx: &dyn ExecutionContext, bot: BotId) -> bool {
    let Some(resolved) = reference.resolve(ctx, bot) else {
        return false;
    };
    match (reference.kind(), resolved.target) {
        (ReferenceKind::Line, Target::Line(index)) => ctx.line(resolved.owner, index).is_flag(),
        // E is the per-turn coin, D asks whether anyone is ahead
        (_, Target::Variable(Var::E)) => ctx.variable(resolved.owner, Var::E).rem_euclid(2) == 1,
        (_, Target::Variable(Var::D)) => ctx.opponent(resolved.owner).is_some(),
        (_, Target::Variable(var)) => ctx.variable(resolved.owner, var) != 0,
        (_, Target::Number(n)) => n != 0,
        (_, Target::Line(_)) => false,
    }
}

impl FromStr for Condition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Equal(left, right) => write!(f, "{}=={}", left, right),
            Condition::Matches(left, right) => write!(f, "{}={}", left, right),
            Condition::Truthy(reference) => write!(f, "{}", reference),
        }
    }
}
