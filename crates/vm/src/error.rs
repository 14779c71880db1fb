//! Parse and load errors
//!
//! Runtime resolution failures are not errors: a broken opponent chain or a
//! locked write target is expressed as `None` or a [`WriteOutcome`] inside
//! the VM. Only source parsing can fail.
//!
//! [`WriteOutcome`]: crate::argument::WriteOutcome

use thiserror::Error;

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse error with a category and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Kind of parse error
    pub kind: ParseErrorKind,
    /// Human-readable error message
    pub message: String,
}

/// Category of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Operand text is not a valid reference
    MalformedOperand,
    /// Condition text is not a valid condition
    MalformedCondition,
    /// Operand is well formed but has the wrong kind for its position
    OperandKind,
    /// Wrong number of operands for the opcode
    Arity,
    /// First token does not name an instruction
    UnknownOpcode,
    /// Source holds more instructions than the program length
    ProgramTooLong,
}

impl ParseError {
    /// Create a malformed operand error.
    pub fn malformed_operand(operand: &str, reason: &str) -> Self {
        Self {
            kind: ParseErrorKind::MalformedOperand,
            message: format!("malformed operand '{}': {}", operand, reason),
        }
    }

    /// Create a malformed condition error.
    pub fn malformed_condition(condition: &str, reason: &str) -> Self {
        Self {
            kind: ParseErrorKind::MalformedCondition,
            message: format!("malformed condition '{}': {}", condition, reason),
        }
    }

    /// Create an operand kind error.
    pub fn operand_kind(message: impl Into<String>) -> Self {
        Self {
            kind: ParseErrorKind::OperandKind,
            message: message.into(),
        }
    }

    /// Create an arity error.
    pub fn arity(opcode: &str, expected: usize, found: usize) -> Self {
        Self {
            kind: ParseErrorKind::Arity,
            message: format!(
                "{} takes {} operand(s), found {}",
                opcode, expected, found
            ),
        }
    }

    /// Create an unknown opcode error.
    pub fn unknown_opcode(word: &str) -> Self {
        Self {
            kind: ParseErrorKind::UnknownOpcode,
            message: format!("unknown instruction '{}'", word),
        }
    }

    /// Create a program length error.
    pub fn too_long(found: usize, limit: usize) -> Self {
        Self {
            kind: ParseErrorKind::ProgramTooLong,
            message: format!(
                "program has {} instructions, limit is {}",
                found, limit
            ),
        }
    }
}

/// A bot whose source failed to parse.
///
/// Carries the bot name and the index of the offending instruction (blank
/// and comment-only lines are not counted) so the caller can decide whether
/// to skip the bot or abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error on line {line} in {bot}: {source}")]
pub struct LoadError {
    /// Name of the bot being loaded
    pub bot: String,
    /// Instruction index where parsing failed
    pub line: usize,
    /// The underlying parse error
    pub source: ParseError,
}
