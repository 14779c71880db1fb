//! Program loading
//!
//! Turns bot source text into a fixed-length instruction list.

use std::sync::Arc;

use tracing::debug;

use crate::error::{LoadError, ParseError};
use crate::instruction::Instruction;

/// Parse bot source into exactly `program_length` instructions.
///
/// Per line: everything after `//` is dropped, surrounding whitespace is
/// trimmed, blank lines are skipped, and the remaining words form one
/// instruction. Short programs are padded with the bot's own Flag.
pub fn parse_program(
    name: &str,
    source: &str,
    program_length: usize,
) -> Result<Vec<Arc<Instruction>>, LoadError> {
    let mut program = Vec::with_capacity(program_length);

    for raw in source.lines() {
        let text = match raw.find("//") {
            Some(at) => &raw[..at],
            None => raw,
        };
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let line = program.len();
        if line >= program_length {
            return Err(LoadError {
                bot: name.to_string(),
                line,
                source: ParseError::too_long(line + 1, program_length),
            });
        }

        let instruction = Instruction::parse_line(&words, name).map_err(|source| LoadError {
            bot: name.to_string(),
            line,
            source,
        })?;
        program.push(Arc::new(instruction));
    }

    let written = program.len();
    let pad = Arc::new(Instruction::flag(name));
    program.resize(program_length, pad);
    debug!(bot = name, instructions = written, "program loaded");

    Ok(program)
}
