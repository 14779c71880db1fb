//! Runtime errors

use codebots_vm::LoadError;
use thiserror::Error;

use crate::config::ConfigError;

/// Runtime result type
pub type Result<T> = std::result::Result<T, Error>;

/// Runtime errors
///
/// Nothing that happens during a game is an error; these all occur before
/// the first turn.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no bots to place: {sources} source(s) x {copies} copies")]
    EmptyPopulation { sources: usize, copies: usize },
}
