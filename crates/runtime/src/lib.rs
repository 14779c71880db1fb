//! CodeBots Runtime
//!
//! Places bots on a wrapping grid, drives their turns, and tallies the
//! flags they declare across many games.

pub mod bot;
pub mod config;
pub mod error;
pub mod runner;
pub mod score;
pub mod types;
pub mod world;

pub use bot::Bot;
pub use config::{ConfigError, MatchConfig};
pub use error::{Error, Result};
pub use runner::{compile_sources, play_game, run_match, Blueprint, BotSource, MatchReport};
pub use score::{Declaration, ScoreSink, ScoreTable};
pub use types::{Direction, Position};
pub use world::World;
