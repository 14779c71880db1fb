//! Score tallies
//!
//! Every bot declares one flag at the end of a game. Declarations are summed
//! across games into a [`ScoreTable`] and handed to a [`ScoreSink`].

use std::fmt;

use indexmap::IndexMap;

/// What a bot declares at the end of a game
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Declaration {
    /// The flag name that strictly outnumbers every other in its program
    Flag(String),
    /// No single most frequent flag
    Tie,
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Flag(name) => f.write_str(name),
            Declaration::Tie => f.write_str("<tie>"),
        }
    }
}

/// Declaration counts, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTable {
    scores: IndexMap<Declaration, u64>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, declaration: Declaration) {
        self.add(declaration, 1);
    }

    pub fn add(&mut self, declaration: Declaration, count: u64) {
        *self.scores.entry(declaration).or_insert(0) += count;
    }

    pub fn merge(&mut self, other: &ScoreTable) {
        for (declaration, count) in &other.scores {
            self.add(declaration.clone(), *count);
        }
    }

    pub fn get(&self, declaration: &Declaration) -> u64 {
        self.scores.get(declaration).copied().unwrap_or(0)
    }

    /// Score for a flag name
    pub fn flag(&self, name: &str) -> u64 {
        self.get(&Declaration::Flag(name.to_string()))
    }

    pub fn total(&self) -> u64 {
        self.scores.values().sum()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Declaration, u64)> {
        self.scores.iter().map(|(d, c)| (d, *c))
    }

    /// Highest score first; equal scores by name with the tie bucket last
    pub fn ranked(&self) -> Vec<(Declaration, u64)> {
        let mut ranked: Vec<(Declaration, u64)> =
            self.scores.iter().map(|(d, c)| (d.clone(), *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// Emit every entry to `sink` in ranked order
    pub fn emit(&self, sink: &mut dyn ScoreSink) {
        for (declaration, score) in self.ranked() {
            sink.emit(&declaration, score);
        }
    }
}

impl FromIterator<Declaration> for ScoreTable {
    fn from_iter<I: IntoIterator<Item = Declaration>>(iter: I) -> Self {
        let mut table = ScoreTable::new();
        for declaration in iter {
            table.record(declaration);
        }
        table
    }
}

/// Receiver for final scores
pub trait ScoreSink {
    fn emit(&mut self, declaration: &Declaration, score: u64);
}

impl ScoreSink for Vec<(Declaration, u64)> {
    fn emit(&mut self, declaration: &Declaration, score: u64) {
        self.push((declaration.clone(), score));
    }
}
