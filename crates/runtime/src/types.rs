//! Grid geometry

use std::fmt;

/// A cell on the toroidal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell in `direction`, wrapping at the grid edges
    pub fn step(self, direction: Direction, width: usize, height: usize) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: (self.x as i64 + dx).rem_euclid(width as i64) as usize,
            y: (self.y as i64 + dy).rem_euclid(height as i64) as usize,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Facing direction, encoded in variable D modulo 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn from_variable(d: i64) -> Self {
        Self::ALL[d.rem_euclid(4) as usize]
    }

    /// Unit offset; y grows southwards
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_variable() {
        assert_eq!(Direction::from_variable(0), Direction::North);
        assert_eq!(Direction::from_variable(5), Direction::East);
        assert_eq!(Direction::from_variable(22), Direction::South);
        assert_eq!(Direction::from_variable(-1), Direction::West);
    }

    #[test]
    fn test_step_wraps() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.step(Direction::North, 4, 3), Position::new(0, 2));
        assert_eq!(corner.step(Direction::West, 4, 3), Position::new(3, 0));

        let far = Position::new(3, 2);
        assert_eq!(far.step(Direction::East, 4, 3), Position::new(0, 2));
        assert_eq!(far.step(Direction::South, 4, 3), Position::new(3, 0));
    }
}
