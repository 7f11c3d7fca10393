// Cardinal moves and translation of a path step into one of them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::Cell;

/// Represents the four possible movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All directions in evaluation order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Wire token for the move
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::East => "E",
            Direction::West => "W",
        }
    }

    /// Calculates the next cell when moving in this direction
    pub fn apply(&self, cell: Cell) -> Cell {
        match self {
            Direction::North => Cell::new(cell.x, cell.y - 1),
            Direction::South => Cell::new(cell.x, cell.y + 1),
            Direction::East => Cell::new(cell.x + 1, cell.y),
            Direction::West => Cell::new(cell.x - 1, cell.y),
        }
    }

    /// Direction that takes `from` to the adjacent cell `to`.
    ///
    /// Rows are compared first: a larger `y` is South, a smaller one North.
    /// Otherwise a smaller `x` is West and anything else East. Paths only
    /// ever hand in orthogonal neighbours.
    pub fn between(from: Cell, to: Cell) -> Direction {
        if from.y < to.y {
            Direction::South
        } else if from.y > to.y {
            Direction::North
        } else if from.x > to.x {
            Direction::West
        } else {
            Direction::East
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "n" | "north" => Ok(Direction::North),
            "s" | "south" => Ok(Direction::South),
            "e" | "east" => Ok(Direction::East),
            "w" | "west" => Ok(Direction::West),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
