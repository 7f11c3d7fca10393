// Core value types shared by the decision engine
//
// Everything here is rebuilt from the incoming snapshot every tick and never
// mutated after construction.

use serde::{Deserialize, Serialize};

/// 2D grid coordinate, `y` is the row (0 at the top)
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Orthogonal neighbours in search order: North, South, East, West
    pub fn neighbours(self) -> [Cell; 4] {
        [
            Cell::new(self.x, self.y - 1),
            Cell::new(self.x, self.y + 1),
            Cell::new(self.x + 1, self.y),
            Cell::new(self.x - 1, self.y),
        ]
    }
}

/// A snake as seen in one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub id: String,
    pub name: String,
    pub head: Cell,
    /// Head first, tail last
    pub body: Vec<Cell>,
    pub length: usize,
}

impl Snake {
    /// Builds a snake whose reported length is its body length
    pub fn new(id: impl Into<String>, head: Cell, body: Vec<Cell>) -> Self {
        let length = body.len();
        Snake {
            id: id.into(),
            name: String::new(),
            head,
            body,
            length,
        }
    }

    /// Body segments that still occupy their cell when the next move resolves.
    /// The most distal segment vacates, so it is left out.
    pub fn occupying_segments(&self) -> &[Cell] {
        let keep = self.body.len().saturating_sub(1);
        &self.body[..keep]
    }
}

/// Immutable per-tick view of the arena's dynamic content
#[derive(Debug, Clone)]
pub struct GameState {
    snakes: Vec<Snake>,
    you_id: String,
    food: Vec<Cell>,
}

impl GameState {
    pub fn new(snakes: Vec<Snake>, you_id: impl Into<String>, food: Vec<Cell>) -> Self {
        GameState {
            snakes,
            you_id: you_id.into(),
            food,
        }
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn food(&self) -> &[Cell] {
        &self.food
    }

    pub fn you_id(&self) -> &str {
        &self.you_id
    }

    /// The requesting snake, or `None` when it is no longer alive
    pub fn you(&self) -> Option<&Snake> {
        self.snakes.iter().find(|s| s.id == self.you_id)
    }

    /// Every alive snake other than the requesting one
    pub fn opponents(&self) -> impl Iterator<Item = &Snake> {
        let you_id = self.you_id.as_str();
        self.snakes.iter().filter(move |s| s.id != you_id)
    }
}
