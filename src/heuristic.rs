// Constant-time distance estimate used to rank targets
//
// Diagonal steps are priced at TRAVEL_COST_DIAG even though snakes only move
// orthogonally. Callers use this for relative ordering of candidates, never as
// a path length. Switching to Manhattan distance changes which food and attack
// targets get picked.

use crate::types::Cell;

pub const TRAVEL_COST_DIAG: i32 = 2;
pub const TRAVEL_COST_STRAIGHT: i32 = 1;

/// `2 * min(dx, dy) + 1 * (dx + dy - 2 * min(dx, dy))`
pub fn distance(a: Cell, b: Cell) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let diagonal = dx.min(dy);
    let straight = dx + dy;
    TRAVEL_COST_DIAG * diagonal + TRAVEL_COST_STRAIGHT * (straight - 2 * diagonal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_values() {
        assert_eq!(distance(Cell::new(0, 0), Cell::new(0, 0)), 0);
        assert_eq!(distance(Cell::new(0, 0), Cell::new(3, 0)), 3);
        assert_eq!(distance(Cell::new(0, 0), Cell::new(2, 2)), 4);
        assert_eq!(distance(Cell::new(4, 2), Cell::new(0, 0)), 6);
        assert_eq!(distance(Cell::new(1, 1), Cell::new(2, 3)), 3);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let cells = [
            Cell::new(0, 0),
            Cell::new(5, 1),
            Cell::new(-2, 7),
            Cell::new(3, 3),
            Cell::new(10, 0),
        ];
        for &a in cells.iter() {
            for &b in cells.iter() {
                assert_eq!(distance(a, b), distance(b, a), "{:?} {:?}", a, b);
            }
        }
    }
}
