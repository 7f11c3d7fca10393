// Static arena map and the passability matrix shared with the path engine
//
// The map arrives once per game as rows of symbols where `#` is a wall and
// anything else is open floor. Per-tick hazard overlays are plain clones of
// the base grid with extra cells blocked.

use thiserror::Error;

use crate::types::Cell;

pub const WALL: char = '#';
pub const FLOOR: char = '.';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("map has no tiles")]
    Empty,
    #[error("map row {row} has {found} tiles, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Rectangular passability matrix, `true` means walkable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Grid with every cell walkable
    pub fn open(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            cells: vec![true; width * height],
        }
    }

    /// Parses map rows where every char is one tile
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let tiles: Vec<Vec<char>> = rows.iter().map(|r| r.as_ref().chars().collect()).collect();
        Self::from_tiles(&tiles)
    }

    /// Parses a 2D array of map symbols indexed `[y][x]`
    pub fn from_tiles(tiles: &[Vec<char>]) -> Result<Self, GridError> {
        let width = tiles.first().map(|r| r.len()).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(width * tiles.len());
        for (row, line) in tiles.iter().enumerate() {
            if line.len() != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found: line.len(),
                });
            }
            cells.extend(line.iter().map(|&c| c != WALL));
        }

        Ok(Grid {
            width,
            height: tiles.len(),
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height
    }

    /// Row-major index of an in-bounds cell
    pub(crate) fn index(&self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.y as usize * self.width + cell.x as usize)
        } else {
            None
        }
    }

    /// Out-of-bounds cells are never walkable
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.index(cell).map_or(false, |i| self.cells[i])
    }

    /// Marks a cell blocked; out-of-bounds cells are ignored
    pub fn block(&mut self, cell: Cell) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = false;
        }
    }

    /// Marks a cell walkable; out-of-bounds cells are ignored
    pub fn unblock(&mut self, cell: Cell) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = true;
        }
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Renders the grid back into map rows
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|&c| if c { FLOOR } else { WALL }).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_walls_and_floor() {
        let grid = Grid::from_rows(&["###", "#..", "###"]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert!(!grid.is_walkable(Cell::new(0, 1)));
        assert!(grid.is_walkable(Cell::new(1, 1)));
        assert!(grid.is_walkable(Cell::new(2, 1)));
        assert_eq!(grid.walkable_count(), 2);
    }

    #[test]
    fn test_any_non_wall_symbol_is_floor() {
        let grid = Grid::from_rows(&[".,", "x#"]).unwrap();
        assert!(grid.is_walkable(Cell::new(1, 0)));
        assert!(grid.is_walkable(Cell::new(0, 1)));
        assert!(!grid.is_walkable(Cell::new(1, 1)));
    }

    #[test]
    fn test_out_of_bounds_is_not_walkable() {
        let grid = Grid::open(2, 2);
        assert!(!grid.is_walkable(Cell::new(-1, 0)));
        assert!(!grid.is_walkable(Cell::new(0, 2)));
        assert!(!grid.is_walkable(Cell::new(2, 0)));
    }

    #[test]
    fn test_rejects_bad_maps() {
        let empty: [&str; 0] = [];
        assert_eq!(Grid::from_rows(&empty), Err(GridError::Empty));
        assert_eq!(
            Grid::from_rows(&["...", ".."]),
            Err(GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_block_ignores_out_of_bounds() {
        let mut grid = Grid::open(2, 2);
        grid.block(Cell::new(5, 5));
        grid.block(Cell::new(1, 1));
        assert_eq!(grid.to_rows(), vec!["..".to_string(), ".#".to_string()]);
        grid.unblock(Cell::new(1, 1));
        assert_eq!(grid.walkable_count(), 4);
    }
}
