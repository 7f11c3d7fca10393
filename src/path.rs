// Lee-algorithm path engine
//
// Breadth-first wavefront expansion over a 4-connected passability grid. The
// traversal keeps every discovered node in an arena with a parent index so the
// route to any node can be rebuilt after the search finishes.

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::heuristic;
use crate::types::Cell;

/// Cells after the start, in travel order. Empty means "no path".
pub type Path = Vec<Cell>;

/// One discovered cell; owned by a single traversal
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    cell: Cell,
    dist: usize,
    parent: Option<usize>,
}

/// Result of one breadth-first traversal
struct Traversal {
    nodes: Vec<SearchNode>,
    /// Arena index of the goal when it was reached
    goal: Option<usize>,
    /// Arena index of the first node discovered at the greatest depth
    farthest: Option<usize>,
}

impl Traversal {
    fn path_to(&self, idx: usize) -> Path {
        let mut journey = Vec::new();
        let mut node = self.nodes[idx];
        while let Some(parent) = node.parent {
            journey.push(node.cell);
            node = self.nodes[parent];
        }
        journey.reverse();
        journey
    }
}

/// Breadth-first search over a fixed passability matrix.
///
/// The matrix is set once at construction. Neighbours are always expanded
/// North, South, East, West, which fixes which of several equal-length paths
/// is returned.
#[derive(Debug, Clone)]
pub struct PathEngine {
    grid: Grid,
}

impl PathEngine {
    pub fn new(grid: Grid) -> Self {
        PathEngine { grid }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Shortest path from `from` to `to`, excluding `from`.
    ///
    /// Returns an empty path when `to` is blocked, unreachable, or equal to
    /// `from`. The start cell itself does not need to be walkable.
    pub fn shortest_path(&self, from: Cell, to: Cell) -> Path {
        if from == to || !self.grid.is_walkable(to) {
            return Path::new();
        }
        let traversal = self.traverse(from, Some(to));
        traversal
            .goal
            .map(|idx| traversal.path_to(idx))
            .unwrap_or_default()
    }

    /// Path to the cell with the greatest BFS depth from `from`.
    ///
    /// This is the BFS eccentricity of `from`, used as a cheap proxy for
    /// "direction of the most open space". It is not a longest simple path:
    /// in cyclic or sparse regions it can under- or over-state how much room
    /// is really there. Ties go to the node discovered first. An empty path
    /// means nothing beyond `from` is reachable.
    pub fn farthest_reachable(&self, from: Cell) -> Path {
        let traversal = self.traverse(from, None);
        traversal
            .farthest
            .map(|idx| traversal.path_to(idx))
            .unwrap_or_default()
    }

    /// Ranking heuristic, see [`heuristic::distance`]
    pub fn distance(&self, a: Cell, b: Cell) -> i32 {
        heuristic::distance(a, b)
    }

    fn traverse(&self, from: Cell, goal: Option<Cell>) -> Traversal {
        let mut traversal = Traversal {
            nodes: Vec::new(),
            goal: None,
            farthest: None,
        };

        let start_idx = match self.grid.index(from) {
            Some(i) => i,
            None => return traversal,
        };

        let mut visited = vec![false; self.grid.width() * self.grid.height()];
        visited[start_idx] = true;

        traversal.nodes.push(SearchNode {
            cell: from,
            dist: 0,
            parent: None,
        });
        let mut queue = VecDeque::new();
        queue.push_back(0usize);

        let mut max_dist = 0;
        traversal.farthest = Some(0);

        while let Some(current) = queue.pop_front() {
            let node = traversal.nodes[current];

            if node.dist > max_dist {
                max_dist = node.dist;
                traversal.farthest = Some(current);
            }

            if goal == Some(node.cell) {
                traversal.goal = Some(current);
                break;
            }

            for next in node.cell.neighbours().iter() {
                let idx = match self.grid.index(*next) {
                    Some(i) => i,
                    None => continue,
                };
                if visited[idx] || !self.grid.is_walkable(*next) {
                    continue;
                }
                visited[idx] = true;
                traversal.nodes.push(SearchNode {
                    cell: *next,
                    dist: node.dist + 1,
                    parent: Some(current),
                });
                queue.push_back(traversal.nodes.len() - 1);
            }
        }

        traversal
    }
}
