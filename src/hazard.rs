// Per-tick hazard overlay
//
// Starts from the static wall grid and blocks every cell a snake occupies when
// the next move resolves, plus every cell an opponent's head could reach in one
// step. The overlay lives for one tick and is rebuilt from the next snapshot.

use log::debug;

use crate::grid::Grid;
use crate::types::{GameState, Snake};

/// Builds hazard grids from one perspective snake against a set of others
#[derive(Debug, Clone, Copy)]
pub struct HazardProjector<'a> {
    base: &'a Grid,
    head_unpathable: bool,
}

impl<'a> HazardProjector<'a> {
    pub fn new(base: &'a Grid) -> Self {
        HazardProjector {
            base,
            head_unpathable: false,
        }
    }

    /// Also block the perspective snake's own head cell
    pub fn head_unpathable(mut self, blocked: bool) -> Self {
        self.head_unpathable = blocked;
        self
    }

    /// Projects hazards as seen by `me`.
    ///
    /// Every snake's body except its most distal segment is blocked. Each
    /// snake in `others` whose head is not on `me`'s head also blocks its head
    /// and in-bounds orthogonal neighbours. `me`'s head stays walkable unless
    /// `head_unpathable` is set or the static map has a wall there.
    pub fn project<'s, I>(&self, me: &Snake, others: I) -> Grid
    where
        I: IntoIterator<Item = &'s Snake>,
    {
        let mut grid = self.base.clone();

        for other in others {
            if other.head != me.head {
                grid.block(other.head);
                for cell in other.head.neighbours().iter() {
                    grid.block(*cell);
                }
            }
            mark_body(&mut grid, other);
        }

        mark_body(&mut grid, me);

        if self.head_unpathable {
            grid.block(me.head);
        } else if self.base.is_walkable(me.head) {
            grid.unblock(me.head);
        }

        grid
    }
}

fn mark_body(grid: &mut Grid, snake: &Snake) {
    for cell in snake.occupying_segments() {
        grid.block(*cell);
    }
}

/// Hazard grid for `self_id` against every other alive snake.
/// Returns `None` when `self_id` is not among the alive snakes.
pub fn build_hazard(base: &Grid, state: &GameState, self_id: &str) -> Option<Grid> {
    let me = state.snakes().iter().find(|s| s.id == self_id)?;
    let others = state.snakes().iter().filter(|s| s.id != self_id);
    let grid = HazardProjector::new(base).project(me, others);
    debug!(
        "Hazard for {}: {} of {} walkable cells remain",
        self_id,
        grid.walkable_count(),
        base.walkable_count()
    );
    Some(grid)
}
