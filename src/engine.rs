// Per-tick entry point: one snapshot in, one outcome out
//
// Pure with respect to I/O. Everything it builds (hazard grids, search arenas,
// paths) is dropped when the call returns.

use log::{debug, info};
use rand::Rng;
use std::time::Instant;

use crate::direction::Direction;
use crate::grid::Grid;
use crate::strategy::{Decision, StrategySelector};
use crate::types::GameState;

/// What the engine concluded for this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A move was chosen
    Move(Decision),
    /// The requesting snake is not among the alive snakes
    Dead,
}

impl TickOutcome {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            TickOutcome::Move(decision) => Some(decision.direction),
            TickOutcome::Dead => None,
        }
    }
}

/// Decides this tick's move using the thread-local RNG for the last-resort pick
pub fn decide(grid: &Grid, state: &GameState) -> TickOutcome {
    decide_with_rng(grid, state, &mut rand::rng())
}

/// Decides this tick's move with an injected RNG
pub fn decide_with_rng<R: Rng>(grid: &Grid, state: &GameState, rng: &mut R) -> TickOutcome {
    let start = Instant::now();

    let selector = match StrategySelector::new(grid, state) {
        Some(selector) => selector,
        None => {
            info!("Snake {} is not alive in this snapshot", state.you_id());
            return TickOutcome::Dead;
        }
    };

    let decision = selector.decide(rng);
    debug!(
        "Snake {} chose {} via {} in {}us",
        state.you_id(),
        decision.direction,
        decision.objective.as_str(),
        start.elapsed().as_micros()
    );

    TickOutcome::Move(decision)
}
