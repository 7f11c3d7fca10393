// Objective ladder that turns one snapshot into one move
//
// Objectives are tried in a fixed order and the first one that produces a
// direction wins:
//   1. Eat      - nearest food this snake reaches before any opponent
//   2. Attack   - cut across a nearby opponent's escape route
//   3. Conserve - steer into a compact region when space is short or the
//                 snake is long; otherwise Expand toward the farthest cell
//   4. Fallback - best-scoring non-fatal neighbour, random if none
// Thresholds are fixed constants so replays reproduce exactly.

use log::{debug, warn};
use rand::Rng;

use crate::direction::Direction;
use crate::grid::Grid;
use crate::hazard::HazardProjector;
use crate::path::{Path, PathEngine};
use crate::types::{Cell, GameState, Snake};

/// Body length below which a snake counts as small
pub const SMALL_SNAKE_LENGTH: usize = 120;
/// Opponents whose head is within this distance trigger the attack objective
pub const ENGAGEMENT_RADIUS: i32 = 6;
/// Small snakes conserve space when their farthest path is shorter than this
pub const CONSERVE_PATH_THRESHOLD: usize = 20;
/// Move used when the snake has nowhere to go
pub const TRAPPED_DIRECTION: Direction = Direction::North;

/// Which rung of the ladder produced a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    Eat,
    Attack,
    Conserve,
    Expand,
    Trapped,
    Fallback,
}

impl Objective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::Eat => "eat",
            Objective::Attack => "attack",
            Objective::Conserve => "conserve",
            Objective::Expand => "expand",
            Objective::Trapped => "trapped",
            Objective::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub direction: Direction,
    pub objective: Objective,
}

impl Decision {
    fn new(direction: Direction, objective: Objective) -> Self {
        Decision {
            direction,
            objective,
        }
    }
}

/// Evaluates the objective ladder for one snake in one snapshot
pub struct StrategySelector<'a> {
    base: &'a Grid,
    me: &'a Snake,
    others: Vec<&'a Snake>,
    food: &'a [Cell],
    engine: PathEngine,
}

impl<'a> StrategySelector<'a> {
    /// Returns `None` when the requesting snake is not alive in `state`
    pub fn new(base: &'a Grid, state: &'a GameState) -> Option<Self> {
        let me = state.you()?;
        let others: Vec<&Snake> = state.opponents().collect();
        let hazard = HazardProjector::new(base).project(me, others.iter().copied());

        Some(StrategySelector {
            base,
            me,
            others,
            food: state.food(),
            engine: PathEngine::new(hazard),
        })
    }

    fn head(&self) -> Cell {
        self.me.head
    }

    pub fn is_small(&self) -> bool {
        self.me.body.len() < SMALL_SNAKE_LENGTH
    }

    /// Runs the ladder. `rng` is only consulted by the last-resort random pick.
    pub fn decide<R: Rng>(&self, rng: &mut R) -> Decision {
        let decision = self
            .eat()
            .or_else(|| self.attack())
            .unwrap_or_else(|| self.conserve_or_expand());

        if self.is_fatal(decision.direction) {
            warn!(
                "{} move {} runs into an obstacle, using safety fallback",
                decision.objective.as_str(),
                decision.direction
            );
            return self.safety_fallback(rng);
        }

        decision
    }

    /// Food we are strictly closer to than every opponent, nearest first
    pub fn food_destination(&self) -> Option<Cell> {
        self.food
            .iter()
            .copied()
            .filter(|&item| self.is_closest_snake(item))
            .min_by_key(|&item| self.engine.distance(self.head(), item))
    }

    fn is_closest_snake(&self, item: Cell) -> bool {
        let ours = self.engine.distance(self.head(), item);
        self.others
            .iter()
            .map(|other| self.engine.distance(other.head, item))
            .min()
            .map_or(true, |closest| closest > ours)
    }

    fn eat(&self) -> Option<Decision> {
        if !self.is_small() {
            return None;
        }
        let target = self.food_destination()?;
        let path = self.engine.shortest_path(self.head(), target);
        let step = path.first()?;
        debug!("Eating by path - {} steps to {:?}", path.len(), target);
        Some(Decision::new(
            Direction::between(self.head(), *step),
            Objective::Eat,
        ))
    }

    /// Opponent with the nearest head inside the engagement radius
    pub fn nearest_enemy(&self) -> Option<&'a Snake> {
        self.others
            .iter()
            .copied()
            .min_by_key(|other| self.engine.distance(other.head, self.head()))
            .filter(|other| self.engine.distance(other.head, self.head()) <= ENGAGEMENT_RADIUS)
    }

    fn attack(&self) -> Option<Decision> {
        let enemy = self.nearest_enemy()?;

        // The enemy sees every snake except itself and us.
        let rivals = self
            .others
            .iter()
            .copied()
            .filter(|s| s.id != enemy.id);
        let enemy_engine = PathEngine::new(HazardProjector::new(self.base).project(enemy, rivals));
        let escape = enemy_engine.farthest_reachable(enemy.head);

        let target = escape.iter().copied().find(|&node| {
            self.engine.distance(node, self.head()) < self.engine.distance(node, enemy.head)
        })?;

        let path = self.engine.shortest_path(self.head(), target);
        let step = path.first()?;
        debug!(
            "Attacking {} - {} steps to cut off {:?}",
            enemy.id,
            path.len(),
            target
        );
        Some(Decision::new(
            Direction::between(self.head(), *step),
            Objective::Attack,
        ))
    }

    /// Farthest-reachable path from our head on our own hazard grid
    pub fn longest_path(&self) -> Path {
        self.engine.farthest_reachable(self.head())
    }

    fn should_conserve(&self, longest: &Path) -> bool {
        !self.is_small() || longest.len() < CONSERVE_PATH_THRESHOLD
    }

    fn conserve_or_expand(&self) -> Decision {
        let longest = self.longest_path();
        let terminal = match longest.last() {
            Some(cell) => *cell,
            None => {
                debug!("No reachable cells, we're trapped");
                return Decision::new(TRAPPED_DIRECTION, Objective::Trapped);
            }
        };

        if !self.should_conserve(&longest) {
            debug!("Free space - longest path: {}", longest.len());
            return Decision::new(
                Direction::between(self.head(), longest[0]),
                Objective::Expand,
            );
        }

        match self.conserve_step(terminal) {
            Some(step) => {
                debug!("Conserving space - longest path: {}", longest.len());
                Decision::new(Direction::between(self.head(), step), Objective::Conserve)
            }
            None => {
                debug!("Conserve search gave no usable step");
                Decision::new(TRAPPED_DIRECTION, Objective::Trapped)
            }
        }
    }

    /// First step toward the region behind `terminal`, searched with our own
    /// head blocked so the route cannot loop back through it.
    ///
    /// Since the head is blocked the reverse path never contains it; the
    /// second-to-last fallback only keeps the head-as-target rule total.
    fn conserve_step(&self, terminal: Cell) -> Option<Cell> {
        let others = self.others.iter().copied();
        let blocked_head = HazardProjector::new(self.base)
            .head_unpathable(true)
            .project(self.me, others);
        let reverse = PathEngine::new(blocked_head).farthest_reachable(terminal);

        let mut target = reverse.first().copied().unwrap_or(terminal);
        if target == self.head() {
            target = *reverse.iter().rev().nth(1)?;
        }

        self.engine.shortest_path(self.head(), target).first().copied()
    }

    /// Cells a snake head or a non-tail body segment sits on
    fn occupancy(&self) -> Grid {
        let mut grid = self.base.clone();
        for snake in self.others.iter().copied().chain(std::iter::once(self.me)) {
            grid.block(snake.head);
            for cell in snake.occupying_segments() {
                grid.block(*cell);
            }
        }
        grid
    }

    fn is_fatal(&self, direction: Direction) -> bool {
        !self.occupancy().is_walkable(direction.apply(self.head()))
    }

    /// Picks the non-fatal move with the most open neighbours, ties by
    /// North, South, East, West. Random when every move is fatal.
    pub fn safety_fallback<R: Rng>(&self, rng: &mut R) -> Decision {
        let occupied = self.occupancy();
        let mut best: Option<(Direction, usize)> = None;

        for dir in Direction::ALL.iter().copied() {
            let next = dir.apply(self.head());
            if !occupied.is_walkable(next) {
                continue;
            }
            let score = next
                .neighbours()
                .iter()
                .filter(|c| occupied.is_walkable(**c))
                .count();
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((dir, score));
            }
        }

        match best {
            Some((direction, score)) => {
                debug!("Safety fallback {} with {} open neighbours", direction, score);
                Decision::new(direction, Objective::Fallback)
            }
            None => {
                let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
                warn!("Every move is fatal, picking {} at random", direction);
                Decision::new(direction, Objective::Fallback)
            }
        }
    }
}
