// Glue between the transport and the decision engine
//
// The Bot keeps the static map each snake registered at game start, remembers
// the last known length of every live snake so a death can be recorded, and
// forwards every snapshot to the engine. It holds no state the engine reads.

use log::{info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::config::Config;
use crate::engine::{self, TickOutcome};
use crate::grid::{Grid, GridError};
use crate::replay_store::ReplayStore;
use crate::snapshot::{parse_map, MapRow, SnapshotError, WireGameState};

/// Registers a snake and the arena it plays in
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StartRequest {
    pub snake_id: String,
    pub map: Vec<MapRow>,
}

/// One tick's snapshot for one snake
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MoveRequest {
    pub snake_id: String,
    pub state: WireGameState,
}

/// Explicit end of a snake's game
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct EndRequest {
    pub snake_id: String,
    #[serde(default)]
    pub length: Option<usize>,
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("no map registered for snake {0}")]
    UnknownArena(String),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("invalid map: {0}")]
    Map(#[from] GridError),
    #[error("decision task failed: {0}")]
    Engine(String),
}

/// Snake bot with an API mirroring the HTTP endpoints
pub struct Bot {
    config: Config,
    arenas: RwLock<HashMap<String, Arc<Grid>>>,
    lengths: RwLock<HashMap<String, usize>>,
    /// Snakes whose death is already in the replay log for this life
    dead: RwLock<HashSet<String>>,
    replay: ReplayStore,
}

impl Bot {
    /// Creates a new Bot instance
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    /// * `replay` - Where ticks and deaths are recorded
    pub fn new(config: Config, replay: ReplayStore) -> Self {
        Bot {
            config,
            arenas: RwLock::new(HashMap::new()),
            lengths: RwLock::new(HashMap::new()),
            dead: RwLock::new(HashSet::new()),
            replay,
        }
    }

    /// Returns bot metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "name": self.config.snake.name,
            "color": self.config.snake.color,
        })
    }

    /// Parses and stores the static map for a newly registered snake
    /// Corresponds to POST /start endpoint
    pub fn start(&self, req: &StartRequest) -> Result<(), BotError> {
        let grid = parse_map(&req.map)?;
        info!(
            "GAME START for {} on a {}x{} map",
            req.snake_id,
            grid.width(),
            grid.height()
        );
        self.arenas.write().insert(req.snake_id.clone(), Arc::new(grid));
        self.lengths.write().remove(&req.snake_id);
        self.dead.write().remove(&req.snake_id);
        Ok(())
    }

    /// Computes the move for one snapshot
    /// Corresponds to POST /move endpoint
    ///
    /// # Returns
    /// * `TickOutcome::Move` - the chosen direction and the objective behind it
    /// * `TickOutcome::Dead` - the snake is absent from the snapshot
    pub async fn get_move(&self, req: MoveRequest) -> Result<TickOutcome, BotError> {
        let start_time = Instant::now();
        let MoveRequest { snake_id, state } = req;

        let grid = self
            .arenas
            .read()
            .get(&snake_id)
            .cloned()
            .ok_or_else(|| BotError::UnknownArena(snake_id.clone()))?;

        let decoded = state.decode(&snake_id)?;
        let me = decoded.you().map(|s| (s.head, s.length));

        let engine_grid = grid.clone();
        let outcome = tokio::task::spawn_blocking(move || engine::decide(&engine_grid, &decoded))
            .await
            .map_err(|e| BotError::Engine(e.to_string()))?;

        match (outcome, me) {
            (TickOutcome::Move(decision), Some((head, length))) => {
                self.lengths.write().insert(snake_id.clone(), length);

                let elapsed = start_time.elapsed().as_millis();
                info!(
                    "Snake is at: {:?} - Moving {} ({}) - sorted in {}ms",
                    head,
                    decision.direction,
                    decision.objective.as_str(),
                    elapsed
                );
                if elapsed > u128::from(self.config.timing.tick_budget_ms) {
                    warn!(
                        "Tick for {} took {}ms, budget is {}ms",
                        snake_id, elapsed, self.config.timing.tick_budget_ms
                    );
                }

                self.replay
                    .record_tick(&snake_id, &grid, state, decision.direction);
            }
            _ => self.record_death(&snake_id, None),
        }

        Ok(outcome)
    }

    /// Called when a snake's game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, req: &EndRequest) {
        self.arenas.write().remove(&req.snake_id);
        self.record_death(&req.snake_id, req.length);
        info!("GAME OVER for {}", req.snake_id);
    }

    /// Records a death once per life, a new life starts with `start`
    fn record_death(&self, snake_id: &str, length: Option<usize>) {
        let last_known = self.lengths.write().remove(snake_id);
        let length = match length.or(last_known) {
            Some(length) if length > 0 => length,
            _ => return,
        };
        if !self.dead.write().insert(snake_id.to_string()) {
            return;
        }
        info!("DEATH - Snake {} died. Length {}", snake_id, length);
        self.replay.record_death(snake_id, length);
    }

    /// Whether a map is registered for `snake_id`
    pub fn has_arena(&self, snake_id: &str) -> bool {
        self.arenas.read().contains_key(snake_id)
    }
}
