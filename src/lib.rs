// Library exports for the snake move-decision engine
// This allows the server, the replay tool, and tests to share the core logic

pub mod bot;
pub mod config;
pub mod direction;
pub mod engine;
pub mod grid;
pub mod hazard;
pub mod heuristic;
pub mod path;
pub mod replay;
pub mod replay_store;
pub mod snapshot;
pub mod strategy;
pub mod types;
