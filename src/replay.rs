// Replay module for analyzing recorded games and checking decisions
//
// This module provides functionality to:
// 1. Parse JSONL replay logs
// 2. Re-run the engine on recorded snapshots
// 3. Compare recorded vs replayed moves
// 4. Rank snakes by the length they reached before dying

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::direction::Direction;
use crate::engine::{self, TickOutcome};
use crate::grid::Grid;
use crate::replay_store::{ReplayEntry, TickRecord};
use crate::strategy::Objective;

/// Result of replaying a single tick
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub snake_id: String,
    pub t: i64,
    pub original_move: Direction,
    /// `None` when the replayed snapshot reports the snake as dead
    pub replayed_move: Option<Direction>,
    pub objective: Option<Objective>,
    pub matches: bool,
    pub computation_time_us: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_ticks: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
    /// Ticks that took longer than the configured budget
    pub slow_ticks: usize,
}

/// Replay engine for analyzing replay logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<ReplayEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: ReplayEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} replay entries", entries.len());
        Ok(entries)
    }

    /// Re-runs the engine on one recorded tick.
    /// The random fallback is seeded from the tick time so reruns agree.
    pub fn replay_tick(&self, record: &TickRecord) -> Result<ReplayResult, String> {
        let grid = Grid::from_rows(&record.map).map_err(|e| format!("Bad map: {}", e))?;
        let state = record
            .state
            .decode(&record.snake_id)
            .map_err(|e| format!("Bad snapshot: {}", e))?;

        let start_time = Instant::now();
        let mut rng = StdRng::seed_from_u64(record.t as u64);
        let outcome = engine::decide_with_rng(&grid, &state, &mut rng);
        let computation_time_us = start_time.elapsed().as_micros();

        let (replayed_move, objective) = match outcome {
            TickOutcome::Move(decision) => (Some(decision.direction), Some(decision.objective)),
            TickOutcome::Dead => (None, None),
        };
        let matches = replayed_move == Some(record.chosen_move);

        if self.verbose {
            if matches {
                info!(
                    "Tick {}: ✓ MATCH - {} ({})",
                    record.t,
                    record.chosen_move,
                    objective.map_or("dead", |o| o.as_str())
                );
            } else {
                warn!(
                    "Tick {}: ✗ MISMATCH - Original: {}, Replayed: {}",
                    record.t,
                    record.chosen_move,
                    replayed_move.map_or("dead".to_string(), |d| d.to_string())
                );
            }
        }

        Ok(ReplayResult {
            snake_id: record.snake_id.clone(),
            t: record.t,
            original_move: record.chosen_move,
            replayed_move,
            objective,
            matches,
            computation_time_us,
        })
    }

    /// Replays every tick record, optionally only those of one snake
    pub fn replay_all(
        &self,
        entries: &[ReplayEntry],
        snake_id: Option<&str>,
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for record in ticks(entries).filter(|r| snake_id.map_or(true, |id| r.snake_id == id)) {
            match self.replay_tick(record) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay tick {}: {}", record.t, e);
                }
            }
        }

        Ok(results)
    }

    /// Most recent `n` tick records of `snake_id`, newest first
    pub fn last_ticks<'e>(
        &self,
        entries: &'e [ReplayEntry],
        snake_id: &str,
        n: usize,
    ) -> Vec<&'e TickRecord> {
        let mut records: Vec<&TickRecord> = ticks(entries).filter(|r| r.snake_id == snake_id).collect();
        records.sort_by(|a, b| b.t.cmp(&a.t));
        records.truncate(n);
        records
    }

    /// Final length per dead snake, longest first. A later death record for
    /// the same snake replaces an earlier one.
    pub fn leaderboard(&self, entries: &[ReplayEntry]) -> Vec<(String, usize)> {
        let mut lengths: HashMap<&str, usize> = HashMap::new();
        for entry in entries {
            if let ReplayEntry::Death(death) = entry {
                lengths.insert(death.snake_id.as_str(), death.length);
            }
        }

        let mut board: Vec<(String, usize)> = lengths
            .into_iter()
            .map(|(id, length)| (id.to_string(), length))
            .collect();
        board.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        board
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_ticks = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_ticks - matches;
        let match_rate = if total_ticks > 0 {
            (matches as f64 / total_ticks as f64) * 100.0
        } else {
            0.0
        };
        let budget_us = u128::from(self.config.timing.tick_budget_ms) * 1000;
        let slow_ticks = results
            .iter()
            .filter(|r| r.computation_time_us > budget_us)
            .count();

        ReplayStats {
            total_ticks,
            matches,
            mismatches,
            match_rate,
            slow_ticks,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Ticks:    {}", stats.total_ticks);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("Over budget:    {}", stats.slow_ticks);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_us as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Computation Time:   {:.1}us\n", avg_time);

            let mut by_objective: HashMap<&str, usize> = HashMap::new();
            for result in results {
                let name = result.objective.map_or("dead", |o| o.as_str());
                *by_objective.entry(name).or_insert(0) += 1;
            }
            let mut by_objective: Vec<_> = by_objective.into_iter().collect();
            by_objective.sort();
            for (name, count) in by_objective {
                println!("  {:<10} {}", name, count);
            }
            println!();
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "{} @ {}: {} → {} (time: {}us)",
                    result.snake_id,
                    result.t,
                    result.original_move,
                    result
                        .replayed_move
                        .map_or("dead".to_string(), |d| d.to_string()),
                    result.computation_time_us
                );
            }
            println!();
        }
    }
}

fn ticks(entries: &[ReplayEntry]) -> impl Iterator<Item = &TickRecord> {
    entries.iter().filter_map(|entry| match entry {
        ReplayEntry::Tick(record) => Some(record),
        ReplayEntry::Death(_) => None,
    })
}
