// Replay store for recording ticks and deaths asynchronously
//
// Fire-and-forget writes keep file I/O off the move path. Every record is one
// JSON line appended to the configured file. Nothing written here ever feeds
// back into a decision.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::direction::Direction;
use crate::grid::Grid;
use crate::snapshot::WireGameState;

/// One snapshot and the move chosen for it
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TickRecord {
    pub snake_id: String,
    /// Milliseconds since the Unix epoch
    pub t: i64,
    pub map: Vec<String>,
    pub state: WireGameState,
    pub chosen_move: Direction,
}

/// Final length of a snake that died
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DeathRecord {
    pub snake_id: String,
    pub length: usize,
    pub t: i64,
}

/// A single line of the replay log
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplayEntry {
    Tick(TickRecord),
    Death(DeathRecord),
}

/// Shared replay store state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct ReplayStore {
    file: Arc<Mutex<Option<File>>>,
    /// Writes spawned but not yet awaited by `flush`
    pending: Arc<parking_lot::Mutex<Vec<JoinHandle<()>>>>,
    enabled: bool,
}

impl ReplayStore {
    /// Opens the replay log for appending when `enabled` is true
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return ReplayStore::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                info!("Replay recording enabled: {}", log_file_path);
                ReplayStore {
                    file: Arc::new(Mutex::new(Some(file))),
                    pending: Arc::new(parking_lot::Mutex::new(Vec::new())),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to open replay log '{}': {}", log_file_path, e);
                ReplayStore::disabled()
            }
        }
    }

    /// Creates a disabled store (no-op)
    pub fn disabled() -> Self {
        ReplayStore {
            file: Arc::new(Mutex::new(None)),
            pending: Arc::new(parking_lot::Mutex::new(Vec::new())),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records a decided tick (fire-and-forget)
    pub fn record_tick(
        &self,
        snake_id: &str,
        grid: &Grid,
        state: WireGameState,
        chosen_move: Direction,
    ) {
        if !self.enabled {
            return;
        }
        self.spawn_write(ReplayEntry::Tick(TickRecord {
            snake_id: snake_id.to_string(),
            t: chrono::Utc::now().timestamp_millis(),
            map: grid.to_rows(),
            state,
            chosen_move,
        }));
    }

    /// Records a snake's final length (fire-and-forget)
    pub fn record_death(&self, snake_id: &str, length: usize) {
        if !self.enabled {
            return;
        }
        self.spawn_write(ReplayEntry::Death(DeathRecord {
            snake_id: snake_id.to_string(),
            length,
            t: chrono::Utc::now().timestamp_millis(),
        }));
    }

    fn spawn_write(&self, entry: ReplayEntry) {
        let file_handle = self.file.clone();
        let handle = tokio::spawn(async move {
            Self::append_to(&file_handle, &entry).await;
        });

        let mut pending = self.pending.lock();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Waits for every write spawned so far to land in the file
    pub async fn flush(&self) {
        let handles = std::mem::take(&mut *self.pending.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                error!("Replay write task failed: {}", e);
            }
        }
    }

    /// Appends one entry and waits for the write to finish
    pub async fn append(&self, entry: &ReplayEntry) {
        Self::append_to(&self.file, entry).await;
    }

    async fn append_to(file_handle: &Mutex<Option<File>>, entry: &ReplayEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write replay entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush replay log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize replay entry: {}", e);
                }
            }
        }
    }
}
