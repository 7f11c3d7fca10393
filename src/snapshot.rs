// Wire format of the game-state snapshot and its validated decoding
//
// Snapshots look like:
//   {
//     "alive_snakes": [{"id": .., "name": .., "head": {"x": 1, "y": 2},
//                       "length": 3, "body": [{"x": 1, "y": 2}, ..]}],
//     "items": [{"position": {"x": 4, "y": 0}}],
//     "leaderboard": [..]
//   }
// Optional wire fields are checked here so the engine only ever sees a
// well-formed `GameState`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::grid::{Grid, GridError};
use crate::types::{Cell, GameState, Snake};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snake #{index} has no id")]
    MissingId { index: usize },
    #[error("snake {snake_id} has no head")]
    MissingHead { snake_id: String },
    #[error("snake {snake_id} head {head:?} does not match first body segment {first:?}")]
    HeadMismatch {
        snake_id: String,
        head: Cell,
        first: Cell,
    },
    #[error("item #{index} has no position")]
    MissingPosition { index: usize },
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WireSnake {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub head: Option<Cell>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub length: Option<usize>,
    #[serde(default)]
    pub body: Vec<Cell>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WireItem {
    #[serde(default)]
    pub position: Option<Cell>,
}

/// Snapshot exactly as delivered by the transport
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WireGameState {
    pub alive_snakes: Vec<WireSnake>,
    #[serde(default)]
    pub items: Vec<WireItem>,
    #[serde(default)]
    pub leaderboard: Vec<Value>,
}

impl WireGameState {
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validates the snapshot and builds the engine's view for `you_id`.
    /// `you_id` does not have to be alive; that is the engine's call.
    pub fn decode(&self, you_id: &str) -> Result<GameState, SnapshotError> {
        let snakes = self
            .alive_snakes
            .iter()
            .enumerate()
            .map(|(index, wire)| wire.decode(index))
            .collect::<Result<Vec<_>, _>>()?;

        let food = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| item.position.ok_or(SnapshotError::MissingPosition { index }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GameState::new(snakes, you_id, food))
    }

    /// Whether `snake_id` is among the alive snakes
    pub fn is_alive(&self, snake_id: &str) -> bool {
        self.alive_snakes
            .iter()
            .any(|s| s.id.as_deref() == Some(snake_id))
    }
}

impl WireSnake {
    fn decode(&self, index: usize) -> Result<Snake, SnapshotError> {
        let id = self.id.clone().ok_or(SnapshotError::MissingId { index })?;
        let head = match self.head {
            Some(head) => head,
            None => return Err(SnapshotError::MissingHead { snake_id: id }),
        };
        if let Some(&first) = self.body.first() {
            if first != head {
                return Err(SnapshotError::HeadMismatch {
                    snake_id: id,
                    head,
                    first,
                });
            }
        }

        Ok(Snake {
            length: self.length.unwrap_or_else(|| self.body.len()),
            name: self.name.clone().unwrap_or_default(),
            id,
            head,
            body: self.body.clone(),
        })
    }
}

/// One map row, either `"#.."` or `["#", ".", "."]`
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum MapRow {
    Text(String),
    Tiles(Vec<String>),
}

impl MapRow {
    fn symbols(&self) -> Vec<char> {
        match self {
            MapRow::Text(text) => text.chars().collect(),
            MapRow::Tiles(tiles) => tiles.concat().chars().collect(),
        }
    }
}

/// Parses the static arena map delivered at game start
pub fn parse_map(rows: &[MapRow]) -> Result<Grid, GridError> {
    let tiles: Vec<Vec<char>> = rows.iter().map(MapRow::symbols).collect();
    Grid::from_tiles(&tiles)
}

/// Decodes raw snapshot text for `you_id` in one go
pub fn decode_snapshot(text: &str, you_id: &str) -> Result<GameState, SnapshotError> {
    WireGameState::from_json(text)?.decode(you_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r##"{
        "alive_snakes": [
            {"id": "me", "name": "Lee", "head": {"x": 1, "y": 1}, "color": "#fff",
             "length": 2, "body": [{"x": 1, "y": 1}, {"x": 1, "y": 2}]},
            {"id": "them", "head": {"x": 4, "y": 4}, "body": []}
        ],
        "items": [{"position": {"x": 0, "y": 3}}],
        "leaderboard": []
    }"##;

    #[test]
    fn test_decode_valid_snapshot() {
        let state = decode_snapshot(SNAPSHOT, "me").unwrap();
        assert_eq!(state.snakes().len(), 2);
        assert_eq!(state.food(), &[Cell::new(0, 3)]);

        let me = state.you().unwrap();
        assert_eq!(me.name, "Lee");
        assert_eq!(me.head, Cell::new(1, 1));
        assert_eq!(me.length, 2);

        let them = state.opponents().next().unwrap();
        assert_eq!(them.length, 0);
        assert!(them.body.is_empty());
    }

    #[test]
    fn test_missing_head_is_an_error() {
        let text = r#"{"alive_snakes": [{"id": "me", "body": []}], "items": []}"#;
        match decode_snapshot(text, "me") {
            Err(SnapshotError::MissingHead { snake_id }) => assert_eq!(snake_id, "me"),
            other => panic!("expected MissingHead, got {:?}", other),
        }
    }

    #[test]
    fn test_head_must_lead_body() {
        let text = r#"{"alive_snakes": [{"id": "me", "head": {"x": 0, "y": 1},
            "body": [{"x": 2, "y": 1}]}]}"#;
        assert!(matches!(
            decode_snapshot(text, "me"),
            Err(SnapshotError::HeadMismatch { .. })
        ));
    }

    #[test]
    fn test_item_without_position_is_an_error() {
        let text = r#"{"alive_snakes": [], "items": [{}]}"#;
        assert!(matches!(
            decode_snapshot(text, "me"),
            Err(SnapshotError::MissingPosition { index: 0 })
        ));
    }

    #[test]
    fn test_missing_alive_snakes_is_json_error() {
        assert!(matches!(
            decode_snapshot(r#"{"items": []}"#, "me"),
            Err(SnapshotError::Json(_))
        ));
        assert!(matches!(
            decode_snapshot(r#"{"alive_snakes": [{"id": "a", "head": {"x": 1}}]}"#, "a"),
            Err(SnapshotError::Json(_))
        ));
    }

    #[test]
    fn test_parse_map_accepts_both_row_shapes() {
        let rows: Vec<MapRow> =
            serde_json::from_str(r##"["#..", ["#", ".", "#"]]"##).unwrap();
        let grid = parse_map(&rows).unwrap();
        assert_eq!(grid.to_rows(), vec!["#..".to_string(), "#.#".to_string()]);

        let ragged: Vec<MapRow> = serde_json::from_str(r#"["...", [".", "."]]"#).unwrap();
        assert!(parse_map(&ragged).is_err());
    }

    #[test]
    fn test_absent_snake_still_decodes() {
        let wire = WireGameState::from_json(SNAPSHOT).unwrap();
        assert!(wire.is_alive("them"));
        assert!(!wire.is_alive("ghost"));
        let state = wire.decode("ghost").unwrap();
        assert!(state.you().is_none());
    }
}
