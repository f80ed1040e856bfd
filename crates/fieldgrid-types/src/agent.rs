//! Canonical agent records and the normalized frame handed to the renderer.
//!
//! Agents arrive in two upstream encodings; a [`CanonicalAgent`] is the one
//! shape everything downstream of the normalizer sees. Its serialized form
//! is itself the record encoding, so normalizing an already-canonical list
//! yields the same list.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Role;
use crate::snapshot::{Announcement, SnapshotMeta};

/// Integer grid coordinates, serialized as an `[x, y]` pair.
///
/// Bounds (`0 <= x < cols`, `0 <= y < rows`) are the caller's contract and
/// are not enforced here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct Position {
    /// Column index.
    pub x: i64,
    /// Row index.
    pub y: i64,
}

impl Position {
    /// Create a position from column and row.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<[i64; 2]> for Position {
    fn from([x, y]: [i64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Position> for [i64; 2] {
    fn from(position: Position) -> Self {
        [position.x, position.y]
    }
}

/// A normalized agent. Derived per frame, never persisted across frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CanonicalAgent {
    /// Source identity when present, else the positional index.
    #[ts(type = "number")]
    pub id: i64,
    /// Grid coordinates of the agent's tile.
    #[serde(rename = "pos")]
    #[ts(type = "[number, number]")]
    pub position: Position,
    /// Role used for colouring.
    pub role: Role,
    /// Crops harvested (0 when not reported).
    pub harvested: f64,
    /// Current exploration rate (0 when not reported).
    #[serde(rename = "explorationRate")]
    pub exploration_rate: f64,
}

impl CanonicalAgent {
    /// Create an agent with zero-valued telemetry.
    pub const fn new(id: i64, position: Position, role: Role) -> Self {
        Self {
            id,
            position,
            role,
            harvested: 0.0,
            exploration_rate: 0.0,
        }
    }

    /// Short marker label, e.g. `A3`.
    pub fn label(&self) -> String {
        format!("A{}", self.id)
    }
}

/// A validated, normalized snapshot ready to render.
///
/// Built only from snapshots with a non-empty rectangular grid, so
/// `rows >= 1`, `cols >= 1`, and every row of `grid` has `cols` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Row-major cell codes.
    pub grid: Vec<Vec<i64>>,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Normalized agents in source order.
    pub agents: Vec<CanonicalAgent>,
    /// Blackboard announcements in recency order (last is newest).
    pub announcements: Vec<Announcement>,
    /// Backend counters, when present.
    pub meta: Option<SnapshotMeta>,
}
