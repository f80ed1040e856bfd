//! Grid snapshot payloads as served by the simulation backend.
//!
//! A [`GridSnapshot`] is the unit of exchange between a frame source and
//! the viewer: one complete grid, agent list, and blackboard at a point in
//! simulated time. It is deserialized leniently. Missing or `null` top-level
//! fields become empty values so that a malformed payload still reaches the
//! engine, which then decides to skip it rather than the decoder failing.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// One complete simulation state as received or replayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridSnapshot {
    /// Row-major matrix of cell codes; `grid[y][x]`.
    #[serde(default, deserialize_with = "null_as_default")]
    #[ts(type = "Array<Array<number>>")]
    pub grid: Vec<Vec<i64>>,

    /// Agent entries in either upstream encoding (bare `[x, y]` pair or
    /// record). Interpreted by the normalizer, never by the renderer.
    #[serde(default, deserialize_with = "null_as_default")]
    pub agents: Vec<serde_json::Value>,

    /// Shared message board.
    #[serde(default, deserialize_with = "null_as_default")]
    pub blackboard: Blackboard,

    /// Backend counters, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<SnapshotMeta>,
}

impl GridSnapshot {
    /// Return `(rows, cols)` when the grid is a non-empty rectangle.
    ///
    /// Returns `None` for an empty grid, an empty first row, or rows of
    /// differing length.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        let cols = self.grid.first()?.len();
        if cols == 0 || self.grid.iter().any(|row| row.len() != cols) {
            return None;
        }
        Some((self.grid.len(), cols))
    }
}

/// The blackboard section of a snapshot.
///
/// The backend also publishes per-agent and resource bookkeeping here;
/// only the announcements are displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Blackboard {
    /// Messages in insertion order; the last entry is the most recent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub announcements: Vec<Announcement>,
}

/// A single blackboard message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "bindings/")]
pub enum Announcement {
    /// A plain text message.
    Text(String),
    /// A `[key, text]` pair; the key is usually a sender or topic.
    Keyed(serde_json::Value, String),
    /// Any other JSON value.
    Other(serde_json::Value),
}

impl Announcement {
    /// The display text for this message.
    ///
    /// Keyed entries with an empty text fall back to the JSON form of the
    /// whole entry so the line is never blank.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Keyed(key, text) if text.is_empty() => {
                serde_json::json!([key, text]).to_string()
            }
            Self::Keyed(_, text) => text.clone(),
            Self::Other(value) => value.to_string(),
        }
    }
}

/// Backend counters attached to live snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SnapshotMeta {
    /// Simulation step counter.
    #[serde(default)]
    #[ts(type = "number | null")]
    pub step: Option<u64>,
    /// Total crops harvested so far.
    #[serde(default)]
    pub harvested_total: Option<f64>,
    /// Whether a training run is in progress.
    #[serde(default)]
    pub is_training: Option<bool>,
    /// Whether the trained model is being run in real time.
    #[serde(default)]
    pub is_running_trained: Option<bool>,
}

/// Deserialize a field treating an explicit `null` like a missing value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
