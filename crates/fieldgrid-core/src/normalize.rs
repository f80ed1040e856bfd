//! Agent normalization at the source boundary.
//!
//! Upstream data mixes two encodings for agents:
//!
//! - a bare `[x, y]` pair
//! - a record with `id?`, `pos`, `role?` and telemetry fields
//!
//! Both become a [`CanonicalAgent`]. Anything else degrades to a fallback
//! agent at `(0, 0)` with the general role; normalization never fails.

use fieldgrid_types::{CanonicalAgent, Frame, GridSnapshot, Position, Role};
use serde_json::Value;

/// Keys accepted for the exploration rate, first match wins.
const EXPLORATION_KEYS: [&str; 3] = ["explorationRate", "exploration_rate", "eps"];

/// Normalize a list of raw agent entries in order.
pub fn normalize(raw: &[Value]) -> Vec<CanonicalAgent> {
    raw.iter()
        .enumerate()
        .map(|(index, entry)| normalize_entry(index, entry))
        .collect()
}

/// Normalize one entry found at `index` in the source list.
pub fn normalize_entry(index: usize, entry: &Value) -> CanonicalAgent {
    let fallback_id = i64::try_from(index).unwrap_or(i64::MAX);
    if let Some(position) = parse_pair(entry) {
        return CanonicalAgent::new(fallback_id, position, Role::General);
    }
    let Some(record) = entry.as_object() else {
        return CanonicalAgent::new(fallback_id, Position::default(), Role::General);
    };

    let id = record.get("id").and_then(as_integer).unwrap_or(fallback_id);
    let position = record
        .get("pos")
        .and_then(parse_position)
        .unwrap_or_default();
    let role = record
        .get("role")
        .and_then(Value::as_str)
        .map_or(Role::General, Role::parse);
    let harvested = record
        .get("harvested")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let exploration_rate = EXPLORATION_KEYS
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_f64))
        .unwrap_or(0.0);

    CanonicalAgent {
        id,
        position,
        role,
        harvested,
        exploration_rate,
    }
}

/// Build a renderable frame, or `None` when the grid is missing, empty, or
/// ragged.
pub fn canonicalize(snapshot: GridSnapshot) -> Option<Frame> {
    let (rows, cols) = snapshot.dimensions()?;
    Some(Frame {
        agents: normalize(&snapshot.agents),
        grid: snapshot.grid,
        rows,
        cols,
        announcements: snapshot.blackboard.announcements,
        meta: snapshot.meta,
    })
}

/// A `pos` value: a pair, a `{"0": x, "1": y}` object, or `{x, y}`.
fn parse_position(value: &Value) -> Option<Position> {
    if let Some(position) = parse_pair(value) {
        return Some(position);
    }
    let object = value.as_object()?;
    let pick = |a: &str, b: &str| object.get(a).or_else(|| object.get(b)).and_then(as_integer);
    Some(Position::new(pick("x", "0")?, pick("y", "1")?))
}

/// A two-element array of integers.
fn parse_pair(value: &Value) -> Option<Position> {
    match value.as_array()?.as_slice() {
        [x, y] => Some(Position::new(as_integer(x)?, as_integer(y)?)),
        _ => None,
    }
}

/// Integers, and floats with no fractional part.
#[allow(clippy::cast_possible_truncation)]
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        let float = value.as_f64()?;
        let in_range = float.fract().abs() < f64::EPSILON && float.abs() < 9.0e15;
        in_range.then_some(float as i64)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_pair_uses_index_and_general_role() {
        let agents = normalize(&[json!([3, 4]), json!([0, 1])]);
        assert_eq!(
            agents,
            vec![
                CanonicalAgent::new(0, Position::new(3, 4), Role::General),
                CanonicalAgent::new(1, Position::new(0, 1), Role::General),
            ]
        );
    }

    #[test]
    fn record_without_role_or_id() {
        let agents = normalize(&[json!([9, 9]), json!({"pos": [1, 2]})]);
        assert_eq!(
            agents.get(1),
            Some(&CanonicalAgent::new(1, Position::new(1, 2), Role::General))
        );
    }

    #[test]
    fn record_keeps_identity_role_and_telemetry() {
        let agent = normalize_entry(
            0,
            &json!({"id": 7, "pos": [2, 3], "role": "Harvester", "harvested": 5, "eps": 0.25}),
        );
        assert_eq!(agent.id, 7);
        assert_eq!(agent.position, Position::new(2, 3));
        assert_eq!(agent.role, Role::Harvester);
        assert!((agent.harvested - 5.0).abs() < f64::EPSILON);
        assert!((agent.exploration_rate - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn object_positions_are_accepted() {
        let keyed = normalize_entry(0, &json!({"pos": {"0": 4, "1": 5}}));
        let named = normalize_entry(0, &json!({"pos": {"x": 6, "y": 7}}));
        assert_eq!(keyed.position, Position::new(4, 5));
        assert_eq!(named.position, Position::new(6, 7));
    }

    #[test]
    fn whole_floats_count_as_integers() {
        let agent = normalize_entry(0, &json!([2.0, 3.0]));
        assert_eq!(agent.position, Position::new(2, 3));
        let fractional = normalize_entry(0, &json!([2.5, 3]));
        assert_eq!(fractional.position, Position::default());
    }

    #[test]
    fn unrecognised_shapes_fall_back() {
        let fallback = |i| CanonicalAgent::new(i, Position::default(), Role::General);
        let agents = normalize(&[
            json!("agent"),
            json!(null),
            json!([1, 2, 3]),
            json!({"role": "pilot"}),
            json!(12),
        ]);
        assert_eq!(
            agents,
            vec![fallback(0), fallback(1), fallback(2), fallback(3), fallback(4)]
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = vec![
            json!([1, 1]),
            json!({"id": 4, "pos": [0, 2], "role": "scout", "harvested": 2.5}),
            json!({"pos": {"x": 3, "y": 1}, "explorationRate": 0.5}),
            json!("garbage"),
        ];
        let once = normalize(&raw);
        let encoded: Vec<Value> = once.iter().map(|a| serde_json::to_value(a).unwrap()).collect();
        assert_eq!(normalize(&encoded), once);
    }

    #[test]
    fn canonicalize_rejects_malformed_grids() {
        let empty: GridSnapshot = serde_json::from_value(json!({})).unwrap();
        assert!(canonicalize(empty).is_none());

        let ragged: GridSnapshot =
            serde_json::from_value(json!({"grid": [[0, 1], [2]]})).unwrap();
        assert!(canonicalize(ragged).is_none());
    }

    #[test]
    fn canonicalize_builds_frame() {
        let snapshot: GridSnapshot = serde_json::from_value(json!({
            "grid": [[0, 1], [2, 0]],
            "agents": [[0, 0]],
            "blackboard": {"announcements": ["hello", ["scout", "crop found"]]}
        }))
        .unwrap();
        let frame = canonicalize(snapshot).unwrap();
        assert_eq!((frame.rows, frame.cols), (2, 2));
        assert_eq!(frame.agents.len(), 1);
        assert_eq!(frame.announcements.len(), 2);
    }
}
