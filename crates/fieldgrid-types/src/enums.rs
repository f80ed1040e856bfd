//! Enumeration types shared by the normalizer, renderer, and viewer.
//!
//! The [`CellCode`] table is the single source for both the background
//! colour lookup and the legend rows: adding or renumbering a code here
//! changes both consistently.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Cell codes
// ---------------------------------------------------------------------------

/// The fixed set of cell codes a grid snapshot may carry.
///
/// Codes outside this table are drawn as [`CellCode::Empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CellCode {
    /// Bare soil (code 0).
    Empty,
    /// Impassable terrain (code 1).
    Obstacle,
    /// A planted crop (code 2).
    Crop,
    /// A walkable path (code 3).
    Path,
    /// The manager station (code 4).
    Manager,
    /// Water or any other feature (code 5).
    Water,
}

impl CellCode {
    /// Every code in table order.
    pub const ALL: [Self; 6] = [
        Self::Empty,
        Self::Obstacle,
        Self::Crop,
        Self::Path,
        Self::Manager,
        Self::Water,
    ];

    /// The integer code as it appears in snapshot grids.
    pub const fn code(self) -> i64 {
        match self {
            Self::Empty => 0,
            Self::Obstacle => 1,
            Self::Crop => 2,
            Self::Path => 3,
            Self::Manager => 4,
            Self::Water => 5,
        }
    }

    /// Look up a raw code, returning `None` for codes outside the table.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Obstacle),
            2 => Some(Self::Crop),
            3 => Some(Self::Path),
            4 => Some(Self::Manager),
            5 => Some(Self::Water),
            _ => None,
        }
    }

    /// Classify a raw code, falling back to [`CellCode::Empty`].
    pub const fn classify(code: i64) -> Self {
        match Self::from_code(code) {
            Some(cell) => cell,
            None => Self::Empty,
        }
    }

    /// Legend label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Obstacle => "Obstacle",
            Self::Crop => "Crop",
            Self::Path => "Path",
            Self::Manager => "Manager",
            Self::Water => "Water",
        }
    }
}

// ---------------------------------------------------------------------------
// Agent roles
// ---------------------------------------------------------------------------

/// The role an agent plays in the simulation.
///
/// Unknown or missing roles normalize to [`Role::General`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Role {
    /// Sows crops on empty soil.
    Planter,
    /// Collects ripe crops.
    Harvester,
    /// Waters planted crops.
    Irrigator,
    /// Explores the field.
    Scout,
    /// Carries goods between stations.
    Transport,
    /// Any agent without a recognised role.
    #[default]
    General,
}

impl Role {
    /// Every role in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Planter,
        Self::Harvester,
        Self::Irrigator,
        Self::Scout,
        Self::Transport,
        Self::General,
    ];

    /// Parse a role name case-insensitively.
    ///
    /// Anything unrecognised yields [`Role::General`]; this never fails.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planter => "planter",
            Self::Harvester => "harvester",
            Self::Irrigator => "irrigator",
            Self::Scout => "scout",
            Self::Transport => "transport",
            Self::General => "general",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Source mode and overlay panels
// ---------------------------------------------------------------------------

/// Which kind of frame source is currently attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SourceMode {
    /// Periodic polling of the backend for the current snapshot.
    Live,
    /// Looping replay of a finite, pre-supplied frame sequence.
    Playback,
}

impl SourceMode {
    /// Lowercase name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Playback => "playback",
        }
    }
}

/// One of the independently toggled overlay panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum Panel {
    /// The cell code legend (bottom-right).
    Legend,
    /// Recent blackboard announcements (top-left).
    Messages,
    /// Per-agent telemetry (bottom-left).
    AgentInfo,
}

impl Panel {
    /// Parse the URL slug form (`legend`, `messages`, `agent-info`).
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "legend" => Some(Self::Legend),
            "messages" => Some(Self::Messages),
            "agent-info" | "agent_info" => Some(Self::AgentInfo),
            _ => None,
        }
    }

    /// The URL slug form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legend => "legend",
            Self::Messages => "messages",
            Self::AgentInfo => "agent-info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_codes_round_trip_through_table() {
        for cell in CellCode::ALL {
            assert_eq!(CellCode::from_code(cell.code()), Some(cell));
        }
    }

    #[test]
    fn unknown_code_classifies_as_empty() {
        assert_eq!(CellCode::classify(6), CellCode::Empty);
        assert_eq!(CellCode::classify(-1), CellCode::Empty);
        assert_eq!(CellCode::classify(11), CellCode::Empty);
        assert_eq!(CellCode::classify(2), CellCode::Crop);
    }

    #[test]
    fn role_parse_is_lenient() {
        assert_eq!(Role::parse("planter"), Role::Planter);
        assert_eq!(Role::parse(" Harvester "), Role::Harvester);
        assert_eq!(Role::parse("IRRIGATOR"), Role::Irrigator);
        assert_eq!(Role::parse("pilot"), Role::General);
        assert_eq!(Role::parse(""), Role::General);
    }

    #[test]
    fn panel_slugs() {
        assert_eq!(Panel::from_slug("legend"), Some(Panel::Legend));
        assert_eq!(Panel::from_slug("agent-info"), Some(Panel::AgentInfo));
        assert_eq!(Panel::from_slug("minimap"), None);
    }
}
