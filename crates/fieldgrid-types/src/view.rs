//! Engine-local presentation toggles.
//!
//! [`ViewState`] has no effect on data acquisition beyond the pause flag,
//! which the owning controller mirrors onto the attached source.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Panel;

/// Visibility of each overlay panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisiblePanels {
    /// Cell code legend.
    pub legend: bool,
    /// Recent announcements.
    pub messages: bool,
    /// Per-agent telemetry.
    pub agent_info: bool,
}

impl VisiblePanels {
    /// Whether `panel` is currently shown.
    pub const fn is_visible(&self, panel: Panel) -> bool {
        match panel {
            Panel::Legend => self.legend,
            Panel::Messages => self.messages,
            Panel::AgentInfo => self.agent_info,
        }
    }

    /// Flip one panel and return its new visibility.
    pub const fn toggle(&mut self, panel: Panel) -> bool {
        let slot = match panel {
            Panel::Legend => &mut self.legend,
            Panel::Messages => &mut self.messages,
            Panel::AgentInfo => &mut self.agent_info,
        };
        *slot = !*slot;
        *slot
    }
}

impl Default for VisiblePanels {
    fn default() -> Self {
        Self {
            legend: true,
            messages: true,
            agent_info: false,
        }
    }
}

/// Mutable presentation state owned by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ViewState {
    /// Whether frame scheduling is suspended.
    pub paused: bool,
    /// Overlay visibility.
    pub visible_panels: VisiblePanels,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panels_toggle_independently() {
        let mut panels = VisiblePanels::default();
        assert!(panels.is_visible(Panel::Legend));
        assert!(!panels.toggle(Panel::Legend));
        assert!(!panels.is_visible(Panel::Legend));
        assert!(panels.is_visible(Panel::Messages));
        assert!(panels.toggle(Panel::AgentInfo));
        assert!(panels.is_visible(Panel::AgentInfo));
    }
}
