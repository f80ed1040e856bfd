//! Shared type definitions for the Fieldgrid viewer.
//!
//! This crate is the single source of truth for the data that flows from a
//! frame source through the normalizer into the renderer. Types defined here
//! flow downstream to `TypeScript` via `ts-rs` for browser-side controls.
//!
//! # Modules
//!
//! - [`snapshot`] -- Wire payloads: grid snapshot, blackboard, announcements
//! - [`agent`] -- Canonical agent record and the normalized [`Frame`]
//! - [`enums`] -- Cell codes, roles, source modes, overlay panels
//! - [`view`] -- Presentation toggles

pub mod agent;
pub mod enums;
pub mod snapshot;
pub mod view;

// Re-export all public types at crate root for convenience.
pub use agent::{CanonicalAgent, Frame, Position};
pub use enums::{CellCode, Panel, Role, SourceMode};
pub use snapshot::{Announcement, Blackboard, GridSnapshot, SnapshotMeta};
pub use view::{ViewState, VisiblePanels};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes the bindings to the `bindings/` directory relative
        // to the crate root.
        use ts_rs::TS;

        // Enums
        let _ = crate::enums::CellCode::export_all();
        let _ = crate::enums::Role::export_all();
        let _ = crate::enums::SourceMode::export_all();
        let _ = crate::enums::Panel::export_all();

        // Snapshot payloads
        let _ = crate::snapshot::GridSnapshot::export_all();
        let _ = crate::snapshot::Blackboard::export_all();
        let _ = crate::snapshot::Announcement::export_all();
        let _ = crate::snapshot::SnapshotMeta::export_all();

        // Canonical data and view state
        let _ = crate::agent::CanonicalAgent::export_all();
        let _ = crate::view::VisiblePanels::export_all();
        let _ = crate::view::ViewState::export_all();
    }
}
