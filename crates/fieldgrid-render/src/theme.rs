//! Static palette shared by cell fills, agent markers, and the legend.
//!
//! A [`Theme`] is built once and passed by reference into every draw;
//! nothing on the hot path allocates or looks colours up by name.

use fieldgrid_types::{CellCode, Role};
use image::Rgba;

/// Opaque colour from a `0xRRGGBB` literal.
#[allow(clippy::cast_possible_truncation)]
pub const fn rgb(hex: u32) -> Rgba<u8> {
    Rgba([
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
        u8::MAX,
    ])
}

/// Colour lookup tables for one rendering session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Cell fill, indexed in [`CellCode::ALL`] order.
    pub cells: [Rgba<u8>; 6],
    /// Marker fill, indexed in [`Role::ALL`] order.
    pub roles: [Rgba<u8>; 6],
    /// Tile boundary separators.
    pub grid_line: Rgba<u8>,
    /// Background of overlay panels.
    pub panel: Rgba<u8>,
    /// Labels on markers and in the legend.
    pub text: Rgba<u8>,
    /// Announcement lines.
    pub message_text: Rgba<u8>,
}

/// The default palette.
pub static STANDARD_THEME: Theme = Theme::standard();

impl Theme {
    /// The default palette.
    pub const fn standard() -> Self {
        Self {
            cells: [
                rgb(0x00bd_bdbd),
                rgb(0x0000_0000),
                rgb(0x002e_cc71),
                rgb(0x00f4_d03f),
                rgb(0x0034_98db),
                rgb(0x0055_aaff),
            ],
            roles: [
                rgb(0x002a_9d8f),
                rgb(0x00d6_2828),
                rgb(0x004c_c9f0),
                rgb(0x00f4_a261),
                rgb(0x008e_44ad),
                rgb(0x00ff_b703),
            ],
            // rgba(0, 0, 0, 0.06)
            grid_line: Rgba([0, 0, 0, 15]),
            // rgba(0, 0, 0, 0.75)
            panel: Rgba([0, 0, 0, 191]),
            text: rgb(0x00ff_ffff),
            message_text: rgb(0x0000_ff88),
        }
    }

    /// Fill colour for a known cell code.
    pub const fn cell_color(&self, code: CellCode) -> Rgba<u8> {
        match code {
            CellCode::Empty => self.cells[0],
            CellCode::Obstacle => self.cells[1],
            CellCode::Crop => self.cells[2],
            CellCode::Path => self.cells[3],
            CellCode::Manager => self.cells[4],
            CellCode::Water => self.cells[5],
        }
    }

    /// Fill colour for a raw cell value; unknown codes use the empty colour.
    pub const fn color_for_code(&self, code: i64) -> Rgba<u8> {
        self.cell_color(CellCode::classify(code))
    }

    /// Marker colour for a role.
    pub const fn role_color(&self, role: Role) -> Rgba<u8> {
        match role {
            Role::Planter => self.roles[0],
            Role::Harvester => self.roles[1],
            Role::Irrigator => self.roles[2],
            Role::Scout => self.roles[3],
            Role::Transport => self.roles[4],
            Role::General => self.roles[5],
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_literals_unpack() {
        assert_eq!(rgb(0x0012_3456), Rgba([0x12, 0x34, 0x56, 0xff]));
    }

    #[test]
    fn unknown_codes_use_empty_colour() {
        let theme = Theme::standard();
        let empty = theme.cell_color(CellCode::Empty);
        assert_eq!(theme.color_for_code(42), empty);
        assert_eq!(theme.color_for_code(-1), empty);
        assert_eq!(theme.color_for_code(5), rgb(0x0055_aaff));
    }

    #[test]
    fn every_role_has_a_distinct_colour() {
        let theme = Theme::standard();
        for (i, a) in Role::ALL.iter().enumerate() {
            for b in Role::ALL.iter().skip(i.saturating_add(1)) {
                assert_ne!(theme.role_color(*a), theme.role_color(*b));
            }
        }
    }
}
