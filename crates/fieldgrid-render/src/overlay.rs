//! Overlay compositor: legend, recent messages, and agent telemetry.
//!
//! Each panel is drawn only when its toggle is on. Geometry is computed in
//! tile units against the frame's extent, so panels scale with the surface
//! the same way the grid does.

use fieldgrid_types::{Announcement, CanonicalAgent, CellCode, Frame, VisiblePanels};

use crate::glyphs;
use crate::surface::Surface;
use crate::theme::Theme;

/// Gap between a panel and the surface edge.
pub const PANEL_MARGIN: f32 = 8.0;
/// Nominal legend width.
pub const LEGEND_WIDTH: f32 = 160.0;
/// Nominal legend height.
pub const LEGEND_HEIGHT: f32 = 140.0;
/// Announcements shown in the messages panel.
pub const MESSAGE_LIMIT: usize = 4;
/// Characters kept per overlay line.
pub const MESSAGE_CHAR_BUDGET: usize = 55;
/// Agents listed in the telemetry panel.
pub const AGENT_INFO_LIMIT: usize = 8;

const PANEL_RADIUS: f32 = 8.0;
const TEXT_INSET: f32 = 8.0;
const LEGEND_ROW_TOP: f32 = 12.0;
const LEGEND_ROW_PITCH: f32 = 20.0;
const LEGEND_SWATCH: f32 = 14.0;
const LEGEND_SWATCH_LEFT: f32 = 10.0;
const LEGEND_LABEL_LEFT: f32 = 30.0;
const LEGEND_FONT: f32 = 12.0;

const MESSAGES_FONT: f32 = 13.0;
const MESSAGE_LINE_PITCH: f32 = 20.0;
const MESSAGE_FIRST_BASELINE: f32 = 28.0;

const AGENT_INFO_FONT: f32 = 11.0;
const AGENT_INFO_LINE_PITCH: f32 = 16.0;

/// An axis-aligned rectangle in tile units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Right edge.
    pub const fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub const fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether this rectangle lies within `[0, width] x [0, height]`.
    pub const fn is_within(&self, width: f32, height: f32) -> bool {
        const SLACK: f32 = 1e-3;
        self.x >= -SLACK
            && self.y >= -SLACK
            && self.right() <= width + SLACK
            && self.bottom() <= height + SLACK
    }
}

/// One row of the legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// The cell code this row describes.
    pub code: CellCode,
    /// Colour swatch bounds.
    pub swatch: Rect,
    /// Label text, e.g. `2 Crop`.
    pub label: String,
    /// Left edge of the label.
    pub label_x: f32,
    /// Top edge of the label.
    pub label_top: f32,
}

/// Placement of the legend for one surface extent.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendLayout {
    /// Panel bounds.
    pub panel: Rect,
    /// Shrink factor applied so the panel fits (1 when it fits untouched).
    pub scale: f32,
    /// Rows, one per cell code in table order.
    pub entries: Vec<LegendEntry>,
}

/// Lay out the legend for a surface of `width x height` units.
///
/// The panel is anchored bottom-right at [`PANEL_MARGIN`]. When the
/// surface is smaller than the panel, the panel is scaled down so every
/// entry stays inside the surface.
pub fn legend_layout(width: f32, height: f32) -> LegendLayout {
    let margin = if width > PANEL_MARGIN * 2.0 && height > PANEL_MARGIN * 2.0 {
        PANEL_MARGIN
    } else {
        0.0
    };
    let avail_w = (margin.mul_add(-2.0, width)).max(0.0);
    let avail_h = (margin.mul_add(-2.0, height)).max(0.0);
    let scale = (avail_w / LEGEND_WIDTH)
        .min(avail_h / LEGEND_HEIGHT)
        .min(1.0)
        .max(0.0);

    let panel_w = LEGEND_WIDTH * scale;
    let panel_h = LEGEND_HEIGHT * scale;
    let panel = Rect {
        x: (width - panel_w - margin).max(margin),
        y: (height - panel_h - margin).max(margin),
        width: panel_w,
        height: panel_h,
    };

    let entries = CellCode::ALL
        .iter()
        .enumerate()
        .map(|(row, code)| legend_entry(&panel, scale, row, *code))
        .collect();

    LegendLayout {
        panel,
        scale,
        entries,
    }
}

#[allow(clippy::cast_precision_loss)]
fn legend_entry(panel: &Rect, scale: f32, row: usize, code: CellCode) -> LegendEntry {
    let row_top = (row as f32).mul_add(LEGEND_ROW_PITCH, LEGEND_ROW_TOP) * scale + panel.y;
    let size = LEGEND_SWATCH * scale;
    let label_top = (size - glyphs::text_height(LEGEND_FONT * scale)).mul_add(0.5, row_top);
    LegendEntry {
        code,
        swatch: Rect {
            x: LEGEND_SWATCH_LEFT.mul_add(scale, panel.x),
            y: row_top,
            width: size,
            height: size,
        },
        label: format!("{} {}", code.code(), code.label()),
        label_x: LEGEND_LABEL_LEFT.mul_add(scale, panel.x),
        label_top,
    }
}

/// Display text of one announcement.
pub fn announcement_text(announcement: &Announcement) -> String {
    announcement.text()
}

/// The last `limit` announcements, oldest first, each cut to `budget`
/// characters.
pub fn recent_messages(announcements: &[Announcement], limit: usize, budget: usize) -> Vec<String> {
    let skip = announcements.len().saturating_sub(limit);
    announcements
        .iter()
        .skip(skip)
        .map(|a| truncate(&announcement_text(a), budget))
        .collect()
}

/// One telemetry line per agent, at most `limit`, each cut to `budget`
/// characters.
pub fn agent_info_lines(agents: &[CanonicalAgent], limit: usize, budget: usize) -> Vec<String> {
    agents
        .iter()
        .take(limit)
        .map(|agent| {
            let line = format!(
                "{} {} ({},{}) h:{} e:{:.2}",
                agent.label(),
                agent.role,
                agent.position.x,
                agent.position.y,
                agent.harvested,
                agent.exploration_rate
            );
            truncate(&line, budget)
        })
        .collect()
}

/// Bounds of the messages panel holding `line_count` lines.
///
/// The width fits a full [`MESSAGE_CHAR_BUDGET`] line plus the text inset
/// on both sides.
#[allow(clippy::cast_precision_loss)]
pub fn messages_panel(line_count: usize) -> Rect {
    Rect {
        x: PANEL_MARGIN,
        y: PANEL_MARGIN,
        width: text_panel_width(MESSAGES_FONT),
        height: (line_count as f32).mul_add(MESSAGE_LINE_PITCH, 20.0),
    }
}

/// Bounds of the agent info panel holding `line_count` lines, anchored
/// bottom-left on an extent `height` units tall.
#[allow(clippy::cast_precision_loss)]
pub fn agent_info_panel(line_count: usize, height: f32) -> Rect {
    let panel_h = (line_count as f32).mul_add(AGENT_INFO_LINE_PITCH, 12.0);
    Rect {
        x: PANEL_MARGIN,
        y: (height - panel_h - PANEL_MARGIN).max(PANEL_MARGIN),
        width: text_panel_width(AGENT_INFO_FONT),
        height: panel_h,
    }
}

#[allow(clippy::cast_precision_loss)]
fn text_panel_width(font_size: f32) -> f32 {
    let advance = glyphs::dot_size(font_size) * f32::from(glyphs::GLYPH_ADVANCE);
    let line = advance * MESSAGE_CHAR_BUDGET as f32;
    TEXT_INSET.mul_add(2.0, line)
}

fn truncate(text: &str, budget: usize) -> String {
    text.chars().take(budget).collect()
}

/// Draw every enabled panel for `frame` onto `surface`.
///
/// `width` and `height` are the frame extent in tile units.
pub fn compose(
    frame: &Frame,
    panels: VisiblePanels,
    width: f32,
    height: f32,
    theme: &Theme,
    surface: &mut Surface,
) {
    if panels.legend {
        draw_legend(width, height, theme, surface);
    }
    if panels.messages {
        draw_messages(&frame.announcements, theme, surface);
    }
    if panels.agent_info {
        draw_agent_info(&frame.agents, height, theme, surface);
    }
}

fn draw_legend(width: f32, height: f32, theme: &Theme, surface: &mut Surface) {
    let layout = legend_layout(width, height);
    if layout.scale <= 0.0 {
        return;
    }
    let panel = layout.panel;
    surface.fill_rounded_rect(
        panel.x,
        panel.y,
        panel.width,
        panel.height,
        PANEL_RADIUS * layout.scale,
        theme.panel,
    );
    for entry in &layout.entries {
        let swatch = entry.swatch;
        surface.fill_rect(
            swatch.x,
            swatch.y,
            swatch.width,
            swatch.height,
            theme.cell_color(entry.code),
        );
        surface.fill_text(
            &entry.label,
            entry.label_x,
            entry.label_top,
            LEGEND_FONT * layout.scale,
            theme.text,
        );
    }
}

#[allow(clippy::cast_precision_loss)]
fn draw_messages(announcements: &[Announcement], theme: &Theme, surface: &mut Surface) {
    let lines = recent_messages(announcements, MESSAGE_LIMIT, MESSAGE_CHAR_BUDGET);
    if lines.is_empty() {
        return;
    }
    let panel = messages_panel(lines.len());
    surface.fill_rounded_rect(
        panel.x,
        panel.y,
        panel.width,
        panel.height,
        PANEL_RADIUS,
        theme.panel,
    );
    let ascent = glyphs::text_height(MESSAGES_FONT);
    for (i, line) in lines.iter().enumerate() {
        let baseline = (i as f32).mul_add(MESSAGE_LINE_PITCH, MESSAGE_FIRST_BASELINE);
        surface.fill_text(
            line,
            panel.x + TEXT_INSET,
            baseline - ascent,
            MESSAGES_FONT,
            theme.message_text,
        );
    }
}

#[allow(clippy::cast_precision_loss)]
fn draw_agent_info(agents: &[CanonicalAgent], height: f32, theme: &Theme, surface: &mut Surface) {
    let lines = agent_info_lines(agents, AGENT_INFO_LIMIT, MESSAGE_CHAR_BUDGET);
    if lines.is_empty() {
        return;
    }
    let panel = agent_info_panel(lines.len(), height);
    surface.fill_rounded_rect(
        panel.x,
        panel.y,
        panel.width,
        panel.height,
        PANEL_RADIUS,
        theme.panel,
    );
    for (i, line) in lines.iter().enumerate() {
        let line_top = (i as f32).mul_add(AGENT_INFO_LINE_PITCH, panel.y + TEXT_INSET);
        surface.fill_text(line, panel.x + TEXT_INSET, line_top, AGENT_INFO_FONT, theme.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldgrid_types::{Position, Role};

    #[test]
    fn legend_anchors_bottom_right_when_it_fits() {
        let layout = legend_layout(500.0, 400.0);
        assert!((layout.scale - 1.0).abs() < f32::EPSILON);
        assert!((layout.panel.x - 332.0).abs() < 1e-4);
        assert!((layout.panel.y - 252.0).abs() < 1e-4);
        assert_eq!(layout.entries.len(), 6);
    }

    #[test]
    fn legend_stays_inside_small_surfaces() {
        for (w, h) in [(25.0, 25.0), (50.0, 50.0), (10.0, 300.0), (300.0, 12.0), (161.0, 141.0)] {
            let layout = legend_layout(w, h);
            assert!(layout.panel.is_within(w, h), "panel escapes {w}x{h}");
            for entry in &layout.entries {
                assert!(entry.swatch.is_within(w, h), "swatch escapes {w}x{h}");
            }
        }
    }

    #[test]
    fn legend_labels_follow_code_table() {
        let layout = legend_layout(400.0, 400.0);
        let labels: Vec<_> = layout.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            ["0 Empty", "1 Obstacle", "2 Crop", "3 Path", "4 Manager", "5 Water"]
        );
    }

    #[test]
    fn recent_messages_keeps_last_four_in_order() {
        let announcements: Vec<_> = (0..6)
            .map(|i| Announcement::Text(format!("m{i}")))
            .collect();
        assert_eq!(
            recent_messages(&announcements, MESSAGE_LIMIT, MESSAGE_CHAR_BUDGET),
            ["m2", "m3", "m4", "m5"]
        );
    }

    #[test]
    fn messages_truncate_by_characters() {
        let long = "\u{e9}".repeat(80);
        let lines = recent_messages(
            &[Announcement::Text(long)],
            MESSAGE_LIMIT,
            MESSAGE_CHAR_BUDGET,
        );
        assert_eq!(lines.first().map(|l| l.chars().count()), Some(55));
    }

    #[test]
    fn keyed_announcements_show_their_text() {
        let keyed = Announcement::Keyed(serde_json::json!("scout"), "crop at 3,4".into());
        assert_eq!(announcement_text(&keyed), "crop at 3,4");
    }

    #[test]
    fn full_budget_lines_fit_their_panels() {
        let widest = "W".repeat(MESSAGE_CHAR_BUDGET);
        for (font, panel) in [
            (MESSAGES_FONT, messages_panel(1)),
            (AGENT_INFO_FONT, agent_info_panel(1, 400.0)),
        ] {
            let text_right = panel.x + TEXT_INSET + glyphs::text_width(&widest, font);
            assert!(text_right <= panel.right() - TEXT_INSET + 1e-3);
        }
    }

    #[test]
    fn agent_info_panel_anchors_bottom_left() {
        let panel = agent_info_panel(2, 500.0);
        assert!((panel.x - PANEL_MARGIN).abs() < f32::EPSILON);
        assert!((panel.bottom() - 492.0).abs() < 1e-4);
    }

    #[test]
    fn agent_info_formats_telemetry() {
        let mut agent = CanonicalAgent::new(3, Position::new(1, 2), Role::Harvester);
        agent.harvested = 4.0;
        agent.exploration_rate = 0.3;
        let lines = agent_info_lines(&[agent], AGENT_INFO_LIMIT, MESSAGE_CHAR_BUDGET);
        assert_eq!(lines, ["A3 harvester (1,2) h:4 e:0.30"]);
    }

    #[test]
    fn agent_info_is_capped() {
        let agents: Vec<_> = (0..12)
            .map(|i| CanonicalAgent::new(i, Position::default(), Role::General))
            .collect();
        assert_eq!(
            agent_info_lines(&agents, AGENT_INFO_LIMIT, MESSAGE_CHAR_BUDGET).len(),
            8
        );
    }
}
