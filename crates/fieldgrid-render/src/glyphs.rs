//! Embedded 5x7 bitmap font for labels and overlay text.
//!
//! Each glyph is seven rows of five bits, most significant bit leftmost.
//! Lowercase letters render as uppercase; characters outside the table
//! render as a hollow box.

/// Lit columns per glyph row.
pub const GLYPH_WIDTH: u8 = 5;

/// Rows per glyph.
pub const GLYPH_ROWS: u8 = 7;

/// Horizontal advance per character, in dots (glyph plus one gap column).
pub const GLYPH_ADVANCE: u8 = 6;

/// Dots per nominal font-size unit.
const DOTS_PER_SIZE: f32 = 10.0;

type Glyph = [u8; GLYPH_ROWS as usize];

const BOX: Glyph = [
    0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111,
];

/// Size of one glyph dot, in units, for a nominal font size.
pub fn dot_size(font_size: f32) -> f32 {
    if font_size.is_finite() && font_size > 0.0 {
        font_size / DOTS_PER_SIZE
    } else {
        0.0
    }
}

/// Width in units of `text` rendered at `font_size`.
#[allow(clippy::cast_precision_loss)]
pub fn text_width(text: &str, font_size: f32) -> f32 {
    dot_size(font_size) * f32::from(GLYPH_ADVANCE) * text.chars().count() as f32
}

/// Height in units of one line of text at `font_size`.
pub fn text_height(font_size: f32) -> f32 {
    dot_size(font_size) * f32::from(GLYPH_ROWS)
}

/// Whether `column` (0 = leftmost) is lit in a glyph row.
pub const fn is_set(row: u8, column: u8) -> bool {
    if column >= GLYPH_WIDTH {
        return false;
    }
    let shift = GLYPH_WIDTH.saturating_sub(column).saturating_sub(1);
    (row >> shift) & 1 == 1
}

/// Bitmap for one character.
#[allow(clippy::too_many_lines)]
pub const fn glyph(ch: char) -> &'static Glyph {
    match ch.to_ascii_uppercase() {
        ' ' => &[0, 0, 0, 0, 0, 0, 0],
        '0' => &[0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => &[0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => &[0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => &[0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => &[0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => &[0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => &[0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => &[0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => &[0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => &[0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'A' => &[0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => &[0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => &[0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => &[0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => &[0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => &[0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => &[0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => &[0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => &[0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => &[0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => &[0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => &[0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => &[0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => &[0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => &[0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => &[0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => &[0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => &[0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => &[0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => &[0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => &[0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => &[0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => &[0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '!' => &[0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '"' => &[0b01010, 0b01010, 0b01010, 0b00000, 0b00000, 0b00000, 0b00000],
        '#' => &[0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010],
        '$' => &[0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100],
        '%' => &[0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011],
        '&' => &[0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101],
        '\'' => &[0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        '(' => &[0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => &[0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '*' => &[0b00000, 0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0b00000],
        '+' => &[0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        ',' => &[0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        '-' => &[0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '.' => &[0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        '/' => &[0b00000, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000],
        ':' => &[0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        ';' => &[0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b00100, 0b01000],
        '<' => &[0b00010, 0b00100, 0b01000, 0b10000, 0b01000, 0b00100, 0b00010],
        '=' => &[0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000],
        '>' => &[0b01000, 0b00100, 0b00010, 0b00001, 0b00010, 0b00100, 0b01000],
        '?' => &[0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        '@' => &[0b01110, 0b10001, 0b00001, 0b01101, 0b10101, 0b10101, 0b01110],
        '[' => &[0b01110, 0b01000, 0b01000, 0b01000, 0b01000, 0b01000, 0b01110],
        ']' => &[0b01110, 0b00010, 0b00010, 0b00010, 0b00010, 0b00010, 0b01110],
        '_' => &[0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111],
        '|' => &[0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        _ => &BOX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_matches_uppercase() {
        assert_eq!(glyph('a'), glyph('A'));
        assert_eq!(glyph('z'), glyph('Z'));
    }

    #[test]
    fn unknown_characters_render_as_box() {
        assert_eq!(glyph('\u{2603}'), &BOX);
        assert_eq!(glyph('~'), &BOX);
    }

    #[test]
    fn bit_order_is_left_to_right() {
        // '1' has its stem in the middle column.
        let rows = glyph('1');
        assert!(rows.iter().skip(1).all(|row| is_set(*row, 2)));
        assert!(!is_set(0b10000, 4));
        assert!(is_set(0b10000, 0));
        assert!(!is_set(0b11111, GLYPH_WIDTH));
    }

    #[test]
    fn metrics_scale_with_font_size() {
        assert!((text_width("AB", 10.0) - 12.0).abs() < 1e-5);
        assert!((text_height(20.0) - 14.0).abs() < 1e-5);
        assert!(dot_size(f32::NAN).abs() < f32::EPSILON);
    }
}
