//! A drawing backend wrapper that renders text with a built-in bitmap font.
//!
//! Titles, axis labels, tick labels, legends and annotations all go through
//! [`GlyphTextBackend::draw_text`], so a chart looks the same on every
//! machine whether or not system fonts are installed.

use plotters_backend::{
    text_anchor, BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend,
    DrawingErrorKind, FontTransform,
};

/// Rows of every glyph
const GLYPH_HEIGHT: usize = 7;

/// Advance of a space or an unknown character, in glyph pixels
const SPACE_WIDTH: i32 = 3;

/// Wraps a backend, delegating everything except text
pub struct GlyphTextBackend<DB> {
    inner: DB,
}

impl<DB> GlyphTextBackend<DB> {
    pub fn new(inner: DB) -> Self {
        Self { inner }
    }
}

impl<DB: DrawingBackend> DrawingBackend for GlyphTextBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.fill_polygon(vert, style)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        let color = style.color();
        if color.alpha == 0.0 || text.trim().is_empty() {
            return Ok(());
        }

        let scale = glyph_scale(style.size());
        let (width, height) = text_extent(text, scale);
        let anchor = style.anchor();
        let dx = match anchor.h_pos {
            text_anchor::HPos::Left => 0,
            text_anchor::HPos::Center => -width / 2,
            text_anchor::HPos::Right => -width,
        };
        let dy = match anchor.v_pos {
            text_anchor::VPos::Top => 0,
            text_anchor::VPos::Center => -height / 2,
            text_anchor::VPos::Bottom => -height,
        };
        let transform = style.transform();

        let mut cursor = dx;
        for ch in text.chars() {
            let Some(glyph) = glyph(ch) else {
                cursor += SPACE_WIDTH * scale;
                continue;
            };
            for (row, bits) in glyph.rows.iter().enumerate() {
                for col in 0..glyph.width {
                    if bits & (1 << (glyph.width - 1 - col)) == 0 {
                        continue;
                    }
                    let left = cursor + col as i32 * scale;
                    let top = dy + row as i32 * scale;
                    for sy in 0..scale {
                        for sx in 0..scale {
                            let (ox, oy) = rotate(&transform, left + sx, top + sy);
                            self.inner.draw_pixel((pos.0 + ox, pos.1 + oy), color)?;
                        }
                    }
                }
            }
            cursor += (glyph.width as i32 + 1) * scale;
        }
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        let (width, height) = text_extent(text, glyph_scale(style.size()));
        Ok((width.max(0) as u32, height as u32))
    }
}

/// Whole-pixel magnification of the 7-row glyphs for a font size in pixels
fn glyph_scale(size: f64) -> i32 {
    ((size / 8.0).round() as i32).max(1)
}

/// Width and height of `text` drawn at `scale`, before rotation
fn text_extent(text: &str, scale: i32) -> (i32, i32) {
    let mut width = 0;
    for ch in text.chars() {
        width += match glyph(ch) {
            Some(g) => (g.width as i32 + 1) * scale,
            None => SPACE_WIDTH * scale,
        };
    }
    // No gap after the last glyph
    if width > 0 {
        width -= scale;
    }
    (width, GLYPH_HEIGHT as i32 * scale)
}

/// Offset of a text-frame pixel after the text rotation
fn rotate(transform: &FontTransform, x: i32, y: i32) -> (i32, i32) {
    match transform {
        FontTransform::None => (x, y),
        FontTransform::Rotate90 => (-y, x),
        FontTransform::Rotate180 => (-x, -y),
        FontTransform::Rotate270 => (y, -x),
    }
}

#[derive(Clone, Copy)]
struct Glyph {
    width: u8,
    rows: [u8; GLYPH_HEIGHT],
}

const fn g5(rows: [u8; GLYPH_HEIGHT]) -> Option<Glyph> {
    Some(Glyph { width: 5, rows })
}

/// 5×7 glyph of a character; lowercase letters use the capitals
fn glyph(ch: char) -> Option<Glyph> {
    match ch.to_ascii_uppercase() {
        'A' => g5([0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'B' => g5([0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
        'C' => g5([0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
        'D' => g5([0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100]),
        'E' => g5([0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
        'F' => g5([0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
        'G' => g5([0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
        'H' => g5([0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'I' => g5([0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
        'J' => g5([0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
        'K' => g5([0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
        'L' => g5([0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'M' => g5([0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
        'N' => g5([0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
        'O' => g5([0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'P' => g5([0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
        'Q' => g5([0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
        'R' => g5([0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
        'S' => g5([0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
        'T' => g5([0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
        'U' => g5([0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'V' => g5([0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
        'W' => g5([0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
        'X' => g5([0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
        'Y' => g5([0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
        'Z' => g5([0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
        '0' => g5([0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
        '1' => g5([0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
        '2' => g5([0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
        '3' => g5([0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
        '4' => g5([0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
        '5' => g5([0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
        '6' => g5([0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
        '7' => g5([0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
        '8' => g5([0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
        '9' => g5([0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
        '-' => g5([0, 0, 0, 0b11111, 0, 0, 0]),
        '+' => g5([0, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0]),
        '=' => g5([0, 0, 0b11111, 0, 0b11111, 0, 0]),
        '_' => g5([0, 0, 0, 0, 0, 0, 0b11111]),
        '/' => g5([0b00001, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000]),
        '%' => g5([0b11001, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b10011]),
        '.' => Some(Glyph {
            width: 1,
            rows: [0, 0, 0, 0, 0, 0, 1],
        }),
        ':' => Some(Glyph {
            width: 1,
            rows: [0, 0, 1, 0, 0, 1, 0],
        }),
        '\'' => Some(Glyph {
            width: 1,
            rows: [1, 1, 0, 0, 0, 0, 0],
        }),
        ',' => Some(Glyph {
            width: 2,
            rows: [0, 0, 0, 0, 0, 0b01, 0b10],
        }),
        '(' => Some(Glyph {
            width: 3,
            rows: [0b001, 0b010, 0b100, 0b100, 0b100, 0b010, 0b001],
        }),
        ')' => Some(Glyph {
            width: 3,
            rows: [0b100, 0b010, 0b001, 0b001, 0b001, 0b010, 0b100],
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_extent() {
        // H, I and a dot, each followed by one column of gap except the last
        assert_eq!(text_extent("HI.", 1), (6 + 6 + 1, 7));
        assert_eq!(text_extent("a b", 2), (2 * (6 + 3 + 5), 14));
        assert_eq!(text_extent("", 1), (0, 7));
    }

    #[test]
    fn test_scale_follows_font_size() {
        assert_eq!(glyph_scale(4.0), 1);
        assert_eq!(glyph_scale(16.0), 2);
        assert_eq!(glyph_scale(30.0), 4);
    }

    #[test]
    fn test_rotation_turns_text_upwards() {
        // Text running right becomes text running up the canvas
        assert_eq!(rotate(&FontTransform::Rotate270, 5, 0), (0, -5));
        assert_eq!(rotate(&FontTransform::None, 5, 1), (5, 1));
    }

    #[test]
    fn test_every_glyph_fits_its_width() {
        for ch in ('A'..='Z').chain('0'..='9').chain("-+=_/%.:',()".chars()) {
            let g = glyph(ch).unwrap();
            assert!(g.rows.iter().all(|r| (*r as u32) < (1 << g.width)), "{}", ch);
        }
        assert!(glyph('~').is_none());
    }
}
