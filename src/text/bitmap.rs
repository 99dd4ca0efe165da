//! Built-in 5x7 bitmap font, used whenever no font file is selected or the
//! selected one cannot be loaded.
//!
//! Printable ASCII uses the classic column-encoded 5x7 glyphs (bit 0 is the
//! top row; bit 7 carries descenders). Every other visible character is drawn
//! as a double-width hollow box so that wrapping of CJK text still behaves.

use image::RgbImage;

use crate::{canvas::{self, Rect}, text::Typeface};

const GLYPH_COLUMNS: u32 = 5;
const CELL_WIDTH: u32 = 6;
const CELL_HEIGHT: u32 = 8;

#[rustfmt::skip]
const ASCII_GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x56, 0x20, 0x50], // &
    [0x00, 0x08, 0x07, 0x03, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x2A, 0x1C, 0x7F, 0x1C, 0x2A], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x80, 0x70, 0x30, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x00, 0x60, 0x60, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x72, 0x49, 0x49, 0x49, 0x46], // 2
    [0x21, 0x41, 0x49, 0x4D, 0x33], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x31], // 6
    [0x41, 0x21, 0x11, 0x09, 0x07], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x46, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x00, 0x14, 0x00, 0x00], // :
    [0x00, 0x40, 0x34, 0x00, 0x00], // ;
    [0x00, 0x08, 0x14, 0x22, 0x41], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x59, 0x09, 0x06], // ?
    [0x3E, 0x41, 0x5D, 0x59, 0x4E], // @
    [0x7C, 0x12, 0x11, 0x12, 0x7C], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x41, 0x3E], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x41, 0x51, 0x73], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x1C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x26, 0x49, 0x49, 0x49, 0x32], // S
    [0x03, 0x01, 0x7F, 0x01, 0x03], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x03, 0x04, 0x78, 0x04, 0x03], // Y
    [0x61, 0x59, 0x49, 0x4D, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x41], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x41, 0x7F], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x03, 0x07, 0x08, 0x00], // `
    [0x20, 0x54, 0x54, 0x78, 0x40], // a
    [0x7F, 0x28, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x28], // c
    [0x38, 0x44, 0x44, 0x28, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x00, 0x08, 0x7E, 0x09, 0x02], // f
    [0x18, 0xA4, 0xA4, 0x9C, 0x78], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x40, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x78, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0xFC, 0x18, 0x24, 0x24, 0x18], // p
    [0x18, 0x24, 0x24, 0x18, 0xFC], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x24], // s
    [0x04, 0x04, 0x3F, 0x44, 0x24], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x4C, 0x90, 0x90, 0x90, 0x7C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x77, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x02, 0x01, 0x02, 0x04, 0x02], // ~
];

/// Built-in pixel font scaled by an integer factor
#[derive(Debug, Clone, Copy)]
pub struct BitmapFont {
    size: f32,
    scale: u32,
}

impl BitmapFont {
    /// Scale the 8px cell to the largest whole multiple that fits `size`
    pub fn new(size: f32) -> Self {
        let scale = if size.is_finite() {
            ((size / CELL_HEIGHT as f32).floor() as u32).max(1)
        } else {
            1
        };
        Self { size, scale }
    }

    /// Width of one character in cells
    fn cells(ch: char) -> u32 {
        if ch.is_ascii() || ch.is_whitespace() {
            1
        } else {
            2
        }
    }

    fn char_width(&self, ch: char) -> u32 {
        Self::cells(ch) * CELL_WIDTH * self.scale
    }

    fn draw_char(&self, canvas: &mut RgbImage, x: i64, y: i64, ch: char, color: [u8; 3]) {
        let s = self.scale;
        let dot = |canvas: &mut RgbImage, col: u32, row: u32| {
            canvas::fill_rect(
                canvas,
                Rect::new(x + (col * s) as i64, y + (row * s) as i64, s, s),
                color,
            );
        };

        if ch.is_whitespace() || ch.is_control() {
            return;
        }

        if (' '..='~').contains(&ch) {
            let glyph = &ASCII_GLYPHS[ch as usize - ' ' as usize];
            for (col, bits) in glyph.iter().enumerate().take(GLYPH_COLUMNS as usize) {
                for row in 0..CELL_HEIGHT {
                    if bits & (1 << row) != 0 {
                        dot(canvas, col as u32, row);
                    }
                }
            }
            return;
        }

        // Hollow box spanning two cells, one dot of padding on each side
        let right = Self::cells(ch) * CELL_WIDTH - 2;
        for col in 1..=right {
            dot(canvas, col, 0);
            dot(canvas, col, CELL_HEIGHT - 2);
        }
        for row in 0..CELL_HEIGHT - 1 {
            dot(canvas, 1, row);
            dot(canvas, right, row);
        }
    }
}

impl Typeface for BitmapFont {
    fn size(&self) -> f32 {
        self.size
    }

    fn line_height(&self) -> u32 {
        CELL_HEIGHT * self.scale
    }

    fn measure(&mut self, text: &str) -> u32 {
        text.chars().map(|ch| self.char_width(ch)).sum()
    }

    fn draw(&mut self, canvas: &mut RgbImage, x: i64, y: i64, text: &str, color: [u8; 3]) {
        let mut pen = x;
        for ch in text.chars() {
            self.draw_char(canvas, pen, y, ch, color);
            pen += self.char_width(ch) as i64;
        }
    }
}
