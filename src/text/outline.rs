use std::borrow::Cow;
use std::path::Path;

use image::RgbImage;
use parley::fontique::GenericFamily;
use parley::style::{FontStack, StyleProperty};

use crate::{canvas, error::FontError, text::Typeface};

/// RGBA8 brush color carried through parley layouts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl TextBrush {
    fn opaque([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A TrueType/OpenType face shaped with parley and rasterized with vello_cpu
///
/// Characters the primary family lacks are shaped with system fallback faces,
/// so every glyph run is rasterized with its own font data.
pub struct OutlineFont {
    size: f32,
    family: String,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
}

impl std::fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFont")
            .field("family", &self.family)
            .field("size", &self.size)
            .finish()
    }
}

impl OutlineFont {
    /// Read a font file and prepare it at `size` pixels
    pub fn from_file(path: &Path, size: f32) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|e| FontError::Invalid {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(bytes, size).map_err(|e| match e {
            FontError::Invalid { reason, .. } => FontError::Invalid {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Prepare an in-memory font at `size` pixels
    pub fn from_bytes(bytes: Vec<u8>, size: f32) -> Result<Self, FontError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(FontError::InvalidSize { size });
        }

        let invalid = |reason: &str| FontError::Invalid {
            path: "<memory>".to_string(),
            reason: reason.to_string(),
        };

        let mut font_ctx = parley::FontContext::new();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| invalid("no font families in file"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| invalid("font family has no name"))?
            .to_string();

        Ok(Self {
            size,
            family,
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
        })
    }

    /// The platform's sans-serif face at `size` pixels
    pub fn system(size: f32) -> Result<Self, FontError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(FontError::InvalidSize { size });
        }

        let mut font_ctx = parley::FontContext::new();
        let family_id = font_ctx
            .collection
            .generic_families(GenericFamily::SansSerif)
            .next()
            .ok_or(FontError::NoSystemFont)?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or(FontError::NoSystemFont)?
            .to_string();

        Ok(Self {
            size,
            family,
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    fn layout(&mut self, text: &str, brush: TextBrush) -> parley::Layout<TextBrush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(StyleProperty::FontStack(FontStack::Source(Cow::Owned(
            self.family.clone(),
        ))));
        builder.push_default(StyleProperty::FontSize(self.size));
        builder.push_default(StyleProperty::Brush(brush));

        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl Typeface for OutlineFont {
    fn size(&self) -> f32 {
        self.size
    }

    fn line_height(&self) -> u32 {
        (self.size * 1.2).ceil() as u32
    }

    fn measure(&mut self, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }
        let layout = self.layout(text, TextBrush::default());
        layout
            .lines()
            .map(|line| line.metrics().advance)
            .fold(0.0f32, f32::max)
            .ceil() as u32
    }

    fn draw(&mut self, canvas: &mut RgbImage, x: i64, y: i64, text: &str, color: [u8; 3]) {
        if text.trim().is_empty() {
            return;
        }

        let layout = self.layout(text, TextBrush::opaque(color));
        let width = (layout.width().ceil() as u32 + 2).min(u16::MAX as u32) as u16;
        let height = (layout.height().ceil() as u32 + 2).min(u16::MAX as u32) as u16;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(run.run().font())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);

        let row_len = width as usize * 4;
        for (py, row) in pixmap.data_as_u8_slice().chunks_exact(row_len).enumerate() {
            for (px, rgba) in row.chunks_exact(4).enumerate() {
                if rgba[3] == 0 {
                    continue;
                }
                canvas::blend_premultiplied(
                    canvas,
                    x + px as i64,
                    y + py as i64,
                    [rgba[0], rgba[1], rgba[2], rgba[3]],
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::test_font_bytes;
    use tempfile::tempdir;

    const WHITE: [u8; 3] = [255, 255, 255];

    fn dejavu(size: f32) -> OutlineFont {
        OutlineFont::from_bytes(test_font_bytes(), size).unwrap()
    }

    /// Columns and rows touched by ink, as (min_x, max_x, min_y, max_y)
    fn inked_bounds(canvas: &RgbImage, background: [u8; 3]) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, px) in canvas.enumerate_pixels() {
            if px.0 == background {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, x, y, y),
                Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
            });
        }
        bounds
    }

    #[test]
    fn test_draw_inks_the_measured_width() {
        let mut font = dejavu(40.0);
        assert_eq!(font.family(), "DejaVu Sans");

        let text = "HHHHHHHH";
        let measured = font.measure(text);
        assert!(measured > 200, "measured {}", measured);

        let mut canvas = canvas::filled(600, 200, WHITE);
        font.draw(&mut canvas, 50, 50, text, [0, 0, 0]);

        let (x0, x1, y0, y1) = inked_bounds(&canvas, WHITE).expect("nothing was drawn");
        let inked = x1 - x0 + 1;
        // Side bearings keep the ink slightly narrower than the advance
        assert!(inked <= measured, "inked {} > measured {}", inked, measured);
        assert!(inked + 12 >= measured, "inked {} vs measured {}", inked, measured);

        // Ink sits inside the line box that starts at the draw origin
        assert!(x0 >= 50 && x0 < 56, "x0 = {}", x0);
        assert!(y0 >= 50 && y1 < 50 + font.line_height(), "rows {}..={}", y0, y1);

        // Solid stems are painted with the fill color
        let stem_dark = (y0..=y1).any(|y| canvas.get_pixel(x0 + 2, y).0 == [0, 0, 0]);
        assert!(stem_dark);
    }

    #[test]
    fn test_draw_clips_at_canvas_edges() {
        let mut font = dejavu(40.0);
        let mut canvas = canvas::filled(60, 30, WHITE);
        font.draw(&mut canvas, -20, -15, "HH", [0, 0, 0]);
        assert!(inked_bounds(&canvas, WHITE).is_some());
    }

    #[test]
    fn test_measure_grows_with_text() {
        let mut font = dejavu(28.0);
        assert_eq!(font.measure(""), 0);
        let one = font.measure("H");
        let two = font.measure("HH");
        assert!(one > 0);
        assert!(two >= 2 * one - 1 && two <= 2 * one + 1, "{} vs {}", one, two);
        assert_eq!(font.line_height(), 34);
    }

    #[test]
    fn test_rejects_bad_size() {
        assert!(matches!(
            OutlineFont::from_bytes(Vec::new(), 0.0),
            Err(FontError::InvalidSize { .. })
        ));
        assert!(matches!(
            OutlineFont::from_bytes(Vec::new(), f32::INFINITY),
            Err(FontError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_rejects_garbage_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.ttf");
        std::fs::write(&path, b"definitely not an sfnt").unwrap();

        match OutlineFont::from_file(&path, 24.0) {
            Err(FontError::Invalid { path: reported, .. }) => {
                assert!(reported.ends_with("garbage.ttf"));
            }
            other => panic!("expected invalid font, got {:?}", other),
        }
    }

    #[test]
    fn test_brush_is_opaque() {
        let brush = TextBrush::opaque([1, 2, 3]);
        assert_eq!((brush.r, brush.g, brush.b, brush.a), (1, 2, 3, 255));
    }
}
