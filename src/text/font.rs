use std::fmt;
use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{debug, warn};

use crate::{
    error::FontError,
    text::{BitmapFont, OutlineFont},
};

/// Name that selects the platform's sans-serif face
pub const DEFAULT_FONT: &str = "default";

/// Name that selects the built-in bitmap font
pub const BUILTIN_FONT: &str = "builtin";

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

/// Something that can measure and draw a single line of text
///
/// Coordinates are the top-left corner of the line box; origins may lie
/// outside the canvas and drawing clips.
pub trait Typeface {
    /// Nominal size in pixels
    fn size(&self) -> f32;

    /// Height of one line box in pixels
    fn line_height(&self) -> u32;

    /// Advance width of `text` laid out on a single line
    fn measure(&mut self, text: &str) -> u32;

    /// Fill `text` with `color`
    fn draw(&mut self, canvas: &mut RgbImage, x: i64, y: i64, text: &str, color: [u8; 3]);

    /// Fill `text` over an outline of `stroke_width` pixels
    ///
    /// The outline is stamped at every offset within the stroke radius before
    /// the fill is drawn on top.
    fn draw_outlined(
        &mut self,
        canvas: &mut RgbImage,
        x: i64,
        y: i64,
        text: &str,
        fill: [u8; 3],
        stroke: [u8; 3],
        stroke_width: u32,
    ) {
        let w = stroke_width as i64;
        for dy in -w..=w {
            for dx in -w..=w {
                if dx != 0 || dy != 0 {
                    self.draw(canvas, x + dx, y + dy, text, stroke);
                }
            }
        }
        self.draw(canvas, x, y, text, fill);
    }
}

/// Which font captions are set in
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FontSpec {
    /// The platform's sans-serif face
    #[default]
    Default,
    /// The built-in bitmap font
    Builtin,
    /// A file name inside the font directory
    Named(String),
}

impl FontSpec {
    /// Parse a CLI/config value; `"default"` and `"builtin"` match in any case
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(DEFAULT_FONT) {
            FontSpec::Default
        } else if name.eq_ignore_ascii_case(BUILTIN_FONT) {
            FontSpec::Builtin
        } else {
            FontSpec::Named(name.to_string())
        }
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSpec::Default => f.write_str(DEFAULT_FONT),
            FontSpec::Builtin => f.write_str(BUILTIN_FONT),
            FontSpec::Named(name) => f.write_str(name),
        }
    }
}

/// Load a font file from `font_dir`
pub fn load_font(font_dir: &Path, file_name: &str, size: f32) -> Result<OutlineFont, FontError> {
    let path: PathBuf = font_dir.join(file_name);
    if !path.is_file() {
        return Err(FontError::NotFound { path: path.display().to_string() });
    }
    OutlineFont::from_file(&path, size)
}

/// Resolve a font spec, falling back to the system face
///
/// Never fails: a font file that cannot be loaded is replaced by the system
/// sans-serif face, and [`BitmapFont`] is used only when no system face exists.
pub fn resolve_typeface(spec: &FontSpec, font_dir: &Path, size: f32) -> Box<dyn Typeface> {
    match spec {
        FontSpec::Default => system_or_builtin(size),
        FontSpec::Builtin => Box::new(BitmapFont::new(size)),
        FontSpec::Named(name) => match load_font(font_dir, name, size) {
            Ok(font) => {
                debug!("Using font {} at {}px", name, size);
                Box::new(font)
            }
            Err(e) => {
                warn!("Falling back to the system font: {}", e);
                system_or_builtin(size)
            }
        },
    }
}

fn system_or_builtin(size: f32) -> Box<dyn Typeface> {
    match OutlineFont::system(size) {
        Ok(font) => {
            debug!("Using system font {} at {}px", font.family(), size);
            Box::new(font)
        }
        Err(e) => {
            warn!("Falling back to the built-in font: {}", e);
            Box::new(BitmapFont::new(size))
        }
    }
}

/// List selectable fonts: `"default"`, `"builtin"`, then font files in `font_dir`, sorted
pub fn available_fonts(font_dir: &Path) -> Vec<String> {
    let mut fonts: Vec<String> = std::fs::read_dir(font_dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| {
                    path.is_file()
                        && path
                            .extension()
                            .and_then(|ext| ext.to_str())
                            .is_some_and(|ext| {
                                FONT_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known))
                            })
                })
                .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    fonts.sort();
    let mut listing = vec![DEFAULT_FONT.to_string(), BUILTIN_FONT.to_string()];
    listing.extend(fonts);
    listing
}
