//! # Text Compositor
//!
//! Wraps caption strings to the text boxes computed by the layout geometry and
//! burns them into the composed canvas.
//!
//! Font files and the platform's sans-serif face are shaped with `parley` and
//! rasterized with `vello_cpu`. When no outline face can be loaded, a built-in
//! bitmap font is used instead so captioning never fails.

pub mod bitmap;
pub mod compositor;
pub mod font;
pub mod outline;
pub mod wrap;

pub use bitmap::BitmapFont;
pub use compositor::draw_captions;
pub use font::{available_fonts, load_font, resolve_typeface, FontSpec, Typeface, BUILTIN_FONT, DEFAULT_FONT};
pub use outline::{OutlineFont, TextBrush};
pub use wrap::wrap_text;

/// DejaVu Sans, bundled for tests that need real outlines
#[cfg(test)]
pub(crate) fn test_font_bytes() -> Vec<u8> {
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSans.ttf")).to_vec()
}
