//! # Color Grading
//!
//! Applies a named 3D LUT to an image. Grading is best-effort: a missing or
//! broken LUT leaves the image untouched and the pipeline carries on.
//!
//! ```rust,no_run
//! use photomagic::grading::{apply_lut, LutLibrary};
//!
//! let library = LutLibrary::new("luts");
//! let photo = image::open("photo.jpg").unwrap().to_rgb8();
//! let graded = apply_lut(photo, "kodak_portra", &library);
//! ```

pub mod cube;
pub mod library;
pub mod lut;

pub use cube::{parse_cube, read_cube};
pub use library::{LutLibrary, NO_LUT};
pub use lut::Lut3D;

use std::path::Path;

use image::RgbImage;
use tracing::{debug, warn};

use crate::error::LutError;

/// Grade `image` with the LUT called `lut_name`
///
/// `"none"` returns the image unchanged. Load and transform failures are
/// logged and also return the original image.
pub fn apply_lut(image: RgbImage, lut_name: &str, library: &LutLibrary) -> RgbImage {
    match try_apply_lut(&image, lut_name, library) {
        Ok(Some(graded)) => graded,
        Ok(None) => image,
        Err(e) => {
            warn!("Color grading with '{}' skipped: {}", lut_name, e);
            image
        }
    }
}

/// Grade `image`, reporting failures instead of falling back
///
/// Returns `Ok(None)` for the `"none"` sentinel.
pub fn try_apply_lut(
    image: &RgbImage,
    lut_name: &str,
    library: &LutLibrary,
) -> Result<Option<RgbImage>, LutError> {
    if lut_name.eq_ignore_ascii_case(NO_LUT) {
        return Ok(None);
    }

    let lut = library.load(lut_name)?;
    debug!(
        "Grading {}x{} image with '{}' ({}³)",
        image.width(),
        image.height(),
        lut_name,
        lut.size()
    );
    lut.grade(image).map(Some)
}

/// List selectable looks: `"none"` followed by the LUTs in `lut_dir`
pub fn available_luts(lut_dir: &Path) -> Vec<String> {
    std::iter::once(NO_LUT.to_string())
        .chain(LutLibrary::new(lut_dir).available_luts())
        .collect()
}
