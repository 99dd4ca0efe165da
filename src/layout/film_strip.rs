use image::{imageops::{self, FilterType}, RgbImage};
use tracing::{debug, warn};

use crate::{
    canvas::{self, Rect},
    config::FilmStripConfig,
    layout::{GapMode, Layout, LayoutGeometry},
};

/// Vertical film strip: photos stacked in a content column between two
/// perforated rails
pub struct FilmStripLayout {
    config: FilmStripConfig,
    gap_mode: GapMode,
}

impl FilmStripLayout {
    pub fn new(config: FilmStripConfig, gap_mode: GapMode) -> Self {
        Self { config, gap_mode }
    }
}

impl Layout for FilmStripLayout {
    fn name(&self) -> &str {
        "film-strip"
    }

    fn description(&self) -> &str {
        "Photos stacked on a black film strip with sprocket holes down both rails"
    }

    fn required_images(&self) -> usize {
        3
    }

    fn geometry(&self, dims: &[(u32, u32)]) -> LayoutGeometry {
        LayoutGeometry::film_strip(dims, self.gap_mode, &self.config)
    }

    fn compose(&self, images: &[RgbImage]) -> RgbImage {
        create_film_strip_layout(images, self.gap_mode, &self.config)
    }
}

/// Stack `images` top to bottom at the content width and punch sprocket
/// holes down both rails.
pub fn create_film_strip_layout(
    images: &[RgbImage],
    gap_mode: GapMode,
    config: &FilmStripConfig,
) -> RgbImage {
    if images.is_empty() {
        warn!("Film strip requested with no images, drawing an empty strip");
        let mut placeholder = canvas::filled(config.canvas_width(), config.content_width, config.background);
        draw_sprocket_holes(&mut placeholder, config);
        return placeholder;
    }

    let dims: Vec<(u32, u32)> = images.iter().map(|img| img.dimensions()).collect();
    let geometry = LayoutGeometry::film_strip(&dims, gap_mode, config);
    debug!(
        "Film strip canvas {}x{} for {} image(s), {:?}",
        geometry.width,
        geometry.height,
        images.len(),
        gap_mode
    );

    let mut composed = canvas::filled(geometry.width, geometry.height, config.background);

    for (image, segment) in images.iter().zip(&geometry.segments) {
        let photo = segment.photo;
        if photo.width == 0 || photo.height == 0 {
            warn!("Skipping degenerate {}x{} image", image.width(), image.height());
            continue;
        }

        let resized = resize_to(image, photo.width, photo.height);
        canvas::paste(&mut composed, &resized, photo.x, photo.y);
    }

    draw_sprocket_holes(&mut composed, config);
    composed
}

/// Draw holes on both rails at a fixed pitch over the full canvas height.
///
/// The pitch is independent of photo boundaries.
fn draw_sprocket_holes(composed: &mut RgbImage, config: &FilmStripConfig) {
    let spacing = config.hole_spacing();
    let step = (spacing.floor() as u32).max(1);
    let first = (spacing / 2.0).floor() as u32;

    let margin = config.hole_margin() as i64;
    let left_x = margin;
    let right_x = (config.rail_width + config.content_width) as i64 + margin;

    let mut y = first;
    while y < composed.height() {
        for x in [left_x, right_x] {
            canvas::fill_rect(
                composed,
                Rect::new(x, y as i64, config.hole_size, config.hole_size),
                config.hole_color,
            );
        }
        y += step;
    }
}

pub(crate) fn resize_to(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Lanczos3)
}
