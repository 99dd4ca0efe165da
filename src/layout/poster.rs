use image::RgbImage;
use tracing::{debug, warn};

use crate::{
    canvas,
    config::PosterConfig,
    layout::{film_strip::resize_to, Layout, LayoutGeometry},
};

/// Single photo in a gallery-print mat: narrow top and sides, a deep bottom
/// margin for the caption
pub struct PosterLayout {
    config: PosterConfig,
}

impl PosterLayout {
    pub fn new(config: PosterConfig) -> Self {
        Self { config }
    }
}

impl Layout for PosterLayout {
    fn name(&self) -> &str {
        "poster"
    }

    fn description(&self) -> &str {
        "One photo in a white mat with a wide bottom margin for the caption"
    }

    fn required_images(&self) -> usize {
        1
    }

    fn geometry(&self, dims: &[(u32, u32)]) -> LayoutGeometry {
        LayoutGeometry::poster(dims, &self.config)
    }

    fn compose(&self, images: &[RgbImage]) -> RgbImage {
        create_poster_layout(images, &self.config)
    }
}

/// Mat the first image; extra images are ignored.
pub fn create_poster_layout(images: &[RgbImage], config: &PosterConfig) -> RgbImage {
    let Some(image) = images.first() else {
        warn!("Poster requested with no image, drawing an empty mat");
        let side = config.side_mat;
        return canvas::filled(
            side * 2 + config.max_width,
            side + config.max_width + config.bottom_mat,
            config.mat_color,
        );
    };

    if images.len() > 1 {
        debug!("Poster uses the first image, ignoring {} extra", images.len() - 1);
    }

    let geometry = LayoutGeometry::poster(&[image.dimensions()], config);
    let mut composed = canvas::filled(geometry.width, geometry.height, config.mat_color);

    if let Some(segment) = geometry.segments.first() {
        let photo = segment.photo;
        if photo.width > 0 && photo.height > 0 {
            let resized = resize_to(image, photo.width, photo.height);
            canvas::paste(&mut composed, &resized, photo.x, photo.y);
        }
    }

    composed
}
