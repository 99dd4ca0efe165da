//! Pure geometry for both layouts.
//!
//! The layout engine uses these records to place photos, and the text
//! compositor uses the same records to anchor captions, so the two stages
//! can never disagree about where a photo ends.

use crate::{
    canvas::Rect,
    config::{FilmStripConfig, PosterConfig},
    layout::GapMode,
};

/// Height of an image scaled to `target_width`, preserving aspect ratio.
///
/// Rounds down. A zero-width source has no meaningful aspect ratio and
/// yields zero.
///
/// # Examples
/// ```
/// # use photomagic::layout::scaled_height_for_width;
/// assert_eq!(scaled_height_for_width(1600, 1200, 800), 600);
/// assert_eq!(scaled_height_for_width(0, 1200, 800), 0);
/// ```
pub fn scaled_height_for_width(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return 0;
    }
    (height as u64 * target_width as u64 / width as u64) as u32
}

/// Dimensions after shrinking to at most `max_width`. Never upscales.
pub fn fit_within_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width > max_width {
        (max_width, scaled_height_for_width(width, height, max_width))
    } else {
        (width, height)
    }
}

/// One photo's slot on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Where the resized photo is pasted
    pub photo: Rect,

    /// Region available to the caption. Poster captions flow down from its
    /// top; its width bounds wrapping in both layouts.
    pub text_box: Rect,

    /// Row the last caption line ends on. Film strip blocks grow upward from
    /// here, which lies above the photo top when the photo is shorter than
    /// the bottom margin.
    pub caption_bottom: i64,
}

/// Canvas size and per-photo placement for one composition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutGeometry {
    pub width: u32,
    pub height: u32,
    pub segments: Vec<Segment>,
}

impl LayoutGeometry {
    /// Stack photos vertically between two sprocket rails.
    ///
    /// `dims` are the original (pre-resize) photo dimensions.
    pub fn film_strip(dims: &[(u32, u32)], gap_mode: GapMode, config: &FilmStripConfig) -> Self {
        let gap = gap_mode.gap(config);
        let caption = &config.caption;
        let text_width = config.content_width.saturating_sub(caption.inset * 2);

        let mut segments = Vec::with_capacity(dims.len());
        let mut current_y: i64 = 0;

        for &(w, h) in dims {
            let photo_height = scaled_height_for_width(w, h, config.content_width);
            let photo = Rect::new(config.rail_width as i64, current_y, config.content_width, photo_height);
            let caption_bottom = photo.bottom() - caption.bottom_margin as i64;
            let text_box = Rect::new(
                photo.x + caption.inset as i64,
                current_y,
                text_width,
                photo_height.saturating_sub(caption.bottom_margin),
            );

            segments.push(Segment { photo, text_box, caption_bottom });
            current_y += photo_height as i64 + gap as i64;
        }

        let photos: u64 = segments.iter().map(|s| s.photo.height as u64).sum();
        let gaps = gap as u64 * segments.len().saturating_sub(1) as u64;

        Self {
            width: config.canvas_width(),
            height: (photos + gaps) as u32,
            segments,
        }
    }

    /// Frame a single photo in an asymmetric mat. Only the first entry of
    /// `dims` is used.
    pub fn poster(dims: &[(u32, u32)], config: &PosterConfig) -> Self {
        let side = config.side_mat;
        let (photo_width, photo_height) = dims
            .first()
            .map(|&(w, h)| fit_within_width(w, h, config.max_width))
            .unwrap_or((0, 0));

        let width = side * 2 + photo_width;
        let height = side + photo_height + config.bottom_mat;

        let photo = Rect::new(side as i64, side as i64, photo_width, photo_height);
        let text_top = photo.bottom() + config.caption.photo_gap as i64;
        let text_box = Rect::new(
            side as i64,
            text_top,
            width - side * 2,
            (height as i64 - text_top).max(0) as u32,
        );

        Self {
            width,
            height,
            segments: if dims.is_empty() {
                Vec::new()
            } else {
                vec![Segment { photo, text_box, caption_bottom: text_box.bottom() }]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_height_rounds_down() {
        assert_eq!(scaled_height_for_width(1000, 667, 600), 400);
        assert_eq!(scaled_height_for_width(600, 900, 600), 900);
        assert_eq!(scaled_height_for_width(300, 200, 600), 400);
    }

    #[test]
    fn test_fit_never_upscales() {
        assert_eq!(fit_within_width(1600, 1200, 800), (800, 600));
        assert_eq!(fit_within_width(640, 480, 800), (640, 480));
        assert_eq!(fit_within_width(800, 1000, 800), (800, 1000));
    }

    #[test]
    fn test_film_strip_gapped_heights() {
        let config = FilmStripConfig::default();
        let dims = [(600, 900), (600, 1200), (600, 600)];
        let geometry = LayoutGeometry::film_strip(&dims, GapMode::Gapped, &config);

        assert_eq!(geometry.width, 720);
        assert_eq!(geometry.height, 900 + 1200 + 600 + 50);

        let tops: Vec<i64> = geometry.segments.iter().map(|s| s.photo.y).collect();
        assert_eq!(tops, vec![0, 925, 2150]);
        assert!(geometry.segments.iter().all(|s| s.photo.x == 60));
    }

    #[test]
    fn test_film_strip_gap_difference() {
        let config = FilmStripConfig::default();
        let dims = [(1200, 800); 3];
        let gapped = LayoutGeometry::film_strip(&dims, GapMode::Gapped, &config);
        let seamless = LayoutGeometry::film_strip(&dims, GapMode::Seamless, &config);

        assert_eq!(seamless.height, gapped.height - 25 * 2);
    }

    #[test]
    fn test_film_strip_single_image_has_no_gap() {
        let config = FilmStripConfig::default();
        let geometry = LayoutGeometry::film_strip(&[(600, 400)], GapMode::Gapped, &config);
        assert_eq!(geometry.height, 400);
    }

    #[test]
    fn test_film_strip_text_box_anchor() {
        let config = FilmStripConfig::default();
        let geometry = LayoutGeometry::film_strip(&[(600, 400), (600, 300)], GapMode::Gapped, &config);
        let second = geometry.segments[1];

        assert_eq!(second.text_box.x, 80);
        assert_eq!(second.text_box.width, 560);
        // Bottom edge sits 20px above the photo bottom
        assert_eq!(second.text_box.bottom(), 425 + 300 - 20);
        assert_eq!(second.caption_bottom, 425 + 300 - 20);
    }

    #[test]
    fn test_film_strip_anchor_above_short_photo() {
        let config = FilmStripConfig::default();
        // A 6000x50 panorama shrinks to 600x5, shorter than the 20px margin
        let geometry = LayoutGeometry::film_strip(&[(600, 400), (6000, 50)], GapMode::Gapped, &config);
        let second = geometry.segments[1];

        assert_eq!(second.photo, Rect::new(60, 425, 600, 5));
        assert_eq!(second.caption_bottom, 410);
        assert_eq!(second.text_box.height, 0);
    }

    #[test]
    fn test_poster_halves_wide_photo() {
        let config = PosterConfig::default();
        let geometry = LayoutGeometry::poster(&[(1600, 1200)], &config);

        assert_eq!((geometry.width, geometry.height), (900, 830));
        let segment = geometry.segments[0];
        assert_eq!(segment.photo, Rect::new(50, 50, 800, 600));
        assert_eq!(segment.text_box.y, 50 + 600 + 40);
        assert_eq!(segment.text_box.width, 800);
        assert_eq!(segment.caption_bottom, 830);
    }

    #[test]
    fn test_poster_ignores_extra_images() {
        let config = PosterConfig::default();
        let one = LayoutGeometry::poster(&[(400, 300)], &config);
        let many = LayoutGeometry::poster(&[(400, 300), (2000, 2000)], &config);
        assert_eq!(one, many);
    }
}
