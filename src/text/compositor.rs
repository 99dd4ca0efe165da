use image::RgbImage;
use tracing::debug;

use crate::{
    config::Config,
    layout::{LayoutGeometry, LayoutStyle},
    text::{resolve_typeface, wrap_text, FontSpec},
};

/// Burn captions into a composed canvas
///
/// Placement comes from [`LayoutGeometry`] computed on `original_images`, the
/// same records the layout engine used, so captions stay aligned with their
/// photos. Missing captions draw nothing. Never fails.
pub fn draw_captions(
    image: RgbImage,
    captions: &[String],
    layout: LayoutStyle,
    font: &FontSpec,
    original_images: &[RgbImage],
    config: &Config,
) -> RgbImage {
    let dims: Vec<(u32, u32)> = original_images.iter().map(|img| img.dimensions()).collect();

    match layout {
        LayoutStyle::Poster => draw_poster_caption(image, captions, font, &dims, config),
        LayoutStyle::FilmStrip { gap_mode } => {
            let geometry = LayoutGeometry::film_strip(&dims, gap_mode, &config.film_strip);
            draw_film_strip_captions(image, captions, font, &geometry, config)
        }
    }
}

fn draw_poster_caption(
    mut image: RgbImage,
    captions: &[String],
    font: &FontSpec,
    dims: &[(u32, u32)],
    config: &Config,
) -> RgbImage {
    let geometry = LayoutGeometry::poster(dims, &config.poster);
    let Some(segment) = geometry.segments.first() else {
        return image;
    };

    let style = &config.poster.caption;
    let text = captions
        .first()
        .map(String::as_str)
        .unwrap_or(&config.captions.placeholder);

    let mut typeface = resolve_typeface(font, &config.resources.font_dir, style.font_size);
    let lines = wrap_text(typeface.as_mut(), text, segment.text_box.width);
    let advance = style.font_size * style.line_spacing;
    let canvas_width = image.width() as i64;

    debug!("Drawing {} poster caption line(s)", lines.len());
    for (i, line) in lines.iter().enumerate() {
        let line_width = typeface.measure(line) as i64;
        let x = (canvas_width - line_width) / 2;
        let y = segment.text_box.y + (i as f32 * advance).round() as i64;
        typeface.draw(&mut image, x, y, line, style.color);
    }
    image
}

fn draw_film_strip_captions(
    mut image: RgbImage,
    captions: &[String],
    font: &FontSpec,
    geometry: &LayoutGeometry,
    config: &Config,
) -> RgbImage {
    let style = &config.film_strip.caption;
    let mut typeface = resolve_typeface(font, &config.resources.font_dir, style.font_size);

    for (i, segment) in geometry.segments.iter().enumerate() {
        let text = captions.get(i).map(String::as_str).unwrap_or("");
        let lines = wrap_text(typeface.as_mut(), text, segment.text_box.width);
        if lines.is_empty() {
            continue;
        }

        let block_height = (lines.len() as f32 * style.font_size).round() as i64;
        let start_y = segment.caption_bottom - block_height;
        debug!("Segment {}: {} caption line(s) from y={}", i, lines.len(), start_y);

        for (j, line) in lines.iter().enumerate() {
            let y = start_y + (j as f32 * style.font_size).round() as i64;
            if style.stroke_width > 0 {
                typeface.draw_outlined(
                    &mut image,
                    segment.text_box.x,
                    y,
                    line,
                    style.color,
                    style.stroke_color,
                    style.stroke_width,
                );
            } else {
                typeface.draw(&mut image, segment.text_box.x, y, line, style.color);
            }
        }
    }
    image
}
