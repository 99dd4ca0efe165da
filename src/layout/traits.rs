use std::fmt;
use std::str::FromStr;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::{
    config::{Config, FilmStripConfig},
    error::LayoutError,
    layout::{FilmStripLayout, LayoutGeometry, PosterLayout},
};

/// Core trait implemented by both layouts
pub trait Layout: Send + Sync {
    /// Returns the unique name of this layout
    fn name(&self) -> &str;

    /// Returns a human-readable description of this layout
    fn description(&self) -> &str;

    /// Number of photos the layout consumes
    fn required_images(&self) -> usize;

    /// Compute canvas size and photo placement from original dimensions
    fn geometry(&self, dims: &[(u32, u32)]) -> LayoutGeometry;

    /// Compose the photos into a single canvas
    ///
    /// Never fails: an empty photo list produces a placeholder canvas.
    fn compose(&self, images: &[RgbImage]) -> RgbImage;
}

/// Whether film strip photos touch or are separated by a black band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapMode {
    Seamless,
    #[default]
    Gapped,
}

impl GapMode {
    /// Gap between consecutive photos in pixels
    pub fn gap(self, config: &FilmStripConfig) -> u32 {
        match self {
            GapMode::Seamless => 0,
            GapMode::Gapped => config.gap,
        }
    }
}

impl FromStr for GapMode {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "seamless" => Ok(GapMode::Seamless),
            "gapped" => Ok(GapMode::Gapped),
            _ => Err(LayoutError::UnknownGapMode { name: s.to_string() }),
        }
    }
}

/// Which layout to compose, with its variant options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutStyle {
    FilmStrip { gap_mode: GapMode },
    Poster,
}

impl LayoutStyle {
    /// Look a layout up by its CLI name (`film-strip` or `poster`)
    pub fn from_name(name: &str, gap_mode: GapMode) -> Result<Self, LayoutError> {
        match name.to_ascii_lowercase().replace('_', "-").as_str() {
            "film-strip" | "filmstrip" => Ok(LayoutStyle::FilmStrip { gap_mode }),
            "poster" => Ok(LayoutStyle::Poster),
            _ => Err(LayoutError::UnknownLayout { name: name.to_string() }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayoutStyle::FilmStrip { .. } => "film-strip",
            LayoutStyle::Poster => "poster",
        }
    }

    /// Number of photos the layout consumes
    pub fn required_images(&self) -> usize {
        match self {
            LayoutStyle::FilmStrip { .. } => 3,
            LayoutStyle::Poster => 1,
        }
    }

    /// Instantiate the layout with the geometry from `config`
    pub fn layout(&self, config: &Config) -> Box<dyn Layout> {
        match *self {
            LayoutStyle::FilmStrip { gap_mode } => {
                Box::new(FilmStripLayout::new(config.film_strip.clone(), gap_mode))
            }
            LayoutStyle::Poster => Box::new(PosterLayout::new(config.poster.clone())),
        }
    }

    /// Reject a photo count that does not match the layout
    pub fn check_image_count(&self, actual: usize) -> Result<(), LayoutError> {
        let expected = self.required_images();
        if actual != expected {
            return Err(LayoutError::WrongImageCount {
                layout: self.name().to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

impl fmt::Display for LayoutStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutStyle::FilmStrip { gap_mode } => write!(f, "film-strip ({:?})", gap_mode),
            LayoutStyle::Poster => write!(f, "poster"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_images() {
        let strip = LayoutStyle::FilmStrip { gap_mode: GapMode::Seamless };
        assert_eq!(strip.required_images(), 3);
        assert_eq!(LayoutStyle::Poster.required_images(), 1);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            LayoutStyle::from_name("Film_Strip", GapMode::Seamless).unwrap(),
            LayoutStyle::FilmStrip { gap_mode: GapMode::Seamless }
        );
        assert_eq!(LayoutStyle::from_name("poster", GapMode::Gapped).unwrap(), LayoutStyle::Poster);
        assert!(LayoutStyle::from_name("collage", GapMode::Gapped).is_err());
    }

    #[test]
    fn test_gap_mode_parse() {
        assert_eq!("gapped".parse::<GapMode>().unwrap(), GapMode::Gapped);
        assert_eq!("SEAMLESS".parse::<GapMode>().unwrap(), GapMode::Seamless);
        assert!("wide".parse::<GapMode>().is_err());
    }

    #[test]
    fn test_check_image_count() {
        let strip = LayoutStyle::FilmStrip { gap_mode: GapMode::Gapped };
        assert!(strip.check_image_count(3).is_ok());

        match strip.check_image_count(2) {
            Err(LayoutError::WrongImageCount { expected, actual, .. }) => {
                assert_eq!((expected, actual), (3, 2));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_layout_instances() {
        let config = Config::default();
        let poster = LayoutStyle::Poster.layout(&config);
        assert_eq!(poster.name(), "poster");
        assert_eq!(poster.required_images(), 1);

        let strip = LayoutStyle::FilmStrip { gap_mode: GapMode::Gapped }.layout(&config);
        assert_eq!(strip.name(), "film-strip");
        assert!(!strip.description().is_empty());
    }

    #[test]
    fn test_geometry_matches_composed_canvas() {
        let config = Config::default();
        let photos = vec![
            RgbImage::new(1000, 667),
            RgbImage::new(640, 480),
            RgbImage::new(480, 640),
        ];
        let dims: Vec<(u32, u32)> = photos.iter().map(|p| p.dimensions()).collect();

        for style in [
            LayoutStyle::FilmStrip { gap_mode: GapMode::Gapped },
            LayoutStyle::FilmStrip { gap_mode: GapMode::Seamless },
            LayoutStyle::Poster,
        ] {
            let layout = style.layout(&config);
            let used = &photos[..layout.required_images()];
            let geometry = layout.geometry(&dims[..used.len()]);
            let canvas = layout.compose(used);
            assert_eq!(canvas.dimensions(), (geometry.width, geometry.height), "{}", style);
        }
    }
}
