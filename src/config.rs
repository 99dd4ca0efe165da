use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for Photomagic
///
/// Every pixel constant used by the layout engine and the text compositor
/// lives here so that both stages read the same numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Film strip geometry and caption typography
    pub film_strip: FilmStripConfig,

    /// Poster geometry and caption typography
    pub poster: PosterConfig,

    /// Resource directories for LUTs and fonts
    pub resources: ResourceConfig,

    /// Placeholder captions
    pub captions: CaptionConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.film_strip.validate()?;
        self.poster.validate()?;
        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Film strip layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmStripConfig {
    /// Width every photo is scaled to (pixels)
    pub content_width: u32,

    /// Width of each sprocket rail (pixels)
    pub rail_width: u32,

    /// Side length of a sprocket hole (pixels)
    pub hole_size: u32,

    /// Vertical hole pitch as a multiple of the hole size
    pub hole_spacing_factor: f32,

    /// Gap between photos in gapped mode (pixels)
    pub gap: u32,

    /// Canvas background
    pub background: [u8; 3],

    /// Sprocket hole fill
    pub hole_color: [u8; 3],

    /// Caption typography
    pub caption: FilmStripCaptionConfig,
}

impl Default for FilmStripConfig {
    fn default() -> Self {
        Self {
            content_width: 600,
            rail_width: 60,
            hole_size: 12,
            hole_spacing_factor: 2.5,
            gap: 25,
            background: [0, 0, 0],
            hole_color: [25, 25, 25],
            caption: FilmStripCaptionConfig::default(),
        }
    }
}

impl FilmStripConfig {
    /// Vertical distance between consecutive sprocket holes
    pub fn hole_spacing(&self) -> f32 {
        self.hole_size as f32 * self.hole_spacing_factor
    }

    /// Horizontal offset of a hole inside its rail
    pub fn hole_margin(&self) -> u32 {
        self.rail_width.saturating_sub(self.hole_size) / 2
    }

    /// Total canvas width: both rails plus the content column
    pub fn canvas_width(&self) -> u32 {
        self.rail_width * 2 + self.content_width
    }

    fn validate(&self) -> Result<()> {
        if self.content_width == 0 {
            return Err(invalid("film_strip.content_width", self.content_width).into());
        }

        if self.hole_size == 0 || self.hole_size > self.rail_width {
            return Err(invalid(
                "film_strip.hole_size",
                format!("{} (rail {})", self.hole_size, self.rail_width),
            )
            .into());
        }

        if !(self.hole_spacing() >= 1.0) {
            return Err(invalid("film_strip.hole_spacing_factor", self.hole_spacing_factor).into());
        }

        self.caption.validate()
    }
}

/// Caption typography for film strip segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmStripCaptionConfig {
    /// Font size (pixels); also the line advance
    pub font_size: f32,

    /// Horizontal inset from the content column on each side (pixels)
    pub inset: u32,

    /// Distance from the text block bottom to the photo bottom (pixels)
    pub bottom_margin: u32,

    /// Text fill
    pub color: [u8; 3],

    /// Outline color
    pub stroke_color: [u8; 3],

    /// Outline width (pixels, 0 disables the outline)
    pub stroke_width: u32,
}

impl Default for FilmStripCaptionConfig {
    fn default() -> Self {
        Self {
            font_size: 28.0,
            inset: 20,
            bottom_margin: 20,
            color: [240, 240, 240],
            stroke_color: [0, 0, 0],
            stroke_width: 1,
        }
    }
}

impl FilmStripCaptionConfig {
    fn validate(&self) -> Result<()> {
        if !(self.font_size > 0.0) {
            return Err(invalid("film_strip.caption.font_size", self.font_size).into());
        }
        Ok(())
    }
}

/// Poster layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosterConfig {
    /// Photos wider than this are scaled down (pixels)
    pub max_width: u32,

    /// Mat width on the top, left and right (pixels)
    pub side_mat: u32,

    /// Mat height below the photo, reserved for the caption (pixels)
    pub bottom_mat: u32,

    /// Mat color
    pub mat_color: [u8; 3],

    /// Caption typography
    pub caption: PosterCaptionConfig,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            max_width: 800,
            side_mat: 50,
            bottom_mat: 180,
            mat_color: [255, 255, 255],
            caption: PosterCaptionConfig::default(),
        }
    }
}

impl PosterConfig {
    fn validate(&self) -> Result<()> {
        if self.max_width == 0 {
            return Err(invalid("poster.max_width", self.max_width).into());
        }
        self.caption.validate()
    }
}

/// Caption typography for the poster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosterCaptionConfig {
    /// Font size (pixels)
    pub font_size: f32,

    /// Gap between the photo bottom and the first text line (pixels)
    pub photo_gap: u32,

    /// Line advance as a multiple of the font size
    pub line_spacing: f32,

    /// Text fill
    pub color: [u8; 3],
}

impl Default for PosterCaptionConfig {
    fn default() -> Self {
        Self {
            font_size: 40.0,
            photo_gap: 40,
            line_spacing: 1.2,
            color: [50, 50, 50],
        }
    }
}

impl PosterCaptionConfig {
    fn validate(&self) -> Result<()> {
        if !(self.font_size > 0.0) {
            return Err(invalid("poster.caption.font_size", self.font_size).into());
        }

        if !(self.line_spacing > 0.0) {
            return Err(invalid("poster.caption.line_spacing", self.line_spacing).into());
        }

        Ok(())
    }
}

/// Where named LUTs and fonts are looked up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Directory holding `<name>.cube` files
    pub lut_dir: PathBuf,

    /// Directory holding `.ttf`/`.otf`/`.ttc` files
    pub font_dir: PathBuf,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            lut_dir: PathBuf::from("luts"),
            font_dir: PathBuf::from("fonts"),
        }
    }
}

/// Placeholder captions used when the captioning collaborator gives nothing usable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionConfig {
    /// Drawn on the poster when the caption list is empty
    pub placeholder: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            placeholder: "No caption available".to_string(),
        }
    }
}
