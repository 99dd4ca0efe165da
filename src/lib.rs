//! # Photomagic
//!
//! Turn a handful of photos into a captioned film strip or matted poster,
//! color graded with a 3D LUT.
//!
//! The pipeline runs one way: raw photos are graded, the graded photos are
//! laid out on a canvas, captions are requested for the canvas, and the
//! captions are wrapped and drawn into it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use photomagic::{
//!     captions::{CaptionStyle, StaticCaptioner},
//!     composition::{load_images, CompositionEngine, CompositionRequest},
//!     config::Config,
//!     layout::{GapMode, LayoutStyle},
//!     text::FontSpec,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let images = load_images(&["a.jpg", "b.jpg", "c.jpg"])?;
//! let engine = CompositionEngine::new(Config::default());
//!
//! let request = CompositionRequest {
//!     layout: LayoutStyle::FilmStrip { gap_mode: GapMode::Gapped },
//!     lut: "kodak_portra".to_string(),
//!     font: FontSpec::Default,
//!     caption_style: CaptionStyle::EnglishProse,
//! };
//! let captioner = StaticCaptioner::new(vec!["Morning".into(), "Noon".into(), "Night".into()]);
//!
//! let composition = engine.compose(&images, &request, &captioner, |stage| println!("{}", stage))?;
//! composition.image.save("strip.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`layout`] - Film strip and poster geometry and canvas composition
//! - [`grading`] - `.cube` parsing and LUT color grading
//! - [`text`] - Fonts, wrapping and caption drawing
//! - [`captions`] - Prompt and reply handling for the captioning collaborator
//! - [`composition`] - The engine that runs the stages in order
//! - [`config`] - Configuration management

pub mod canvas;
pub mod captions;
pub mod composition;
pub mod config;
pub mod error;
pub mod grading;
pub mod layout;
pub mod text;

// Re-export commonly used types for convenience
pub use crate::{
    captions::{CaptionStyle, Captioner},
    composition::{Composition, CompositionEngine, CompositionRequest, Stage},
    config::Config,
    error::{ComposerError, Result},
    layout::{GapMode, Layout, LayoutStyle},
};
