//! # Layout Engine
//!
//! Turns a list of photos into one composed canvas. Canvas dimensions depend
//! only on the layout, its configuration and the photos' aspect ratios.
//!
//! ## Layouts
//!
//! - **Film strip**: three photos scaled to a fixed content width, stacked on
//!   black with sprocket holes on both rails, optionally separated by gaps
//! - **Poster**: one photo, shrunk to a maximum width, in an asymmetric white mat
//!
//! ## Usage
//!
//! ```rust,no_run
//! use photomagic::config::Config;
//! use photomagic::layout::{GapMode, LayoutStyle};
//!
//! let config = Config::default();
//! let layout = LayoutStyle::FilmStrip { gap_mode: GapMode::Gapped }.layout(&config);
//! let photos = vec![image::RgbImage::new(600, 400); 3];
//! let canvas = layout.compose(&photos);
//! ```

pub mod film_strip;
pub mod geometry;
pub mod poster;
pub mod traits;

pub use film_strip::{create_film_strip_layout, FilmStripLayout};
pub use geometry::{fit_within_width, scaled_height_for_width, LayoutGeometry, Segment};
pub use poster::{create_poster_layout, PosterLayout};
pub use traits::{GapMode, Layout, LayoutStyle};
