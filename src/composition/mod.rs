//! # Composition Engine
//!
//! The composition engine runs color grading, layout and captioning in order
//! and reports progress through [`Stage`] updates.

pub mod engine;

// Re-exports for convenience
pub use engine::{load_images, Composition, CompositionEngine, CompositionRequest, Stage};
