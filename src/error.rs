use thiserror::Error;

/// Main error type for the Photomagic library
#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Color grading error: {0}")]
    Grading(#[from] LutError),

    #[error("Font error: {0}")]
    Font(#[from] FontError),

    #[error("Captioning error: {0}")]
    Caption(#[from] CaptionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Layout-specific errors
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("{layout} layout needs {expected} image(s), got {actual}")]
    WrongImageCount {
        layout: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown layout: {name}")]
    UnknownLayout { name: String },

    #[error("Unknown gap mode: {name}")]
    UnknownGapMode { name: String },
}

/// LUT loading and application errors
#[derive(Error, Debug)]
pub enum LutError {
    #[error("LUT not found: {path}")]
    NotFound { path: String },

    #[error("Invalid LUT name: {name}")]
    InvalidName { name: String },

    #[error("Failed to parse LUT: {reason}")]
    ParseFailed { reason: String },

    #[error("LUT transform failed: {reason}")]
    TransformFailed { reason: String },

    #[error("IO error reading LUT: {0}")]
    Io(#[from] std::io::Error),
}

/// Font loading errors
#[derive(Error, Debug)]
pub enum FontError {
    #[error("Font file not found: {path}")]
    NotFound { path: String },

    #[error("Invalid font file {path}: {reason}")]
    Invalid { path: String, reason: String },

    #[error("Invalid font size: {size}")]
    InvalidSize { size: f32 },

    #[error("No system sans-serif font is installed")]
    NoSystemFont,
}

/// Captioning collaborator errors
#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("Caption request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Caption response was empty")]
    EmptyResponse,

    #[error("Unknown caption style: {name}")]
    UnknownStyle { name: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using ComposerError
pub type Result<T> = std::result::Result<T, ComposerError>;

impl ComposerError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if the pipeline can continue past this error with a degraded result
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Grading falls back to the ungraded image
            Self::Grading(_) => true,
            // Fonts fall back to the system face, then the built-in one
            Self::Font(_) => true,
            // Captions fall back to a placeholder
            Self::Caption(_) => true,
            // Wrong image counts, bad configs and undecodable inputs stop the run
            _ => false,
        }
    }

    /// Get a user-friendly error message suitable for a status line
    pub fn user_message(&self) -> String {
        match self {
            Self::Layout(LayoutError::WrongImageCount { expected, .. }) => {
                format!("Error: this layout needs {} image(s)!", expected)
            }
            Self::Layout(LayoutError::UnknownLayout { name }) => {
                format!("Layout '{}' not found. Available layouts: film-strip, poster", name)
            }
            Self::Caption(CaptionError::UnknownStyle { name }) => {
                format!(
                    "Caption style '{}' not found. Available styles: short_simplified, poetic_traditional, english_prose",
                    name
                )
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Image(e) => format!("Could not read or write image: {}", e),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_count_is_not_recoverable() {
        let err: ComposerError = LayoutError::WrongImageCount {
            layout: "film-strip".to_string(),
            expected: 3,
            actual: 2,
        }
        .into();

        assert!(!err.is_recoverable());
        assert_eq!(err.user_message(), "Error: this layout needs 3 image(s)!");
    }

    #[test]
    fn test_resource_errors_are_recoverable() {
        let lut: ComposerError = LutError::NotFound { path: "luts/x.cube".to_string() }.into();
        let font: ComposerError = FontError::NotFound { path: "fonts/x.ttf".to_string() }.into();

        assert!(lut.is_recoverable());
        assert!(font.is_recoverable());
    }
}
