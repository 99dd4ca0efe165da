use std::fmt;
use std::path::Path;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    captions::{captions_or_placeholder, CaptionStyle, Captioner},
    config::Config,
    error::Result,
    grading::{self, LutLibrary, NO_LUT},
    layout::LayoutStyle,
    text::{self, FontSpec},
};

/// Everything the user picks for one composition
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionRequest {
    pub layout: LayoutStyle,
    /// LUT name, or `"none"`
    pub lut: String,
    pub font: FontSpec,
    pub caption_style: CaptionStyle,
}

impl Default for CompositionRequest {
    fn default() -> Self {
        Self {
            layout: LayoutStyle::FilmStrip { gap_mode: Default::default() },
            lut: NO_LUT.to_string(),
            font: FontSpec::Default,
            caption_style: CaptionStyle::default(),
        }
    }
}

/// Pipeline progress reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Grading,
    Composing,
    Captioning,
    Drawing,
    Done,
}

impl Stage {
    /// Status line shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            Stage::Grading => "Applying color grade...",
            Stage::Composing => "Building layout...",
            Stage::Captioning => "Requesting captions...",
            Stage::Drawing => "Drawing captions...",
            Stage::Done => "Done!",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of a finished composition
#[derive(Debug, Clone)]
pub struct Composition {
    /// Final image with captions burned in
    pub image: RgbImage,
    /// Captions that were drawn, after placeholder recovery
    pub captions: Vec<String>,
    /// Final status line
    pub status: String,
}

/// Runs the photo pipeline: grade, lay out, caption, draw
///
/// 1. Grading - apply the selected LUT to every photo
/// 2. Layout - compose the graded photos into a film strip or poster
/// 3. Captioning - ask the captioner about the composed canvas
/// 4. Drawing - burn the captions in, placed by the original photo sizes
///
/// Only an image count that does not match the layout stops the run; every
/// other failure degrades to a usable image.
pub struct CompositionEngine {
    config: Config,
    luts: LutLibrary,
}

impl CompositionEngine {
    /// Create a new engine; LUTs are resolved from `config.resources.lut_dir`
    pub fn new(config: Config) -> Self {
        let luts = LutLibrary::new(config.resources.lut_dir.clone());
        Self { config, luts }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn luts(&self) -> &LutLibrary {
        &self.luts
    }

    /// Main composition method - orchestrates the entire pipeline
    ///
    /// `on_status` is called as each stage starts and once more at the end.
    pub fn compose<F>(
        &self,
        images: &[RgbImage],
        request: &CompositionRequest,
        captioner: &dyn Captioner,
        mut on_status: F,
    ) -> Result<Composition>
    where
        F: FnMut(Stage),
    {
        request.layout.check_image_count(images.len())?;

        info!("📷 Starting composition");
        info!("   Layout: {}", request.layout);
        info!("   LUT: {}", request.lut);
        info!("   Font: {}", request.font);
        info!("   Caption style: {}", request.caption_style);

        // Step 1: Grading
        on_status(Stage::Grading);
        let graded = self.grade_images(images, &request.lut);

        // Step 2: Layout
        on_status(Stage::Composing);
        let composed = self.compose_layout(&graded, request.layout);

        // Step 3: Captioning
        on_status(Stage::Captioning);
        let captions = self.request_captions(&composed, request, captioner, images.len());

        // Step 4: Drawing, placed by the original dimensions
        on_status(Stage::Drawing);
        let image = text::draw_captions(
            composed,
            &captions,
            request.layout,
            &request.font,
            images,
            &self.config,
        );

        on_status(Stage::Done);
        info!("🎉 Composition complete: {}x{}", image.width(), image.height());

        Ok(Composition {
            image,
            captions,
            status: Stage::Done.message().to_string(),
        })
    }

    // ==========================================
    // PIPELINE STEPS
    // ==========================================

    fn grade_images(&self, images: &[RgbImage], lut: &str) -> Vec<RgbImage> {
        info!("🎨 Step 1: Grading {} image(s) with '{}'", images.len(), lut);
        images
            .iter()
            .map(|img| grading::apply_lut(img.clone(), lut, &self.luts))
            .collect()
    }

    fn compose_layout(&self, graded: &[RgbImage], style: LayoutStyle) -> RgbImage {
        info!("🧩 Step 2: Composing {} layout", style.name());
        let layout = style.layout(&self.config);
        let canvas = layout.compose(graded);
        debug!("   Canvas: {}x{}", canvas.width(), canvas.height());
        canvas
    }

    fn request_captions(
        &self,
        composed: &RgbImage,
        request: &CompositionRequest,
        captioner: &dyn Captioner,
        count: usize,
    ) -> Vec<String> {
        info!("💬 Step 3: Requesting {} caption(s) ({})", count, request.caption_style);
        let result = captioner.generate_captions(composed, request.caption_style, count);
        let captions = captions_or_placeholder(result, &self.config.captions.placeholder);
        for (i, caption) in captions.iter().enumerate() {
            debug!("   Caption {}: {:?}", i + 1, caption);
        }
        captions
    }
}

/// Decode image files to 8-bit RGB, in order
pub fn load_images<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<RgbImage>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            debug!("Loading image {:?}", path);
            Ok(image::open(path)?.to_rgb8())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        captions::{ResponseCaptioner, StaticCaptioner},
        error::{ComposerError, LayoutError},
        layout::GapMode,
    };
    use image::Rgb;
    use tempfile::tempdir;

    fn photo(w: u32, h: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(color))
    }

    fn engine_with_luts(dir: &Path) -> CompositionEngine {
        let mut config = Config::default();
        config.resources.lut_dir = dir.to_path_buf();
        config.resources.font_dir = dir.to_path_buf();
        CompositionEngine::new(config)
    }

    #[test]
    fn test_wrong_count_is_rejected_before_processing() {
        let dir = tempdir().unwrap();
        let engine = engine_with_luts(dir.path());
        let mut stages = Vec::new();

        let result = engine.compose(
            &vec![photo(10, 10, [0, 0, 0]); 2],
            &CompositionRequest::default(),
            &StaticCaptioner::default(),
            |stage| stages.push(stage),
        );

        assert!(matches!(
            result,
            Err(ComposerError::Layout(LayoutError::WrongImageCount { expected: 3, actual: 2, .. }))
        ));
        assert!(stages.is_empty());
    }

    #[test]
    fn test_film_strip_pipeline() {
        let dir = tempdir().unwrap();
        let engine = engine_with_luts(dir.path());
        let images = vec![
            photo(1200, 800, [200, 30, 30]),
            photo(600, 600, [30, 200, 30]),
            photo(300, 400, [30, 30, 200]),
        ];
        let captioner = ResponseCaptioner::new(r#"{"texts": ["one", "two", "three"]}"#);
        let mut stages = Vec::new();

        let composition = engine
            .compose(&images, &CompositionRequest::default(), &captioner, |stage| stages.push(stage))
            .unwrap();

        // 400 + 600 + 800 plus two gaps
        assert_eq!(composition.image.dimensions(), (720, 1850));
        assert_eq!(composition.captions, vec!["one", "two", "three"]);
        assert_eq!(composition.status, "Done!");
        assert_eq!(
            stages,
            vec![Stage::Grading, Stage::Composing, Stage::Captioning, Stage::Drawing, Stage::Done]
        );
    }

    #[test]
    fn test_missing_lut_and_font_still_compose() {
        let dir = tempdir().unwrap();
        let engine = engine_with_luts(dir.path());
        let request = CompositionRequest {
            layout: LayoutStyle::Poster,
            lut: "does_not_exist".to_string(),
            font: FontSpec::Named("missing.ttf".to_string()),
            caption_style: CaptionStyle::EnglishProse,
        };

        let composition = engine
            .compose(&[photo(1600, 1200, [90, 90, 90])], &request, &ResponseCaptioner::new(""), |_| {})
            .unwrap();

        assert_eq!(composition.image.dimensions(), (900, 830));
        assert_eq!(composition.captions, vec![engine.config().captions.placeholder.clone()]);
        // Photo area is ungraded
        let px = composition.image.get_pixel(450, 300).0;
        assert!(px.iter().all(|&c| c.abs_diff(90) <= 1), "{:?}", px);
    }

    #[test]
    fn test_seamless_strip_has_no_gaps() {
        let dir = tempdir().unwrap();
        let engine = engine_with_luts(dir.path());
        let request = CompositionRequest {
            layout: LayoutStyle::FilmStrip { gap_mode: GapMode::Seamless },
            ..CompositionRequest::default()
        };

        let composition = engine
            .compose(&vec![photo(600, 100, [1, 2, 3]); 3], &request, &StaticCaptioner::default(), |_| {})
            .unwrap();

        assert_eq!(composition.image.dimensions(), (720, 300));
        assert!(composition.captions.is_empty());
    }

    #[test]
    fn test_load_images() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.png");
        photo(4, 3, [10, 20, 30]).save(&path).unwrap();

        let images = load_images(&[&path]).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].get_pixel(1, 1).0, [10, 20, 30]);

        assert!(load_images(&[dir.path().join("missing.png")]).is_err());
    }
}
