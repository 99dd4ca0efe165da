// Minimal run of the whole pipeline on synthetic photos

use image::{Rgb, RgbImage};
use photomagic::{
    captions::{ResponseCaptioner, StaticCaptioner},
    composition::{CompositionEngine, CompositionRequest},
    config::Config,
    grading::Lut3D,
    layout::{GapMode, LayoutStyle},
    text::FontSpec,
    CaptionStyle,
};

fn gradient(width: u32, height: u32, tint: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let fx = x as f32 / width as f32;
        let fy = y as f32 / height as f32;
        Rgb([
            (tint[0] as f32 * fx) as u8,
            (tint[1] as f32 * fy) as u8,
            (tint[2] as f32 * (1.0 - fx)) as u8,
        ])
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📷 Testing Photomagic Core Functionality");

    // Test 1: LUT grading
    println!("\n1. Testing identity LUT...");
    let photo = gradient(320, 240, [255, 200, 160]);
    let graded = Lut3D::identity(17).grade(&photo)?;
    assert_eq!(graded, photo);
    println!("   ✅ Identity LUT leaves pixels unchanged");

    // Test 2: Film strip
    println!("\n2. Testing film strip...");
    let engine = CompositionEngine::new(Config::default());
    let photos = vec![
        gradient(1200, 800, [255, 120, 60]),
        gradient(800, 800, [60, 255, 120]),
        gradient(600, 900, [120, 60, 255]),
    ];
    let request = CompositionRequest {
        layout: LayoutStyle::FilmStrip { gap_mode: GapMode::Gapped },
        lut: "none".to_string(),
        font: FontSpec::Default,
        caption_style: CaptionStyle::EnglishProse,
    };
    let captioner = ResponseCaptioner::new(
        r#"{"texts": ["Morning light on the harbour", "Noon", "A long walk home after the rain"]}"#,
    );
    let strip = engine.compose(&photos, &request, &captioner, |stage| println!("   {}", stage))?;
    println!("   Canvas: {}x{}", strip.image.width(), strip.image.height());
    assert_eq!(strip.image.dimensions(), (720, 1950));

    // Test 3: Poster
    println!("\n3. Testing poster...");
    let request = CompositionRequest {
        layout: LayoutStyle::Poster,
        ..request
    };
    let poster = engine.compose(
        &photos[..1],
        &request,
        &StaticCaptioner::new(vec!["晨光 over the water".to_string()]),
        |stage| println!("   {}", stage),
    )?;
    println!("   Canvas: {}x{}", poster.image.width(), poster.image.height());
    assert_eq!(poster.image.dimensions(), (900, 763));

    for (name, image) in [("minimal_strip.png", &strip.image), ("minimal_poster.png", &poster.image)] {
        match image.save(name) {
            Ok(()) => println!("   📁 Output saved to: {}", name),
            Err(e) => println!("   ⚠️  Could not save file: {}", e),
        }
    }

    println!("\n🎉 All tests passed! Photomagic core is working.");
    Ok(())
}
