use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn, Level};

use photomagic::{
    captions::{Captioner, ResponseCaptioner, StaticCaptioner},
    composition::{load_images, CompositionEngine, CompositionRequest},
    config::Config,
    grading::{self, NO_LUT},
    layout::{GapMode, LayoutStyle},
    text::{self, FontSpec},
    CaptionStyle, ComposerError,
};

#[derive(Parser)]
#[command(
    name = "photomagic",
    version,
    about = "Compose photos into captioned film strips and posters",
    long_about = "Photomagic grades photos with a 3D LUT, lays them out as a film strip or a matted poster, and burns wrapped captions into the result."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose photos into a captioned image
    Compose {
        /// Layout to build (film-strip, poster)
        #[arg(short, long, default_value = "film-strip")]
        layout: String,

        /// Film strip spacing (gapped, seamless)
        #[arg(short, long, default_value = "gapped")]
        gap: String,

        /// LUT name from the LUT directory, or "none"
        #[arg(long, default_value = NO_LUT)]
        lut: String,

        /// Font file from the font directory, "default" (system sans-serif) or "builtin"
        #[arg(short, long, default_value = text::DEFAULT_FONT)]
        font: String,

        /// Caption style (short_simplified, poetic_traditional, english_prose)
        #[arg(short = 's', long, default_value = "short_simplified")]
        caption_style: String,

        /// Caption text, once per photo from the top
        #[arg(long = "caption")]
        captions: Vec<String>,

        /// File holding a raw captioning reply to parse
        #[arg(short, long, conflicts_with = "captions")]
        response: Option<PathBuf>,

        /// Output image path (defaults to photomagic_<timestamp>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Photos to compose
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },

    /// List available LUTs and fonts
    List,

    /// Write the default configuration to a file
    InitConfig {
        /// Destination TOML file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Photomagic v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };

    match cli.command {
        Command::Compose {
            layout,
            gap,
            lut,
            font,
            caption_style,
            captions,
            response,
            output,
            images,
        } => {
            let gap_mode = gap.parse::<GapMode>().map_err(report)?;
            let request = CompositionRequest {
                layout: LayoutStyle::from_name(&layout, gap_mode).map_err(report)?,
                lut,
                font: FontSpec::from_name(&font),
                caption_style: caption_style
                    .parse::<CaptionStyle>()
                    .map_err(report)?,
            };

            let response = match response {
                Some(path) => Some(
                    tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("reading caption reply {:?}", path))?,
                ),
                None => None,
            };

            let output = output.unwrap_or_else(default_output_name);
            compose(config, request, images, captions, response, output).await
        }
        Command::List => {
            list_resources(&config);
            Ok(())
        }
        Command::InitConfig { path } => {
            Config::default().save_to_file(&path)?;
            info!("Default configuration written to {:?}", path);
            Ok(())
        }
    }
}

async fn compose(
    config: Config,
    request: CompositionRequest,
    image_paths: Vec<PathBuf>,
    captions: Vec<String>,
    response: Option<String>,
    output: PathBuf,
) -> Result<()> {
    info!("Photos: {:?}", image_paths);
    info!("Output: {:?}", output);

    // The pipeline is synchronous; keep it off the async workers
    let composition = tokio::task::spawn_blocking(move || -> Result<_> {
        let images = load_images(&image_paths).map_err(report)?;

        let captioner: Box<dyn Captioner> = match response {
            Some(raw) => Box::new(ResponseCaptioner::new(raw)),
            None => Box::new(StaticCaptioner::new(captions)),
        };

        let engine = CompositionEngine::new(config);
        let composition = engine
            .compose(&images, &request, captioner.as_ref(), |stage| info!("{}", stage))
            .map_err(report)?;
        Ok(composition)
    })
    .await??;

    composition
        .image
        .save(&output)
        .with_context(|| format!("saving {:?}", output))?;

    info!("{} Output saved to: {:?}", composition.status, output);
    Ok(())
}

fn list_resources(config: &Config) {
    println!("LUTs ({}):", config.resources.lut_dir.display());
    for name in grading::available_luts(&config.resources.lut_dir) {
        println!("  {}", name);
    }

    println!("Fonts ({}):", config.resources.font_dir.display());
    for name in text::available_fonts(&config.resources.font_dir) {
        println!("  {}", name);
    }

    println!("Caption styles:");
    for style in CaptionStyle::ALL {
        println!("  {}", style);
    }
}

fn default_output_name() -> PathBuf {
    PathBuf::from(format!(
        "photomagic_{}.png",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Log the user-facing message before handing the error to anyhow
fn report<E: Into<ComposerError>>(err: E) -> anyhow::Error {
    let err: ComposerError = err.into();
    if err.is_recoverable() {
        warn!("{}", err.user_message());
    } else {
        error!("{}", err.user_message());
    }
    err.into()
}
