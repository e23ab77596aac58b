use std::path::PathBuf;

use anyhow::{Context, Result};
use captcha::{CaptchaSolver, ImageSource, ScreenMapping, Solution, SolverConfig};
use clap::Parser;
use ocr::TesseractEngine;
use tracing_subscriber::EnvFilter;

/// Command line arguments. Flags override values from `--config`.
#[derive(Parser, Debug)]
#[command(
    name = "captcha-solver",
    version,
    about = "Find the repeated glyph in a CAPTCHA image and print where to click it"
)]
struct Args {
    /// Image URL (http/https) or path to a saved image
    source: ImageSource,

    /// JSON file with solver and recognizer settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for PostProcess.png and PostProcessBlur.png (default: ~/Documents)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Neutrality threshold for the black/white mask (default: 25)
    #[arg(long)]
    sensitivity: Option<u16>,

    /// Gaussian sigma of the smoothing pass, 0 disables it (default: 1)
    #[arg(long)]
    blur_radius: Option<f32>,

    /// Tesseract language pack
    #[arg(long)]
    lang: Option<String>,

    /// Tesseract page segmentation mode
    #[arg(long)]
    psm: Option<i32>,

    /// Drop recognized words at or below this confidence
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Only recognize these characters
    #[arg(long)]
    whitelist: Option<String>,

    /// Screen x of the image's top-left corner
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    origin_x: i32,

    /// Screen y of the image's top-left corner
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    origin_y: i32,

    /// Width the image is displayed at on screen
    #[arg(long, requires = "display_height")]
    display_width: Option<u32>,

    /// Height the image is displayed at on screen
    #[arg(long, requires = "display_width")]
    display_height: Option<u32>,

    /// Print the whole solution as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let config = build_config(&args)?;
    let engine = TesseractEngine::with_options(config.recognizer.clone());
    let mut solver = CaptchaSolver::new(config, engine).context("invalid solver configuration")?;

    let solution = solver
        .solve_source(&args.source)
        .with_context(|| format!("failed to solve captcha from {}", args.source))?;
    let mapping = screen_mapping(&args, &solution);

    if args.json {
        let output = serde_json::json!({
            "solution": solution,
            "screen": mapping.map_all(&solution.clicks),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("recognized: {:?}", solution.key);
    let Some(duplicate) = solution.duplicate else {
        println!("no repeated character found; nothing to click");
        return Ok(());
    };
    println!("duplicate: {duplicate:?}");
    for (index, click) in solution.clicks.iter().enumerate() {
        let (sx, sy) = mapping.to_screen(*click);
        println!(
            "  click {:02}: image ({:.2}, {:.2}) -> screen ({}, {})",
            index + 1,
            click.x,
            click.y,
            sx,
            sy
        );
    }
    Ok(())
}

/// Config file (or defaults) with command line overrides applied.
fn build_config(args: &Args) -> Result<SolverConfig> {
    let mut config = match &args.config {
        Some(path) => SolverConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SolverConfig::default(),
    };

    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(sensitivity) = args.sensitivity {
        config.sensitivity = sensitivity;
    }
    if let Some(radius) = args.blur_radius {
        config.blur_radius = radius;
    }
    if let Some(lang) = &args.lang {
        config.recognizer.lang = lang.clone();
    }
    if let Some(psm) = args.psm {
        config.recognizer.psm = Some(psm);
    }
    if let Some(min_confidence) = args.min_confidence {
        config.recognizer.min_confidence = min_confidence;
    }
    if let Some(whitelist) = &args.whitelist {
        config.recognizer.whitelist = Some(whitelist.clone());
    }

    config.validate()?;
    Ok(config)
}

fn screen_mapping(args: &Args, solution: &Solution) -> ScreenMapping {
    let origin = (args.origin_x, args.origin_y);
    match (args.display_width, args.display_height) {
        (Some(w), Some(h)) => {
            ScreenMapping::from_display((solution.width, solution.height), (w, h), origin)
        }
        _ => ScreenMapping {
            origin,
            ..ScreenMapping::identity()
        },
    }
}
