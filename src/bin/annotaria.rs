//! annotaria CLI: interpolate tracks and export LabelMe shapes.
//!
//! Usage:
//!   annotaria interpolate <JSON> (-n N | -a) [-d]   Densify tracked annotations
//!   annotaria coco2labelme <JSON> [IMAGES_FOLDER]     Write one LabelMe file per image

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use annotaria::config::{AppConfig, InterpolationConfig};
use annotaria::interpolation::{interpolate_dataset, write_diagnostics, FrameDirectory, FrameSource};
use annotaria::loader::{load_from_file, save_to_file};
use annotaria::logging::init_logging;
use annotaria::shapes::{coco_to_labelme, write_labelme_files};

#[derive(Parser)]
#[command(
    name = "annotaria",
    about = "Interpolate tracked COCO annotations and export LabelMe shapes",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file (classifier thresholds, logging)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill unannotated frames between the keyframes of every track
    Interpolate {
        /// Path to the COCO JSON file
        json_file: PathBuf,

        /// Interpolation factor: frames inserted per unit of image id gap
        #[arg(short = 'n', long, required_unless_present = "auto", conflicts_with = "auto")]
        number: Option<u32>,

        /// Insert exactly the frames found in the sibling image folder
        #[arg(short, long)]
        auto: bool,

        /// Write per-track fit diagnostics next to the output
        #[arg(short, long)]
        debug: bool,
    },

    /// Convert a COCO JSON file into LabelMe files, one per image
    Coco2labelme {
        /// Path to the COCO JSON file
        json_file: PathBuf,

        /// Output folder; defaults to the folder named after the JSON file
        images_folder: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_logging(&config.logging);

    match cli.command {
        Commands::Interpolate {
            json_file,
            number,
            auto,
            debug,
        } => interpolate(&json_file, number, auto, debug),
        Commands::Coco2labelme {
            json_file,
            images_folder,
        } => coco2labelme(&config, &json_file, images_folder),
    }
}

fn interpolate(json_file: &Path, number: Option<u32>, auto: bool, debug: bool) -> Result<()> {
    let dataset = load_from_file(json_file)
        .with_context(|| format!("failed to load {}", json_file.display()))?;

    let config = match (auto, number) {
        (true, _) => InterpolationConfig::automatic(),
        (false, Some(factor)) => InterpolationConfig::manual(factor),
        (false, None) => bail!("either --number or --auto is required"),
    }
    .with_debug(debug);

    let frames = FrameDirectory::new(sibling(json_file, ""), ".png");
    let source: Option<&dyn FrameSource> = if auto { Some(&frames) } else { None };

    let output = interpolate_dataset(&dataset, &config, source)
        .with_context(|| format!("failed to interpolate {}", json_file.display()))?;

    let out_path = sibling(json_file, "-interp.json");
    save_to_file(&output.dataset, &out_path)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    tracing::info!(path = %out_path.display(), "wrote interpolated dataset");

    if debug {
        let debug_dir = sibling(json_file, "-interp_debug");
        write_diagnostics(&debug_dir, &output.diagnostics)
            .with_context(|| format!("failed to write diagnostics to {}", debug_dir.display()))?;
    }

    Ok(())
}

fn coco2labelme(config: &AppConfig, json_file: &Path, images_folder: Option<PathBuf>) -> Result<()> {
    if !json_file.is_file() {
        bail!("{} is not a valid JSON file", json_file.display());
    }
    let folder = images_folder.unwrap_or_else(|| sibling(json_file, ""));
    if !folder.is_dir() {
        bail!("{} is not a valid directory", folder.display());
    }

    tracing::info!(json = %json_file.display(), folder = %folder.display(), "converting to LabelMe");
    let dataset = load_from_file(json_file)
        .with_context(|| format!("failed to load {}", json_file.display()))?;
    let files = coco_to_labelme(&dataset, &config.classifier)?;
    write_labelme_files(&files, &folder)?;
    Ok(())
}

/// `<dir>/<stem><suffix>` for a JSON path `<dir>/<stem>.json`.
fn sibling(json_file: &Path, suffix: &str) -> PathBuf {
    let stem = json_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    json_file.with_file_name(format!("{}{}", stem, suffix))
}
