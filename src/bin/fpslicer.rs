use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fp_slicer::slicer::NullSink;
use fp_slicer::tools::{ImageFormat, SliceOptions, collect_sources, load, slice_card};
use fp_slicer::{Slicer, SlicerConfig};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Binarize offset used by the CLI unless overridden
const CLI_THRESHOLD: i32 = 1;

#[derive(Parser)]
#[command(name = "fpslicer", version, about = "Extract individual prints from ten-print cards")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Slice every card under a file or directory
    Slice {
        /// Card image, or a directory of JPEG/PNG cards
        #[arg(short, long)]
        source: PathBuf,
        /// Output root; each card gets `<destination>/<stem>/fp_<i>.<ext>`
        #[arg(short, long)]
        destination: PathBuf,
        /// Output format for the prints (jpg or png)
        #[arg(short, long, default_value = "jpg")]
        format: ImageFormat,
        /// JPEG quality for the prints
        #[arg(short, long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,
        /// Also write the intermediate stage images
        #[arg(short = 'o', long)]
        demo: bool,
        /// Number of prints on each card (even)
        #[arg(long)]
        prints: Option<usize>,
        /// Offset added to the mean when binarizing
        #[arg(long, allow_hyphen_values = true)]
        threshold: Option<i32>,
    },
    /// Print the analysis geometry and rectangles for one card
    Inspect {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        prints: Option<usize>,
        #[arg(long, allow_hyphen_values = true)]
        threshold: Option<i32>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Slice {
            source,
            destination,
            format,
            quality,
            demo,
            prints,
            threshold,
        } => {
            let options = SliceOptions {
                destination,
                format,
                quality,
                demo,
            };
            slice_cmd(&source, &options, prints, threshold)
        }
        Command::Inspect {
            image,
            prints,
            threshold,
        } => inspect_cmd(&image, prints, threshold),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(2);
        }
    }
}

/// Environment configuration with the CLI's own defaults and flags on top
fn build_slicer(prints: Option<usize>, threshold: Option<i32>) -> Result<Slicer> {
    let mut config = SlicerConfig::from_env();
    if std::env::var_os("FP_BINARIZE_THRESHOLD").is_none() {
        config.binarize_threshold = CLI_THRESHOLD;
    }
    if let Some(prints) = prints {
        config.expected_print_count = prints;
    }
    if let Some(threshold) = threshold {
        config.binarize_threshold = threshold;
    }
    Slicer::new(config).context("invalid slicer configuration")
}

/// Returns `Ok(false)` when at least one card failed
fn slice_cmd(
    source: &Path,
    options: &SliceOptions,
    prints: Option<usize>,
    threshold: Option<i32>,
) -> Result<bool> {
    let slicer = build_slicer(prints, threshold)?;
    let sources = collect_sources(source)
        .with_context(|| format!("failed to read sources from {}", source.display()))?;
    std::fs::create_dir_all(&options.destination).with_context(|| {
        format!("failed to create {}", options.destination.display())
    })?;

    let start = Instant::now();
    let results: Vec<_> = sources
        .par_iter()
        .map(|path| (path, slice_card(&slicer, path, options)))
        .collect();

    let expected = slicer.config().expected_print_count;
    let mut failed = 0usize;
    let mut short = 0usize;
    for (path, result) in &results {
        match result {
            Ok(report) => {
                if report.prints.len() < expected {
                    short += 1;
                }
                println!(
                    "{} -> {} prints in {}",
                    path.display(),
                    report.prints.len(),
                    report.output_dir.display()
                );
            }
            Err(err) => {
                failed += 1;
                eprintln!("{} -> failed: {}", path.display(), err);
            }
        }
    }

    println!(
        "Sliced {}/{} cards ({} short of {} prints) in {:.2?}",
        results.len() - failed,
        results.len(),
        short,
        expected,
        start.elapsed()
    );
    Ok(failed == 0)
}

fn inspect_cmd(image: &Path, prints: Option<usize>, threshold: Option<i32>) -> Result<bool> {
    let slicer = build_slicer(prints, threshold)?;
    let card = load(image).with_context(|| format!("failed to load {}", image.display()))?;

    let start = Instant::now();
    let report = slicer
        .analyze(&card, &mut NullSink)
        .with_context(|| format!("failed to slice {}", image.display()))?;
    let elapsed = start.elapsed();

    println!("Image: {} ({}x{})", image.display(), card.width(), card.height());
    println!(
        "Analysis: {}x{}, trim {}, top row height {}",
        report.analysis_size.0, report.analysis_size.1, report.trim, report.top_height
    );
    println!(
        "Top row: {} prints, bottom row: {} prints",
        report.top.len(),
        report.bottom.len()
    );
    for (i, rect) in report.rectangles.iter().enumerate() {
        println!("  fp_{}: {} ({}x{})", i, rect, rect.width(), rect.height());
    }
    println!("Found {} prints ({:.2?})", report.rectangles.len(), elapsed);
    Ok(true)
}
