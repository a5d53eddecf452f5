//! Cropset: synthetic crop sampling for object detection training data.
//!
//! Cropset cuts fixed-size training windows out of large annotated source
//! images. A positive window is constrained by construction to fully
//! contain one target object; a negative window is rejection-sampled until
//! it contains none. Object boxes that survive clipping against the window
//! are emitted as normalized single-class detection labels alongside the
//! cropped image, in the directory layout detector training tools expect.
//!
//! # Modules
//!
//! - [`annot`]: annotation records (polygons per source image)
//! - [`geom`]: pixel boxes, crop windows, label rendering
//! - [`scene`]: joint image/polygon rescaling
//! - [`sample`]: positive and negative window sampling
//! - [`dataset`]: the on-disk dataset tree and manifest
//! - [`pipeline`]: the generation sweep
//! - [`downsample`], [`merge`], [`augment`]: dataset post-processing
//! - [`error`]: error types for cropset operations

pub mod annot;
pub mod augment;
pub mod dataset;
pub mod downsample;
pub mod error;
pub mod geom;
pub mod merge;
pub mod pipeline;
pub mod sample;
pub mod scene;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::CropsetError;

use augment::AugmentOptions;
use downsample::DownsampleOptions;
use merge::MergeOptions;
use pipeline::{GenerateOptions, DEFAULT_SCALES};

/// The cropset CLI application.
#[derive(Parser)]
#[command(name = "cropset")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Generate a crop-sampled dataset from annotated source images.
    Generate(GenerateArgs),
    /// Reduce an existing dataset to a percentage of its train split.
    Downsample(DownsampleArgs),
    /// Merge two datasets into one.
    Merge(MergeArgs),
    /// Blur and/or noise the train images of an existing dataset.
    Augment(AugmentArgs),
}

/// Arguments for the generate subcommand.
#[derive(clap::Args)]
struct GenerateArgs {
    /// Directory of raw annotated data.
    #[arg(short, long, default_value = "raw_synthetic_data")]
    input: PathBuf,

    /// Directory where the dataset should be stored.
    #[arg(short, long, default_value = "synthetic_dataset")]
    output: PathBuf,

    /// Also generate windows that contain no object.
    #[arg(short, long)]
    negative: bool,

    /// Scale factors applied to every source image.
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SCALES)]
    scales: Vec<f64>,

    /// Width of the generated crops, in pixels.
    #[arg(long, default_value_t = 640)]
    target_width: u32,

    /// Height of the generated crops, in pixels.
    #[arg(long, default_value_t = 640)]
    target_height: u32,

    /// Name recorded for the single detection class.
    #[arg(long, default_value = "crocodile")]
    class_name: String,

    /// Attempt budget for each negative sample.
    #[arg(long, default_value_t = 100)]
    negative_attempts: usize,

    /// RNG seed for reproducible sampling.
    #[arg(long)]
    seed: Option<u64>,
}

/// Arguments for the downsample subcommand.
#[derive(clap::Args)]
struct DownsampleArgs {
    /// Dataset to sample from.
    #[arg(short, long, default_value = "synthetic_dataset")]
    input: PathBuf,

    /// Directory where the reduced dataset should be stored.
    #[arg(short, long, default_value = "downsampled_dataset")]
    output: PathBuf,

    /// Percentage of the train split to keep (1 to 100).
    #[arg(short, long)]
    percentage: u32,
}

/// Arguments for the merge subcommand.
#[derive(clap::Args)]
struct MergeArgs {
    /// First dataset to merge from.
    #[arg(short, long)]
    a: PathBuf,

    /// Second dataset to merge from.
    #[arg(short, long)]
    b: PathBuf,

    /// Directory where the merged dataset should be stored.
    #[arg(short, long)]
    output: PathBuf,
}

/// Arguments for the augment subcommand.
#[derive(clap::Args)]
struct AugmentArgs {
    /// Dataset to augment.
    #[arg(short, long, default_value = "synthetic_dataset")]
    input: PathBuf,

    /// Directory where the augmented dataset should be stored.
    #[arg(short, long, default_value = "augmented_dataset")]
    output: PathBuf,

    /// Sigma of the Gaussian blur to apply (0 disables).
    #[arg(short = 'g', long, default_value_t = 0.0)]
    blur: f32,

    /// Sigma of the additive Gaussian noise to apply (0 disables).
    #[arg(short = 'n', long, default_value_t = 0.0)]
    noise: f32,

    /// RNG seed for reproducible noise.
    #[arg(long)]
    seed: Option<u64>,
}

/// Run the cropset CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), CropsetError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Generate(args)) => run_generate(args),
        Some(Commands::Downsample(args)) => run_downsample(args),
        Some(Commands::Merge(args)) => run_merge(args),
        Some(Commands::Augment(args)) => run_augment(args),
        None => {
            // No subcommand: print a short hint and exit successfully.
            println!("cropset {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Synthetic crop sampler for single-class object detection datasets.");
            println!();
            println!("Run 'cropset --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the generate subcommand.
fn run_generate(args: GenerateArgs) -> Result<(), CropsetError> {
    let opts = GenerateOptions {
        input: args.input,
        output: args.output,
        scales: args.scales,
        target_width: args.target_width,
        target_height: args.target_height,
        negatives: args.negative,
        class_name: args.class_name,
        seed: args.seed,
        negative_attempts: args.negative_attempts,
    };

    let report = pipeline::run_generate(&opts)?;
    print!("{report}");
    Ok(())
}

/// Execute the downsample subcommand.
fn run_downsample(args: DownsampleArgs) -> Result<(), CropsetError> {
    let opts = DownsampleOptions {
        input: args.input,
        output: args.output,
        percentage: args.percentage,
    };

    let report = downsample::run_downsample(&opts)?;
    print!("{report}");
    Ok(())
}

/// Execute the merge subcommand.
fn run_merge(args: MergeArgs) -> Result<(), CropsetError> {
    let opts = MergeOptions {
        a: args.a,
        b: args.b,
        output: args.output,
    };

    let report = merge::run_merge(&opts)?;
    print!("{report}");
    Ok(())
}

/// Execute the augment subcommand.
fn run_augment(args: AugmentArgs) -> Result<(), CropsetError> {
    let opts = AugmentOptions {
        input: args.input,
        output: args.output,
        blur_sigma: args.blur,
        noise_sigma: args.noise,
        seed: args.seed,
    };

    let report = augment::run_augment(&opts)?;
    print!("{report}");
    Ok(())
}
