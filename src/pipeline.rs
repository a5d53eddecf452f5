//! The generation pipeline: annotated source images in, crop examples out.
//!
//! One run sweeps every annotated source image, every configured scale
//! factor, and every object instance, producing one positive example per
//! instance (and optionally the same count of negative attempts). Per-item
//! failures are logged and counted but never abort the sweep.

use std::fmt;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::annot::read_annotations;
use crate::dataset::{reset_dataset_tree, write_example, Split};
use crate::error::CropsetError;
use crate::sample::{sample_negative, sample_positive, NegativeSample, SampleParams};
use crate::scene::Scene;

/// Scale factors applied to every source image by default: shrink,
/// identity, enlarge.
pub const DEFAULT_SCALES: [f64; 3] = [0.66666, 1.0, 1.33333];

/// Options for one generation run.
#[derive(Clone, Debug)]
pub struct GenerateOptions {
    /// Directory holding the source images and `annotations.json`.
    pub input: PathBuf,
    /// Dataset root to (re)create and populate.
    pub output: PathBuf,
    pub scales: Vec<f64>,
    pub target_width: u32,
    pub target_height: u32,
    /// Also attempt one negative sample per object instance per scale.
    pub negatives: bool,
    /// Name recorded for class 0 in the manifest.
    pub class_name: String,
    /// Seed for reproducible runs; a fresh OS seed otherwise.
    pub seed: Option<u64>,
    pub negative_attempts: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from("raw_synthetic_data"),
            output: PathBuf::from("synthetic_dataset"),
            scales: DEFAULT_SCALES.to_vec(),
            target_width: 640,
            target_height: 640,
            negatives: false,
            class_name: "crocodile".to_string(),
            seed: None,
            negative_attempts: 100,
        }
    }
}

/// Counters for one generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub positives_written: usize,
    pub negatives_written: usize,
    /// Source images referenced by the annotations but missing or
    /// undecodable on disk.
    pub skipped_images: usize,
    /// Samples whose geometry did not fit the crop size.
    pub skipped_samples: usize,
    /// Negative attempts that ran out of budget.
    pub exhausted_negatives: usize,
    pub write_failures: usize,
}

impl fmt::Display for GenerateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Wrote {} positive and {} negative example(s)",
            self.positives_written, self.negatives_written
        )?;

        if self.skipped_images > 0 {
            writeln!(
                f,
                "  skipped {} missing or unreadable source image(s)",
                self.skipped_images
            )?;
        }
        if self.skipped_samples > 0 {
            writeln!(
                f,
                "  skipped {} sample(s) whose objects did not fit the crop size",
                self.skipped_samples
            )?;
        }
        if self.exhausted_negatives > 0 {
            writeln!(
                f,
                "  gave up on {} negative sample(s) after exhausting the attempt budget",
                self.exhausted_negatives
            )?;
        }
        if self.write_failures > 0 {
            writeln!(f, "  failed to write {} example(s)", self.write_failures)?;
        }

        Ok(())
    }
}

/// Produces globally unique example stems from the source image stem and a
/// run-wide counter threaded through the driver.
#[derive(Default)]
struct ExampleNamer {
    counter: u64,
}

impl ExampleNamer {
    fn next(&mut self, stem: &str) -> String {
        let name = format!("{stem}_{}", self.counter);
        self.counter += 1;
        name
    }
}

fn example_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}

/// Runs the full generation sweep.
///
/// Fatal errors (missing input directory, missing or malformed annotation
/// file, scaffold failure) surface before any example is produced. After
/// that point every failure is per-item: it is logged to stderr, counted
/// in the report, and the sweep continues.
pub fn run_generate(opts: &GenerateOptions) -> Result<GenerateReport, CropsetError> {
    if !opts.input.is_dir() {
        return Err(CropsetError::InputDirMissing {
            path: opts.input.clone(),
        });
    }

    let annotations = read_annotations(&opts.input.join("annotations.json"))?;
    reset_dataset_tree(&opts.output, &opts.class_name)?;

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let params = SampleParams {
        target_width: opts.target_width,
        target_height: opts.target_height,
        negative_attempts: opts.negative_attempts,
    };

    let mut report = GenerateReport::default();
    let mut namer = ExampleNamer::default();

    for (filename, scene_annotation) in annotations.iter() {
        let image_path = opts.input.join(filename);
        if !image_path.is_file() {
            eprintln!(
                "warning: image {} was not found, skipping",
                image_path.display()
            );
            report.skipped_images += 1;
            continue;
        }

        println!("Processing {}", image_path.display());

        let base_image = match image::open(&image_path) {
            Ok(image) => image,
            Err(source) => {
                let err = CropsetError::ImageDecode {
                    path: image_path,
                    source,
                };
                eprintln!("warning: {err}, skipping");
                report.skipped_images += 1;
                continue;
            }
        };

        let stem = example_stem(filename);
        let base_scene = Scene::new(base_image, scene_annotation.polygons.clone());

        for &scale in &opts.scales {
            let scene = base_scene.rescaled(scale);

            for index in 0..scene.polygons.len() {
                match sample_positive(&scene, index, &params, &mut rng) {
                    Ok(example) => {
                        persist(opts, &mut namer, &stem, &example.image, &example.labels, &mut report, true);
                    }
                    Err(err) if err.is_per_sample() => {
                        eprintln!("warning: {err}, skipping sample");
                        report.skipped_samples += 1;
                    }
                    Err(err) => return Err(err),
                }
            }

            if opts.negatives {
                for _ in 0..scene.polygons.len() {
                    match sample_negative(&scene, &params, &mut rng) {
                        Ok(NegativeSample::Found(example)) => {
                            persist(opts, &mut namer, &stem, &example.image, &example.labels, &mut report, false);
                        }
                        Ok(NegativeSample::Exhausted { attempts }) => {
                            eprintln!(
                                "warning: no object-free window found in {} within {} attempt(s)",
                                image_path.display(),
                                attempts
                            );
                            report.exhausted_negatives += 1;
                        }
                        Err(err) if err.is_per_sample() => {
                            eprintln!("warning: {err}, skipping sample");
                            report.skipped_samples += 1;
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }
    }

    Ok(report)
}

fn persist(
    opts: &GenerateOptions,
    namer: &mut ExampleNamer,
    stem: &str,
    image: &image::DynamicImage,
    labels: &str,
    report: &mut GenerateReport,
    positive: bool,
) {
    let name = namer.next(stem);

    match write_example(&opts.output, Split::Train, &name, image, labels) {
        Ok(()) => {
            if positive {
                report.positives_written += 1;
            } else {
                report.negatives_written += 1;
            }
        }
        Err(err) => {
            eprintln!("warning: {err}");
            report.write_failures += 1;
        }
    }
}
