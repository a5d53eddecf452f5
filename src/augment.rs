//! Photometric augmentation over an existing dataset's train split.
//!
//! Geometry is untouched: labels and the val split are copied verbatim,
//! only train image pixels change. Gaussian blur softens synthetic
//! renders; additive Gaussian noise roughens them.

use std::fmt;
use std::path::PathBuf;

use image::RgbImage;
use imageproc::filter::gaussian_blur_f32;
use imageproc::noise::gaussian_noise;
use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};

use crate::dataset::{
    check_dataset_tree, collect_files_with_extensions, copy_dir_files, images_dir, labels_dir,
    read_manifest_class, reset_dataset_tree, Split, IMAGE_EXTENSIONS,
};
use crate::error::CropsetError;

/// Options for one augmentation run.
#[derive(Clone, Debug)]
pub struct AugmentOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Sigma of the Gaussian blur; 0 disables blurring.
    pub blur_sigma: f32,
    /// Sigma of the additive Gaussian pixel noise; 0 disables noise.
    pub noise_sigma: f32,
    /// Seed for reproducible noise; a fresh OS seed otherwise.
    pub seed: Option<u64>,
}

/// Counters for one augmentation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AugmentReport {
    pub images_augmented: usize,
    pub skipped_images: usize,
}

impl fmt::Display for AugmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Augmented {} train image(s)", self.images_augmented)?;
        if self.skipped_images > 0 {
            writeln!(f, "  skipped {} unreadable image(s)", self.skipped_images)?;
        }
        Ok(())
    }
}

/// Writes an augmented copy of the dataset.
pub fn run_augment(opts: &AugmentOptions) -> Result<AugmentReport, CropsetError> {
    if opts.blur_sigma <= 0.0 && opts.noise_sigma <= 0.0 {
        return Err(CropsetError::InvalidParams {
            message: "set at least one of blur sigma and noise sigma".to_string(),
        });
    }

    check_dataset_tree(&opts.input)?;
    let class_name = read_manifest_class(&opts.input)?;
    reset_dataset_tree(&opts.output, &class_name)?;

    // Everything except train pixels travels unchanged.
    copy_dir_files(
        &images_dir(&opts.input, Split::Val),
        &images_dir(&opts.output, Split::Val),
        None,
    )?;
    for split in Split::ALL {
        copy_dir_files(
            &labels_dir(&opts.input, split),
            &labels_dir(&opts.output, split),
            None,
        )?;
    }

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let train_images =
        collect_files_with_extensions(&images_dir(&opts.input, Split::Train), &IMAGE_EXTENSIONS)?;

    let mut report = AugmentReport::default();

    for image_path in &train_images {
        let Some(file_name) = image_path.file_name() else {
            continue;
        };

        println!("Processing {}", image_path.display());

        let image = match image::open(image_path) {
            Ok(image) => image.to_rgb8(),
            Err(source) => {
                let err = CropsetError::ImageDecode {
                    path: image_path.clone(),
                    source,
                };
                eprintln!("warning: {err}, skipping");
                report.skipped_images += 1;
                continue;
            }
        };

        let augmented = augment_image(image, opts.blur_sigma, opts.noise_sigma, &mut rng);

        let target = images_dir(&opts.output, Split::Train).join(file_name);
        augmented
            .save(&target)
            .map_err(|source| CropsetError::ImageWrite {
                path: target,
                source,
            })?;

        report.images_augmented += 1;
    }

    Ok(report)
}

fn augment_image<R: Rng + ?Sized>(
    image: RgbImage,
    blur_sigma: f32,
    noise_sigma: f32,
    rng: &mut R,
) -> RgbImage {
    let mut image = image;

    if blur_sigma > 0.0 {
        image = gaussian_blur_f32(&image, blur_sigma);
    }

    if noise_sigma > 0.0 {
        image = gaussian_noise(&image, 0.0, noise_sigma as f64, rng.random());
    }

    image
}
