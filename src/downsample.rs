//! Downsampling an existing dataset to a fraction of its train split.
//!
//! The val split travels unchanged; train examples are kept as an evenly
//! spaced selection over the sorted file list, so the reduced dataset
//! still covers the whole range of source scenes.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::dataset::{
    check_dataset_tree, collect_files_with_extensions, copy_dir_files, images_dir, labels_dir,
    read_manifest_class, reset_dataset_tree, Split, IMAGE_EXTENSIONS, LABEL_EXTENSION,
};
use crate::error::CropsetError;

/// Options for one downsampling run.
#[derive(Clone, Debug)]
pub struct DownsampleOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Percentage of the train split to keep (1 to 100).
    pub percentage: u32,
}

/// Counters for one downsampling run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownsampleReport {
    pub train_kept: usize,
    pub train_total: usize,
    pub val_copied: usize,
}

impl fmt::Display for DownsampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Kept {} of {} train example(s); copied {} val image(s) unchanged",
            self.train_kept, self.train_total, self.val_copied
        )
    }
}

/// Copies a reduced dataset into a freshly scaffolded tree.
pub fn run_downsample(opts: &DownsampleOptions) -> Result<DownsampleReport, CropsetError> {
    if !(1..=100).contains(&opts.percentage) {
        return Err(CropsetError::InvalidParams {
            message: "percentage must be between 1 and 100".to_string(),
        });
    }

    check_dataset_tree(&opts.input)?;
    let class_name = read_manifest_class(&opts.input)?;
    reset_dataset_tree(&opts.output, &class_name)?;

    let val_copied = copy_dir_files(
        &images_dir(&opts.input, Split::Val),
        &images_dir(&opts.output, Split::Val),
        None,
    )?;
    copy_dir_files(
        &labels_dir(&opts.input, Split::Val),
        &labels_dir(&opts.output, Split::Val),
        None,
    )?;

    let train_images =
        collect_files_with_extensions(&images_dir(&opts.input, Split::Train), &IMAGE_EXTENSIONS)?;
    let train_total = train_images.len();
    let keep = train_total * opts.percentage as usize / 100;

    let mut report = DownsampleReport {
        train_total,
        val_copied,
        ..Default::default()
    };

    for index in 0..keep {
        // Evenly spaced indices over the sorted list.
        let image_path = &train_images[index * train_total / keep];
        let Some(file_name) = image_path.file_name() else {
            continue;
        };

        fs::copy(
            image_path,
            images_dir(&opts.output, Split::Train).join(file_name),
        )
        .map_err(CropsetError::Io)?;

        let label_source = labels_dir(&opts.input, Split::Train)
            .join(file_name)
            .with_extension(LABEL_EXTENSION);

        if label_source.is_file() {
            let label_target = labels_dir(&opts.output, Split::Train)
                .join(file_name)
                .with_extension(LABEL_EXTENSION);
            fs::copy(&label_source, label_target).map_err(CropsetError::Io)?;
        } else {
            eprintln!(
                "warning: no label file for {}, copied the image without one",
                image_path.display()
            );
        }

        report.train_kept += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn seed_dataset(root: &std::path::Path, train_examples: usize) {
        reset_dataset_tree(root, "crocodile").expect("scaffold");

        for index in 0..train_examples {
            let stem = format!("scene_{index}");
            DynamicImage::ImageRgb8(RgbImage::new(4, 4))
                .save(images_dir(root, Split::Train).join(format!("{stem}.png")))
                .expect("write train image");
            fs::write(
                labels_dir(root, Split::Train).join(format!("{stem}.txt")),
                "0 0.5 0.5 0.1 0.1\n",
            )
            .expect("write train label");
        }

        DynamicImage::ImageRgb8(RgbImage::new(4, 4))
            .save(images_dir(root, Split::Val).join("val_0.png"))
            .expect("write val image");
        fs::write(labels_dir(root, Split::Val).join("val_0.txt"), "")
            .expect("write val label");
    }

    #[test]
    fn downsample_keeps_requested_fraction() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let input = temp.path().join("input");
        let output = temp.path().join("output");
        seed_dataset(&input, 10);

        let report = run_downsample(&DownsampleOptions {
            input: input.clone(),
            output: output.clone(),
            percentage: 50,
        })
        .expect("downsample");

        assert_eq!(report.train_total, 10);
        assert_eq!(report.train_kept, 5);
        assert_eq!(report.val_copied, 1);

        let kept_images = fs::read_dir(images_dir(&output, Split::Train))
            .expect("list images")
            .count();
        let kept_labels = fs::read_dir(labels_dir(&output, Split::Train))
            .expect("list labels")
            .count();
        assert_eq!(kept_images, 5);
        assert_eq!(kept_labels, 5);
        assert!(images_dir(&output, Split::Val).join("val_0.png").is_file());
    }

    #[test]
    fn downsample_rejects_out_of_range_percentage() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = run_downsample(&DownsampleOptions {
            input: temp.path().join("input"),
            output: temp.path().join("output"),
            percentage: 0,
        })
        .unwrap_err();
        assert!(matches!(err, CropsetError::InvalidParams { .. }));
    }

    #[test]
    fn downsample_carries_class_name_over() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let input = temp.path().join("input");
        let output = temp.path().join("output");

        reset_dataset_tree(&input, "heron").expect("scaffold");
        run_downsample(&DownsampleOptions {
            input,
            output: output.clone(),
            percentage: 100,
        })
        .expect("downsample");

        assert_eq!(read_manifest_class(&output).expect("read class"), "heron");
    }
}
