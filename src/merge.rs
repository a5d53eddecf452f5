//! Merging two dataset trees into a fresh one.
//!
//! Filenames from the two inputs are prefixed `a_` and `b_` so the merged
//! tree never collides, whatever naming scheme the inputs used.

use std::fmt;
use std::path::PathBuf;

use crate::dataset::{
    check_dataset_tree, copy_dir_files, images_dir, labels_dir, read_manifest_class,
    reset_dataset_tree, Split,
};
use crate::error::CropsetError;

/// Options for one merge run.
#[derive(Clone, Debug)]
pub struct MergeOptions {
    pub a: PathBuf,
    pub b: PathBuf,
    pub output: PathBuf,
}

/// Counters for one merge run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Images contributed by dataset A (both splits).
    pub from_a: usize,
    /// Images contributed by dataset B (both splits).
    pub from_b: usize,
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Merged {} image(s) from dataset A and {} from dataset B",
            self.from_a, self.from_b
        )
    }
}

/// Copies both datasets into a freshly scaffolded tree.
///
/// The class name is taken from dataset A's manifest; a differing name in
/// B is reported but does not block the merge, since both datasets carry a
/// single class 0 either way.
pub fn run_merge(opts: &MergeOptions) -> Result<MergeReport, CropsetError> {
    check_dataset_tree(&opts.a)?;
    check_dataset_tree(&opts.b)?;

    let class_a = read_manifest_class(&opts.a)?;
    let class_b = read_manifest_class(&opts.b)?;
    if class_a != class_b {
        eprintln!(
            "warning: datasets name class 0 differently ('{class_a}' vs '{class_b}'); keeping '{class_a}'"
        );
    }

    reset_dataset_tree(&opts.output, &class_a)?;

    let mut report = MergeReport::default();

    for (root, prefix, contributed) in [
        (&opts.a, "a", &mut report.from_a),
        (&opts.b, "b", &mut report.from_b),
    ] {
        for split in Split::ALL {
            *contributed += copy_dir_files(
                &images_dir(root, split),
                &images_dir(&opts.output, split),
                Some(prefix),
            )?;
            copy_dir_files(
                &labels_dir(root, split),
                &labels_dir(&opts.output, split),
                Some(prefix),
            )?;
        }
    }

    Ok(report)
}
