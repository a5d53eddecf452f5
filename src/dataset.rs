//! The fixed on-disk dataset layout and its manifest.
//!
//! Generated datasets always carry the same tree: `images/train`,
//! `images/val`, `labels/train`, `labels/val`, plus a `data.yaml` manifest
//! naming the dataset root, the split subpaths, and the single-class name
//! table. Scaffolding is destructive: re-running a command against an
//! existing output replaces it wholesale.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::CropsetError;

pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "webp"];
pub const LABEL_EXTENSION: &str = "txt";

/// Dataset split a generated example belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Split {
    Train,
    Val,
}

impl Split {
    pub const ALL: [Split; 2] = [Split::Train, Split::Val];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
        }
    }
}

/// Images directory for a split under a dataset root.
pub fn images_dir(root: &Path, split: Split) -> PathBuf {
    root.join("images").join(split.as_str())
}

/// Labels directory for a split under a dataset root.
pub fn labels_dir(root: &Path, split: Split) -> PathBuf {
    root.join("labels").join(split.as_str())
}

/// Deletes any existing tree at `root` and scaffolds a fresh, empty one
/// with its manifest. Idempotent: the result is the same whether or not
/// `root` existed before.
pub fn reset_dataset_tree(root: &Path, class_name: &str) -> Result<(), CropsetError> {
    if root.exists() {
        fs::remove_dir_all(root).map_err(CropsetError::Io)?;
    }

    for split in Split::ALL {
        fs::create_dir_all(images_dir(root, split)).map_err(CropsetError::Io)?;
        fs::create_dir_all(labels_dir(root, split)).map_err(CropsetError::Io)?;
    }

    write_manifest(root, class_name)
}

fn write_manifest(root: &Path, class_name: &str) -> Result<(), CropsetError> {
    // The manifest records an absolute dataset path so downstream training
    // tools can be launched from any working directory.
    let absolute_root = fs::canonicalize(root).map_err(CropsetError::Io)?;

    let manifest = format!(
        "path: {}\ntrain: images/train\nval: images/val\n\nnames:\n  0: {}\n",
        absolute_root.display(),
        class_name
    );

    fs::write(root.join("data.yaml"), manifest).map_err(CropsetError::Io)
}

#[derive(Debug, Deserialize)]
struct Manifest {
    names: BTreeMap<usize, String>,
}

/// Reads the class name table back out of an existing tree's manifest.
pub fn read_manifest_class(root: &Path) -> Result<String, CropsetError> {
    let path = root.join("data.yaml");

    if !path.is_file() {
        return Err(CropsetError::DatasetLayoutInvalid {
            path,
            message: "missing data.yaml manifest".to_string(),
        });
    }

    let data = fs::read_to_string(&path).map_err(CropsetError::Io)?;
    let manifest: Manifest =
        serde_yaml::from_str(&data).map_err(|source| CropsetError::ManifestParse {
            path: path.clone(),
            source,
        })?;

    manifest
        .names
        .get(&0)
        .cloned()
        .ok_or_else(|| CropsetError::DatasetLayoutInvalid {
            path,
            message: "manifest names table has no class 0".to_string(),
        })
}

/// Checks that `root` carries the tree this tool produces and consumes.
pub fn check_dataset_tree(root: &Path) -> Result<(), CropsetError> {
    if !root.is_dir() {
        return Err(CropsetError::InputDirMissing {
            path: root.to_path_buf(),
        });
    }

    for split in Split::ALL {
        for dir in [images_dir(root, split), labels_dir(root, split)] {
            if !dir.is_dir() {
                return Err(CropsetError::DatasetLayoutInvalid {
                    path: dir,
                    message: "missing split directory".to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Persists one generated example under a split.
///
/// The image is written first; the label file is only created once the
/// image write succeeded, so a failed image write never leaves an orphaned
/// label behind.
pub fn write_example(
    root: &Path,
    split: Split,
    stem: &str,
    image: &DynamicImage,
    labels: &str,
) -> Result<(), CropsetError> {
    let image_path = images_dir(root, split).join(format!("{stem}.png"));
    image
        .save(&image_path)
        .map_err(|source| CropsetError::ImageWrite {
            path: image_path,
            source,
        })?;

    let label_path = labels_dir(root, split).join(format!("{stem}.txt"));
    fs::write(label_path, labels).map_err(CropsetError::Io)
}

/// Collects files under `root` carrying one of the given extensions,
/// sorted by filename for deterministic processing order.
pub fn collect_files_with_extensions(
    root: &Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, CropsetError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| CropsetError::DatasetLayoutInvalid {
            path: root.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

/// Copies every file directly under `source` into `target`, optionally
/// prefixing the destination filenames. Returns the number of files
/// copied.
pub fn copy_dir_files(
    source: &Path,
    target: &Path,
    prefix: Option<&str>,
) -> Result<usize, CropsetError> {
    let mut copied = 0;

    for entry in fs::read_dir(source).map_err(CropsetError::Io)? {
        let entry = entry.map_err(CropsetError::Io)?;
        if !entry.file_type().map_err(CropsetError::Io)?.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        let target_name = match prefix {
            Some(prefix) => {
                let mut name = std::ffi::OsString::from(format!("{prefix}_"));
                name.push(&file_name);
                name
            }
            None => file_name,
        };

        fs::copy(entry.path(), target.join(target_name)).map_err(CropsetError::Io)?;
        copied += 1;
    }

    Ok(copied)
}
