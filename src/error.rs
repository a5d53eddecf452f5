use std::path::PathBuf;
use thiserror::Error;

/// The main error type for cropset operations.
#[derive(Debug, Error)]
pub enum CropsetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Annotation file {path} does not exist")]
    AnnotationMissing { path: PathBuf },

    #[error("Failed to parse annotations from {path}: {source}")]
    AnnotationParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Input directory {path} does not exist")]
    InputDirMissing { path: PathBuf },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image ({image_width}x{image_height}) is smaller than the crop size ({target_width}x{target_height})")]
    CropLargerThanImage {
        image_width: i64,
        image_height: i64,
        target_width: i64,
        target_height: i64,
    },

    #[error("Object ({object_width}x{object_height}) does not fit inside the crop size ({target_width}x{target_height})")]
    ObjectLargerThanCrop {
        object_width: i64,
        object_height: i64,
        target_width: i64,
        target_height: i64,
    },

    #[error("Invalid dataset layout at {path}: {message}")]
    DatasetLayoutInvalid { path: PathBuf, message: String },

    #[error("Failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },
}

impl CropsetError {
    /// True for failures the pipeline treats as per-sample conditions
    /// rather than run-enders.
    pub fn is_per_sample(&self) -> bool {
        matches!(
            self,
            CropsetError::CropLargerThanImage { .. } | CropsetError::ObjectLargerThanCrop { .. }
        )
    }
}
