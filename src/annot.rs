//! Annotation records for source images.
//!
//! The input annotation structure is one JSON object mapping each image
//! filename to the object outlines recorded for it. It is loaded once at
//! pipeline start and is read-only for the rest of the run; polygons are
//! only ever rescaled by value, never mutated in place.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::CropsetError;
use crate::geom::PixelBox;

type PolygonCoords = (Vec<f64>, Vec<f64>);

/// An object outline as parallel x/y coordinate sequences in pixel space.
///
/// Deserializes from the `[[x0, x1, ...], [y0, y1, ...]]` form used by the
/// annotation file. Construction validates that both sequences have the
/// same non-zero length, so every polygon in the system carries at least
/// one point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonCoords", into = "PolygonCoords")]
pub struct Polygon {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl TryFrom<PolygonCoords> for Polygon {
    type Error = String;

    fn try_from((xs, ys): PolygonCoords) -> Result<Self, Self::Error> {
        if xs.is_empty() {
            return Err("polygon has no points".to_string());
        }
        if xs.len() != ys.len() {
            return Err(format!(
                "polygon has {} x coordinate(s) but {} y coordinate(s)",
                xs.len(),
                ys.len()
            ));
        }
        Ok(Self { xs, ys })
    }
}

impl From<Polygon> for PolygonCoords {
    fn from(polygon: Polygon) -> Self {
        (polygon.xs, polygon.ys)
    }
}

impl Polygon {
    /// Creates a polygon from coordinate sequences, validating shape.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, CropsetError> {
        Self::try_from((xs, ys)).map_err(|message| CropsetError::InvalidParams { message })
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Reduces the polygon to its axis-aligned bounding box by taking the
    /// extrema of the coordinate sequences.
    pub fn bounding_box(&self) -> PixelBox {
        let mut left = self.xs[0];
        let mut right = self.xs[0];
        let mut top = self.ys[0];
        let mut bottom = self.ys[0];

        for (&x, &y) in self.xs.iter().zip(&self.ys) {
            left = left.min(x);
            right = right.max(x);
            top = top.min(y);
            bottom = bottom.max(y);
        }

        PixelBox::new(
            left.round() as i64,
            top.round() as i64,
            right.round() as i64,
            bottom.round() as i64,
        )
    }

    /// Returns a copy with every coordinate multiplied by `scale` and
    /// rounded to the nearest integer pixel.
    pub fn rescaled(&self, scale: f64) -> Polygon {
        Polygon {
            xs: self.xs.iter().map(|x| (x * scale).round()).collect(),
            ys: self.ys.iter().map(|y| (y * scale).round()).collect(),
        }
    }
}

/// All object outlines recorded for one source image.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SceneAnnotation {
    pub polygons: Vec<Polygon>,
}

/// The full annotation structure: image filename to recorded outlines.
///
/// A `BTreeMap` keeps the processing order deterministic across runs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationSet {
    pub scenes: BTreeMap<String, SceneAnnotation>,
}

impl AnnotationSet {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SceneAnnotation)> {
        self.scenes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

/// Reads the annotation file for a raw data directory.
///
/// A missing or malformed file is fatal: nothing is generated before the
/// annotations load cleanly.
pub fn read_annotations(path: &Path) -> Result<AnnotationSet, CropsetError> {
    if !path.is_file() {
        return Err(CropsetError::AnnotationMissing {
            path: path.to_path_buf(),
        });
    }

    let data = fs::read_to_string(path).map_err(CropsetError::Io)?;
    serde_json::from_str(&data).map_err(|source| CropsetError::AnnotationParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Fuzz-only entrypoint for annotation JSON parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_annotations(input: &str) -> Result<(), CropsetError> {
    let _: AnnotationSet =
        serde_json::from_str(input).map_err(|source| CropsetError::AnnotationParse {
            path: std::path::PathBuf::from("<fuzz>"),
            source,
        })?;
    Ok(())
}
