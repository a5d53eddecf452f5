#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{DynamicImage, RgbImage};

pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .save(path)
        .expect("write png file");
}

pub fn write_annotations(path: &Path, json: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, json).expect("write annotations file");
}

/// One 200x200 source image with a single 20px square object.
pub fn seed_raw_input(dir: &Path) {
    write_png(&dir.join("scene.png"), 200, 200);
    write_annotations(
        &dir.join("annotations.json"),
        r#"{ "scene.png": { "polygons": [[[40, 60, 60, 40], [40, 40, 60, 60]]] } }"#,
    );
}
