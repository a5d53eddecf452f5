//! A source image together with its recorded object outlines.

use image::imageops::FilterType;
use image::DynamicImage;

use crate::annot::Polygon;

/// One (possibly rescaled) source image and the polygons that live in it.
///
/// Rescaling produces a new scene so the image and its polygons always
/// share one coordinate frame; samplers never see mixed scales.
pub struct Scene {
    pub image: DynamicImage,
    pub polygons: Vec<Polygon>,
}

impl Scene {
    pub fn new(image: DynamicImage, polygons: Vec<Polygon>) -> Self {
        Self { image, polygons }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Rescales the image and every polygon by the same scalar factor.
    ///
    /// The image is resampled with a bilinear filter to the rounded target
    /// dimensions; polygon coordinates are rounded to the nearest integer
    /// pixel independently, which keeps relative geometry intact up to
    /// rounding.
    pub fn rescaled(&self, scale: f64) -> Scene {
        // resize_exact rejects zero dimensions.
        let width = ((self.image.width() as f64) * scale).round().max(1.0) as u32;
        let height = ((self.image.height() as f64) * scale).round().max(1.0) as u32;

        let image = self.image.resize_exact(width, height, FilterType::Triangle);
        let polygons = self
            .polygons
            .iter()
            .map(|polygon| polygon.rescaled(scale))
            .collect();

        Scene { image, polygons }
    }
}
