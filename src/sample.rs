//! Constrained random crop sampling.
//!
//! Positive windows are placed by interval construction: per axis, the set
//! of window origins that keep the target's bounding box inside a
//! fixed-size window (with the window itself inside the image) is a closed
//! integer interval, and the origin is drawn uniformly from it. Negative
//! windows are found by bounded rejection sampling instead.

use image::DynamicImage;
use rand::{Rng, RngExt};

use crate::error::CropsetError;
use crate::geom::{label_lines, CropWindow, PixelBox};
use crate::scene::Scene;

/// Fixed crop geometry and sampling limits.
#[derive(Clone, Copy, Debug)]
pub struct SampleParams {
    pub target_width: u32,
    pub target_height: u32,
    /// Rejection budget for negative sampling.
    pub negative_attempts: usize,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            target_width: 640,
            target_height: 640,
            negative_attempts: 100,
        }
    }
}

/// A generated training example: a fixed-size crop plus its label text.
pub struct Example {
    pub image: DynamicImage,
    pub labels: String,
    pub window: CropWindow,
}

/// Outcome of a negative sampling run.
///
/// Exhaustion is an expected result on dense scenes, not an error; callers
/// skip the sample and move on.
#[derive(Debug)]
pub enum NegativeSample {
    Found(Example),
    Exhausted { attempts: usize },
}

impl std::fmt::Debug for Example {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Example")
            .field("window", &self.window)
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

/// Picks a window origin so the window fully contains `target` and stays
/// inside the image.
///
/// Per axis the valid origin interval is
/// `[max(target.right - width, 0), min(target.left, image_width - width)]`,
/// both ends inclusive. Errors when the image cannot hold a window of the
/// target size, or when the interval inverts because the object's extent
/// exceeds the window on that axis; both are per-sample conditions the
/// caller skips over.
pub fn place_positive_window<R: Rng + ?Sized>(
    target: &PixelBox,
    image_width: i64,
    image_height: i64,
    params: &SampleParams,
    rng: &mut R,
) -> Result<CropWindow, CropsetError> {
    let target_width = params.target_width as i64;
    let target_height = params.target_height as i64;

    if image_width < target_width || image_height < target_height {
        return Err(CropsetError::CropLargerThanImage {
            image_width,
            image_height,
            target_width,
            target_height,
        });
    }

    let min_left = (target.right - target_width).max(0);
    let max_left = target.left.min(image_width - target_width);
    let min_top = (target.bottom - target_height).max(0);
    let max_top = target.top.min(image_height - target_height);

    if min_left > max_left || min_top > max_top {
        return Err(CropsetError::ObjectLargerThanCrop {
            object_width: target.width(),
            object_height: target.height(),
            target_width,
            target_height,
        });
    }

    let left = rng.random_range(min_left..=max_left);
    let top = rng.random_range(min_top..=max_top);

    Ok(CropWindow::new(left, top, target_width, target_height))
}

/// Picks a window origin uniformly at random anywhere within image bounds.
pub fn place_random_window<R: Rng + ?Sized>(
    image_width: i64,
    image_height: i64,
    params: &SampleParams,
    rng: &mut R,
) -> Result<CropWindow, CropsetError> {
    let target_width = params.target_width as i64;
    let target_height = params.target_height as i64;

    if image_width < target_width || image_height < target_height {
        return Err(CropsetError::CropLargerThanImage {
            image_width,
            image_height,
            target_width,
            target_height,
        });
    }

    let left = rng.random_range(0..=image_width - target_width);
    let top = rng.random_range(0..=image_height - target_height);

    Ok(CropWindow::new(left, top, target_width, target_height))
}

/// Reduces every polygon in the scene to a box and clips it against the
/// window. Boxes with no overlap drop out; partial overlaps stay, clipped.
fn clipped_scene_boxes(scene: &Scene, window: &CropWindow) -> Vec<PixelBox> {
    scene
        .polygons
        .iter()
        .filter_map(|polygon| polygon.bounding_box().clip_to(window))
        .collect()
}

fn crop_example(scene: &Scene, window: &CropWindow, labels: String) -> Example {
    let image = scene.image.crop_imm(
        window.left as u32,
        window.top as u32,
        window.width as u32,
        window.height as u32,
    );

    Example {
        image,
        labels,
        window: *window,
    }
}

/// Produces one positive example around the polygon at `target_index`.
///
/// The chosen window fully contains the target's bounding box and lies
/// inside the scene image; every polygon in the scene (the target
/// included) that overlaps the window contributes one clipped, normalized
/// label line.
///
/// `target_index` must be a valid index into `scene.polygons`.
pub fn sample_positive<R: Rng + ?Sized>(
    scene: &Scene,
    target_index: usize,
    params: &SampleParams,
    rng: &mut R,
) -> Result<Example, CropsetError> {
    let target = scene.polygons[target_index].bounding_box();
    let window = place_positive_window(
        &target,
        scene.width() as i64,
        scene.height() as i64,
        params,
        rng,
    )?;

    let boxes = clipped_scene_boxes(scene, &window);
    let labels = label_lines(&boxes, window.width, window.height);

    Ok(crop_example(scene, &window, labels))
}

/// Searches for a window containing no object at all.
///
/// Draws up to `params.negative_attempts` uniformly placed windows and
/// accepts the first with an empty clipped label set. Dense scenes can
/// legitimately exhaust the budget; that outcome is reported, never
/// silently turned into a false-empty example.
pub fn sample_negative<R: Rng + ?Sized>(
    scene: &Scene,
    params: &SampleParams,
    rng: &mut R,
) -> Result<NegativeSample, CropsetError> {
    for _ in 0..params.negative_attempts {
        let window = place_random_window(
            scene.width() as i64,
            scene.height() as i64,
            params,
            rng,
        )?;

        if clipped_scene_boxes(scene, &window).is_empty() {
            return Ok(NegativeSample::Found(crop_example(
                scene,
                &window,
                String::new(),
            )));
        }
    }

    Ok(NegativeSample::Exhausted {
        attempts: params.negative_attempts,
    })
}
