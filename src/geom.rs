//! Pixel-space boxes, crop windows, and label rendering.
//!
//! Everything here works in integer pixel coordinates. Boxes only become
//! fractional at the very end, when [`label_lines`] divides by the canvas
//! dimensions to produce normalized label text.

/// An axis-aligned box in pixel space (left, top, right, bottom).
///
/// Well-formed boxes satisfy `left <= right` and `top <= bottom`. The type
/// does not enforce this in the constructor; boxes are always derived from
/// polygon extrema or rebuilt by clipping, both of which preserve ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBox {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl PixelBox {
    #[inline]
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Returns the width of the box.
    #[inline]
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    /// Returns the height of the box.
    #[inline]
    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// Returns true if the box is properly ordered on both axes.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    /// Translates the box into the window's local frame and clips it to the
    /// window extent.
    ///
    /// Returns `None` when the box has no overlap with the window at all:
    /// fully left of, fully right of, fully above, or fully below it. Each
    /// check is an independent early-out; a box can be off in more than one
    /// direction at once. Boxes that only partially overlap are kept and
    /// clamped into `[0, width] x [0, height]`.
    pub fn clip_to(&self, window: &CropWindow) -> Option<PixelBox> {
        let width = window.width;
        let height = window.height;

        let left = self.left - window.left;
        let right = self.right - window.left;
        let top = self.top - window.top;
        let bottom = self.bottom - window.top;

        if left < 0 && right < 0 {
            return None;
        }
        if left > width && right > width {
            return None;
        }
        if top < 0 && bottom < 0 {
            return None;
        }
        if top > height && bottom > height {
            return None;
        }

        Some(PixelBox {
            left: left.max(0),
            top: top.max(0),
            right: right.min(width),
            bottom: bottom.min(height),
        })
    }
}

/// A fixed-size rectangular region positioned within an image.
///
/// Windows exist only for the duration of one sampling call; the crops they
/// describe are persisted, the windows themselves never are.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropWindow {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl CropWindow {
    #[inline]
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> i64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i64 {
        self.top + self.height
    }

    /// True if `inner` lies fully inside this window in absolute
    /// coordinates.
    pub fn contains_box(&self, inner: &PixelBox) -> bool {
        self.left <= inner.left
            && self.top <= inner.top
            && inner.right <= self.right()
            && inner.bottom <= self.bottom()
    }
}

/// Renders window-local boxes as detection label text.
///
/// One line per box: `0 center_x center_y width height`, the four geometric
/// fields normalized by the canvas dimensions. The class id is fixed at 0,
/// the single object class. No boxes produces an empty string, which is the
/// valid label of a negative example.
pub fn label_lines(boxes: &[PixelBox], canvas_width: i64, canvas_height: i64) -> String {
    let mut lines = String::new();

    let canvas_w = canvas_width as f64;
    let canvas_h = canvas_height as f64;

    for bx in boxes {
        let width = bx.width() as f64;
        let height = bx.height() as f64;
        let center_x = (bx.left + bx.right) as f64 / 2.0;
        let center_y = (bx.top + bx.bottom) as f64 / 2.0;

        lines.push_str(&format!(
            "0 {} {} {} {}\n",
            center_x / canvas_w,
            center_y / canvas_h,
            width / canvas_w,
            height / canvas_h
        ));
    }

    lines
}
