//! Square-crop derivation, resizing, and keypoint remapping.
//!
//! These are the pure geometric transforms every reader shares: derive a
//! square crop from a bounding region, resize it to the target edge length,
//! and remap raw pixel keypoints into the canonical [-1, 1] frame of the
//! resized crop.

use image::imageops::{self, FilterType};
use image::RgbImage;

use super::coord::Coord;
use super::region::Region;
use super::space::{Canonical, Pixel};
use crate::error::UnisetError;

/// Result of [`square_crop_and_resize`].
///
/// `scale` and `origin` are the parameters needed to carry raw pixel
/// keypoints into the crop with [`remap_keypoint`].
#[derive(Clone, Debug)]
pub struct SquareCrop {
    /// The cropped image, resized to `target_size × target_size`.
    pub image: RgbImage,
    /// `target_size / side`, where `side` is the pre-resize square edge.
    pub scale: f64,
    /// Top-left corner of the square crop in the source image.
    pub origin: Coord<Pixel>,
}

/// Derives a square crop around `region`, resizes it to
/// `target_size × target_size`, and returns the remapping parameters.
///
/// The square's side is `max(width, height)` of the region; the shorter
/// dimension expands symmetrically around the box center. Expansion is
/// clamped to the image bounds, so a region touching an edge produces an
/// off-center crop. This asymmetry is intentional and must be preserved:
/// downstream keypoint remapping assumes exactly this origin.
///
/// Fails with [`UnisetError::InvalidRegion`] when the region is degenerate
/// or lies entirely outside the image.
pub fn square_crop_and_resize(
    img: &RgbImage,
    region: &Region,
    target_size: u32,
) -> Result<SquareCrop, UnisetError> {
    region.require_valid()?;

    let width = region.width();
    let height = region.height();
    let side = region.side();

    // Symmetric expansion of the shorter dimension, clamped at zero. The
    // high edge clamps against the image dimension below.
    let x1 = (region.x1 - (side - width) / 2).max(0);
    let y1 = (region.y1 - (side - height) / 2).max(0);
    let x2 = (x1 + side).min(i64::from(img.width()));
    let y2 = (y1 + side).min(i64::from(img.height()));

    if x2 <= x1 || y2 <= y1 {
        return Err(UnisetError::InvalidRegion {
            x1: region.x1,
            y1: region.y1,
            x2: region.x2,
            y2: region.y2,
        });
    }

    let crop = imageops::crop_imm(
        img,
        x1 as u32,
        y1 as u32,
        (x2 - x1) as u32,
        (y2 - y1) as u32,
    )
    .to_image();
    let resized = imageops::resize(&crop, target_size, target_size, FilterType::Triangle);

    Ok(SquareCrop {
        image: resized,
        scale: f64::from(target_size) / side as f64,
        origin: Coord::new(x1 as f64, y1 as f64),
    })
}

/// Remaps a raw pixel keypoint into the canonical [-1, 1] frame of a crop.
///
/// Subtracts the crop origin, applies the crop's scale, then maps
/// `[0, target_size]` to `[-1, 1]` via `2 * (v / target_size) - 1`.
///
/// Only call this for keypoints flagged visible; invisible keypoints keep
/// their raw (sentinel) values and are gated by the visibility flag.
pub fn remap_keypoint(
    raw: Coord<Pixel>,
    origin: Coord<Pixel>,
    scale: f64,
    target_size: u32,
) -> Coord<Canonical> {
    let target = f64::from(target_size);
    let x = (raw.x - origin.x) * scale;
    let y = (raw.y - origin.y) * scale;
    Coord::new(2.0 * (x / target) - 1.0, 2.0 * (y / target) - 1.0)
}

/// Crops a `crop_w × crop_h` window centred on the image.
///
/// The center is computed with integer division, matching the aligned-face
/// layouts this is used on. The window is clamped to the image bounds.
pub fn center_crop(img: &RgbImage, crop_w: u32, crop_h: u32) -> RgbImage {
    let x0 = (img.width() / 2).saturating_sub(crop_w / 2);
    let y0 = (img.height() / 2).saturating_sub(crop_h / 2);
    let w = crop_w.min(img.width() - x0);
    let h = crop_h.min(img.height() - y0);
    imageops::crop_imm(img, x0, y0, w, h).to_image()
}

/// Resizes an image to a square of the given edge length.
pub fn resize_square(img: &RgbImage, size: u32) -> RgbImage {
    imageops::resize(img, size, size, FilterType::Triangle)
}

/// Resizes an image to the given width × height.
pub fn resize_to(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    imageops::resize(img, width, height, FilterType::Triangle)
}
