//! Geometric normalization primitives.
//!
//! Every reader funnels its raw coordinates through this module: bounding
//! regions become square crops of a fixed edge length, and raw pixel
//! keypoints are remapped into the canonical [-1, 1] frame of the crop.
//! Coordinate frames are tracked at the type level so pixel-frame and
//! canonical-frame values cannot be mixed.

mod coord;
mod crop;
mod region;
mod space;

pub use coord::Coord;
pub use crop::{
    center_crop, remap_keypoint, resize_square, resize_to, square_crop_and_resize, SquareCrop,
};
pub use region::Region;
pub use space::{Canonical, Pixel};
